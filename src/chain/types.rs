//! Value types shared by the chain collaborators

use k256::ecdsa::SigningKey;
use serde::Serialize;
use sha3::{Digest, Keccak256};
use std::fmt;

use crate::common::{Error, Result};

/// One side of the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Chain {
    Mainnet,
    Schain,
}

impl Chain {
    /// The chain on the other side of the bridge
    pub fn counterpart(self) -> Self {
        match self {
            Chain::Mainnet => Chain::Schain,
            Chain::Schain => Chain::Mainnet,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::Mainnet => write!(f, "mainnet"),
            Chain::Schain => write!(f, "schain"),
        }
    }
}

/// 20-byte account or contract address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// secp256k1 private key of a test account
///
/// The key material never appears in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// Parse a hex key, with or without `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|e| Error::InvalidKey(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| Error::InvalidKey(format!("expected 32 bytes, got {}", v.len())))?;

        // Rejects zero and out-of-range scalars
        SigningKey::from_slice(&bytes).map_err(|e| Error::InvalidKey(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Ethereum address controlled by this key
    ///
    /// Keccak-256 of the uncompressed public key without its `0x04` tag,
    /// last 20 bytes.
    pub fn address(&self) -> Address {
        let signing_key = match SigningKey::from_slice(&self.0) {
            Ok(key) => key,
            // Validated in from_hex
            Err(_) => return Address::ZERO,
        };
        let encoded = signing_key.verifying_key().to_encoded_point(false);
        let hash = Keccak256::digest(&encoded.as_bytes()[1..]);

        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Address(bytes)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({})", self.address())
    }
}

/// Hash of a submitted transaction
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TxHash(pub [u8; 32]);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Parameters of an ERC20 deployment
#[derive(Debug, Clone)]
pub struct TokenSpec {
    pub name: String,
    pub symbol: String,
    pub supply: u128,
}

impl TokenSpec {
    pub fn new(name: &str, symbol: &str, supply: u128) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            supply,
        }
    }
}

/// A deployed ERC20 contract on a specific chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHandle {
    pub chain: Chain,
    pub address: Address,
    pub symbol: String,
}

/// Asset moved by a bridge transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
    /// ERC20 token, identified on the destination by its bridge index
    Erc20 {
        token: TokenHandle,
        index: Option<u32>,
    },
    /// The chain's native coin, in wei
    NativeCoin,
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Erc20 { token, .. } => write!(f, "ERC20 {}", token.symbol),
            Asset::NativeCoin => write!(f, "native coin"),
        }
    }
}

/// Direction of a bridge transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    MainnetToSchain,
    SchainToMainnet,
}

impl Direction {
    pub fn source(self) -> Chain {
        match self {
            Direction::MainnetToSchain => Chain::Mainnet,
            Direction::SchainToMainnet => Chain::Schain,
        }
    }

    pub fn destination(self) -> Chain {
        self.source().counterpart()
    }
}

/// Everything the agent needs to move one asset across the bridge
#[derive(Debug, Clone)]
pub struct TransferIntent {
    pub asset: Asset,
    pub amount: u128,
    pub direction: Direction,
    pub from: PrivateKey,
    pub to: PrivateKey,
}

impl TransferIntent {
    /// Transfer of an ERC20 token registered under `index` on the bridge
    pub fn erc20(
        direction: Direction,
        token: &TokenHandle,
        index: u32,
        from: &PrivateKey,
        to: &PrivateKey,
        amount: u128,
    ) -> Self {
        Self {
            asset: Asset::Erc20 {
                token: token.clone(),
                index: Some(index),
            },
            amount,
            direction,
            from: from.clone(),
            to: to.clone(),
        }
    }

    /// Transfer of native coin
    pub fn native(direction: Direction, from: &PrivateKey, to: &PrivateKey, amount: u128) -> Self {
        Self {
            asset: Asset::NativeCoin,
            amount,
            direction,
            from: from.clone(),
            to: to.clone(),
        }
    }

    pub fn source(&self) -> Chain {
        self.direction.source()
    }

    pub fn destination(&self) -> Chain {
        self.direction.destination()
    }
}
