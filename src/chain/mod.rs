//! Chain-side collaborators
//!
//! Scenarios never talk to a node directly. They go through three traits:
//! [`ChainGateway`] for reads and transactions on either chain,
//! [`BridgeAgent`] for cross-chain transfers and [`NodeAdmin`] for
//! operating the schain nodes. [`Environment`] bundles one implementation
//! of each.

pub mod local;
pub mod shell;
mod types;

pub use types::{
    Address, Asset, Chain, Direction, PrivateKey, TokenHandle, TokenSpec, TransferIntent, TxHash,
};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::common::Result;
use local::LocalNetwork;

/// Reads and transactions on mainnet and the schain
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Address controlled by a private key
    fn address_of(&self, key: &PrivateKey) -> Address {
        key.address()
    }

    /// Deploy an ERC20 contract owned by `deployer`
    async fn deploy_token(
        &self,
        chain: Chain,
        deployer: &PrivateKey,
        spec: &TokenSpec,
    ) -> Result<TokenHandle>;

    /// Next transaction nonce of an account
    async fn nonce(&self, chain: Chain, address: Address) -> Result<u64>;

    /// Sign and broadcast a `mint(to, amount)` call with an explicit nonce
    async fn send_mint(
        &self,
        token: &TokenHandle,
        signer: &PrivateKey,
        to: Address,
        amount: u128,
        nonce: u64,
    ) -> Result<TxHash>;

    /// Whether a receipt exists for a submitted transaction
    async fn receipt_present(&self, chain: Chain, tx: &TxHash) -> Result<bool>;

    /// ERC20 `balanceOf(owner)`
    async fn token_balance(&self, token: &TokenHandle, owner: Address) -> Result<u128>;

    /// Native coin balance in wei
    async fn native_balance(&self, chain: Chain, owner: Address) -> Result<u128>;

    /// Token registered under a bridge index on `chain`, once it exists
    async fn token_on_destination(&self, chain: Chain, index: u32) -> Result<Option<TokenHandle>>;

    /// Move schain native coin of `key` into the budget that pays exit fees
    async fn fund_transfer_costs(&self, key: &PrivateKey, amount: u128) -> Result<()>;
}

/// Relays asset transfers between the two chains
#[async_trait]
pub trait BridgeAgent: Send + Sync {
    /// Submit a transfer and block until the source chain accepted it.
    ///
    /// Delivery on the destination chain happens later, out of band.
    async fn transfer(&self, intent: &TransferIntent, timeout: Duration) -> Result<()>;
}

/// Operational control over schain nodes
#[async_trait]
pub trait NodeAdmin: Send + Sync {
    /// Point the schain nodes' bridge at a mainnet endpoint
    async fn reconfigure_bridge(&self, schain_name: &str, mainnet_rpc_url: &str) -> Result<()>;

    /// Restart the schain node daemon
    async fn restart_chain_node(&self, schain_name: &str) -> Result<()>;
}

/// The collaborators a test case runs against
#[derive(Clone)]
pub struct Environment {
    pub chain: Arc<dyn ChainGateway>,
    pub agent: Arc<dyn BridgeAgent>,
    pub admin: Arc<dyn NodeAdmin>,
}

impl Environment {
    pub fn new(
        chain: Arc<dyn ChainGateway>,
        agent: Arc<dyn BridgeAgent>,
        admin: Arc<dyn NodeAdmin>,
    ) -> Self {
        Self {
            chain,
            agent,
            admin,
        }
    }

    /// Use the in-process network for all three roles
    pub fn local(network: LocalNetwork) -> Self {
        Self {
            chain: Arc::new(network.clone()),
            agent: Arc::new(network.clone()),
            admin: Arc::new(network),
        }
    }

    /// Replace the node admin implementation
    pub fn with_admin(mut self, admin: Arc<dyn NodeAdmin>) -> Self {
        self.admin = admin;
        self
    }
}
