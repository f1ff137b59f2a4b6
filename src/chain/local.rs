//! In-process simulated mainnet/schain pair
//!
//! Implements all three collaborator traits against shared in-memory
//! ledgers. Timing follows the live setup closely enough for the
//! scenarios' polling to matter: transactions get a receipt one block
//! time after submission, and bridged assets arrive on the other chain
//! one relay delay after the agent accepted them.
//!
//! Bridged ERC20 tokens are routed by index. The first delivery for an
//! index creates a clone contract on the schain; bridging a different
//! mainnet token under the same index re-registers the index with a fresh
//! clone. Exits from the schain are charged an exit fee against the
//! sender's transfer cost budget, see [`ChainGateway::fund_transfer_costs`].

use async_trait::async_trait;
use sha3::{Digest, Keccak256};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{
    Address, Asset, BridgeAgent, Chain, ChainGateway, Direction, NodeAdmin, PrivateKey,
    TokenHandle, TokenSpec, TransferIntent, TxHash,
};
use crate::common::config::LocalConfig;
use crate::common::{Error, Result};

/// Work applied to the network state once a delay elapses
type Delivery = Box<dyn FnOnce(&mut State) + Send>;

/// Bridge endpoint last set through [`NodeAdmin::reconfigure_bridge`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeEndpoint {
    pub schain_name: String,
    pub mainnet_rpc_url: String,
}

struct TokenState {
    owner: Address,
    symbol: String,
    cap: u128,
    minted: u128,
    balances: HashMap<Address, u128>,
}

impl TokenState {
    fn new(owner: Address, symbol: &str, cap: u128) -> Self {
        Self {
            owner,
            symbol: symbol.to_string(),
            cap,
            minted: 0,
            balances: HashMap::new(),
        }
    }

    fn balance(&self, owner: Address) -> u128 {
        self.balances.get(&owner).copied().unwrap_or(0)
    }

    fn credit(&mut self, owner: Address, amount: u128) {
        *self.balances.entry(owner).or_default() += amount;
    }

    fn debit(&mut self, owner: Address, amount: u128) -> Result<()> {
        let have = self.balance(owner);
        if have < amount {
            return Err(Error::Transfer(format!(
                "{} balance of {} is {}, cannot move {}",
                self.symbol, owner, have, amount
            )));
        }
        self.balances.insert(owner, have - amount);
        Ok(())
    }
}

struct Ledger {
    chain: Chain,
    /// Native coin granted to accounts seen for the first time
    faucet: u128,
    nonces: HashMap<Address, u64>,
    native: HashMap<Address, u128>,
    tokens: HashMap<Address, TokenState>,
    receipts: HashSet<TxHash>,
}

impl Ledger {
    fn new(chain: Chain, faucet: u128) -> Self {
        Self {
            chain,
            faucet,
            nonces: HashMap::new(),
            native: HashMap::new(),
            tokens: HashMap::new(),
            receipts: HashSet::new(),
        }
    }

    fn native_entry(&mut self, owner: Address) -> &mut u128 {
        let faucet = self.faucet;
        self.native.entry(owner).or_insert(faucet)
    }

    fn token(&mut self, address: Address) -> Result<&mut TokenState> {
        let chain = self.chain;
        self.tokens
            .get_mut(&address)
            .ok_or_else(|| Error::chain(chain, format!("no token contract at {address}")))
    }
}

/// Mainnet token and its schain clone registered under one bridge index
struct Erc20Route {
    origin: Address,
    clone: Address,
}

struct State {
    mainnet: Ledger,
    schain: Ledger,
    routes: HashMap<u32, Erc20Route>,
    transfer_budget: HashMap<Address, u128>,
    bridge_endpoint: Option<BridgeEndpoint>,
    restarts: HashMap<String, u32>,
    relay_halted: bool,
    tx_counter: u64,
}

impl State {
    fn ledger(&mut self, chain: Chain) -> &mut Ledger {
        match chain {
            Chain::Mainnet => &mut self.mainnet,
            Chain::Schain => &mut self.schain,
        }
    }

    fn next_tx_hash(&mut self, chain: Chain, sender: Address) -> TxHash {
        self.tx_counter += 1;
        let mut hasher = Keccak256::new();
        hasher.update(chain.to_string().as_bytes());
        hasher.update(sender.as_bytes());
        hasher.update(self.tx_counter.to_be_bytes());
        TxHash(hasher.finalize().into())
    }

    /// Schain clone for `origin` under `index`, created on first use
    fn clone_for(&mut self, index: u32, origin: Address, symbol: &str) -> Address {
        if let Some(route) = self.routes.get(&index) {
            if route.origin == origin {
                return route.clone;
            }
        }

        let clone = derive_address(&[b"clone", origin.as_bytes(), &index.to_be_bytes()]);
        self.schain
            .tokens
            .entry(clone)
            .or_insert_with(|| TokenState::new(Address::ZERO, symbol, u128::MAX));
        self.routes.insert(index, Erc20Route { origin, clone });
        info!(index, %origin, %clone, "Registered schain clone");
        clone
    }

    /// Bridge index and mainnet origin of a schain clone
    fn route_of_clone(&self, clone: Address) -> Option<(u32, Address)> {
        self.routes
            .iter()
            .find(|(_, route)| route.clone == clone)
            .map(|(index, route)| (*index, route.origin))
    }
}

fn derive_address(parts: &[&[u8]]) -> Address {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    let hash = hasher.finalize();
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address::from_bytes(bytes)
}

/// Shared handle to the simulated network
#[derive(Clone)]
pub struct LocalNetwork {
    state: Arc<Mutex<State>>,
    settings: LocalConfig,
}

impl LocalNetwork {
    pub fn new(settings: LocalConfig) -> Self {
        let state = State {
            mainnet: Ledger::new(Chain::Mainnet, u128::from(settings.faucet_wei)),
            schain: Ledger::new(Chain::Schain, 0),
            routes: HashMap::new(),
            transfer_budget: HashMap::new(),
            bridge_endpoint: None,
            restarts: HashMap::new(),
            relay_halted: false,
            tx_counter: 0,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            settings,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| Error::Internal("local network state poisoned".to_string()))
    }

    /// Apply `delivery` after `delay` on a background task
    fn schedule(&self, delay: Duration, what: String, relayed: bool, delivery: Delivery) {
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Ok(mut state) = state.lock() else {
                return;
            };
            if relayed && state.relay_halted {
                warn!(%what, "Relay halted, message dropped");
                return;
            }
            delivery(&mut state);
            debug!(%what, "Delivered");
        });
    }

    /// Validate and debit the source side of a transfer.
    ///
    /// Returns the credit to apply on the destination chain.
    fn accept(&self, state: &mut State, intent: &TransferIntent) -> Result<Delivery> {
        let from = intent.from.address();
        let to = intent.to.address();
        let amount = intent.amount;
        let exit_fee = u128::from(self.settings.exit_fee_wei);

        if intent.direction == Direction::SchainToMainnet {
            let budget = state.transfer_budget.get(&from).copied().unwrap_or(0);
            if budget < exit_fee {
                return Err(Error::Transfer(format!(
                    "exit fee of {exit_fee} wei exceeds the transfer cost budget of {budget} wei for {from}"
                )));
            }
        }

        let delivery: Delivery = match (&intent.asset, intent.direction) {
            (Asset::Erc20 { token, index }, Direction::MainnetToSchain) => {
                let index = index.ok_or_else(|| {
                    Error::Transfer("ERC20 transfers to the schain need a token index".to_string())
                })?;
                if token.chain != Chain::Mainnet {
                    return Err(Error::Transfer(format!(
                        "token {} does not live on mainnet",
                        token.address
                    )));
                }
                let origin = token.address;
                let erc20 = state.mainnet.token(origin)?;
                erc20.debit(from, amount)?;
                let symbol = erc20.symbol.clone();

                Box::new(move |state: &mut State| {
                    let clone = state.clone_for(index, origin, &symbol);
                    if let Some(erc20) = state.schain.tokens.get_mut(&clone) {
                        erc20.credit(to, amount);
                    }
                })
            }
            (Asset::Erc20 { token, .. }, Direction::SchainToMainnet) => {
                let (_, origin) = state
                    .route_of_clone(token.address)
                    .filter(|_| token.chain == Chain::Schain)
                    .ok_or_else(|| {
                        Error::Transfer(format!("{} is not a bridged schain token", token.address))
                    })?;
                state.schain.token(token.address)?.debit(from, amount)?;

                Box::new(move |state: &mut State| {
                    if let Some(erc20) = state.mainnet.tokens.get_mut(&origin) {
                        erc20.credit(to, amount);
                    }
                })
            }
            (Asset::NativeCoin, direction) => {
                let source = state.ledger(direction.source());
                let balance = source.native_entry(from);
                if *balance < amount {
                    return Err(Error::Transfer(format!(
                        "native balance of {from} on {} is {balance} wei, cannot move {amount}",
                        direction.source()
                    )));
                }
                *balance -= amount;

                let destination = direction.destination();
                Box::new(move |state: &mut State| {
                    *state.ledger(destination).native_entry(to) += amount;
                })
            }
        };

        if intent.direction == Direction::SchainToMainnet {
            if let Some(budget) = state.transfer_budget.get_mut(&from) {
                *budget -= exit_fee;
            }
        }

        Ok(delivery)
    }

    /// Bridge endpoint configured on the schain nodes, if any
    pub fn bridge_endpoint(&self) -> Option<BridgeEndpoint> {
        self.lock().ok().and_then(|state| state.bridge_endpoint.clone())
    }

    /// Number of restarts of a schain node
    pub fn restart_count(&self, schain_name: &str) -> u32 {
        self.lock()
            .ok()
            .and_then(|state| state.restarts.get(schain_name).copied())
            .unwrap_or(0)
    }

    /// Remaining exit fee budget of an account
    pub fn transfer_budget(&self, owner: Address) -> u128 {
        self.lock()
            .ok()
            .and_then(|state| state.transfer_budget.get(&owner).copied())
            .unwrap_or(0)
    }

    /// Drop relayed messages until [`resume_relay`](Self::resume_relay)
    pub fn halt_relay(&self) {
        if let Ok(mut state) = self.lock() {
            state.relay_halted = true;
        }
    }

    pub fn resume_relay(&self) {
        if let Ok(mut state) = self.lock() {
            state.relay_halted = false;
        }
    }

    /// Overwrite a token balance directly, bypassing transactions
    pub fn set_token_balance(&self, token: &TokenHandle, owner: Address, amount: u128) -> Result<()> {
        let mut state = self.lock()?;
        state
            .ledger(token.chain)
            .token(token.address)?
            .balances
            .insert(owner, amount);
        Ok(())
    }
}

#[async_trait]
impl ChainGateway for LocalNetwork {
    async fn deploy_token(
        &self,
        chain: Chain,
        deployer: &PrivateKey,
        spec: &TokenSpec,
    ) -> Result<TokenHandle> {
        let owner = deployer.address();
        let mut state = self.lock()?;
        let ledger = state.ledger(chain);

        let nonce = ledger.nonces.entry(owner).or_default();
        let address = derive_address(&[owner.as_bytes(), &nonce.to_be_bytes()]);
        *nonce += 1;

        ledger
            .tokens
            .insert(address, TokenState::new(owner, &spec.symbol, spec.supply));
        info!(%chain, name = %spec.name, symbol = %spec.symbol, %address, "Deployed ERC20");

        Ok(TokenHandle {
            chain,
            address,
            symbol: spec.symbol.clone(),
        })
    }

    async fn nonce(&self, chain: Chain, address: Address) -> Result<u64> {
        let mut state = self.lock()?;
        Ok(state.ledger(chain).nonces.get(&address).copied().unwrap_or(0))
    }

    async fn send_mint(
        &self,
        token: &TokenHandle,
        signer: &PrivateKey,
        to: Address,
        amount: u128,
        nonce: u64,
    ) -> Result<TxHash> {
        let sender = signer.address();
        let chain = token.chain;

        let tx = {
            let mut state = self.lock()?;
            let ledger = state.ledger(chain);

            let expected = ledger.nonces.get(&sender).copied().unwrap_or(0);
            if nonce != expected {
                return Err(Error::chain(
                    chain,
                    format!("nonce mismatch for {sender}: expected {expected}, got {nonce}"),
                ));
            }

            let erc20 = ledger.token(token.address)?;
            if erc20.owner != sender {
                return Err(Error::chain(chain, format!("{sender} is not the minter of {}", token.symbol)));
            }
            if erc20.minted.saturating_add(amount) > erc20.cap {
                return Err(Error::chain(
                    chain,
                    format!("minting {amount} exceeds the {} supply cap of {}", token.symbol, erc20.cap),
                ));
            }
            erc20.minted += amount;
            ledger.nonces.insert(sender, expected + 1);

            state.next_tx_hash(chain, sender)
        };

        debug!(%chain, %tx, %to, amount, "Mint submitted");

        let address = token.address;
        self.schedule(
            self.settings.block_time(),
            format!("mint {tx}"),
            false,
            Box::new(move |state: &mut State| {
                let ledger = state.ledger(chain);
                if let Some(erc20) = ledger.tokens.get_mut(&address) {
                    erc20.credit(to, amount);
                }
                ledger.receipts.insert(tx);
            }),
        );

        Ok(tx)
    }

    async fn receipt_present(&self, chain: Chain, tx: &TxHash) -> Result<bool> {
        let mut state = self.lock()?;
        Ok(state.ledger(chain).receipts.contains(tx))
    }

    async fn token_balance(&self, token: &TokenHandle, owner: Address) -> Result<u128> {
        let mut state = self.lock()?;
        Ok(state.ledger(token.chain).token(token.address)?.balance(owner))
    }

    async fn native_balance(&self, chain: Chain, owner: Address) -> Result<u128> {
        let mut state = self.lock()?;
        Ok(*state.ledger(chain).native_entry(owner))
    }

    async fn token_on_destination(&self, chain: Chain, index: u32) -> Result<Option<TokenHandle>> {
        let state = self.lock()?;
        let Some(route) = state.routes.get(&index) else {
            return Ok(None);
        };
        let address = match chain {
            Chain::Mainnet => route.origin,
            Chain::Schain => route.clone,
        };
        let ledger = match chain {
            Chain::Mainnet => &state.mainnet,
            Chain::Schain => &state.schain,
        };
        Ok(ledger.tokens.get(&address).map(|erc20| TokenHandle {
            chain,
            address,
            symbol: erc20.symbol.clone(),
        }))
    }

    async fn fund_transfer_costs(&self, key: &PrivateKey, amount: u128) -> Result<()> {
        let owner = key.address();
        let mut state = self.lock()?;

        let balance = state.schain.native_entry(owner);
        if *balance < amount {
            return Err(Error::chain(
                Chain::Schain,
                format!("{owner} holds {balance} wei, cannot fund {amount} wei of transfer costs"),
            ));
        }
        *balance -= amount;
        *state.transfer_budget.entry(owner).or_default() += amount;

        info!(%owner, amount, "Funded transfer cost budget");
        Ok(())
    }
}

#[async_trait]
impl BridgeAgent for LocalNetwork {
    async fn transfer(&self, intent: &TransferIntent, timeout: Duration) -> Result<()> {
        let inclusion = tokio::time::sleep(self.settings.block_time());
        if tokio::time::timeout(timeout, inclusion).await.is_err() {
            return Err(Error::Transfer(format!(
                "{} transfer not accepted within {} seconds",
                intent.asset,
                timeout.as_secs_f64()
            )));
        }

        let delivery = {
            let mut state = self.lock()?;
            self.accept(&mut state, intent)?
        };

        info!(
            asset = %intent.asset,
            amount = intent.amount,
            from = %intent.source(),
            to = %intent.destination(),
            "Transfer accepted"
        );

        let what = format!(
            "{} {} {} -> {}",
            intent.amount,
            intent.asset,
            intent.source(),
            intent.destination()
        );
        self.schedule(self.settings.relay_delay(), what, true, delivery);
        Ok(())
    }
}

#[async_trait]
impl NodeAdmin for LocalNetwork {
    async fn reconfigure_bridge(&self, schain_name: &str, mainnet_rpc_url: &str) -> Result<()> {
        let mut state = self.lock()?;
        state.bridge_endpoint = Some(BridgeEndpoint {
            schain_name: schain_name.to_string(),
            mainnet_rpc_url: mainnet_rpc_url.to_string(),
        });
        info!(schain = schain_name, mainnet_rpc_url, "Bridge reconfigured");
        Ok(())
    }

    async fn restart_chain_node(&self, schain_name: &str) -> Result<()> {
        let mut state = self.lock()?;
        *state.restarts.entry(schain_name.to_string()).or_default() += 1;
        info!(schain = schain_name, "Schain node restarted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> PrivateKey {
        PrivateKey::from_hex(&format!("{:02x}", byte).repeat(32)).unwrap()
    }

    fn network() -> LocalNetwork {
        LocalNetwork::new(LocalConfig::default())
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    async fn minted_token(net: &LocalNetwork, owner: &PrivateKey, amount: u128) -> TokenHandle {
        let token = net
            .deploy_token(Chain::Mainnet, owner, &TokenSpec::new("D2-Token", "D2", 100))
            .await
            .unwrap();
        let nonce = net.nonce(Chain::Mainnet, owner.address()).await.unwrap();
        net.send_mint(&token, owner, owner.address(), amount, nonce)
            .await
            .unwrap();
        settle().await;
        token
    }

    #[tokio::test(start_paused = true)]
    async fn test_mint_has_receipt_after_block_time() {
        let net = network();
        let owner = key(1);
        let token = net
            .deploy_token(Chain::Mainnet, &owner, &TokenSpec::new("D2-Token", "D2", 100))
            .await
            .unwrap();

        let nonce = net.nonce(Chain::Mainnet, owner.address()).await.unwrap();
        assert_eq!(nonce, 1);
        let tx = net
            .send_mint(&token, &owner, owner.address(), 3, nonce)
            .await
            .unwrap();

        assert!(!net.receipt_present(Chain::Mainnet, &tx).await.unwrap());
        assert_eq!(net.token_balance(&token, owner.address()).await.unwrap(), 0);

        settle().await;
        assert!(net.receipt_present(Chain::Mainnet, &tx).await.unwrap());
        assert_eq!(net.token_balance(&token, owner.address()).await.unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mint_rejects_stale_nonce_and_foreign_signer() {
        let net = network();
        let owner = key(1);
        let token = net
            .deploy_token(Chain::Mainnet, &owner, &TokenSpec::new("D2-Token", "D2", 100))
            .await
            .unwrap();

        let err = net
            .send_mint(&token, &owner, owner.address(), 1, 0)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nonce mismatch"));

        let stranger = key(2);
        let err = net
            .send_mint(&token, &stranger, stranger.address(), 1, 0)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not the minter"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mint_respects_supply_cap() {
        let net = network();
        let owner = key(1);
        let token = net
            .deploy_token(Chain::Mainnet, &owner, &TokenSpec::new("D2-Token", "D2", 5))
            .await
            .unwrap();
        let err = net
            .send_mint(&token, &owner, owner.address(), 6, 1)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("supply cap"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_erc20_round_trip() {
        let net = network();
        let (main_key, schain_key) = (key(1), key(2));
        let token = minted_token(&net, &main_key, 4).await;

        let out = TransferIntent::erc20(Direction::MainnetToSchain, &token, 1, &main_key, &schain_key, 4);
        net.transfer(&out, Duration::from_secs(10)).await.unwrap();
        assert_eq!(net.token_balance(&token, main_key.address()).await.unwrap(), 0);
        assert!(net.token_on_destination(Chain::Schain, 1).await.unwrap().is_none());

        settle().await;
        let clone = net.token_on_destination(Chain::Schain, 1).await.unwrap().unwrap();
        assert_eq!(clone.symbol, "D2");
        assert_eq!(net.token_balance(&clone, schain_key.address()).await.unwrap(), 4);

        // Exits need a funded cost budget
        let back = TransferIntent::erc20(Direction::SchainToMainnet, &clone, 1, &schain_key, &main_key, 2);
        let err = net.transfer(&back, Duration::from_secs(10)).await.unwrap_err();
        assert!(err.to_string().contains("transfer cost budget"));

        let fee = TransferIntent::native(Direction::MainnetToSchain, &main_key, &schain_key, 90_000_000_000_000_000);
        net.transfer(&fee, Duration::from_secs(10)).await.unwrap();
        settle().await;
        net.fund_transfer_costs(&schain_key, 90_000_000_000_000_000)
            .await
            .unwrap();

        net.transfer(&back, Duration::from_secs(10)).await.unwrap();
        settle().await;
        assert_eq!(net.token_balance(&clone, schain_key.address()).await.unwrap(), 2);
        assert_eq!(net.token_balance(&token, main_key.address()).await.unwrap(), 2);
        assert_eq!(
            net.transfer_budget(schain_key.address()),
            80_000_000_000_000_000
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_token_reuses_index_with_fresh_clone() {
        let net = network();
        let (main_key, schain_key) = (key(1), key(2));

        let first = minted_token(&net, &main_key, 1).await;
        let intent = TransferIntent::erc20(Direction::MainnetToSchain, &first, 1, &main_key, &schain_key, 1);
        net.transfer(&intent, Duration::from_secs(10)).await.unwrap();
        settle().await;
        let first_clone = net.token_on_destination(Chain::Schain, 1).await.unwrap().unwrap();

        let second = minted_token(&net, &main_key, 4).await;
        let intent = TransferIntent::erc20(Direction::MainnetToSchain, &second, 1, &main_key, &schain_key, 4);
        net.transfer(&intent, Duration::from_secs(10)).await.unwrap();
        settle().await;
        let second_clone = net.token_on_destination(Chain::Schain, 1).await.unwrap().unwrap();

        assert_ne!(first_clone.address, second_clone.address);
        assert_eq!(net.token_balance(&second_clone, schain_key.address()).await.unwrap(), 4);
        assert_eq!(net.token_balance(&first_clone, schain_key.address()).await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_halted_relay_drops_delivery() {
        let net = network();
        let (main_key, schain_key) = (key(1), key(2));
        net.halt_relay();

        let intent = TransferIntent::native(Direction::MainnetToSchain, &main_key, &schain_key, 1_000);
        net.transfer(&intent, Duration::from_secs(10)).await.unwrap();
        settle().await;
        assert_eq!(net.native_balance(Chain::Schain, schain_key.address()).await.unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transfer_times_out_before_acceptance() {
        let net = network();
        let (main_key, schain_key) = (key(1), key(2));
        let intent = TransferIntent::native(Direction::MainnetToSchain, &main_key, &schain_key, 1);

        let err = net
            .transfer(&intent, Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transfer(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_admin_bookkeeping() {
        let net = network();
        net.reconfigure_bridge("elastic-schain", "http://127.0.0.1:8545")
            .await
            .unwrap();
        net.restart_chain_node("elastic-schain").await.unwrap();
        net.restart_chain_node("elastic-schain").await.unwrap();

        assert_eq!(
            net.bridge_endpoint(),
            Some(BridgeEndpoint {
                schain_name: "elastic-schain".to_string(),
                mainnet_rpc_url: "http://127.0.0.1:8545".to_string(),
            })
        );
        assert_eq!(net.restart_count("elastic-schain"), 2);
        assert_eq!(net.restart_count("other"), 0);
    }
}
