//! Bridge scenarios
//!
//! Each scenario moves one asset across the bridge in one direction and
//! checks the balance that should have changed on the other side.

mod erc20_to_mainnet;
mod erc20_to_schain;
mod eth_to_mainnet;
mod eth_to_schain;

pub use erc20_to_mainnet::{Erc20ToMainnet, FEE_TOKENS};
pub use erc20_to_schain::Erc20ToSchain;
pub use eth_to_mainnet::EthToMainnet;
pub use eth_to_schain::EthToSchain;

use tracing::info;

use crate::chain::{Chain, Direction, TokenHandle, TokenSpec, TransferIntent};
use crate::common::Result;
use crate::testing::wait::wait_for;
use crate::testing::{CaseContext, TestPool};

pub const ERC20_TO_SCHAIN: &str = "erc20-to-schain";
pub const ERC20_TO_MAINNET: &str = "erc20-to-mainnet";
pub const ETH_TO_SCHAIN: &str = "eth-to-schain";
pub const ETH_TO_MAINNET: &str = "eth-to-mainnet";

/// Bridge index the test token is registered under
pub const TOKEN_INDEX: u32 = 1;

/// Native coin committed to exit fees before leaving the schain, in wei
pub const TRANSFER_COST_BUDGET: u128 = 90 * 10u128.pow(15);

const TOKEN_NAME: &str = "D2-Token";
const TOKEN_SYMBOL: &str = "D2";
const TOKEN_SUPPLY: u128 = 100;

/// Register every built-in scenario in run order
pub fn register_all(pool: &mut TestPool) -> Result<()> {
    pool.register(ERC20_TO_SCHAIN, Erc20ToSchain::boxed)?;
    pool.register(ERC20_TO_MAINNET, Erc20ToMainnet::boxed)?;
    pool.register(ETH_TO_SCHAIN, EthToSchain::boxed)?;
    pool.register(ETH_TO_MAINNET, EthToMainnet::boxed)?;
    Ok(())
}

/// Pool holding every built-in scenario
pub fn default_pool() -> Result<TestPool> {
    let mut pool = TestPool::new();
    register_all(&mut pool)?;
    Ok(pool)
}

/// One-line description of a built-in scenario
pub fn describe(name: &str) -> Option<&'static str> {
    match name {
        ERC20_TO_SCHAIN => Some("Send ERC20 to schain"),
        ERC20_TO_MAINNET => Some("Send ERC20 from schain to mainnet"),
        ETH_TO_SCHAIN => Some("Send ETH to schain"),
        ETH_TO_MAINNET => Some("Send ETH from schain to mainnet"),
        _ => None,
    }
}

/// Deploy the test token on mainnet and mint `amount` to the mainnet account
async fn deploy_and_mint(ctx: &CaseContext<'_>, amount: u128) -> Result<TokenHandle> {
    let key = &ctx.config.mainnet_key;
    let owner = ctx.mainnet_address();

    let token = ctx
        .chain()
        .deploy_token(
            Chain::Mainnet,
            key,
            &TokenSpec::new(TOKEN_NAME, TOKEN_SYMBOL, TOKEN_SUPPLY),
        )
        .await?;

    let nonce = ctx.chain().nonce(Chain::Mainnet, owner).await?;
    let tx = ctx.chain().send_mint(&token, key, owner, amount, nonce).await?;
    ctx.wait_for_receipt(Chain::Mainnet, tx).await?;

    info!(token = %token.address, %owner, amount, "Minted test tokens");
    Ok(token)
}

/// Bridge native coin to the schain account and commit
/// [`TRANSFER_COST_BUDGET`] of it to exit fees.
///
/// `spare` wei on top of the budget stay on the account.
async fn fund_exit_fees(ctx: &CaseContext<'_>, spare: u128) -> Result<()> {
    let config = ctx.config;
    let schain = ctx.schain_address();
    let amount = TRANSFER_COST_BUDGET + spare;

    let before = ctx.chain().native_balance(Chain::Schain, schain).await?;
    let intent = TransferIntent::native(
        Direction::MainnetToSchain,
        &config.mainnet_key,
        &config.schain_key,
        amount,
    );
    ctx.agent().transfer(&intent, config.timeout).await?;

    let target = before + amount;
    wait_for(
        &format!("{amount} wei to reach {schain} on schain"),
        &config.polling,
        || ctx.chain().native_balance(Chain::Schain, schain),
        |balance| *balance >= target,
    )
    .await?;

    ctx.chain()
        .fund_transfer_costs(&config.schain_key, TRANSFER_COST_BUDGET)
        .await
}
