//! Send ERC20 from schain to mainnet
//!
//! Round trip: tokens are first moved to the schain, then part of them is
//! sent back. The schain nodes' bridge is pointed at mainnet and the node
//! restarted before anything else happens.

use async_trait::async_trait;
use tracing::{error, info};

use super::{deploy_and_mint, fund_exit_fees, TOKEN_INDEX};
use crate::chain::{Direction, TokenHandle, TransferIntent};
use crate::common::{Error, Result};
use crate::testing::{CaseContext, Scenario, TestConfig, Verdict};

const AMOUNT: u128 = 4;

/// Tokens kept back on the schain when returning to mainnet
pub const FEE_TOKENS: u128 = 2;

#[derive(Debug, Default)]
pub struct Erc20ToMainnet {
    token: Option<TokenHandle>,
    clone: Option<TokenHandle>,
}

impl Erc20ToMainnet {
    pub fn boxed(_config: &TestConfig) -> Box<dyn Scenario> {
        Box::new(Self::default())
    }
}

#[async_trait]
impl Scenario for Erc20ToMainnet {
    async fn prepare(&mut self, ctx: &CaseContext<'_>) -> Result<()> {
        let config = ctx.config;

        ctx.admin()
            .reconfigure_bridge(&config.schain_name, &config.mainnet_rpc_url)
            .await?;
        ctx.admin().restart_chain_node(&config.schain_name).await?;

        let token = deploy_and_mint(ctx, AMOUNT).await?;

        let intent = TransferIntent::erc20(
            Direction::MainnetToSchain,
            &token,
            TOKEN_INDEX,
            &config.mainnet_key,
            &config.schain_key,
            AMOUNT,
        );
        ctx.agent().transfer(&intent, config.timeout).await?;

        fund_exit_fees(ctx, 0).await?;

        self.clone = Some(ctx.wait_for_clone(TOKEN_INDEX, &token).await?);
        self.token = Some(token);
        Ok(())
    }

    async fn execute(&mut self, ctx: &CaseContext<'_>, verdict: &mut Verdict) -> Result<()> {
        let (Some(token), Some(clone)) = (self.token.as_ref(), self.clone.as_ref()) else {
            return Err(Error::Internal("tokens missing after prepare".to_string()));
        };
        let config = ctx.config;
        let sender = ctx.schain_address();
        let receiver = ctx.mainnet_address();

        let held = ctx
            .poll_token_balance(clone, sender, |balance| *balance >= AMOUNT)
            .await?
            .into_value();
        if held < AMOUNT {
            let shortfall = Error::InsufficientBalance {
                have: held,
                need: AMOUNT,
            };
            error!(error = %shortfall, %sender, "Not enough tokens to send");
            verdict.note(shortfall.to_string());
            return Ok(());
        }

        let amount = AMOUNT - FEE_TOKENS;
        let intent = TransferIntent::erc20(
            Direction::SchainToMainnet,
            clone,
            TOKEN_INDEX,
            &config.schain_key,
            &config.mainnet_key,
            amount,
        );
        ctx.agent().transfer(&intent, config.timeout).await?;

        let balance = ctx
            .poll_token_balance(token, receiver, |balance| *balance == amount)
            .await?;
        if balance.is_reached() {
            info!(token = %token.address, %receiver, amount, "Tokens returned to mainnet");
            verdict.mark_passed();
        } else {
            verdict.note(format!(
                "expected {amount} {} on mainnet for {receiver}, observed {}",
                token.symbol,
                balance.value()
            ));
        }
        Ok(())
    }
}
