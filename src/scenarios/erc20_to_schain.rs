//! Send ERC20 to schain

use async_trait::async_trait;
use tracing::info;

use super::{deploy_and_mint, TOKEN_INDEX};
use crate::chain::{Direction, TokenHandle, TransferIntent};
use crate::common::{Error, Result};
use crate::testing::{CaseContext, Scenario, TestConfig, Verdict};

const AMOUNT: u128 = 1;

/// Mint one token on mainnet, bridge it and expect exactly one on the schain
#[derive(Debug, Default)]
pub struct Erc20ToSchain {
    token: Option<TokenHandle>,
}

impl Erc20ToSchain {
    pub fn boxed(_config: &TestConfig) -> Box<dyn Scenario> {
        Box::new(Self::default())
    }
}

#[async_trait]
impl Scenario for Erc20ToSchain {
    async fn prepare(&mut self, ctx: &CaseContext<'_>) -> Result<()> {
        self.token = Some(deploy_and_mint(ctx, AMOUNT).await?);
        Ok(())
    }

    async fn execute(&mut self, ctx: &CaseContext<'_>, verdict: &mut Verdict) -> Result<()> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| Error::Internal("token missing after prepare".to_string()))?;
        let config = ctx.config;

        let intent = TransferIntent::erc20(
            Direction::MainnetToSchain,
            token,
            TOKEN_INDEX,
            &config.mainnet_key,
            &config.schain_key,
            AMOUNT,
        );
        ctx.agent().transfer(&intent, config.timeout).await?;

        let clone = ctx.wait_for_clone(TOKEN_INDEX, token).await?;
        let receiver = ctx.schain_address();
        let balance = ctx
            .poll_token_balance(&clone, receiver, |balance| *balance == AMOUNT)
            .await?;

        if balance.is_reached() {
            info!(clone = %clone.address, %receiver, "Tokens arrived on schain");
            verdict.mark_passed();
        } else {
            verdict.note(format!(
                "expected {AMOUNT} {} on schain for {receiver}, observed {}",
                clone.symbol,
                balance.value()
            ));
        }
        Ok(())
    }
}
