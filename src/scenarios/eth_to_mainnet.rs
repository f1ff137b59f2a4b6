//! Send ETH from schain to mainnet

use async_trait::async_trait;
use tracing::info;

use super::fund_exit_fees;
use crate::chain::{Chain, Direction, TransferIntent};
use crate::common::Result;
use crate::testing::{CaseContext, Scenario, TestConfig, Verdict};

/// 0.01 ETH
const AMOUNT_WEI: u128 = 10_000_000_000_000_000;

/// Fund the schain account, bridge native coin back and expect the mainnet
/// balance to grow by exactly that amount
#[derive(Debug, Default)]
pub struct EthToMainnet {
    baseline: u128,
}

impl EthToMainnet {
    pub fn boxed(_config: &TestConfig) -> Box<dyn Scenario> {
        Box::new(Self::default())
    }
}

#[async_trait]
impl Scenario for EthToMainnet {
    async fn prepare(&mut self, ctx: &CaseContext<'_>) -> Result<()> {
        fund_exit_fees(ctx, AMOUNT_WEI).await?;

        self.baseline = ctx
            .chain()
            .native_balance(Chain::Mainnet, ctx.mainnet_address())
            .await?;
        Ok(())
    }

    async fn execute(&mut self, ctx: &CaseContext<'_>, verdict: &mut Verdict) -> Result<()> {
        let config = ctx.config;
        let receiver = ctx.mainnet_address();

        let intent = TransferIntent::native(
            Direction::SchainToMainnet,
            &config.schain_key,
            &config.mainnet_key,
            AMOUNT_WEI,
        );
        ctx.agent().transfer(&intent, config.timeout).await?;

        let expected = self.baseline + AMOUNT_WEI;
        let balance = ctx
            .poll_native_balance(Chain::Mainnet, receiver, |balance| *balance == expected)
            .await?;
        if balance.is_reached() {
            info!(%receiver, amount = AMOUNT_WEI, "Native coin returned to mainnet");
            verdict.mark_passed();
        } else {
            verdict.note(format!(
                "expected {expected} wei on mainnet for {receiver}, observed {}",
                balance.value()
            ));
        }
        Ok(())
    }
}
