//! Send ETH to schain

use async_trait::async_trait;
use tracing::info;

use crate::chain::{Chain, Direction, TransferIntent};
use crate::common::Result;
use crate::testing::{CaseContext, Scenario, TestConfig, Verdict};

/// 0.01 ETH
const AMOUNT_WEI: u128 = 10_000_000_000_000_000;

/// Bridge native coin to the schain and expect the receiver's balance to
/// grow by exactly that amount
#[derive(Debug, Default)]
pub struct EthToSchain {
    baseline: u128,
}

impl EthToSchain {
    pub fn boxed(_config: &TestConfig) -> Box<dyn Scenario> {
        Box::new(Self::default())
    }
}

#[async_trait]
impl Scenario for EthToSchain {
    async fn prepare(&mut self, ctx: &CaseContext<'_>) -> Result<()> {
        self.baseline = ctx
            .chain()
            .native_balance(Chain::Schain, ctx.schain_address())
            .await?;
        Ok(())
    }

    async fn execute(&mut self, ctx: &CaseContext<'_>, verdict: &mut Verdict) -> Result<()> {
        let config = ctx.config;
        let receiver = ctx.schain_address();

        let intent = TransferIntent::native(
            Direction::MainnetToSchain,
            &config.mainnet_key,
            &config.schain_key,
            AMOUNT_WEI,
        );
        ctx.agent().transfer(&intent, config.timeout).await?;

        let expected = self.baseline + AMOUNT_WEI;
        let balance = ctx
            .poll_native_balance(Chain::Schain, receiver, |balance| *balance == expected)
            .await?;
        if balance.is_reached() {
            info!(%receiver, amount = AMOUNT_WEI, "Native coin arrived on schain");
            verdict.mark_passed();
        } else {
            verdict.note(format!(
                "expected {expected} wei on schain for {receiver}, observed {}",
                balance.value()
            ));
        }
        Ok(())
    }
}
