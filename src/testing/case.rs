//! Test case lifecycle
//!
//! A [`TestCase`] wraps one [`Scenario`] and drives it through
//! `Pending -> Prepared -> Passed | Failed`. Scenarios only decide whether
//! their post-condition held; phase bookkeeping stays here.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use super::config::TestConfig;
use super::wait::{poll_until, wait_for, Settled};
use crate::chain::{Address, BridgeAgent, Chain, ChainGateway, Environment, NodeAdmin, TokenHandle, TxHash};
use crate::common::{Error, Result};

/// Terminal result of a test case as reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pending,
    Passed,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pending => write!(f, "pending"),
            Outcome::Passed => write!(f, "passed"),
            Outcome::Failed => write!(f, "failed"),
        }
    }
}

/// Position of a test case in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Prepared,
    Passed,
    Failed,
}

impl Phase {
    pub fn outcome(self) -> Outcome {
        match self {
            Phase::Pending | Phase::Prepared => Outcome::Pending,
            Phase::Passed => Outcome::Passed,
            Phase::Failed => Outcome::Failed,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Pending => write!(f, "pending"),
            Phase::Prepared => write!(f, "prepared"),
            Phase::Passed => write!(f, "passed"),
            Phase::Failed => write!(f, "failed"),
        }
    }
}

/// Collects a scenario's judgement during `execute`
#[derive(Debug, Default)]
pub struct Verdict {
    passed: bool,
    note: Option<String>,
}

impl Verdict {
    /// The post-condition held. Calling this again has no further effect.
    pub fn mark_passed(&mut self) {
        self.passed = true;
    }

    /// Explain why the scenario did not pass
    pub fn note(&mut self, note: impl Into<String>) {
        self.note = Some(note.into());
    }

    pub fn is_passed(&self) -> bool {
        self.passed
    }
}

/// What a scenario sees while it runs
pub struct CaseContext<'a> {
    pub config: &'a TestConfig,
    pub env: &'a Environment,
}

impl CaseContext<'_> {
    pub fn chain(&self) -> &dyn ChainGateway {
        self.env.chain.as_ref()
    }

    pub fn agent(&self) -> &dyn BridgeAgent {
        self.env.agent.as_ref()
    }

    pub fn admin(&self) -> &dyn NodeAdmin {
        self.env.admin.as_ref()
    }

    pub fn mainnet_address(&self) -> Address {
        self.chain().address_of(&self.config.mainnet_key)
    }

    pub fn schain_address(&self) -> Address {
        self.chain().address_of(&self.config.schain_key)
    }

    /// Wait until a submitted transaction has a receipt
    pub async fn wait_for_receipt(&self, chain: Chain, tx: TxHash) -> Result<()> {
        let what = format!("receipt of {tx} on {chain}");
        wait_for(
            &what,
            &self.config.polling,
            || self.chain().receipt_present(chain, &tx),
            |present| *present,
        )
        .await?;
        Ok(())
    }

    /// Wait until bridge index `index` routes `origin` and return its schain clone
    pub async fn wait_for_clone(&self, index: u32, origin: &TokenHandle) -> Result<TokenHandle> {
        let what = format!("schain clone of {} under index {index}", origin.address);
        wait_for(
            &what,
            &self.config.polling,
            || self.chain().token_on_destination(Chain::Mainnet, index),
            |routed| routed.as_ref().is_some_and(|t| t.address == origin.address),
        )
        .await?;

        self.chain()
            .token_on_destination(Chain::Schain, index)
            .await?
            .ok_or_else(|| Error::chain(Chain::Schain, format!("no token registered for {what}")))
    }

    /// Poll a token balance until `settled` holds or the polling deadline
    /// passes, returning the last observed balance either way
    pub async fn poll_token_balance(
        &self,
        token: &TokenHandle,
        owner: Address,
        settled: impl FnMut(&u128) -> bool,
    ) -> Result<Settled<u128>> {
        let what = format!("{} balance of {} on {}", token.symbol, owner, token.chain);
        poll_until(
            &what,
            &self.config.polling,
            self.config.polling.deadline(),
            || self.chain().token_balance(token, owner),
            settled,
        )
        .await
    }

    /// Poll a native coin balance, see [`poll_token_balance`](Self::poll_token_balance)
    pub async fn poll_native_balance(
        &self,
        chain: Chain,
        owner: Address,
        settled: impl FnMut(&u128) -> bool,
    ) -> Result<Settled<u128>> {
        let what = format!("native balance of {owner} on {chain}");
        poll_until(
            &what,
            &self.config.polling,
            self.config.polling.deadline(),
            || self.chain().native_balance(chain, owner),
            settled,
        )
        .await
    }
}

/// The steps of one bridge scenario
///
/// Artifacts created in `prepare` (deployed tokens, clones) are kept on
/// the implementing type and consumed in `execute`.
#[async_trait]
pub trait Scenario: Send {
    /// One-time setup before the operation under test
    async fn prepare(&mut self, ctx: &CaseContext<'_>) -> Result<()>;

    /// Run the operation under test and judge the observed state
    ///
    /// Call [`Verdict::mark_passed`] only when the post-condition holds.
    async fn execute(&mut self, ctx: &CaseContext<'_>, verdict: &mut Verdict) -> Result<()>;
}

/// One named scenario instance and its lifecycle state
pub struct TestCase {
    name: String,
    config: Arc<TestConfig>,
    phase: Phase,
    note: Option<String>,
    scenario: Box<dyn Scenario>,
}

impl TestCase {
    pub fn new(name: impl Into<String>, config: Arc<TestConfig>, scenario: Box<dyn Scenario>) -> Self {
        Self {
            name: name.into(),
            config,
            phase: Phase::Pending,
            note: None,
            scenario,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Outcome {
        self.phase.outcome()
    }

    /// Why the case did not pass, when the scenario said so
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Set up chain state. Only valid once, from `Pending`.
    pub async fn prepare(&mut self, env: &Environment) -> Result<()> {
        if self.phase != Phase::Pending {
            return Err(Error::invalid_state("prepare", &self.phase.to_string()));
        }

        info!(case = %self.name, "Preparing");
        let ctx = CaseContext {
            config: &self.config,
            env,
        };
        match self.scenario.prepare(&ctx).await {
            Ok(()) => {
                self.phase = Phase::Prepared;
                Ok(())
            }
            Err(e) => {
                self.phase = Phase::Failed;
                Err(e.into_setup())
            }
        }
    }

    /// Run the operation under test. Only valid from `Prepared`.
    pub async fn execute(&mut self, env: &Environment) -> Result<()> {
        if self.phase != Phase::Prepared {
            return Err(Error::invalid_state("execute", &self.phase.to_string()));
        }

        info!(case = %self.name, "Executing");
        let ctx = CaseContext {
            config: &self.config,
            env,
        };
        let mut verdict = Verdict::default();
        let result = self.scenario.execute(&ctx, &mut verdict).await;
        self.note = verdict.note.take();

        match result {
            Ok(()) if verdict.is_passed() => self.mark_passed(),
            Ok(()) => self.phase = Phase::Failed,
            Err(e) => {
                self.phase = Phase::Failed;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Record that the post-condition held.
    ///
    /// Moves `Prepared` to `Passed`; repeated calls and calls from any
    /// other phase change nothing.
    pub fn mark_passed(&mut self) {
        if self.phase == Phase::Prepared {
            self.phase = Phase::Passed;
        }
    }

    /// `prepare` then `execute`
    pub async fn run(&mut self, env: &Environment) -> Result<()> {
        self.prepare(env).await?;
        self.execute(env).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::local::LocalNetwork;
    use crate::common::config::LocalConfig;
    use crate::testing::config::tests::sample_config;

    /// Scenario scripted by flags
    struct Scripted {
        fail_prepare: bool,
        fail_execute: bool,
        pass: bool,
        mark_twice: bool,
    }

    impl Scripted {
        fn passing() -> Self {
            Self {
                fail_prepare: false,
                fail_execute: false,
                pass: true,
                mark_twice: false,
            }
        }
    }

    #[async_trait]
    impl Scenario for Scripted {
        async fn prepare(&mut self, _ctx: &CaseContext<'_>) -> Result<()> {
            if self.fail_prepare {
                return Err(Error::chain("mainnet", "deploy reverted"));
            }
            Ok(())
        }

        async fn execute(&mut self, _ctx: &CaseContext<'_>, verdict: &mut Verdict) -> Result<()> {
            if self.fail_execute {
                return Err(Error::Transfer("agent unreachable".to_string()));
            }
            if self.pass {
                verdict.mark_passed();
                if self.mark_twice {
                    verdict.mark_passed();
                }
            } else {
                verdict.note("balance mismatch");
            }
            Ok(())
        }
    }

    fn env() -> Environment {
        Environment::local(LocalNetwork::new(LocalConfig::default()))
    }

    fn case(scenario: Scripted) -> TestCase {
        TestCase::new("scripted", Arc::new(sample_config()), Box::new(scenario))
    }

    #[tokio::test]
    async fn test_passing_case() {
        let mut case = case(Scripted::passing());
        assert_eq!(case.outcome(), Outcome::Pending);

        case.prepare(&env()).await.unwrap();
        assert_eq!(case.phase(), Phase::Prepared);
        assert_eq!(case.outcome(), Outcome::Pending);

        case.execute(&env()).await.unwrap();
        assert_eq!(case.outcome(), Outcome::Passed);
        assert!(case.note().is_none());
    }

    #[tokio::test]
    async fn test_unmet_condition_fails_with_note() {
        let mut case = case(Scripted {
            pass: false,
            ..Scripted::passing()
        });
        case.run(&env()).await.unwrap();
        assert_eq!(case.outcome(), Outcome::Failed);
        assert_eq!(case.note(), Some("balance mismatch"));
    }

    #[tokio::test]
    async fn test_prepare_error_is_setup_failure() {
        let mut case = case(Scripted {
            fail_prepare: true,
            ..Scripted::passing()
        });
        let err = case.run(&env()).await.unwrap_err();
        assert!(matches!(err, Error::Setup(_)));
        assert_eq!(case.outcome(), Outcome::Failed);
    }

    #[tokio::test]
    async fn test_execute_error_fails_case() {
        let mut case = case(Scripted {
            fail_execute: true,
            ..Scripted::passing()
        });
        let err = case.run(&env()).await.unwrap_err();
        assert!(matches!(err, Error::Transfer(_)));
        assert_eq!(case.outcome(), Outcome::Failed);
    }

    #[tokio::test]
    async fn test_execute_before_prepare_is_rejected() {
        let mut case = case(Scripted::passing());
        let err = case.execute(&env()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidState { .. }));
        assert_eq!(case.phase(), Phase::Pending);
    }

    #[tokio::test]
    async fn test_no_transition_out_of_terminal_phase() {
        let mut case = case(Scripted::passing());
        case.run(&env()).await.unwrap();

        assert!(case.prepare(&env()).await.is_err());
        assert!(case.execute(&env()).await.is_err());
        assert_eq!(case.outcome(), Outcome::Passed);
    }

    #[tokio::test]
    async fn test_mark_passed_is_idempotent() {
        let mut case = case(Scripted {
            mark_twice: true,
            ..Scripted::passing()
        });
        case.run(&env()).await.unwrap();
        assert_eq!(case.outcome(), Outcome::Passed);

        case.mark_passed();
        case.mark_passed();
        assert_eq!(case.outcome(), Outcome::Passed);
    }

    #[test]
    fn test_mark_passed_needs_prepared_phase() {
        let mut case = case(Scripted::passing());
        case.mark_passed();
        assert_eq!(case.outcome(), Outcome::Pending);
    }
}
