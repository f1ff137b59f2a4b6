//! Test runner implementation
//!
//! Runs test cases one at a time, each on its own task so that a panic or
//! an exhausted time budget only fails that case. A panicking scenario
//! constructor fails its case the same way. The run always continues with
//! the next case.

use colored::Colorize;
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, info_span, warn, Instrument};

use super::case::{Outcome, TestCase};
use super::config::TestConfig;
use super::pool::TestPool;
use crate::chain::Environment;
use crate::common::{Error, Result};

/// Result of one test case
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub name: String,
    pub outcome: Outcome,
    /// Error that ended the case, if any
    pub error: Option<String>,
    /// Scenario's explanation for an unmet post-condition
    pub note: Option<String>,
    pub elapsed_ms: u64,
}

/// Results of a whole run, in run order
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(|c| c.outcome == Outcome::Passed)
    }

    pub fn passed_count(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| c.outcome == Outcome::Passed)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.cases.len() - self.passed_count()
    }

    pub fn get(&self, name: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|c| c.name == name)
    }

    /// Print a per-case pass/fail listing and a summary line
    pub fn print(&self) {
        println!("\n{}", "Results:".cyan());
        for case in &self.cases {
            let elapsed = format!("({:.1}s)", case.elapsed_ms as f64 / 1000.0);
            match case.outcome {
                Outcome::Passed => {
                    println!("  {} {} {}", "✓".green(), case.name, elapsed.dimmed());
                }
                _ => {
                    println!("  {} {} {}", "✗".red(), case.name.red(), elapsed.dimmed());
                    if let Some(error) = &case.error {
                        println!("      {}", error.red());
                    }
                    if let Some(note) = &case.note {
                        println!("      {}", note.yellow());
                    }
                }
            }
        }

        let summary = format!(
            "{} passed, {} failed, {} total",
            self.passed_count(),
            self.failed_count(),
            self.cases.len()
        );
        if self.all_passed() {
            println!("\n{} {}\n", "✓".green().bold(), summary.green().bold());
        } else {
            println!("\n{} {}\n", "✗".red().bold(), summary.red().bold());
        }
    }
}

/// Runs registered scenarios against one environment
pub struct Runner<'a> {
    pool: &'a TestPool,
    env: Environment,
}

impl<'a> Runner<'a> {
    pub fn new(pool: &'a TestPool, env: Environment) -> Self {
        Self { pool, env }
    }

    /// Run every selected scenario in order and report each outcome.
    ///
    /// Only an invalid selection is an error; failures inside scenarios
    /// end up in the report.
    pub async fn run(
        &self,
        config: Arc<TestConfig>,
        selection: Option<&[String]>,
    ) -> Result<RunReport> {
        let names = self.pool.resolve(selection)?;
        info!(count = names.len(), "Running scenarios");

        let mut report = RunReport::default();
        for name in names {
            let built = panic::catch_unwind(AssertUnwindSafe(|| {
                self.pool.instantiate(&name, Arc::clone(&config))
            }));
            let case = match built {
                Ok(case) => case?,
                Err(payload) => {
                    let e = Error::Panicked(panic_message(payload));
                    error!(case = %name, error = %e, "Scenario could not be constructed");
                    report.cases.push(CaseReport {
                        name,
                        outcome: Outcome::Failed,
                        error: Some(e.to_string()),
                        note: None,
                        elapsed_ms: 0,
                    });
                    continue;
                }
            };
            let span = info_span!("case", name = %name);
            let case_report = self.run_case(case, config.timeout).instrument(span).await;
            report.cases.push(case_report);
        }
        Ok(report)
    }

    async fn run_case(&self, mut case: TestCase, budget: Duration) -> CaseReport {
        let name = case.name().to_string();
        let env = self.env.clone();
        let start = Instant::now();

        let mut handle = tokio::spawn(
            async move {
                let result = case.run(&env).await;
                (case, result)
            }
            .in_current_span(),
        );

        let (outcome, error, note) = match tokio::time::timeout(budget, &mut handle).await {
            Ok(Ok((case, Ok(())))) => (case.outcome(), None, case.note().map(str::to_string)),
            Ok(Ok((case, Err(e)))) => {
                error!(error = %e, "Case failed with error");
                (Outcome::Failed, Some(e.to_string()), case.note().map(str::to_string))
            }
            Ok(Err(join_error)) => {
                let message = if join_error.is_panic() {
                    panic_message(join_error.into_panic())
                } else {
                    join_error.to_string()
                };
                let e = Error::Panicked(message);
                error!(error = %e, "Case aborted");
                (Outcome::Failed, Some(e.to_string()), None)
            }
            Err(_) => {
                handle.abort();
                let e = Error::Timeout(budget);
                error!(error = %e, "Case exceeded its time budget");
                (Outcome::Failed, Some(e.to_string()), None)
            }
        };

        // A case that returned without reaching a terminal phase did not pass
        let outcome = match outcome {
            Outcome::Pending => Outcome::Failed,
            other => other,
        };

        match outcome {
            Outcome::Passed => info!("Passed"),
            _ => warn!("Failed"),
        }

        CaseReport {
            name,
            outcome,
            error,
            note,
            elapsed_ms: start.elapsed().as_millis() as u64,
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::local::LocalNetwork;
    use crate::common::config::LocalConfig;
    use crate::testing::case::{CaseContext, Scenario, Verdict};
    use crate::testing::config::tests::sample_config;
    use async_trait::async_trait;

    #[derive(Clone, Copy)]
    enum Behaviour {
        Pass,
        Mismatch,
        PrepareError,
        Panic,
        Hang,
    }

    struct Scripted(Behaviour);

    #[async_trait]
    impl Scenario for Scripted {
        async fn prepare(&mut self, _ctx: &CaseContext<'_>) -> Result<()> {
            match self.0 {
                Behaviour::PrepareError => Err(Error::chain("mainnet", "deploy reverted")),
                _ => Ok(()),
            }
        }

        async fn execute(&mut self, _ctx: &CaseContext<'_>, verdict: &mut Verdict) -> Result<()> {
            match self.0 {
                Behaviour::Pass => verdict.mark_passed(),
                Behaviour::Mismatch => verdict.note("expected 1, observed 0"),
                Behaviour::Panic => panic!("scenario exploded"),
                Behaviour::Hang => tokio::time::sleep(Duration::from_secs(3600)).await,
                Behaviour::PrepareError => unreachable!(),
            }
            Ok(())
        }
    }

    fn pool(cases: &[(&str, Behaviour)]) -> TestPool {
        let mut pool = TestPool::new();
        for (name, behaviour) in cases {
            let behaviour = *behaviour;
            pool.register(*name, move |_: &TestConfig| -> Box<dyn Scenario> {
                Box::new(Scripted(behaviour))
            })
            .unwrap();
        }
        pool
    }

    fn env() -> Environment {
        Environment::local(LocalNetwork::new(LocalConfig::default()))
    }

    fn config(timeout: Duration) -> Arc<TestConfig> {
        Arc::new(TestConfig {
            timeout,
            ..sample_config()
        })
    }

    #[tokio::test]
    async fn test_one_outcome_per_case_in_order() {
        let pool = pool(&[
            ("first", Behaviour::Pass),
            ("second", Behaviour::Mismatch),
            ("third", Behaviour::Pass),
        ]);
        let report = Runner::new(&pool, env())
            .run(config(Duration::from_secs(5)), None)
            .await
            .unwrap();

        let names: Vec<_> = report.cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(report.cases[0].outcome, Outcome::Passed);
        assert_eq!(report.cases[1].outcome, Outcome::Failed);
        assert_eq!(report.cases[1].note.as_deref(), Some("expected 1, observed 0"));
        assert!(report.cases[1].error.is_none());
        assert_eq!(report.cases[2].outcome, Outcome::Passed);
        assert!(!report.all_passed());
        assert_eq!(report.failed_count(), 1);
    }

    #[tokio::test]
    async fn test_errors_and_panics_do_not_stop_the_run() {
        let pool = pool(&[
            ("setup", Behaviour::PrepareError),
            ("boom", Behaviour::Panic),
            ("fine", Behaviour::Pass),
        ]);
        let report = Runner::new(&pool, env())
            .run(config(Duration::from_secs(5)), None)
            .await
            .unwrap();

        let setup = report.get("setup").unwrap();
        assert_eq!(setup.outcome, Outcome::Failed);
        assert!(setup.error.as_deref().unwrap().starts_with("Setup failed"));

        let boom = report.get("boom").unwrap();
        assert_eq!(boom.outcome, Outcome::Failed);
        assert!(boom.error.as_deref().unwrap().contains("scenario exploded"));

        assert_eq!(report.get("fine").unwrap().outcome, Outcome::Passed);
    }

    #[tokio::test]
    async fn test_panicking_constructor_does_not_stop_the_run() {
        let mut pool = pool(&[("first", Behaviour::Pass)]);
        pool.register("bad-constructor", |_: &TestConfig| -> Box<dyn Scenario> {
            panic!("constructor exploded")
        })
        .unwrap();
        pool.register("last", |_: &TestConfig| -> Box<dyn Scenario> {
            Box::new(Scripted(Behaviour::Pass))
        })
        .unwrap();

        let report = Runner::new(&pool, env())
            .run(config(Duration::from_secs(5)), None)
            .await
            .unwrap();

        let names: Vec<_> = report.cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "bad-constructor", "last"]);

        let bad = report.get("bad-constructor").unwrap();
        assert_eq!(bad.outcome, Outcome::Failed);
        assert!(bad.error.as_deref().unwrap().contains("constructor exploded"));
        assert_eq!(report.get("last").unwrap().outcome, Outcome::Passed);
        assert_eq!(report.failed_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_only_that_case() {
        let pool = pool(&[("stuck", Behaviour::Hang), ("fine", Behaviour::Pass)]);
        let report = Runner::new(&pool, env())
            .run(config(Duration::from_secs(2)), None)
            .await
            .unwrap();

        let stuck = report.get("stuck").unwrap();
        assert_eq!(stuck.outcome, Outcome::Failed);
        assert!(stuck.error.as_deref().unwrap().contains("timed out"));
        assert_eq!(report.get("fine").unwrap().outcome, Outcome::Passed);
    }

    #[tokio::test]
    async fn test_selection_order_and_unknown_names() {
        let pool = pool(&[("a", Behaviour::Pass), ("b", Behaviour::Pass)]);
        let runner = Runner::new(&pool, env());

        let selection = vec!["b".to_string(), "a".to_string()];
        let report = runner
            .run(config(Duration::from_secs(5)), Some(selection.as_slice()))
            .await
            .unwrap();
        let names: Vec<_> = report.cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(report.all_passed());

        let selection = vec!["missing".to_string()];
        let err = runner
            .run(config(Duration::from_secs(5)), Some(selection.as_slice()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownScenario(_)));
    }

    #[test]
    fn test_report_serializes_outcomes() {
        let report = RunReport {
            cases: vec![CaseReport {
                name: "a".to_string(),
                outcome: Outcome::Failed,
                error: Some("Transfer failed: x".to_string()),
                note: None,
                elapsed_ms: 12,
            }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["cases"][0]["outcome"], "failed");
        assert_eq!(json["cases"][0]["error"], "Transfer failed: x");
    }
}
