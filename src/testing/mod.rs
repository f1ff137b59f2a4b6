//! Scenario test framework
//!
//! Test cases move through a small lifecycle, get collected in an explicit
//! pool and are run one at a time by the runner, which turns every failure
//! into a reported outcome instead of aborting the run.

mod case;
mod config;
mod pool;
mod runner;
pub mod wait;

pub use case::{CaseContext, Outcome, Phase, Scenario, TestCase, Verdict};
pub use config::TestConfig;
pub use pool::{Constructor, TestPool};
pub use runner::{CaseReport, RunReport, Runner};
pub use wait::Settled;
