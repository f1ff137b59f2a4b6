//! bridge-e2e - scenario tests for a cross-chain token bridge
//!
//! Test cases deploy a token, mint supply, move assets between mainnet and
//! a schain through a bridge agent and check the resulting balances. Chain
//! access, transfers and node administration sit behind traits in
//! [`chain`]; the lifecycle, pool and runner live in [`testing`].

pub mod chain;
pub mod cli;
pub mod commands;
pub mod common;
pub mod scenarios;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use testing::{Outcome, RunReport, Runner, TestConfig, TestPool};
