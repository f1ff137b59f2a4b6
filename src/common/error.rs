//! Error types for the bridge scenario harness
//!
//! Errors raised inside a scenario never abort a run: the runner turns them
//! into a failed outcome and attaches the message to the report.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Registry Errors ===
    #[error("Scenario '{0}' is already registered")]
    DuplicateScenario(String),

    #[error("Unknown scenario '{0}'. Use 'bridge-e2e list' to see registered scenarios")]
    UnknownScenario(String),

    // === Lifecycle Errors ===
    #[error("Cannot {action} while test case is {phase}")]
    InvalidState { action: String, phase: String },

    #[error("Scenario panicked: {0}")]
    Panicked(String),

    #[error("{failed} of {total} scenarios failed")]
    ScenariosFailed { failed: usize, total: usize },

    // === Scenario Errors ===
    #[error("Setup failed: {0}")]
    Setup(String),

    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },

    #[error("Chain call failed on {chain}: {message}")]
    Chain { chain: String, message: String },

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Node admin command failed: {0}")]
    Admin(String),

    // === Timeout Errors ===
    #[error("Test case timed out after {} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Timed out after {} seconds waiting for {what}", .elapsed.as_secs_f64())]
    WaitTimeout { what: String, elapsed: Duration },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid lifecycle state error
    pub fn invalid_state(action: &str, phase: &str) -> Self {
        Self::InvalidState {
            action: action.to_string(),
            phase: phase.to_string(),
        }
    }

    /// Create a chain call error for the given chain
    pub fn chain(chain: impl ToString, message: impl Into<String>) -> Self {
        Self::Chain {
            chain: chain.to_string(),
            message: message.into(),
        }
    }

    /// Create a wait timeout error
    pub fn wait_timeout(what: impl Into<String>, elapsed: Duration) -> Self {
        Self::WaitTimeout {
            what: what.into(),
            elapsed,
        }
    }

    /// Classify an error raised while preparing a test case.
    ///
    /// Timeouts and errors already tagged as setup failures pass through.
    pub fn into_setup(self) -> Self {
        match self {
            Self::Setup(_) | Self::Timeout(_) | Self::WaitTimeout { .. } => self,
            other => Self::Setup(other.to_string()),
        }
    }

    /// Whether this error came from a deadline elapsing
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::WaitTimeout { .. })
    }
}
