//! Registry of available scenarios
//!
//! Built explicitly at start-up and handed to the runner. Registration
//! order is run order.

use std::fmt;
use std::sync::Arc;

use super::case::{Scenario, TestCase};
use super::config::TestConfig;
use crate::common::{Error, Result};

/// Builds a fresh scenario for one run
pub type Constructor = Box<dyn Fn(&TestConfig) -> Box<dyn Scenario> + Send + Sync>;

struct PoolEntry {
    name: String,
    constructor: Constructor,
}

/// Ordered mapping from scenario name to constructor
#[derive(Default)]
pub struct TestPool {
    entries: Vec<PoolEntry>,
}

impl TestPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scenario under a unique name.
    ///
    /// A second registration of the same name is rejected and the first
    /// entry is kept.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F) -> Result<()>
    where
        F: Fn(&TestConfig) -> Box<dyn Scenario> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.contains(&name) {
            return Err(Error::DuplicateScenario(name));
        }
        self.entries.push(PoolEntry {
            name,
            constructor: Box::new(constructor),
        });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Registered names in run order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Construct a test case for a registered scenario
    pub fn instantiate(&self, name: &str, config: Arc<TestConfig>) -> Result<TestCase> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| Error::UnknownScenario(name.to_string()))?;
        let scenario = (entry.constructor)(&config);
        Ok(TestCase::new(entry.name.clone(), config, scenario))
    }

    /// Names to run for an optional selection.
    ///
    /// Without a selection every scenario runs in registration order. A
    /// selection runs in the order given, each name once; an unknown name
    /// fails before anything runs.
    pub fn resolve(&self, selection: Option<&[String]>) -> Result<Vec<String>> {
        let Some(selection) = selection else {
            return Ok(self.names().map(str::to_string).collect());
        };

        let mut names: Vec<String> = Vec::with_capacity(selection.len());
        for name in selection {
            if !self.contains(name) {
                return Err(Error::UnknownScenario(name.clone()));
            }
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        Ok(names)
    }
}

impl fmt::Debug for TestPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
