//! Deployment environment collaborator.

use std::collections::HashMap;

/// The environment an invocation runs in.
pub trait Environment: Send + Sync {
    /// Environment name, e.g. `production`.
    fn name(&self) -> &str;

    /// Variables the deployment must provide.
    fn expected_variables(&self) -> &[String];

    /// Look up one variable.
    fn variable(&self, key: &str) -> Option<String>;

    fn has_expected_variables(&self) -> bool {
        self.expected_variables()
            .iter()
            .all(|key| self.variable(key).is_some())
    }
}

/// Environment backed by the process environment.
#[derive(Debug, Clone)]
pub struct ProcessEnvironment {
    name: String,
    expected: Vec<String>,
}

impl ProcessEnvironment {
    pub fn new(name: impl Into<String>, expected: Vec<String>) -> Self {
        Self {
            name: name.into(),
            expected,
        }
    }
}

impl Environment for ProcessEnvironment {
    fn name(&self) -> &str {
        &self.name
    }

    fn expected_variables(&self) -> &[String] {
        &self.expected
    }

    fn variable(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Environment backed by a fixed map.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    name: String,
    expected: Vec<String>,
    vars: HashMap<String, String>,
}

impl StaticEnvironment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn expect(mut self, key: impl Into<String>) -> Self {
        self.expected.push(key.into());
        self
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl Environment for StaticEnvironment {
    fn name(&self) -> &str {
        &self.name
    }

    fn expected_variables(&self) -> &[String] {
        &self.expected
    }

    fn variable(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
