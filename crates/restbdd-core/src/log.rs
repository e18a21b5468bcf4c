//! Per-scenario log handle

use tracing::{error, info};

use crate::error::HarnessError;

/// Log attached to the running scenario.
///
/// Entries are kept in memory and emitted as `tracing` events tagged with the
/// scenario name; the cucumber runner attributes those events to the scenario
/// in its console and JSON output.
#[derive(Debug, Clone, Default)]
pub struct ScenarioLog {
    scenario: String,
    entries: Vec<String>,
}

impl ScenarioLog {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            entries: Vec::new(),
        }
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(scenario = %self.scenario, "{}", message);
        self.entries.push(message);
    }

    /// Record a failure under `context` and hand the error back for propagation
    pub fn fail(&mut self, context: &str, err: HarnessError) -> HarnessError {
        let message = format!("{}: {}", context, err);
        error!(scenario = %self.scenario, kind = err.kind(), "{}", message);
        self.entries.push(message);
        err
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Whether any entry contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|entry| entry.contains(needle))
    }
}
