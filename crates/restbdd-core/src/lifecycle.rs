//! Scenario lifecycle and report triggering

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::context::ExecutionContext;
use crate::error::{HarnessError, HarnessResult};

/// Tag that opts a run into report generation (without the leading `@`)
pub const REPORT_TAG: &str = "GenerateReport";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenarioPhase {
    #[default]
    NotStarted,
    Running,
    Passed,
    Failed,
}

impl ScenarioPhase {
    pub fn is_finished(&self) -> bool {
        matches!(self, ScenarioPhase::Passed | ScenarioPhase::Failed)
    }
}

impl fmt::Display for ScenarioPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScenarioPhase::NotStarted => "not started",
            ScenarioPhase::Running => "running",
            ScenarioPhase::Passed => "passed",
            ScenarioPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// State machine for one scenario: `NotStarted -> Running -> {Passed, Failed}`
#[derive(Debug, Default)]
pub struct ScenarioLifecycle {
    phase: ScenarioPhase,
}

impl ScenarioLifecycle {
    pub fn phase(&self) -> ScenarioPhase {
        self.phase
    }

    /// Enter `Running`, resetting the context for `scenario`
    pub fn start(&mut self, ctx: &mut ExecutionContext, scenario: &str) -> HarnessResult<()> {
        if self.phase != ScenarioPhase::NotStarted {
            return Err(HarnessError::State(format!(
                "Cannot start scenario '{}' while it is {}",
                scenario, self.phase
            )));
        }
        ctx.reset(scenario);
        self.phase = ScenarioPhase::Running;
        info!(scenario, "Scenario started");
        Ok(())
    }

    /// Leave `Running` with the scenario's outcome
    pub fn finish(&mut self, ctx: &mut ExecutionContext, passed: bool) -> HarnessResult<()> {
        if self.phase != ScenarioPhase::Running {
            return Err(HarnessError::State(format!(
                "Cannot finish scenario '{}' while it is {}",
                ctx.log().scenario(),
                self.phase
            )));
        }

        if passed {
            self.phase = ScenarioPhase::Passed;
            info!(scenario = ctx.log().scenario(), "Scenario passed");
        } else {
            self.phase = ScenarioPhase::Failed;
            let entries = ctx.log().entries().len();
            ctx.log_mut()
                .log(format!("Scenario failed after {} log entries", entries));
            warn!(scenario = ctx.log().scenario(), "Scenario failed");
        }
        Ok(())
    }
}

/// Whether any of `tags` (with or without `@`) is the report tag
pub fn has_report_tag<'a, I>(tags: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    tags.into_iter()
        .any(|tag| tag.trim_start_matches('@') == REPORT_TAG)
}

/// Run-wide flag set by tagged scenarios and consumed once after the run
#[derive(Debug, Default)]
pub struct ReportTrigger {
    requested: AtomicBool,
    fired: AtomicBool,
}

impl ReportTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// True exactly once, and only if a report was requested
    pub fn take(&self) -> bool {
        self.is_requested() && !self.fired.swap(true, Ordering::SeqCst)
    }
}
