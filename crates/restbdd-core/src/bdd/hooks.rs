//! Before/after scenario hooks

use std::sync::atomic::{AtomicUsize, Ordering};

use cucumber::event::ScenarioFinished;
use cucumber::gherkin::{Feature, Scenario};
use tracing::warn;

use crate::bdd::world::ApiWorld;
use crate::lifecycle::{has_report_tag, ReportTrigger};

/// Scenario outcomes counted across the whole run
#[derive(Debug, Default)]
pub struct RunTally {
    passed: AtomicUsize,
    failed: AtomicUsize,
}

impl RunTally {
    pub fn record(&self, passed: bool) {
        let counter = if passed { &self.passed } else { &self.failed };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn passed(&self) -> usize {
        self.passed.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }
}

/// Reset the world's context and mark the scenario running
pub fn before_scenario(scenario: &Scenario, world: &mut ApiWorld) {
    if let Err(e) = world.lifecycle.start(&mut world.context, &scenario.name) {
        warn!(scenario = %scenario.name, "Could not start scenario: {}", e);
    }
}

/// Close the scenario, count it and mark the run for reporting when tagged
pub fn after_scenario(
    feature: &Feature,
    scenario: &Scenario,
    finished: &ScenarioFinished,
    world: Option<&mut ApiWorld>,
    tally: &RunTally,
    trigger: &ReportTrigger,
) {
    let passed = matches!(finished, ScenarioFinished::StepPassed);
    tally.record(passed);

    if let Some(world) = world {
        if let Err(e) = world.lifecycle.finish(&mut world.context, passed) {
            warn!(scenario = %scenario.name, "Could not finish scenario: {}", e);
        }
    }

    if has_report_tag(feature.tags.iter().chain(scenario.tags.iter())) {
        trigger.request();
    }
}
