//! Cucumber integration for restbdd
//!
//! Wires the step vocabulary, scenario hooks and report trigger into one
//! cucumber run. Suites call [`run_features`] from a `harness = false` test.

mod hooks;
mod steps;
mod world;

pub use hooks::{after_scenario, before_scenario, RunTally};
pub use world::ApiWorld;

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use cucumber::writer::{self, Stats as _};
use cucumber::{World as _, WriterExt as _};
use futures::future;
use restbdd_monitoring::{env_filter, LoggingConfig};
use restbdd_report::{ReportConfiguration, ReportGenerator, ReportSummary};
use tracing::{error, info};
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::Layer as _;

use crate::config;
use crate::lifecycle::ReportTrigger;

/// Inputs for one suite run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Feature file or directory of feature files
    pub features: PathBuf,
    pub report: ReportConfiguration,
    pub logging: LoggingConfig,
}

impl RunOptions {
    pub fn new(features: impl Into<PathBuf>) -> Self {
        Self {
            features: features.into(),
            report: ReportConfiguration::default(),
            logging: LoggingConfig::load(),
        }
    }

    pub fn with_report(mut self, report: ReportConfiguration) -> Self {
        self.report = report;
        self
    }

    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }
}

/// What a suite run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub scenarios: usize,
    pub failed: usize,
    /// Feature files cucumber could not parse; they contribute no scenarios
    pub parsing_errors: usize,
    pub hook_errors: usize,
    /// Present when a tagged scenario requested a report and generation succeeded
    pub report: Option<ReportSummary>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.parsing_errors == 0 && self.hook_errors == 0
    }
}

/// Run every scenario under `options.features` and generate the report if asked to
pub async fn run_features(
    options: RunOptions,
    generator: &dyn ReportGenerator,
) -> anyhow::Result<RunOutcome> {
    let harness = config::global();
    let output_dir = options.report.output_directory().to_path_buf();
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let run_log = options.report.run_log();
    let run_log_file = File::create(&run_log)
        .with_context(|| format!("Failed to create {}", run_log.display()))?;

    let tally = Arc::new(RunTally::default());
    let trigger = Arc::new(ReportTrigger::new());
    let filter = env_filter(&options.logging);

    let after_tally = Arc::clone(&tally);
    let after_trigger = Arc::clone(&trigger);

    // The writer holds the run log open until it is dropped below
    let writer = ApiWorld::cucumber()
        .max_concurrent_scenarios(harness.parallelism)
        .before(|_feature, _rule, scenario, world| {
            before_scenario(scenario, world);
            Box::pin(future::ready(()))
        })
        .after(move |feature, _rule, scenario, finished, world| {
            after_scenario(
                feature,
                scenario,
                finished,
                world,
                &after_tally,
                &after_trigger,
            );
            Box::pin(future::ready(()))
        })
        .with_writer(
            writer::Basic::stdout()
                .summarized()
                .tee::<ApiWorld, _>(writer::Json::for_tee(run_log_file))
                .normalized(),
        )
        .configure_and_init_tracing(
            DefaultFields::new(),
            Format::default().with_ansi(false),
            |layer| tracing_subscriber::registry().with(filter.and_then(layer)),
        )
        .run(&options.features)
        .await;

    let mut outcome = RunOutcome {
        scenarios: tally.passed() + tally.failed(),
        failed: tally.failed(),
        parsing_errors: writer.parsing_errors(),
        hook_errors: writer.hook_errors(),
        report: None,
    };
    if writer.execution_has_failed() && outcome.is_success() {
        // Failed steps the hooks never saw, e.g. in a scenario whose world failed to build
        outcome.failed = outcome.failed.max(1);
    }
    drop(writer);

    info!(
        scenarios = outcome.scenarios,
        failed = outcome.failed,
        parsing_errors = outcome.parsing_errors,
        run_log = %run_log.display(),
        "Feature run finished"
    );

    if trigger.take() {
        match generator.generate_reports() {
            Ok(summary) => {
                info!(output_dir = %output_dir.display(), "Report generated");
                outcome.report = Some(summary);
            }
            Err(e) => error!("Report generation failed: {}", e),
        }
    }

    Ok(outcome)
}
