// Cucumber entry point for the restbdd feature suite

use std::env;
use std::path::Path;
use std::process;

use restbdd_bdd_tests::ReqresStub;
use restbdd_core::bdd::{run_features, RunOptions};
use restbdd_core::config::{self, HarnessConfig};
use restbdd_monitoring::{parse_flag, LoggingConfig};
use restbdd_report::{ReportBuilder, ReportConfiguration};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let live = env::var("BDD_LIVE")
        .ok()
        .and_then(|value| parse_flag(&value))
        .unwrap_or(false);

    // Kept alive until the run is over
    let stub = if live {
        config::install(HarnessConfig::load());
        None
    } else {
        let stub = ReqresStub::start().await;
        config::install(HarnessConfig::load().with_base_uri(stub.base_uri()));
        Some(stub)
    };

    let features = Path::new(env!("CARGO_MANIFEST_DIR")).join("features");
    let report = ReportConfiguration::default();
    let generator = ReportBuilder::for_configuration(report.clone());
    let options = RunOptions::new(features)
        .with_report(report)
        .with_logging(LoggingConfig::load().with_service_name("restbdd-bdd"));

    let outcome = run_features(options, &generator).await?;
    drop(stub);

    if let Some(summary) = &outcome.report {
        println!(
            "Report: {} scenarios, {} failed",
            summary.totals.scenarios, summary.totals.failed_scenarios
        );
    }

    if !outcome.is_success() {
        eprintln!(
            "{} of {} scenarios failed, {} feature files failed to parse, {} hook errors",
            outcome.failed, outcome.scenarios, outcome.parsing_errors, outcome.hook_errors
        );
        process::exit(1);
    }
    Ok(())
}
