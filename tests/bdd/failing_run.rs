// Runs a suite with a failing scenario and a malformed feature file, and checks
// the run is reported as failed without generating a report.

use std::fs;
use std::path::Path;

use restbdd_bdd_tests::ReqresStub;
use restbdd_core::bdd::{run_features, RunOptions};
use restbdd_core::config::{self, HarnessConfig};
use restbdd_monitoring::LoggingConfig;
use restbdd_report::{ReportBuilder, ReportConfiguration};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let stub = ReqresStub::start().await;
    config::install(HarnessConfig::default().with_base_uri(stub.base_uri()));

    let output_dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join("failing-run-reports");
    let _ = fs::remove_dir_all(&output_dir);

    let features = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/failing_run");
    let report = ReportConfiguration::new(&output_dir, "Failing run");
    let generator = ReportBuilder::for_configuration(report.clone());
    let options = RunOptions::new(features)
        .with_report(report)
        .with_logging(LoggingConfig::default());

    let outcome = run_features(options, &generator).await?;

    assert_eq!(outcome.scenarios, 2);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.parsing_errors, 1);
    assert_eq!(outcome.hook_errors, 0);
    assert!(!outcome.is_success());

    // No scenario carries the report tag
    assert!(outcome.report.is_none());
    assert!(output_dir.join("cucumber.json").exists());
    assert!(!output_dir.join("report.json").exists());
    assert!(!output_dir.join("overview.md").exists());

    println!("failing run reported as failed");
    Ok(())
}
