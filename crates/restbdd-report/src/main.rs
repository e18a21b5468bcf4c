//! Regenerate reports from existing cucumber run logs.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use restbdd_monitoring::{init_logging, LogExt, LoggingConfig};
use restbdd_report::{
    PresentationMode, ReportBuilder, ReportConfiguration, ReportGenerator, SortingMethod,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Sorting {
    Natural,
    Alphabetical,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Presentation {
    Collapsed,
    ExpandAllSteps,
}

#[derive(Debug, Parser)]
#[command(name = "restbdd-report", about = "Generate a report from cucumber JSON run logs")]
struct Args {
    /// Run logs to read; defaults to <output-dir>/cucumber.json
    json_files: Vec<PathBuf>,

    #[arg(long, default_value = restbdd_report::config::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    #[arg(long, default_value = "API Test Automation")]
    project_name: String,

    #[arg(long, default_value = "1.0")]
    build_number: String,

    /// Extra classification, as NAME=VALUE
    #[arg(long = "classification", value_parser = parse_classification)]
    classifications: Vec<(String, String)>,

    #[arg(long, value_enum, default_value_t = Sorting::Natural)]
    sorting: Sorting,

    #[arg(long, value_enum, default_value_t = Presentation::ExpandAllSteps)]
    presentation: Presentation,

    /// Skip updating the trends file
    #[arg(long)]
    no_trends: bool,
}

fn parse_classification(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))
}

fn main() -> anyhow::Result<()> {
    let _guard = init_logging(&LoggingConfig::load().with_service_name("restbdd-report"))?;
    let args = Args::parse();

    let mut configuration = ReportConfiguration::new(&args.output_dir, args.project_name)
        .with_build_number(args.build_number)
        .with_sorting_method(match args.sorting {
            Sorting::Natural => SortingMethod::Natural,
            Sorting::Alphabetical => SortingMethod::Alphabetical,
        })
        .with_presentation_mode(match args.presentation {
            Presentation::Collapsed => PresentationMode::Collapsed,
            Presentation::ExpandAllSteps => PresentationMode::ExpandAllSteps,
        });
    for (name, value) in args.classifications {
        configuration = configuration.add_classification(name, value);
    }
    if args.no_trends {
        configuration = configuration.with_trends_file(None);
    }

    let builder = if args.json_files.is_empty() {
        ReportBuilder::for_configuration(configuration)
    } else {
        ReportBuilder::new(args.json_files, configuration)
    };

    let summary = builder
        .generate_reports()
        .log_err("Report generation failed")
        .context("Failed to generate report")?;
    println!(
        "{}: {} scenarios, {} failed -> {}",
        summary.project_name,
        summary.totals.scenarios,
        summary.totals.failed_scenarios,
        builder.configuration().overview_path().display()
    );
    Ok(())
}
