//! Report generation entry point

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::ReportConfiguration;
use crate::error::{ReportError, ReportResult};
use crate::model::Feature;
use crate::render::render_overview;
use crate::summary::ReportSummary;
use crate::trends::{TrendEntry, Trends};

/// Produces report artifacts from cucumber run logs
pub trait ReportGenerator: Send + Sync {
    fn generate_reports(&self) -> ReportResult<ReportSummary>;
}

/// Reads run logs and writes `report.json`, `overview.md` and the trends file
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    json_files: Vec<PathBuf>,
    configuration: ReportConfiguration,
}

impl ReportBuilder {
    pub fn new(json_files: Vec<PathBuf>, configuration: ReportConfiguration) -> Self {
        Self {
            json_files,
            configuration,
        }
    }

    /// Builder for the run log the configuration itself points at
    pub fn for_configuration(configuration: ReportConfiguration) -> Self {
        Self::new(vec![configuration.run_log()], configuration)
    }

    pub fn configuration(&self) -> &ReportConfiguration {
        &self.configuration
    }

    fn load_features(&self) -> ReportResult<Vec<Feature>> {
        let mut features = Vec::new();
        let mut found = false;

        for path in &self.json_files {
            if !path.exists() {
                warn!(path = %path.display(), "Run log not found, skipping");
                continue;
            }
            found = true;

            let raw = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
            if raw.trim().is_empty() {
                continue;
            }
            let parsed: Vec<Feature> =
                serde_json::from_str(&raw).map_err(|e| ReportError::json(path, e))?;
            features.extend(parsed);
        }

        if !found {
            let looked_for: Vec<String> = self
                .json_files
                .iter()
                .map(|path| path.display().to_string())
                .collect();
            return Err(ReportError::NoRunLog(looked_for.join(", ")));
        }
        Ok(features)
    }
}

impl ReportGenerator for ReportBuilder {
    fn generate_reports(&self) -> ReportResult<ReportSummary> {
        let config = &self.configuration;
        let features = self.load_features()?;
        let summary = ReportSummary::build(&features, config, Utc::now());

        let output = config.output_directory();
        fs::create_dir_all(output).map_err(|e| ReportError::io(output, e))?;

        let summary_path = config.summary_path();
        let raw = serde_json::to_string_pretty(&summary)
            .map_err(|e| ReportError::json(&summary_path, e))?;
        fs::write(&summary_path, raw).map_err(|e| ReportError::io(&summary_path, e))?;

        let overview_path = config.overview_path();
        fs::write(&overview_path, render_overview(&summary, config.presentation_mode))
            .map_err(|e| ReportError::io(&overview_path, e))?;

        if let Some(trends_file) = &config.trends_file {
            let mut trends = Trends::load(trends_file)?;
            trends.push(TrendEntry::from(&summary));
            trends.save(trends_file)?;
        }

        info!(
            project = %summary.project_name,
            build = %summary.build_number,
            scenarios = summary.totals.scenarios,
            failed = summary.totals.failed_scenarios,
            output = %output.display(),
            "Report generated"
        );
        Ok(summary)
    }
}
