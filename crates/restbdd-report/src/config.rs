//! Report configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory every report artifact is written to by default
pub const DEFAULT_OUTPUT_DIR: &str = "target/cucumber-reports";

/// Order features and scenarios appear in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortingMethod {
    /// Keep the order of the run log
    #[default]
    Natural,
    /// Sort features and scenarios by name
    Alphabetical,
}

/// How much step detail the overview shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationMode {
    /// Only failed steps are listed
    Collapsed,
    /// Every step is listed
    #[default]
    ExpandAllSteps,
}

/// Free-form key/value shown at the top of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfiguration {
    pub output_directory: PathBuf,
    pub project_name: String,
    pub build_number: String,
    pub classifications: Vec<Classification>,
    pub sorting_method: SortingMethod,
    pub presentation_mode: PresentationMode,
    /// Trends history; `None` disables trend tracking
    pub trends_file: Option<PathBuf>,
}

impl Default for ReportConfiguration {
    fn default() -> Self {
        let output_directory = PathBuf::from(DEFAULT_OUTPUT_DIR);
        Self {
            trends_file: Some(output_directory.join("trends.json")),
            output_directory,
            project_name: "API Test Automation".to_string(),
            build_number: "1.0".to_string(),
            classifications: vec![
                Classification {
                    name: "Platform".to_string(),
                    value: std::env::consts::OS.to_string(),
                },
                Classification {
                    name: "Browser".to_string(),
                    value: "none (API)".to_string(),
                },
                Classification {
                    name: "Branch".to_string(),
                    value: "master".to_string(),
                },
            ],
            sorting_method: SortingMethod::Natural,
            presentation_mode: PresentationMode::ExpandAllSteps,
        }
    }
}

impl ReportConfiguration {
    pub fn new(output_directory: impl Into<PathBuf>, project_name: impl Into<String>) -> Self {
        let output_directory = output_directory.into();
        Self {
            trends_file: Some(output_directory.join("trends.json")),
            output_directory,
            project_name: project_name.into(),
            ..Self::default()
        }
    }

    pub fn with_build_number(mut self, build_number: impl Into<String>) -> Self {
        self.build_number = build_number.into();
        self
    }

    /// Add or replace a classification
    pub fn add_classification(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.classifications.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.value = value,
            None => self.classifications.push(Classification { name, value }),
        }
        self
    }

    pub fn with_sorting_method(mut self, sorting_method: SortingMethod) -> Self {
        self.sorting_method = sorting_method;
        self
    }

    pub fn with_presentation_mode(mut self, presentation_mode: PresentationMode) -> Self {
        self.presentation_mode = presentation_mode;
        self
    }

    pub fn with_trends_file(mut self, trends_file: Option<PathBuf>) -> Self {
        self.trends_file = trends_file;
        self
    }

    /// Where the cucumber runner writes its JSON run log
    pub fn run_log(&self) -> PathBuf {
        self.output_directory.join("cucumber.json")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_directory.join("report.json")
    }

    pub fn overview_path(&self) -> PathBuf {
        self.output_directory.join("overview.md")
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }
}
