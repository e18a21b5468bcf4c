//! Aggregated view of one or more run logs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{Classification, ReportConfiguration, SortingMethod};
use crate::model::{Element, Feature, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Passed,
    Failed,
    Skipped,
}

impl Status {
    /// Map a cucumber step status onto the three report outcomes
    pub fn from_step(status: &str) -> Self {
        match status {
            "passed" => Status::Passed,
            "failed" | "ambiguous" => Status::Failed,
            _ => Status::Skipped,
        }
    }

    /// Failed beats skipped beats passed
    pub fn combine<I: IntoIterator<Item = Status>>(statuses: I) -> Self {
        statuses.into_iter().fold(Status::Passed, |acc, status| match (acc, status) {
            (Status::Failed, _) | (_, Status::Failed) => Status::Failed,
            (Status::Skipped, _) | (_, Status::Skipped) => Status::Skipped,
            _ => Status::Passed,
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Failed => "failed",
            Status::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSummary {
    pub keyword: String,
    pub name: String,
    pub status: Status,
    pub error_message: Option<String>,
    pub duration_ms: u64,
    /// Log lines captured while the step ran
    #[serde(default)]
    pub output: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub tags: Vec<String>,
    pub status: Status,
    pub duration_ms: u64,
    pub steps: Vec<StepSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub name: String,
    pub uri: Option<String>,
    pub status: Status,
    pub scenarios: Vec<ScenarioSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub features: usize,
    pub scenarios: usize,
    pub passed_scenarios: usize,
    pub failed_scenarios: usize,
    pub skipped_scenarios: usize,
    pub steps: usize,
    pub passed_steps: usize,
    pub failed_steps: usize,
    pub skipped_steps: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub project_name: String,
    pub build_number: String,
    pub classifications: Vec<Classification>,
    pub generated_at: DateTime<Utc>,
    pub features: Vec<FeatureSummary>,
    pub totals: Totals,
}

impl ReportSummary {
    pub fn build(features: &[Feature], config: &ReportConfiguration, generated_at: DateTime<Utc>) -> Self {
        let mut features: Vec<FeatureSummary> = features.iter().map(summarize_feature).collect();

        if config.sorting_method == SortingMethod::Alphabetical {
            features.sort_by(|a, b| a.name.cmp(&b.name));
            for feature in &mut features {
                feature.scenarios.sort_by(|a, b| a.name.cmp(&b.name));
            }
        }

        let totals = totals(&features);
        Self {
            project_name: config.project_name.clone(),
            build_number: config.build_number.clone(),
            classifications: config.classifications.clone(),
            generated_at,
            features,
            totals,
        }
    }

    pub fn status(&self) -> Status {
        Status::combine(self.features.iter().map(|f| f.status))
    }
}

fn summarize_step(step: &Step) -> StepSummary {
    StepSummary {
        keyword: step.keyword.trim().to_string(),
        name: step.name.clone(),
        status: Status::from_step(&step.result.status),
        error_message: step.result.error_message.clone(),
        duration_ms: step.result.duration.unwrap_or(0) / 1_000_000,
        output: step_output(step),
    }
}

fn step_output(step: &Step) -> Vec<String> {
    step.embeddings
        .iter()
        .filter_map(|embedding| embedding.text())
        .flat_map(|text| {
            text.lines()
                .map(str::trim_end)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn summarize_feature(feature: &Feature) -> FeatureSummary {
    let feature_tags: Vec<String> = feature.tags.iter().map(|t| t.name.clone()).collect();
    let mut scenarios = Vec::new();
    // Background steps belong to the scenario that follows them.
    let mut background: Vec<StepSummary> = Vec::new();

    for element in &feature.elements {
        let steps: Vec<StepSummary> = element.steps.iter().map(summarize_step).collect();
        if element.is_background() {
            background.extend(steps);
            continue;
        }
        scenarios.push(summarize_scenario(element, &feature_tags, std::mem::take(&mut background), steps));
    }

    FeatureSummary {
        name: feature.name.clone(),
        uri: feature.uri.clone(),
        status: Status::combine(scenarios.iter().map(|s| s.status)),
        scenarios,
    }
}

fn summarize_scenario(
    element: &Element,
    feature_tags: &[String],
    mut steps: Vec<StepSummary>,
    own_steps: Vec<StepSummary>,
) -> ScenarioSummary {
    steps.extend(own_steps);

    let mut tags = feature_tags.to_vec();
    for tag in &element.tags {
        if !tags.contains(&tag.name) {
            tags.push(tag.name.clone());
        }
    }

    ScenarioSummary {
        name: element.name.clone(),
        tags,
        status: Status::combine(steps.iter().map(|s| s.status)),
        duration_ms: steps.iter().map(|s| s.duration_ms).sum(),
        steps,
    }
}

fn totals(features: &[FeatureSummary]) -> Totals {
    let mut totals = Totals {
        features: features.len(),
        ..Totals::default()
    };

    for scenario in features.iter().flat_map(|f| &f.scenarios) {
        totals.scenarios += 1;
        totals.duration_ms += scenario.duration_ms;
        match scenario.status {
            Status::Passed => totals.passed_scenarios += 1,
            Status::Failed => totals.failed_scenarios += 1,
            Status::Skipped => totals.skipped_scenarios += 1,
        }
        for step in &scenario.steps {
            totals.steps += 1;
            match step.status {
                Status::Passed => totals.passed_steps += 1,
                Status::Failed => totals.failed_steps += 1,
                Status::Skipped => totals.skipped_steps += 1,
            }
        }
    }

    totals
}
