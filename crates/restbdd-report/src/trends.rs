//! Build-over-build trend history

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};
use crate::summary::ReportSummary;

/// Number of builds kept in the trends file
pub const MAX_TREND_ENTRIES: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendEntry {
    pub build_number: String,
    pub generated_at: DateTime<Utc>,
    pub passed_scenarios: usize,
    pub failed_scenarios: usize,
    pub skipped_scenarios: usize,
    pub steps: usize,
    pub failed_steps: usize,
    pub duration_ms: u64,
}

impl From<&ReportSummary> for TrendEntry {
    fn from(summary: &ReportSummary) -> Self {
        Self {
            build_number: summary.build_number.clone(),
            generated_at: summary.generated_at,
            passed_scenarios: summary.totals.passed_scenarios,
            failed_scenarios: summary.totals.failed_scenarios,
            skipped_scenarios: summary.totals.skipped_scenarios,
            steps: summary.totals.steps,
            failed_steps: summary.totals.failed_steps,
            duration_ms: summary.totals.duration_ms,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trends {
    pub entries: Vec<TrendEntry>,
}

impl Trends {
    /// Load the history; a missing file is an empty history
    pub fn load(path: &Path) -> ReportResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|e| ReportError::json(path, e))
    }

    /// Append an entry, dropping the oldest beyond the limit
    pub fn push(&mut self, entry: TrendEntry) {
        self.entries.push(entry);
        if self.entries.len() > MAX_TREND_ENTRIES {
            let excess = self.entries.len() - MAX_TREND_ENTRIES;
            self.entries.drain(..excess);
        }
    }

    pub fn save(&self, path: &Path) -> ReportResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
        }
        let raw = serde_json::to_string_pretty(self).map_err(|e| ReportError::json(path, e))?;
        fs::write(path, raw).map_err(|e| ReportError::io(path, e))
    }
}
