//! Logging setup for the restbdd API test harness.
//!
//! The cucumber runner and the report binary both route their output through
//! `tracing`. This crate owns the subscriber configuration so every entry
//! point filters and formats events the same way.

use std::env;
use std::path::PathBuf;

use tracing::warn;

pub mod logging;

pub use logging::{env_filter, init_logging, init_test_tracing, LogExt};

/// Configuration for initializing logging
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Service name attached to the startup event
    pub service_name: String,
    /// Log level filter (e.g., "info,restbdd_core=debug")
    pub log_filter: String,
    /// Emit JSON instead of the pretty console format
    pub json: bool,
    /// Optional file that receives a JSON copy of every event, rotated daily
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            service_name: "restbdd".to_string(),
            log_filter: "info".to_string(),
            json: false,
            log_file: None,
        }
    }
}

impl LoggingConfig {
    /// Load the logging configuration from environment variables
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Ok(filter) = env::var("RESTBDD_LOG") {
            config.log_filter = filter;
        }

        if let Ok(json) = env::var("RESTBDD_LOG_JSON") {
            match parse_flag(&json) {
                Some(enabled) => config.json = enabled,
                None => warn!("Invalid RESTBDD_LOG_JSON value: {}", json),
            }
        }

        if let Ok(file) = env::var("RESTBDD_LOG_FILE") {
            if !file.trim().is_empty() {
                config.log_file = Some(PathBuf::from(file));
            }
        }

        config
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }
}

/// Parse a boolean environment flag ("true"/"false"/"1"/"0").
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
