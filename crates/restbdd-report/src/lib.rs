//! Report generation for restbdd runs.
//!
//! Consumes the cucumber JSON run log and writes a machine-readable summary,
//! a Markdown overview and a build-over-build trends file.

pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod summary;
pub mod trends;

pub use builder::{ReportBuilder, ReportGenerator};
pub use config::{Classification, PresentationMode, ReportConfiguration, SortingMethod};
pub use error::{ReportError, ReportResult};
pub use summary::{ReportSummary, Status};
