//! Core of the restbdd API test harness.
//!
//! This crate provides the per-scenario request context, the fixed step
//! vocabulary for sending requests and asserting on responses, and the
//! scenario lifecycle. The cucumber world, step registrations and runner live
//! in the [`bdd`] module behind the `bdd` feature.

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod json_path;
pub mod lifecycle;
pub mod log;
pub mod request;
pub mod response;

/// Cucumber world, steps, hooks and runner
#[cfg(feature = "bdd")]
pub mod bdd;

pub use client::{HttpClient, ReqwestClient};
pub use config::{HarnessConfig, ProxySettings};
pub use context::ExecutionContext;
pub use error::{HarnessError, HarnessResult};
pub use executor::StepExecutor;
pub use lifecycle::{ReportTrigger, ScenarioLifecycle, ScenarioPhase, REPORT_TAG};
pub use log::ScenarioLog;
pub use request::{HttpMethod, RequestSpec};
pub use response::ResponseSnapshot;
