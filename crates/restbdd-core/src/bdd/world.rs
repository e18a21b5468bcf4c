//! World definition for restbdd scenarios

use std::sync::Arc;

use cucumber::World;

use crate::client::ReqwestClient;
use crate::config::{self, HarnessConfig};
use crate::context::ExecutionContext;
use crate::executor::StepExecutor;
use crate::lifecycle::ScenarioLifecycle;

/// State cucumber creates fresh for every scenario.
///
/// Each running scenario owns its world, so the execution context inside it is
/// never visible to a scenario running concurrently on another worker.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct ApiWorld {
    pub context: ExecutionContext,
    pub lifecycle: ScenarioLifecycle,
    pub executor: StepExecutor<ReqwestClient>,
}

impl ApiWorld {
    /// Create a world bound to the process-wide configuration
    pub fn new() -> Self {
        Self::with_config(config::global())
    }

    pub fn with_config(config: Arc<HarnessConfig>) -> Self {
        Self {
            context: ExecutionContext::default(),
            lifecycle: ScenarioLifecycle::default(),
            executor: StepExecutor::from_config(config),
        }
    }
}

impl Default for ApiWorld {
    fn default() -> Self {
        Self::new()
    }
}
