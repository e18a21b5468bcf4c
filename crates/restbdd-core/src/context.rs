//! Request context store
//!
//! One [`ExecutionContext`] exists per running scenario. It is owned by the
//! scenario's world and handed to each step as `&mut`, so concurrently running
//! scenarios never see each other's request or response.

use crate::error::{HarnessError, HarnessResult};
use crate::log::ScenarioLog;
use crate::request::RequestSpec;
use crate::response::ResponseSnapshot;

#[derive(Debug, Default)]
pub struct ExecutionContext {
    request: Option<RequestSpec>,
    response: Option<ResponseSnapshot>,
    log: ScenarioLog,
}

impl ExecutionContext {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            request: None,
            response: None,
            log: ScenarioLog::new(scenario),
        }
    }

    pub fn set_request(&mut self, spec: RequestSpec) {
        self.request = Some(spec);
    }

    pub fn request(&self) -> HarnessResult<&RequestSpec> {
        self.request.as_ref().ok_or_else(uninitialized_request)
    }

    /// Move the request specification out so a builder can replace it
    pub fn take_request(&mut self) -> HarnessResult<RequestSpec> {
        self.request.take().ok_or_else(uninitialized_request)
    }

    pub fn set_response(&mut self, snapshot: ResponseSnapshot) {
        self.response = Some(snapshot);
    }

    pub fn response(&self) -> HarnessResult<&ResponseSnapshot> {
        self.response.as_ref().ok_or_else(|| {
            HarnessError::State("No response received yet (send a request first)".to_string())
        })
    }

    /// Clear request and response and start a fresh log for `scenario`
    pub fn reset(&mut self, scenario: impl Into<String>) {
        self.request = None;
        self.response = None;
        self.log = ScenarioLog::new(scenario);
    }

    pub fn log(&self) -> &ScenarioLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut ScenarioLog {
        &mut self.log
    }
}

fn uninitialized_request() -> HarnessError {
    HarnessError::State(
        "Request specification not initialized (run \"I have a base URI\" first)".to_string(),
    )
}
