//! Step executor
//!
//! Each public method implements one step phrase against an
//! [`ExecutionContext`]. Parameters are validated before any network call or
//! extraction, and every failure is written to the scenario log before it is
//! returned.

use std::sync::Arc;

use tracing::debug;

use crate::client::{HttpClient, ReqwestClient};
use crate::config::HarnessConfig;
use crate::context::ExecutionContext;
use crate::error::{HarnessError, HarnessResult};
use crate::request::{HttpMethod, RequestSpec, JSON_CONTENT_TYPE};
use crate::response::DATA_KEY;

/// Header carrying `HarnessConfig::api_key`
pub const API_KEY_HEADER: &str = "x-api-key";

/// Prefix some feature files put in front of element fields
const DATA_FIELD_PREFIX: &str = "data.";

#[derive(Debug)]
pub struct StepExecutor<C> {
    config: Arc<HarnessConfig>,
    client: C,
}

impl StepExecutor<ReqwestClient> {
    /// Executor that talks to the network through reqwest
    pub fn from_config(config: Arc<HarnessConfig>) -> Self {
        let client = ReqwestClient::from_config(&config);
        Self::new(config, client)
    }
}

impl<C: HttpClient> StepExecutor<C> {
    pub fn new(config: Arc<HarnessConfig>, client: C) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// `I have a base URI`
    pub fn base_uri(&self, ctx: &mut ExecutionContext) -> HarnessResult<()> {
        let spec = logged(ctx, "Failed to set base URI", self.base_request())?;
        ctx.log_mut().log(format!("Request details: {}", spec.describe()));
        ctx.set_request(spec);
        ctx.log_mut().log("Base URI set successfully");
        Ok(())
    }

    fn base_request(&self) -> HarnessResult<RequestSpec> {
        let base_uri = self.config.require_base_uri()?;
        let proxy = self.config.proxy()?;

        let mut spec = RequestSpec::new(base_uri)
            .content_type(JSON_CONTENT_TYPE)
            .proxy(proxy);
        if let Some(api_key) = &self.config.api_key {
            spec = spec.header(API_KEY_HEADER, api_key.as_str());
        }
        Ok(spec)
    }

    /// `I send a {method} request to {path}`
    pub async fn send_request(
        &self,
        ctx: &mut ExecutionContext,
        method: &str,
        path: &str,
    ) -> HarnessResult<()> {
        let context = format!("Failed to send {} request to {}", method, path);

        let method = match validate_request(method, path) {
            Ok(method) => method,
            Err(e) => {
                ctx.log_mut().log(format!("Invalid request parameters: {}", e));
                return Err(ctx.log_mut().fail(&context, e));
            }
        };
        let path = path.trim();

        let request_ready = ctx.request().map(|_| ());
        logged(ctx, &context, request_ready)?;
        ctx.log_mut()
            .log(format!("Executing {} request to: {}", method, path));

        let result = match ctx.request() {
            Ok(spec) => self.client.dispatch(spec, method, path).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => {
                ctx.log_mut().log(format!(
                    "Response received with status code: {}",
                    response.status()
                ));
                ctx.log_mut()
                    .log(format!("{} Response Body: {}", method, response.pretty_body()));
                debug!(%method, path, status = response.status(), "Stored response");
                ctx.set_response(response);
                Ok(())
            }
            Err(e) => {
                let err = match e {
                    HarnessError::Http(source) => HarnessError::Transport {
                        method: method.to_string(),
                        endpoint: path.to_string(),
                        message: source.to_string(),
                    },
                    other => other,
                };
                let details = ctx
                    .request()
                    .ok()
                    .map(|spec| format!("Request details: {}", spec.describe()));
                if let Some(details) = details {
                    ctx.log_mut().log(details);
                }
                Err(ctx.log_mut().fail(&context, err))
            }
        }
    }

    /// `I have the following request body:`
    pub fn set_body(&self, ctx: &mut ExecutionContext, body: &str) -> HarnessResult<()> {
        let spec = ctx.take_request();
        let spec = logged(ctx, "Failed to set request body", spec)?;
        ctx.set_request(spec.body(body));
        ctx.log_mut().log(format!("Request body set: {}", body));
        Ok(())
    }

    /// `the response status code should be {n}`
    pub fn assert_status(&self, ctx: &mut ExecutionContext, expected: u16) -> HarnessResult<()> {
        let result = ctx.response().and_then(|response| {
            let actual = response.status();
            if actual == expected {
                Ok(())
            } else {
                Err(HarnessError::Assertion(format!(
                    "Expected status code {} but got {}",
                    expected, actual
                )))
            }
        });
        logged(ctx, "Status code validation failed", result)?;
        ctx.log_mut().log("Status code validation successful");
        Ok(())
    }

    /// `the response should have field {field} with value {value}`
    pub fn assert_field(
        &self,
        ctx: &mut ExecutionContext,
        field: &str,
        expected: &str,
    ) -> HarnessResult<()> {
        let result = ctx.response().and_then(|response| {
            let actual = response.field(field);
            if actual.as_deref() == Some(expected) {
                Ok(())
            } else {
                Err(HarnessError::Assertion(format!(
                    "Expected value '{}' for field '{}' but got '{}'",
                    expected,
                    field,
                    actual.as_deref().unwrap_or("null")
                )))
            }
        });
        logged(ctx, "Field validation failed", result)?;
        ctx.log_mut()
            .log(format!("Field validation successful for {}", field));
        Ok(())
    }

    /// `the response should contain {text}`
    pub fn assert_contains(&self, ctx: &mut ExecutionContext, text: &str) -> HarnessResult<()> {
        let result = ctx.response().and_then(|response| {
            if response.body().contains(text) {
                Ok(())
            } else {
                Err(HarnessError::Assertion(format!(
                    "Expected response to contain '{}' but was not found in: {}",
                    text,
                    response.body()
                )))
            }
        });
        logged(ctx, "Failed to verify response content", result)?;
        ctx.log_mut()
            .log(format!("Response contains expected text: {}", text));
        Ok(())
    }

    /// `the response should have field {field} at index {i} with value {value}`
    pub fn assert_field_at_index(
        &self,
        ctx: &mut ExecutionContext,
        field: &str,
        index: i64,
        expected: &str,
    ) -> HarnessResult<()> {
        let context = format!("Failed to verify field '{}' at index {}", field, index);

        let body = ctx.response().map(|response| response.pretty_body());
        let body = logged(ctx, &context, body)?;
        ctx.log_mut().log(format!("Response Body: {}", body));

        let result = ctx.response().and_then(|response| {
            let size = response.data_len()?;
            let position = usize::try_from(index)
                .ok()
                .filter(|&i| i < size)
                .ok_or_else(|| {
                    HarnessError::InvalidArgument(format!(
                        "Index {} is out of bounds for data array of size {}",
                        index, size
                    ))
                })?;

            let element_field = field.strip_prefix(DATA_FIELD_PREFIX).unwrap_or(field);
            let actual = response.field(&format!("{}[{}].{}", DATA_KEY, position, element_field));
            if actual.as_deref() == Some(expected) {
                Ok(())
            } else {
                Err(HarnessError::Assertion(format!(
                    "Expected value '{}' for field '{}' at index {} but got '{}'",
                    expected,
                    field,
                    index,
                    actual.as_deref().unwrap_or("null")
                )))
            }
        });
        logged(ctx, &context, result)?;
        ctx.log_mut().log(format!(
            "Field '{}' at index {} has expected value '{}'",
            field, index, expected
        ));
        Ok(())
    }

    /// `the response should have {n} items in data array`
    pub fn assert_item_count(
        &self,
        ctx: &mut ExecutionContext,
        expected: usize,
    ) -> HarnessResult<()> {
        let result = ctx.response().and_then(|response| {
            let actual = response.data_len()?;
            if actual == expected {
                Ok(())
            } else {
                Err(HarnessError::Assertion(format!(
                    "Expected {} items in data array but found {}",
                    expected, actual
                )))
            }
        });
        logged(ctx, "Failed to verify data array size", result)?;
        ctx.log_mut()
            .log(format!("Data array contains expected {} items", expected));
        Ok(())
    }
}

/// Check path and method before anything touches the network
pub fn validate_request(method: &str, path: &str) -> HarnessResult<HttpMethod> {
    if path.trim().is_empty() {
        return Err(HarnessError::InvalidArgument(
            "Endpoint cannot be null or empty".to_string(),
        ));
    }
    method.parse()
}

fn logged<T>(
    ctx: &mut ExecutionContext,
    context: &str,
    result: HarnessResult<T>,
) -> HarnessResult<T> {
    result.map_err(|e| ctx.log_mut().fail(context, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockHttpClient;
    use crate::response::ResponseSnapshot;
    use assert_matches::assert_matches;
    use std::collections::BTreeMap;

    fn executor(client: MockHttpClient) -> StepExecutor<MockHttpClient> {
        let config = HarnessConfig::default().with_base_uri("http://localhost:9999/api");
        StepExecutor::new(Arc::new(config), client)
    }

    fn context_with_response(status: u16, body: &str) -> ExecutionContext {
        let mut ctx = ExecutionContext::new("test");
        ctx.set_response(ResponseSnapshot::new(status, BTreeMap::new(), body));
        ctx
    }

    fn never_called() -> MockHttpClient {
        let mut client = MockHttpClient::new();
        client.expect_dispatch().never();
        client
    }

    #[test]
    fn test_base_uri_stores_json_request() {
        let executor = executor(never_called());
        let mut ctx = ExecutionContext::new("base");

        executor.base_uri(&mut ctx).unwrap();

        let spec = ctx.request().unwrap();
        assert_eq!(spec.base_uri, "http://localhost:9999/api");
        assert_eq!(spec.content_type.as_deref(), Some(JSON_CONTENT_TYPE));
        assert_eq!(spec.proxy, None);
        assert!(ctx.log().contains("Base URI set successfully"));
    }

    #[test]
    fn test_base_uri_with_api_key_and_proxy() {
        let config = HarnessConfig {
            api_key: Some("reqres-free-v1".to_string()),
            ..HarnessConfig::default()
        }
        .with_proxy("proxy.local", "3128");
        let executor = StepExecutor::new(Arc::new(config), never_called());
        let mut ctx = ExecutionContext::new("proxy");

        executor.base_uri(&mut ctx).unwrap();

        let spec = ctx.request().unwrap();
        assert_eq!(
            spec.headers.get(API_KEY_HEADER).map(String::as_str),
            Some("reqres-free-v1")
        );
        assert_eq!(spec.proxy.as_ref().map(|p| p.port), Some(3128));
    }

    #[test]
    fn test_base_uri_with_malformed_proxy() {
        let config = HarnessConfig::default().with_proxy("proxy.local", "not-a-port");
        let executor = StepExecutor::new(Arc::new(config), never_called());
        let mut ctx = ExecutionContext::new("bad proxy");

        let err = executor.base_uri(&mut ctx).unwrap_err();

        assert_matches!(err, HarnessError::Configuration(_));
        assert!(ctx.request().is_err());
        assert!(ctx.log().contains("Failed to set base URI"));
        assert!(ctx.log().contains("not-a-port"));
    }

    #[tokio::test]
    async fn test_send_dispatches_parsed_method() {
        let mut client = MockHttpClient::new();
        client
            .expect_dispatch()
            .withf(|spec, method, path| {
                spec.base_uri == "http://localhost:9999/api"
                    && *method == HttpMethod::Delete
                    && path == "/users/2"
            })
            .times(1)
            .returning(|_, _, _| Ok(ResponseSnapshot::new(204, BTreeMap::new(), "")));
        let executor = executor(client);
        let mut ctx = ExecutionContext::new("send");
        executor.base_uri(&mut ctx).unwrap();

        executor
            .send_request(&mut ctx, "delete", " /users/2 ")
            .await
            .unwrap();

        assert_eq!(ctx.response().unwrap().status(), 204);
        assert!(ctx.log().contains("Executing DELETE request to: /users/2"));
        assert!(ctx.log().contains("Response received with status code: 204"));
    }

    #[tokio::test]
    async fn test_send_rejects_empty_path_before_dispatch() {
        let executor = executor(never_called());
        let mut ctx = ExecutionContext::new("empty path");
        executor.base_uri(&mut ctx).unwrap();

        for path in ["", "   ", "\t"] {
            let err = executor.send_request(&mut ctx, "GET", path).await.unwrap_err();
            assert_matches!(err, HarnessError::InvalidArgument(_));
        }
        assert!(ctx.log().contains("Invalid request parameters"));
    }

    #[tokio::test]
    async fn test_send_rejects_unknown_method_before_dispatch() {
        let executor = executor(never_called());
        let mut ctx = ExecutionContext::new("bad method");
        executor.base_uri(&mut ctx).unwrap();

        let err = executor
            .send_request(&mut ctx, "TRACE", "/users")
            .await
            .unwrap_err();

        assert_matches!(err, HarnessError::InvalidArgument(ref msg) if msg.contains("TRACE"));
    }

    #[tokio::test]
    async fn test_send_without_base_uri_is_state_error() {
        let executor = executor(never_called());
        let mut ctx = ExecutionContext::new("no base");

        let err = executor
            .send_request(&mut ctx, "GET", "/users")
            .await
            .unwrap_err();

        assert_matches!(err, HarnessError::State(_));
        assert!(ctx.log().contains("Failed to send GET request to /users"));
    }

    #[tokio::test]
    async fn test_send_passes_through_transport_error() {
        let mut client = MockHttpClient::new();
        client.expect_dispatch().times(1).returning(|_, method, path| {
            Err(HarnessError::Transport {
                method: method.to_string(),
                endpoint: path.to_string(),
                message: "operation timed out".to_string(),
            })
        });
        let executor = executor(client);
        let mut ctx = ExecutionContext::new("timeout");
        executor.base_uri(&mut ctx).unwrap();

        let err = executor
            .send_request(&mut ctx, "get", "/users?delay=30")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to execute GET request to /users?delay=30: operation timed out"
        );
        assert!(ctx.response().is_err());
        assert!(ctx.log().contains("Request details: base URI"));
    }

    #[test]
    fn test_set_body() {
        let executor = executor(never_called());
        let mut ctx = ExecutionContext::new("body");

        let err = executor.set_body(&mut ctx, "{}").unwrap_err();
        assert_matches!(err, HarnessError::State(_));

        executor.base_uri(&mut ctx).unwrap();
        executor
            .set_body(&mut ctx, r#"{"name": "morpheus", "job": "leader"}"#)
            .unwrap();
        assert_eq!(
            ctx.request().unwrap().body.as_deref(),
            Some(r#"{"name": "morpheus", "job": "leader"}"#)
        );
    }

    #[test]
    fn test_assert_status() {
        let executor = executor(never_called());

        let mut ctx = context_with_response(200, "{}");
        executor.assert_status(&mut ctx, 200).unwrap();

        let mut ctx = context_with_response(404, "{}");
        let err = executor.assert_status(&mut ctx, 200).unwrap_err();
        assert_matches!(err, HarnessError::Assertion(_));
        let message = err.to_string();
        assert!(message.contains("200") && message.contains("404"));
        assert!(ctx.log().contains("Status code validation failed"));
    }

    #[test]
    fn test_assert_status_without_response() {
        let executor = executor(never_called());
        let mut ctx = ExecutionContext::new("no response");
        assert_matches!(
            executor.assert_status(&mut ctx, 200),
            Err(HarnessError::State(_))
        );
    }

    #[test]
    fn test_assert_field() {
        let executor = executor(never_called());
        let mut ctx = context_with_response(
            200,
            r#"{"data":{"id":2,"email":"janet.weaver@reqres.in"}}"#,
        );

        executor
            .assert_field(&mut ctx, "data.email", "janet.weaver@reqres.in")
            .unwrap();
        executor.assert_field(&mut ctx, "data.id", "2").unwrap();

        let err = executor
            .assert_field(&mut ctx, "data.avatar", "x.png")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Assertion failed: Expected value 'x.png' for field 'data.avatar' but got 'null'"
        );
    }

    #[test]
    fn test_assert_contains() {
        let executor = executor(never_called());
        let mut ctx = context_with_response(201, r#"{"name":"morpheus","job":"leader"}"#);

        executor.assert_contains(&mut ctx, "morpheus").unwrap();

        let err = executor.assert_contains(&mut ctx, "zion resident").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("zion resident"));
        assert!(message.contains(r#"{"name":"morpheus","job":"leader"}"#));
    }

    #[test]
    fn test_assert_field_at_index() {
        let executor = executor(never_called());
        let body = r#"{"data":[{"name":"John"},{"name":"Jane"},{"name":"Joan"}]}"#;

        let mut ctx = context_with_response(200, body);
        executor
            .assert_field_at_index(&mut ctx, "name", 1, "Jane")
            .unwrap();
        executor
            .assert_field_at_index(&mut ctx, "data.name", 0, "John")
            .unwrap();

        let err = executor
            .assert_field_at_index(&mut ctx, "name", 5, "Jane")
            .unwrap_err();
        assert_matches!(err, HarnessError::InvalidArgument(ref msg) if msg.contains("size 3"));

        let err = executor
            .assert_field_at_index(&mut ctx, "name", -1, "Joan")
            .unwrap_err();
        assert_matches!(err, HarnessError::InvalidArgument(_));

        let mut ctx = context_with_response(
            200,
            r#"{"data":[{"name":"John"},{"name":"John"},{"name":"Joan"}]}"#,
        );
        let err = executor
            .assert_field_at_index(&mut ctx, "name", 1, "Jane")
            .unwrap_err();
        assert_matches!(err, HarnessError::Assertion(_));
        let message = err.to_string();
        assert!(message.contains("'Jane'") && message.contains("'John'"));
    }

    #[test]
    fn test_assert_field_at_index_without_data() {
        let executor = executor(never_called());
        let mut ctx = context_with_response(200, r#"{"page":1}"#);

        let err = executor
            .assert_field_at_index(&mut ctx, "name", 0, "Jane")
            .unwrap_err();
        assert_matches!(err, HarnessError::InvalidArgument(ref msg) if msg.contains("size 0"));
    }

    #[test]
    fn test_assert_item_count() {
        let executor = executor(never_called());

        let mut ctx = context_with_response(200, r#"{"page":1}"#);
        executor.assert_item_count(&mut ctx, 0).unwrap();
        let err = executor.assert_item_count(&mut ctx, 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Assertion failed: Expected 1 items in data array but found 0"
        );

        let mut ctx = context_with_response(200, r#"{"data":[1,2,3,4,5,6]}"#);
        executor.assert_item_count(&mut ctx, 6).unwrap();
    }

    #[test]
    fn test_collection_steps_reject_non_array_data() {
        let executor = executor(never_called());
        let mut ctx = context_with_response(200, r#"{"data":{"id":2,"first_name":"Janet"}}"#);

        let err = executor.assert_item_count(&mut ctx, 0).unwrap_err();
        assert_matches!(err, HarnessError::InvalidArgument(ref msg) if msg.contains("is an object"));

        let err = executor
            .assert_field_at_index(&mut ctx, "first_name", 0, "Janet")
            .unwrap_err();
        assert_matches!(err, HarnessError::InvalidArgument(ref msg) if msg.contains("is an object"));
        assert!(ctx.log().contains("Failed to verify data array size"));
    }

    #[test]
    fn test_validate_request_order() {
        assert_matches!(
            validate_request("BOGUS", ""),
            Err(HarnessError::InvalidArgument(ref msg)) if msg.contains("Endpoint")
        );
        assert_eq!(validate_request("put", "/users/2").unwrap(), HttpMethod::Put);
    }
}
