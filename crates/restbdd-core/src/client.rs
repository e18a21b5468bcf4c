//! HTTP client seam between the step executor and the network

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::HarnessConfig;
use crate::error::HarnessResult;
use crate::request::{HttpMethod, RequestSpec};
use crate::response::ResponseSnapshot;

/// Performs one HTTP call described by a request specification
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send `spec` with `method` to `path` and capture the response
    async fn dispatch(
        &self,
        spec: &RequestSpec,
        method: HttpMethod,
        path: &str,
    ) -> HarnessResult<ResponseSnapshot>;
}

/// reqwest-backed client.
///
/// A client is built per dispatch from the request specification, so a proxy
/// attached to one scenario's specification never leaks into another's.
#[derive(Debug, Clone, Copy)]
pub struct ReqwestClient {
    timeout: Duration,
    relaxed_https: bool,
}

impl ReqwestClient {
    pub fn new(timeout: Duration, relaxed_https: bool) -> Self {
        Self {
            timeout,
            relaxed_https,
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.timeout, config.relaxed_https)
    }

    fn client_for(&self, spec: &RequestSpec) -> HarnessResult<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .danger_accept_invalid_certs(self.relaxed_https);

        if let Some(proxy) = &spec.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.url())?);
        }

        Ok(builder.build()?)
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn dispatch(
        &self,
        spec: &RequestSpec,
        method: HttpMethod,
        path: &str,
    ) -> HarnessResult<ResponseSnapshot> {
        let client = self.client_for(spec)?;
        let url = spec.url_for(path);
        debug!(%method, %url, "Dispatching request");

        let mut request = client.request(method.into(), &url);
        if let Some(content_type) = &spec.content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        for (name, value) in &spec.headers {
            request = request.header(name, value);
        }
        if let Some(body) = &spec.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;

        debug!(%method, %url, status, "Response received");
        Ok(ResponseSnapshot::new(status, headers, body))
    }
}
