//! Provider HTTP client
//!
//! Issues exactly one network call per invocation, bounded by the per-tool
//! timeout, and always reads the full response body before returning —
//! providers embed structured errors in 200 and 404 bodies alike. No retries
//! happen at this layer; resilience is a policy decision for callers
//! wrapping the gateway.

use crate::error::ToolError;
use crate::gateway::request::OutboundRequest;
use reqwest::StatusCode;
use std::time::Duration;

/// Raw provider response: status code and full body bytes.
///
/// Transient; consumed immediately by the response interpreter.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Complete response body.
    pub body: Vec<u8>,
}

/// Thin wrapper around a shared `reqwest::Client`.
///
/// Cloning is cheap and shares the underlying connection pool; the pool
/// guarantees connection release on every exit path, including cancellation
/// of an in-flight invocation.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    client: reqwest::Client,
}

impl ProviderClient {
    /// Build a client with the crate defaults (connect timeout, pooling,
    /// user agent).
    pub fn new() -> crate::error::Result<Self> {
        Ok(Self {
            client: crate::utils::HttpClientBuilder::new().build()?,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Execute one outbound request with the given deadline.
    ///
    /// The timeout covers the whole exchange including the body read, so a
    /// provider that streams indefinitely surfaces as [`ToolError::Timeout`]
    /// rather than stalling the invocation.
    pub async fn execute(
        &self,
        request: OutboundRequest,
        timeout: Duration,
    ) -> Result<ProviderResponse, ToolError> {
        let OutboundRequest {
            method,
            url,
            headers,
        } = request;

        let response = self
            .client
            .request(method, url)
            .headers(headers)
            .timeout(timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?.to_vec();

        Ok(ProviderResponse { status, body })
    }
}

/// Map a reqwest failure into the transport arm of the error taxonomy.
fn transport_error(err: reqwest::Error) -> ToolError {
    if err.is_timeout() {
        ToolError::Timeout(err.to_string())
    } else {
        ToolError::ConnectionFailed(err.to_string())
    }
}
