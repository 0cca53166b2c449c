use std::time::Duration;

use tracing::debug;

use crate::config::FleetConfig;
use crate::error::FleetError;
use crate::rpc::{JsonRpcRequest, JsonRpcResponse};
use crate::types::RawNode;

/// Client for a single seed endpoint. One instance is shared across the
/// fan-out; `reqwest::Client` is internally pooled and cheap to clone.
///
/// No retries here. Every seed is independently unreliable and retry
/// policy, if any, belongs to the caller.
#[derive(Debug, Clone)]
pub struct SourceClient {
    http: reqwest::Client,
    timeout: Duration,
    rpc_port: u16,
}

impl SourceClient {
    pub fn new(config: &FleetConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout: Duration::from_millis(config.timeout_per_source_ms),
            rpc_port: config.rpc_port,
        }
    }

    /// Ask one seed for its view of the fleet. Network and timeout errors
    /// map to `SourceUnavailable`, unparseable payloads to
    /// `MalformedSourceResponse`; neither ever panics past the caller.
    pub async fn fetch_nodes(&self, seed: &str) -> Result<Vec<RawNode>, FleetError> {
        let url = if seed.contains(':') {
            format!("http://{}/rpc", seed)
        } else {
            format!("http://{}:{}/rpc", seed, self.rpc_port)
        };

        let response = self
            .http
            .post(&url)
            .json(&JsonRpcRequest::get_pods())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FleetError::SourceUnavailable {
                endpoint: seed.to_string(),
                reason: e.to_string(),
            })?;

        let rpc: JsonRpcResponse =
            response
                .json()
                .await
                .map_err(|e| FleetError::MalformedSourceResponse {
                    endpoint: seed.to_string(),
                    reason: e.to_string(),
                })?;

        if let Some(err) = rpc.error {
            return Err(FleetError::SourceUnavailable {
                endpoint: seed.to_string(),
                reason: format!("rpc error {}: {}", err.code, err.message),
            });
        }

        let result = rpc.result.ok_or_else(|| FleetError::MalformedSourceResponse {
            endpoint: seed.to_string(),
            reason: "response carries neither result nor error".to_string(),
        })?;

        let pods = extract_pods(&result).ok_or_else(|| FleetError::MalformedSourceResponse {
            endpoint: seed.to_string(),
            reason: "result is neither a pod array nor {pods: [...]}".to_string(),
        })?;

        debug!(seed, count = pods.len(), "fetched pods from seed");
        Ok(pods)
    }
}

/// Seeds answer in one of two shapes: a bare pod array, or an object with
/// a `pods` array. Anything else is malformed.
fn extract_pods(result: &serde_json::Value) -> Option<Vec<RawNode>> {
    if result.is_array() {
        return serde_json::from_value(result.clone()).ok();
    }
    let pods = result.get("pods")?;
    serde_json::from_value(pods.clone()).ok()
}
