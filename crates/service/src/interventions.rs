//! Client abstraction for the interventions service.
//!
//! The gateway is a bulkhead: whatever happens on the wire, the caller gets a
//! value back. Failures degrade to [`InterventionHistory::Unavailable`] and
//! are logged, never raised.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

/// Payload substituted when the interventions service cannot be reached.
pub const UNAVAILABLE_PAYLOAD: &str = "interventions service unavailable";

/// Outcome of a history lookup. The payload is opaque at this boundary; its
/// shape belongs to the interventions service.
#[derive(Clone, Debug, PartialEq)]
pub enum InterventionHistory {
    Available(Value),
    Unavailable,
}

impl InterventionHistory {
    /// Wire form: the remote body verbatim, or the fallback marker string.
    pub fn into_payload(self) -> Value {
        match self {
            Self::Available(body) => body,
            Self::Unavailable => Value::String(UNAVAILABLE_PAYLOAD.to_string()),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

#[async_trait]
pub trait InterventionGateway: Send + Sync {
    async fn history_for_machine(&self, machine_id: i64) -> InterventionHistory;
}

/// HTTP gateway: one bounded attempt per lookup, no retry.
pub struct HttpInterventionClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpInterventionClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl InterventionGateway for HttpInterventionClient {
    async fn history_for_machine(&self, machine_id: i64) -> InterventionHistory {
        let url = format!("{}/api/interventions/machine/{}", self.base_url, machine_id);
        let resp = match self.http.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(machine_id, error = %e, "interventions service unreachable");
                return InterventionHistory::Unavailable;
            }
        };
        let resp = match resp.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!(machine_id, error = %e, "interventions service returned failure status");
                return InterventionHistory::Unavailable;
            }
        };
        match resp.json::<Value>().await {
            Ok(body) => InterventionHistory::Available(body),
            Err(e) => {
                warn!(machine_id, error = %e, "interventions response body unreadable");
                InterventionHistory::Unavailable
            }
        }
    }
}
