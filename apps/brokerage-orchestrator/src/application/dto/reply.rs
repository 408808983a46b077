//! Upstream replies passed through to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::ports::UpstreamResponse;

/// 2xx upstream reply, status and body verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamReply {
    /// Upstream status code.
    pub status: u16,
    /// Upstream body; `null` when empty.
    pub body: Value,
}

impl From<&UpstreamResponse> for UpstreamReply {
    fn from(response: &UpstreamResponse) -> Self {
        Self {
            status: response.status,
            body: response.json_value(),
        }
    }
}
