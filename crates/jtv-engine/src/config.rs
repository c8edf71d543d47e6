//! Source configuration.

use serde::{Deserialize, Serialize};

use jtv_resolver::RESOLVER_BASE_URL;
use jtv_transport::PLAYER_SWF_URL;

/// Configuration for a stream controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the channel resolution endpoint.
    pub resolver_base_url: String,

    /// Player SWF URL presented during the RTMP connect handshake.
    pub swf_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            resolver_base_url: RESOLVER_BASE_URL.to_string(),
            swf_url: PLAYER_SWF_URL.to_string(),
        }
    }
}
