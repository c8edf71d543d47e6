//! Session state management.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an RTMP playback session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Created but not yet connected.
    #[default]
    Unconnected,

    /// Connect and play handshakes completed; no read issued yet.
    Connected,

    /// At least one read has been issued.
    Streaming,

    /// Closed; the connection has been released.
    Closed,

    /// A connect or read failure killed the session. It must be rebuilt
    /// from a fresh descriptor; there is no partial recovery.
    Failed,
}

impl SessionState {
    /// Check if the session has not been connected yet.
    pub fn is_unconnected(&self) -> bool {
        matches!(self, Self::Unconnected)
    }

    /// Check if reads are valid (connected or already streaming).
    pub fn is_readable(&self) -> bool {
        matches!(self, Self::Connected | Self::Streaming)
    }

    /// Check if the session is closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Check if the session has failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Simple string representation of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unconnected => "Unconnected",
            Self::Connected => "Connected",
            Self::Streaming => "Streaming",
            Self::Closed => "Closed",
            Self::Failed => "Failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unconnected() {
        assert!(SessionState::default().is_unconnected());
    }

    #[test]
    fn test_readable_states() {
        assert!(SessionState::Connected.is_readable());
        assert!(SessionState::Streaming.is_readable());
        assert!(!SessionState::Unconnected.is_readable());
        assert!(!SessionState::Closed.is_readable());
        assert!(!SessionState::Failed.is_readable());
    }
}
