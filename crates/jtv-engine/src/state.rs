//! Controller state machine types.

use serde::{Deserialize, Serialize};

/// Lifecycle state of the stream controller.
///
/// Models the element-lifecycle gate of the host runtime explicitly: a new
/// `start` is only permitted from `Idle`, and `read` only while
/// `Streaming`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceState {
    /// No channel resolved, no session open.
    #[default]
    Idle,

    /// A start is in progress: resolving the channel and connecting.
    Resolving,

    /// A playback session is open and serving reads.
    Streaming,
}

impl SourceState {
    /// Check if the controller is idle.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if a start is in progress.
    pub fn is_resolving(&self) -> bool {
        matches!(self, Self::Resolving)
    }

    /// Check if a playback session is open.
    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming)
    }

    /// Simple string representation of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Resolving => "Resolving",
            Self::Streaming => "Streaming",
        }
    }
}
