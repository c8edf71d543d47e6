//! Error types for the engine.

use thiserror::Error;

use jtv_resolver::ResolverError;
use jtv_transport::TransportError;

/// Errors that can occur while driving the stream controller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `read` was called before a successful `start`.
    #[error("Source not started")]
    NotStarted,

    /// `start` was called while a session is already open. The existing
    /// session is left untouched.
    #[error("Source already started")]
    AlreadyStarted,

    /// Channel resolution failed.
    #[error("Channel resolution failed: {0}")]
    Resolve(#[from] ResolverError),

    /// The RTMP transport failed.
    #[error("RTMP transport failed: {0}")]
    Transport(#[from] TransportError),
}
