//! Error types for the transport module.

use std::fmt;

use thiserror::Error;

/// The connect-sequence stage at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectStage {
    /// Deriving the playback URL and endpoint from the descriptor.
    UrlSetup,

    /// Applying the platform handshake options.
    Options,

    /// TCP connect, RTMP handshake, and the application-level connect.
    Connect,

    /// Stream creation and the play request.
    StreamConnect,
}

impl fmt::Display for ConnectStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UrlSetup => "URL setup",
            Self::Options => "option setup",
            Self::Connect => "connect",
            Self::StreamConnect => "stream connect",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connect sequence failed at a specific stage.
    #[error("RTMP {stage} failed: {message}")]
    Connect {
        stage: ConnectStage,
        message: String,
    },

    /// A read from an established session failed. Fatal for the session.
    #[error("RTMP read failed: {0}")]
    Read(String),

    /// Not connected.
    #[error("Not connected")]
    NotConnected,

    /// Already connected.
    #[error("Already connected")]
    AlreadyConnected,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Fold a lower-level failure into a connect-stage error, keeping an
    /// already-staged error untouched.
    pub(crate) fn into_connect(self, stage: ConnectStage) -> Self {
        match self {
            Self::Connect { .. } => self,
            other => Self::Connect {
                stage,
                message: other.to_string(),
            },
        }
    }
}

/// Shorthand for building a connect-stage error.
pub(crate) fn connect_error(stage: ConnectStage, message: impl Into<String>) -> TransportError {
    TransportError::Connect {
        stage,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_error_display_includes_stage() {
        let err = connect_error(ConnectStage::StreamConnect, "no such stream");
        assert_eq!(
            err.to_string(),
            "RTMP stream connect failed: no such stream"
        );
    }

    #[test]
    fn test_into_connect_keeps_existing_stage() {
        let err = connect_error(ConnectStage::UrlSetup, "bad url")
            .into_connect(ConnectStage::Connect);
        match err {
            TransportError::Connect { stage, .. } => assert_eq!(stage, ConnectStage::UrlSetup),
            other => panic!("expected Connect, got {other:?}"),
        }
    }

    #[test]
    fn test_into_connect_wraps_read_error() {
        let err = TransportError::Read("boom".to_string()).into_connect(ConnectStage::Connect);
        match err {
            TransportError::Connect { stage, message } => {
                assert_eq!(stage, ConnectStage::Connect);
                assert!(message.contains("boom"));
            }
            other => panic!("expected Connect, got {other:?}"),
        }
    }
}
