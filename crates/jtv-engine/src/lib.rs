//! Stream controller for the jtv live source.
//!
//! This crate coordinates channel resolution and the RTMP transport behind
//! the start/read/stop surface a host media pipeline consumes: `start`
//! resolves a `jtv://` URI and opens the playback session, `read` pulls the
//! next media chunk, `stop` tears everything down.

mod config;
mod controller;
mod error;
mod state;

pub use config::SourceConfig;
pub use controller::StreamController;
pub use error::EngineError;
pub use state::SourceState;

/// Default read size, in bytes, for hosts with no size preference.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
