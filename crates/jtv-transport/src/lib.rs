//! RTMP playback client.
//!
//! This crate pulls a live stream from an RTMP server and surfaces it as an
//! FLV byte stream. One session drives one connection through the fixed
//! connect/play sequence: handshake, `connect` with the platform handshake
//! options, the usher token, `createStream`, then `play`; after that,
//! media is read on demand, one chunk at a time.

mod error;
mod flv;
mod session;
mod state;

pub use error::{ConnectStage, TransportError};
pub use flv::FlvStream;
pub use session::{PlaybackOptions, RtmpSession};
pub use state::SessionState;

/// Player SWF presented to the platform during the connect handshake.
pub const PLAYER_SWF_URL: &str = "http://www-cdn.justin.tv/widgets/live_site_player.swf";

/// Flash client version string sent in the connect command.
pub const FLASH_VERSION: &str = "WIN 10,1,85,3";

/// Default RTMP port.
pub const DEFAULT_RTMP_PORT: u16 = 1935;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
