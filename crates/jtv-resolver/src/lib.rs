//! Channel name resolution for the jtv live source.
//!
//! This crate turns a `jtv://` channel URI into a stream descriptor: the
//! (token, connect, play) triple needed to authorize and address an RTMP
//! playback session. Resolution is a single HTTP GET against the platform
//! endpoint followed by a forward-compatible parse of the XML response.

mod channel;
mod descriptor;
mod error;
mod fetch;

pub use channel::ChannelUri;
pub use descriptor::StreamDescriptor;
pub use error::ResolverError;
pub use fetch::DescriptorFetcher;

/// URI scheme accepted for channel URIs.
pub const CHANNEL_URI_SCHEME: &str = "jtv";

/// Default base URL of the channel resolution endpoint.
pub const RESOLVER_BASE_URL: &str = "http://usher.justin.tv";

/// Result type for resolver operations.
pub type ResolverResult<T> = Result<T, ResolverError>;
