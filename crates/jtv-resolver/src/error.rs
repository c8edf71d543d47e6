//! Error types for the resolver.

use thiserror::Error;

/// Errors that can occur while resolving a channel into a stream descriptor.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The channel URI did not match `jtv://<channel>`.
    #[error("Invalid channel URI: {0}")]
    InvalidUri(String),

    /// The resolution endpoint answered with a non-success status.
    #[error("Resolution endpoint returned HTTP status {0}")]
    HttpStatus(u16),

    /// The resolution request could not be carried out.
    #[error("Resolution request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not a parseable XML document.
    #[error("Malformed descriptor XML: {0}")]
    MalformedXml(String),

    /// The document root was not the expected `nodes` element.
    #[error("Unexpected root element <{0}>")]
    UnexpectedRoot(String),

    /// The document contained no stream node.
    #[error("Descriptor set contains no stream nodes")]
    EmptyDescriptorSet,

    /// The stream node was missing one of the required fields.
    #[error("Stream node is missing <{0}>")]
    IncompleteDescriptor(&'static str),
}
