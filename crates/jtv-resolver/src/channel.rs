//! Channel URI parsing.

use crate::error::ResolverError;
use crate::{ResolverResult, CHANNEL_URI_SCHEME};

/// A validated `jtv://<channel>` URI.
///
/// The channel portion is everything after the scheme separator and must be
/// non-empty and free of path separators. The value is immutable once
/// parsed; the controller holds it for the lifetime of one playback attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelUri {
    uri: String,
    channel: String,
}

impl ChannelUri {
    /// Parse a channel URI of the form `jtv://<channel>`.
    pub fn parse(uri: &str) -> ResolverResult<Self> {
        let channel = uri
            .strip_prefix(CHANNEL_URI_SCHEME)
            .and_then(|rest| rest.strip_prefix("://"))
            .ok_or_else(|| ResolverError::InvalidUri(uri.to_string()))?;

        if channel.is_empty() || channel.contains('/') {
            return Err(ResolverError::InvalidUri(uri.to_string()));
        }

        Ok(Self {
            uri: uri.to_string(),
            channel: channel.to_string(),
        })
    }

    /// The full URI as given.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// The channel name.
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl std::fmt::Display for ChannelUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_uri() {
        let uri = ChannelUri::parse("jtv://somechannel").unwrap();
        assert_eq!(uri.channel(), "somechannel");
        assert_eq!(uri.as_str(), "jtv://somechannel");
    }

    #[test]
    fn test_channel_is_substring_after_separator() {
        for raw in ["jtv://a", "jtv://channel_123", "jtv://UPPER.case-name"] {
            let uri = ChannelUri::parse(raw).unwrap();
            assert_eq!(uri.channel(), &raw["jtv://".len()..]);
        }
    }

    #[test]
    fn test_parse_rejects_wrong_scheme() {
        assert!(matches!(
            ChannelUri::parse("http://somechannel"),
            Err(ResolverError::InvalidUri(_))
        ));
        assert!(matches!(
            ChannelUri::parse("rtmp://somechannel"),
            Err(ResolverError::InvalidUri(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_channel() {
        assert!(matches!(
            ChannelUri::parse("jtv://"),
            Err(ResolverError::InvalidUri(_))
        ));
    }

    #[test]
    fn test_parse_rejects_channel_with_slash() {
        assert!(matches!(
            ChannelUri::parse("jtv://some/channel"),
            Err(ResolverError::InvalidUri(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        assert!(matches!(
            ChannelUri::parse("jtv:somechannel"),
            Err(ResolverError::InvalidUri(_))
        ));
        assert!(matches!(
            ChannelUri::parse("somechannel"),
            Err(ResolverError::InvalidUri(_))
        ));
    }
}
