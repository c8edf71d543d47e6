//! Stream descriptor parsing.
//!
//! The resolution endpoint answers with a document of the form
//!
//! ```xml
//! <nodes>
//!   <node>
//!     <token>...</token>
//!     <connect>rtmp://...</connect>
//!     <play>...</play>
//!   </node>
//! </nodes>
//! ```
//!
//! Only the first stream node is consulted, whatever its tag name; unknown
//! child tags inside it are ignored so newer endpoint revisions keep
//! working against this parser.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ResolverError;
use crate::ResolverResult;

/// The (token, connect, play) triple needed to authorize and address a
/// playback session.
///
/// All three fields are owned, non-empty strings once `parse` succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    /// Playback authorization token.
    pub token: String,

    /// RTMP base URL of the edge server, e.g. `rtmp://host/app`.
    pub connect: String,

    /// Stream key/path appended to the connect URL for playback.
    pub play: String,
}

impl StreamDescriptor {
    /// Parse a resolution response body into a descriptor.
    ///
    /// Fails with `MalformedXml` when the body is not XML, `UnexpectedRoot`
    /// when the root tag is not `nodes`, `EmptyDescriptorSet` when the root
    /// has no child stream node, and `IncompleteDescriptor` when the first
    /// stream node lacks any of the three required fields.
    pub fn parse(body: &[u8]) -> ResolverResult<Self> {
        let mut reader = Reader::from_reader(body);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        let mut token: Option<String> = None;
        let mut connect: Option<String> = None;
        let mut play: Option<String> = None;

        // depth 0 = before root, 1 = inside root, 2 = inside a stream node,
        // 3 = inside a field element.
        let mut depth = 0usize;
        let mut saw_root = false;
        let mut stream_nodes = 0usize;
        let mut field: Option<Field> = None;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| ResolverError::MalformedXml(e.to_string()))?;

            match event {
                Event::Start(ref e) => {
                    match depth {
                        0 => {
                            check_root(e.name().as_ref())?;
                            saw_root = true;
                        }
                        1 => stream_nodes += 1,
                        2 if stream_nodes == 1 => {
                            field = Field::from_name(e.name().as_ref());
                        }
                        _ => {}
                    }
                    depth += 1;
                }
                Event::Empty(ref e) => match depth {
                    // An empty root element has no stream nodes at all.
                    0 => {
                        check_root(e.name().as_ref())?;
                        return Err(ResolverError::EmptyDescriptorSet);
                    }
                    1 => stream_nodes += 1,
                    _ => {}
                },
                Event::Text(ref t) => {
                    if depth == 3 && stream_nodes == 1 {
                        if let Some(field) = field {
                            let text = t
                                .unescape()
                                .map_err(|e| ResolverError::MalformedXml(e.to_string()))?;
                            field.store(text.into_owned(), &mut token, &mut connect, &mut play);
                        }
                    }
                }
                Event::CData(ref t) => {
                    if depth == 3 && stream_nodes == 1 {
                        if let Some(field) = field {
                            let text = String::from_utf8_lossy(t.as_ref()).into_owned();
                            field.store(text, &mut token, &mut connect, &mut play);
                        }
                    }
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == 2 {
                        field = None;
                    }
                    // The first stream node is the only one consulted.
                    if depth == 1 && stream_nodes == 1 {
                        break;
                    }
                }
                Event::Eof => break,
                _ => {}
            }

            buf.clear();
        }

        if !saw_root {
            return Err(ResolverError::MalformedXml(
                "document contains no root element".to_string(),
            ));
        }
        if stream_nodes == 0 {
            return Err(ResolverError::EmptyDescriptorSet);
        }

        Ok(Self {
            token: take_field(token, "token")?,
            connect: take_field(connect, "connect")?,
            play: take_field(play, "play")?,
        })
    }
}

fn check_root(name: &[u8]) -> ResolverResult<()> {
    if name != b"nodes" {
        return Err(ResolverError::UnexpectedRoot(
            String::from_utf8_lossy(name).into_owned(),
        ));
    }
    Ok(())
}

fn take_field(value: Option<String>, name: &'static str) -> ResolverResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ResolverError::IncompleteDescriptor(name)),
    }
}

/// Recognized child tags of a stream node.
#[derive(Debug, Clone, Copy)]
enum Field {
    Token,
    Connect,
    Play,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"token" => Some(Self::Token),
            b"connect" => Some(Self::Connect),
            b"play" => Some(Self::Play),
            _ => None,
        }
    }

    fn store(
        self,
        value: String,
        token: &mut Option<String>,
        connect: &mut Option<String>,
        play: &mut Option<String>,
    ) {
        match self {
            Self::Token => *token = Some(value),
            Self::Connect => *connect = Some(value),
            Self::Play => *play = Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "<nodes><node>\
        <token>abc</token>\
        <connect>rtmp://cdn/live</connect>\
        <play>channelA_1</play>\
        </node></nodes>";

    #[test]
    fn test_parse_full_descriptor() {
        let descriptor = StreamDescriptor::parse(FULL.as_bytes()).unwrap();
        assert_eq!(descriptor.token, "abc");
        assert_eq!(descriptor.connect, "rtmp://cdn/live");
        assert_eq!(descriptor.play, "channelA_1");
    }

    #[test]
    fn test_parse_accepts_any_stream_node_tag() {
        let body = "<nodes><n><token>abc</token>\
            <connect>rtmp://cdn/live</connect>\
            <play>channelA_1</play></n></nodes>";
        let descriptor = StreamDescriptor::parse(body.as_bytes()).unwrap();
        assert_eq!(descriptor.play, "channelA_1");
    }

    #[test]
    fn test_parse_ignores_unknown_tags() {
        let body = "<nodes><node>\
            <video_height>480</video_height>\
            <token>t</token>\
            <connect>rtmp://x/app</connect>\
            <cluster>foo</cluster>\
            <play>p</play>\
            </node></nodes>";
        let descriptor = StreamDescriptor::parse(body.as_bytes()).unwrap();
        assert_eq!(descriptor.token, "t");
        assert_eq!(descriptor.connect, "rtmp://x/app");
        assert_eq!(descriptor.play, "p");
    }

    #[test]
    fn test_parse_uses_first_stream_node_only() {
        let body = "<nodes>\
            <node><token>first</token><connect>rtmp://a/b</connect><play>one</play></node>\
            <node><token>second</token><connect>rtmp://c/d</connect><play>two</play></node>\
            </nodes>";
        let descriptor = StreamDescriptor::parse(body.as_bytes()).unwrap();
        assert_eq!(descriptor.token, "first");
        assert_eq!(descriptor.play, "one");
    }

    #[test]
    fn test_parse_missing_field_is_incomplete() {
        for missing in ["token", "connect", "play"] {
            let body = format!(
                "<nodes><node>{}{}{}</node></nodes>",
                if missing == "token" { "" } else { "<token>t</token>" },
                if missing == "connect" {
                    ""
                } else {
                    "<connect>rtmp://x/a</connect>"
                },
                if missing == "play" { "" } else { "<play>p</play>" },
            );
            match StreamDescriptor::parse(body.as_bytes()) {
                Err(ResolverError::IncompleteDescriptor(field)) => assert_eq!(field, missing),
                other => panic!("expected IncompleteDescriptor, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_empty_field_is_incomplete() {
        let body = "<nodes><node><token></token>\
            <connect>rtmp://x/a</connect><play>p</play></node></nodes>";
        assert!(matches!(
            StreamDescriptor::parse(body.as_bytes()),
            Err(ResolverError::IncompleteDescriptor("token"))
        ));
    }

    #[test]
    fn test_parse_unexpected_root() {
        match StreamDescriptor::parse(b"<streams><node/></streams>") {
            Err(ResolverError::UnexpectedRoot(name)) => assert_eq!(name, "streams"),
            other => panic!("expected UnexpectedRoot, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_empty_descriptor_set() {
        assert!(matches!(
            StreamDescriptor::parse(b"<nodes></nodes>"),
            Err(ResolverError::EmptyDescriptorSet)
        ));
        assert!(matches!(
            StreamDescriptor::parse(b"<nodes/>"),
            Err(ResolverError::EmptyDescriptorSet)
        ));
    }

    #[test]
    fn test_parse_stream_node_without_children_is_incomplete() {
        assert!(matches!(
            StreamDescriptor::parse(b"<nodes><node/></nodes>"),
            Err(ResolverError::IncompleteDescriptor(_))
        ));
    }

    #[test]
    fn test_parse_non_xml_is_malformed() {
        assert!(matches!(
            StreamDescriptor::parse(b"not xml at all"),
            Err(ResolverError::MalformedXml(_))
        ));
        assert!(matches!(
            StreamDescriptor::parse(b""),
            Err(ResolverError::MalformedXml(_))
        ));
    }

    #[test]
    fn test_parse_cdata_field() {
        let body = "<nodes><node><token><![CDATA[tok&en]]></token>\
            <connect>rtmp://x/a</connect><play>p</play></node></nodes>";
        let descriptor = StreamDescriptor::parse(body.as_bytes()).unwrap();
        assert_eq!(descriptor.token, "tok&en");
    }
}
