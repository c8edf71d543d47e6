//! FLV framing for pulled RTMP media.
//!
//! The session surfaces media to the reader as an FLV byte stream: a 9-byte
//! file header, then one tag per RTMP audio, video, or script-data message.
//! Each tag carries an 11-byte header (type, 24-bit payload size, 24+8-bit
//! timestamp, zero stream id) and is followed by a 32-bit previous-tag-size
//! word.

use bytes::{BufMut, Bytes, BytesMut};
use rml_rtmp::rml_amf0::{self, Amf0Value};

use crate::error::TransportError;
use crate::TransportResult;

const TAG_AUDIO: u8 = 8;
const TAG_VIDEO: u8 = 9;
const TAG_SCRIPT: u8 = 18;

const TAG_HEADER_LEN: u32 = 11;

/// Accumulates remuxed FLV bytes awaiting delivery to the reader.
///
/// The file header is emitted lazily, ahead of the first tag; `take` hands
/// out at most the requested number of bytes and keeps the remainder as the
/// single in-flight chunk for the next read.
#[derive(Debug, Default)]
pub struct FlvStream {
    buf: BytesMut,
    header_written: bool,
}

impl FlvStream {
    /// Create an empty stream buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any bytes are pending.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of pending bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Drop all pending bytes.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Take up to `max_len` pending bytes.
    pub fn take(&mut self, max_len: usize) -> Bytes {
        let n = self.buf.len().min(max_len);
        self.buf.split_to(n).freeze()
    }

    /// Append an audio message as an FLV audio tag.
    pub fn append_audio(&mut self, data: &[u8], timestamp_ms: u32) {
        self.append_tag(TAG_AUDIO, timestamp_ms, data);
    }

    /// Append a video message as an FLV video tag.
    pub fn append_video(&mut self, data: &[u8], timestamp_ms: u32) {
        self.append_tag(TAG_VIDEO, timestamp_ms, data);
    }

    /// Append an AMF0 data message (e.g. `onMetaData`) as a script tag.
    pub fn append_script(&mut self, values: Vec<Amf0Value>, timestamp_ms: u32) -> TransportResult<()> {
        let data = rml_amf0::serialize(&values)
            .map_err(|e| TransportError::Read(format!("Metadata serialization failed: {:?}", e)))?;
        self.append_tag(TAG_SCRIPT, timestamp_ms, &data);
        Ok(())
    }

    fn append_tag(&mut self, tag_type: u8, timestamp_ms: u32, data: &[u8]) {
        if !self.header_written {
            self.write_header();
        }

        self.buf.put_u8(tag_type);
        put_u24(&mut self.buf, data.len() as u32);

        // FLV splits the timestamp into a low 24-bit word and an extension byte.
        put_u24(&mut self.buf, timestamp_ms & 0x00FF_FFFF);
        self.buf.put_u8((timestamp_ms >> 24) as u8);

        // Stream id, always zero.
        put_u24(&mut self.buf, 0);

        self.buf.put_slice(data);
        self.buf.put_u32(TAG_HEADER_LEN + data.len() as u32);
    }

    fn write_header(&mut self) {
        self.buf.put_slice(b"FLV");
        self.buf.put_u8(0x01);
        self.buf.put_u8(0x05); // audio + video present
        self.buf.put_u32(9); // data offset
        self.buf.put_u32(0); // previous tag size of the (absent) zeroth tag
        self.header_written = true;
    }
}

fn put_u24(buf: &mut BytesMut, value: u32) {
    buf.put_u8(((value >> 16) & 0xFF) as u8);
    buf.put_u8(((value >> 8) & 0xFF) as u8);
    buf.put_u8((value & 0xFF) as u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_written_once_before_first_tag() {
        let mut flv = FlvStream::new();
        assert!(flv.is_empty());

        flv.append_video(&[0xAA, 0xBB], 0);
        flv.append_audio(&[0xCC], 0);

        let bytes = flv.take(usize::MAX);
        assert_eq!(&bytes[..3], b"FLV");
        assert_eq!(bytes[3], 0x01);
        assert_eq!(bytes[4], 0x05);
        // Header appears exactly once.
        assert_eq!(bytes.windows(3).filter(|w| *w == b"FLV").count(), 1);
    }

    #[test]
    fn test_tag_layout() {
        let mut flv = FlvStream::new();
        flv.append_video(&[0x17, 0x00, 0x12], 0x0102_0304);

        let bytes = flv.take(usize::MAX);
        let tag = &bytes[13..]; // skip file header + zeroth tag size

        assert_eq!(tag[0], 9); // video tag
        assert_eq!(&tag[1..4], &[0, 0, 3]); // payload size
        assert_eq!(&tag[4..7], &[0x02, 0x03, 0x04]); // timestamp low 24 bits
        assert_eq!(tag[7], 0x01); // timestamp extension
        assert_eq!(&tag[8..11], &[0, 0, 0]); // stream id
        assert_eq!(&tag[11..14], &[0x17, 0x00, 0x12]); // payload
        assert_eq!(&tag[14..18], &[0, 0, 0, 14]); // previous tag size = 11 + 3
    }

    #[test]
    fn test_take_respects_max_len() {
        let mut flv = FlvStream::new();
        flv.append_audio(&[0u8; 64], 0);

        let total = flv.len();
        let first = flv.take(10);
        assert_eq!(first.len(), 10);
        assert_eq!(flv.len(), total - 10);

        let rest = flv.take(usize::MAX);
        assert_eq!(rest.len(), total - 10);
        assert!(flv.is_empty());
    }

    #[test]
    fn test_script_tag_from_amf_values() {
        let mut flv = FlvStream::new();
        flv.append_script(
            vec![Amf0Value::Utf8String("onMetaData".to_string())],
            0,
        )
        .unwrap();

        let bytes = flv.take(usize::MAX);
        assert_eq!(bytes[13], 18); // script tag
        // AMF0 string marker (0x02) starts the payload.
        assert_eq!(bytes[13 + 11], 0x02);
    }
}
