//! VBAN text-request header
//!
//! ```text
//! offset  len  field
//!      0    4  "VBAN"
//!      4    1  0x40 + bit-rate index   (sub-protocol | sample rate)
//!      5    1  0x00                    (samples per frame, unused)
//!      6    1  channel
//!      7    1  0x10                    (data format flags)
//!      8   16  stream name, zero padded
//!     24    4  frame counter, little-endian
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::bitrate::BitrateIndex;
use super::counter::FrameCounter;

/// Magic bytes opening every VBAN packet
pub const VBAN_MAGIC: &[u8; 4] = b"VBAN";

/// Text sub-protocol marker, OR'd with the bit-rate index
pub const VBAN_PROTOCOL_TXT: u8 = 0x40;

/// Format byte used by text requests
pub const VBAN_DATATYPE_FORMAT: u8 = 0x10;

/// Stream name field width
pub const STREAM_NAME_LEN: usize = 16;

/// Encoded header size
pub const HEADER_SIZE: usize = 28;

/// Largest datagram a VBAN receiver accepts
pub const MAX_PACKET_SIZE: usize = 1464;

/// Stream name as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamName([u8; STREAM_NAME_LEN]);

impl StreamName {
    /// Truncate or zero-pad `name` to 16 bytes
    pub fn new(name: &str) -> Self {
        let mut buf = [0u8; STREAM_NAME_LEN];
        let len = name.len().min(STREAM_NAME_LEN);
        buf[..len].copy_from_slice(&name.as_bytes()[..len]);
        Self(buf)
    }

    pub fn as_bytes(&self) -> &[u8; STREAM_NAME_LEN] {
        &self.0
    }
}

impl From<&str> for StreamName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Header state for one outgoing text stream
#[derive(Debug, Clone)]
pub struct RequestHeader {
    stream_name: StreamName,
    bitrate: BitrateIndex,
    channel: u8,
    counter: FrameCounter,
}

impl RequestHeader {
    pub fn new(stream_name: impl Into<StreamName>, bitrate: BitrateIndex, channel: u8) -> Self {
        Self::with_counter(stream_name, bitrate, channel, FrameCounter::default())
    }

    pub fn with_counter(
        stream_name: impl Into<StreamName>,
        bitrate: BitrateIndex,
        channel: u8,
        counter: FrameCounter,
    ) -> Self {
        Self {
            stream_name: stream_name.into(),
            bitrate,
            channel,
            counter,
        }
    }

    /// Encode the header for the current frame
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(VBAN_MAGIC);
        out[4] = self.bitrate.sr_byte();
        out[5] = 0x00;
        out[6] = self.channel;
        out[7] = VBAN_DATATYPE_FORMAT;
        out[8..24].copy_from_slice(self.stream_name.as_bytes());
        out[24..28].copy_from_slice(&self.counter.to_le_bytes());
        out
    }

    pub fn frame_counter(&self) -> FrameCounter {
        self.counter
    }

    /// Step to the next frame number
    pub fn advance(&mut self) {
        self.counter.advance();
    }

    pub fn stream_name(&self) -> &StreamName {
        &self.stream_name
    }

    pub fn bitrate(&self) -> BitrateIndex {
        self.bitrate
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }
}

/// Build one datagram: header followed by the raw payload
pub fn encode_packet(header: &RequestHeader, payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    buf.put_slice(&header.encode());
    buf.put_slice(payload);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn command1() -> RequestHeader {
        RequestHeader::new("Command1", BitrateIndex::AUTO, 0)
    }

    #[test]
    fn test_mute_strip_packet() {
        let mut header = command1();
        let packet = encode_packet(&header, b"MSTRIP(0)/Mute=1");

        let mut expected = Vec::new();
        expected.extend_from_slice(b"VBAN");
        expected.extend_from_slice(&[0x40, 0x00, 0x00, 0x10]);
        expected.extend_from_slice(b"Command1\0\0\0\0\0\0\0\0");
        expected.extend_from_slice(&[0, 0, 0, 0]);
        expected.extend_from_slice(b"MSTRIP(0)/Mute=1");
        assert_eq!(&packet[..], &expected[..]);

        header.advance();
        assert_eq!(&header.encode()[24..], &[0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_accessors_match_encoding() {
        let header = RequestHeader::new("Bus", BitrateIndex::from_bps(31250), 7);
        let bytes = header.encode();
        assert_eq!(header.stream_name().as_bytes(), &bytes[8..24]);
        assert_eq!(header.bitrate().sr_byte(), bytes[4]);
        assert_eq!(header.bitrate().bps(), 31250);
        assert_eq!(header.channel(), bytes[6]);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let header = RequestHeader::new("Strip", BitrateIndex::from_bps(9600), 3);
        assert_eq!(header.encode(), header.encode());
    }

    #[test]
    fn test_bitrate_and_channel_bytes() {
        let header = RequestHeader::new("Command1", BitrateIndex::from_bps(115200), 255);
        let bytes = header.encode();
        assert_eq!(bytes[4], 0x40 + 14);
        assert_eq!(bytes[5], 0x00);
        assert_eq!(bytes[6], 255);
        assert_eq!(bytes[7], 0x10);
    }

    #[test]
    fn test_stream_name_exact_length() {
        let name = "ABCDEFGHIJKLMNOP";
        assert_eq!(StreamName::new(name).as_bytes(), name.as_bytes());
    }

    #[test]
    fn test_stream_name_truncated() {
        let name = StreamName::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        assert_eq!(name.as_bytes(), b"ABCDEFGHIJKLMNOP");
    }

    #[test]
    fn test_empty_stream_name() {
        assert_eq!(StreamName::new("").as_bytes(), &[0u8; 16]);
    }

    #[test]
    fn test_counter_wraps_in_header() {
        let mut header = RequestHeader::with_counter(
            "Command1",
            BitrateIndex::AUTO,
            0,
            FrameCounter::new(u32::MAX),
        );
        assert_eq!(&header.encode()[24..], &[0xFF; 4]);
        header.advance();
        assert_eq!(&header.encode()[24..], &[0x00; 4]);
    }

    proptest! {
        #[test]
        fn prop_header_shape(
            name in ".{0,40}",
            index in 0usize..25,
            channel in any::<u8>(),
            frame in any::<u32>(),
        ) {
            let bitrate = BitrateIndex::new(index).unwrap();
            let header = RequestHeader::with_counter(
                name.as_str(),
                bitrate,
                channel,
                FrameCounter::new(frame),
            );
            let bytes = header.encode();

            prop_assert_eq!(bytes.len(), HEADER_SIZE);
            prop_assert_eq!(&bytes[0..4], b"VBAN");
            prop_assert!((0x40..=0x58).contains(&bytes[4]));

            let raw: [u8; 4] = bytes[24..28].try_into().unwrap();
            prop_assert_eq!(FrameCounter::from_le_bytes(raw).to_le_bytes(), raw);
            prop_assert_eq!(u32::from_le_bytes(raw), frame);
        }

        #[test]
        fn prop_stream_name_pad_or_truncate(name in "[ -~]{0,40}") {
            let encoded = StreamName::new(&name);
            let bytes = encoded.as_bytes();
            let keep = name.len().min(STREAM_NAME_LEN);

            prop_assert_eq!(&bytes[..keep], &name.as_bytes()[..keep]);
            prop_assert!(bytes[keep..].iter().all(|&b| b == 0));
        }
    }
}
