//! VBAN text-request wire format
//!
//! Header layout, frame counter and the bit-rate table used to build the
//! sub-protocol byte.

pub mod bitrate;
pub mod counter;
pub mod header;

pub use bitrate::{BitrateIndex, BITRATES};
pub use counter::FrameCounter;
pub use header::{encode_packet, RequestHeader, StreamName};
