//! Per-stream frame counter
//!
//! Receivers use the counter to spot lost or reordered datagrams, so one
//! counter must only ever be advanced by a single sender. Sending the same
//! stream from several tasks needs either one owner that serializes sends
//! or an atomic fetch-add per datagram; `FrameCounter` is neither.

/// 32-bit wrapping frame counter, encoded little-endian on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameCounter(u32);

impl FrameCounter {
    pub fn new(start: u32) -> Self {
        Self(start)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Move to the next frame, wrapping to 0 after `u32::MAX`
    pub fn advance(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    pub fn to_le_bytes(&self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    pub fn from_le_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }
}
