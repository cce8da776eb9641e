//! Bit-rate table for the text sub-protocol
//!
//! The header never carries a raw bits-per-second value, only its position
//! in [`BITRATES`].

use super::header::VBAN_PROTOCOL_TXT;

/// Admissible serial bit-rates; 0 means auto/undefined
pub const BITRATES: [u32; 25] = [
    0, 110, 150, 300, 600, 1200, 2400, 4800, 9600, 14400, 19200, 31250, 38400, 57600, 115200,
    128000, 230400, 250000, 256000, 460800, 921600, 1000000, 1500000, 2000000, 3000000,
];

/// Position of `bps` in the bit-rate table
pub fn index_of(bps: u32) -> Option<usize> {
    BITRATES.iter().position(|&rate| rate == bps)
}

/// Validated index into [`BITRATES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitrateIndex(u8);

impl BitrateIndex {
    /// Index 0, "auto"
    pub const AUTO: Self = Self(0);

    /// Create from a raw table position, rejecting anything past the end
    pub fn new(index: usize) -> Option<Self> {
        if index < BITRATES.len() {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Look up a bits-per-second value, falling back to auto when absent
    pub fn from_bps(bps: u32) -> Self {
        index_of(bps)
            .and_then(Self::new)
            .unwrap_or(Self::AUTO)
    }

    /// Like [`from_bps`](Self::from_bps) but takes any integer and reports
    /// whether the value was known; negative or oversized values are auto
    pub fn lookup(bps: i64) -> (Self, bool) {
        let index = u32::try_from(bps)
            .ok()
            .and_then(index_of)
            .and_then(Self::new);
        match index {
            Some(index) => (index, true),
            None => (Self::AUTO, false),
        }
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    /// Bits per second this index stands for
    pub fn bps(&self) -> u32 {
        BITRATES[self.0 as usize]
    }

    /// Sub-protocol + sample-rate byte (header offset 4)
    pub fn sr_byte(&self) -> u8 {
        VBAN_PROTOCOL_TXT + self.0
    }
}
