//! # vbantxt
//!
//! Sends VBAN text requests (remote-control commands) to a mixer over UDP.
//!
//! ## Architecture Overview
//!
//! ```text
//!   CLI flags ──┐
//!               ├──▶ config::resolve ──▶ Connection { host, port, streamname }
//!   config.toml ┘                               │
//!                                               ▼
//!                                    network::udp::connect (UDP/IPv4)
//!                                               │
//!   messages ──▶ network::sender::TextSender ◀──┘
//!                  │  one RequestHeader + FrameCounter per stream
//!                  ▼
//!          ┌──────────────────────────┬──────────────┐
//!          │ 28-byte VBAN text header │   payload    │ ──▶ mixer
//!          └──────────────────────────┴──────────────┘
//!                  (pause, then next message)
//! ```
//!
//! Requests are fire-and-forget: nothing is read back from the mixer and
//! failed sends are not retried.

pub mod config;
pub mod error;
pub mod network;
pub mod protocol;

pub use error::{Error, Result};

/// Application-wide constants
pub mod constants {
    /// Default VBAN UDP port
    pub const DEFAULT_PORT: u16 = 6980;

    /// Default stream name for text requests
    pub const DEFAULT_STREAM_NAME: &str = "Command1";

    /// Default pause between requests in milliseconds
    pub const DEFAULT_DELAY_MS: u64 = 20;

    /// Directory under the home directory holding the config file
    pub const CONFIG_DIR_NAME: &str = ".vbantxt_cli";

    /// Config file name
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}
