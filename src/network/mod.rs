//! Network subsystem for UDP text-request transport

pub mod udp;
pub mod sender;

pub use udp::{connect, Datagram};
pub use sender::{SendReport, SenderStats, TextSender};
