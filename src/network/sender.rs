//! Text request sender
//!
//! Sends a batch of requests strictly in order over one socket. Each
//! request is a single datagram carrying the header for the current frame
//! number; the frame counter advances once per datagram handed to the
//! socket, so argument order, frame order and transmit order always agree.

use std::time::Duration;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

use super::udp::{self, Datagram};
use crate::config::{self, ConnectionSource, EndpointArgs, SendOptions};
use crate::error::NetworkError;
use crate::protocol::header::{HEADER_SIZE, MAX_PACKET_SIZE};
use crate::protocol::{encode_packet, FrameCounter, RequestHeader};

/// Sends text requests for a single stream
pub struct TextSender<S> {
    socket: S,
    header: RequestHeader,
    delay: Duration,
    stats: SenderStats,
}

impl<S: Datagram> TextSender<S> {
    pub fn new(socket: S, header: RequestHeader, delay: Duration) -> Self {
        Self {
            socket,
            header,
            delay,
            stats: SenderStats::default(),
        }
    }

    /// Build the header from a stream name and send options
    pub fn with_options(socket: S, stream_name: &str, options: &SendOptions) -> Self {
        let header = RequestHeader::new(stream_name, options.bitrate, options.channel);
        Self::new(socket, header, options.delay)
    }

    /// Send one request and advance the frame counter.
    ///
    /// Oversized requests are rejected before reaching the socket and keep
    /// their frame number. A failed socket write still uses up the frame.
    pub async fn send(&mut self, msg: &str) -> Result<usize, NetworkError> {
        let size = HEADER_SIZE + msg.len();
        if size > MAX_PACKET_SIZE {
            self.stats.send_failures += 1;
            return Err(NetworkError::PacketTooLarge(size));
        }

        let packet = encode_packet(&self.header, msg.as_bytes());
        tracing::debug!(frame = self.header.frame_counter().value(), "Sending '{}'", msg);

        let result = self.socket.send_datagram(&packet).await;
        self.header.advance();

        match result {
            Ok(n) => {
                self.stats.packets_sent += 1;
                self.stats.bytes_sent += n as u64;
                Ok(n)
            }
            Err(e) => {
                self.stats.send_failures += 1;
                Err(NetworkError::SendFailed(e.to_string()))
            }
        }
    }

    /// Send every message in order, pausing between them.
    ///
    /// Failures are logged and collected; they never stop the batch.
    /// Cancelling `cancel` cuts the current pause short and skips whatever
    /// is left.
    pub async fn run<I, M>(&mut self, messages: I, cancel: &CancellationToken) -> SendReport
    where
        I: IntoIterator<Item = M>,
        M: AsRef<str>,
    {
        let mut report = SendReport::default();
        let mut messages = messages.into_iter().enumerate().peekable();

        while let Some((index, msg)) = messages.next() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                report.skipped = 1 + messages.count();
                break;
            }

            match self.send(msg.as_ref()).await {
                Ok(_) => report.sent += 1,
                Err(e) => {
                    tracing::error!(index, error = %e, "Failed to send request");
                    report.failures.push((index, e));
                }
            }

            if messages.peek().is_some() && !self.pause(cancel).await {
                tracing::warn!("Cancelled, skipping remaining requests");
                report.cancelled = true;
                report.skipped = messages.count();
                break;
            }
        }

        report
    }

    /// Sleep for the configured delay; false if cancelled first
    async fn pause(&self, cancel: &CancellationToken) -> bool {
        if self.delay.is_zero() {
            return true;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.delay) => true,
        }
    }

    /// Frame number the next request will carry
    pub fn frame_counter(&self) -> FrameCounter {
        self.header.frame_counter()
    }

    pub fn header(&self) -> &RequestHeader {
        &self.header
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn stats(&self) -> SenderStats {
        self.stats.clone()
    }

    pub fn into_socket(self) -> S {
        self.socket
    }
}

impl TextSender<UdpSocket> {
    /// Resolve the endpoint, connect to it and set up its stream header.
    ///
    /// Nothing is opened when resolution fails.
    pub async fn open(
        args: &EndpointArgs,
        source: &dyn ConnectionSource,
        options: &SendOptions,
    ) -> crate::Result<Self> {
        let conn = config::resolve(args, source)?;
        let socket = udp::connect(&conn).await?;
        Ok(Self::with_options(socket, &conn.streamname, options))
    }
}

/// Sender statistics
#[derive(Debug, Clone, Default)]
pub struct SenderStats {
    pub packets_sent: u64,
    pub bytes_sent: u64,
    pub send_failures: u64,
}

/// Outcome of [`TextSender::run`]
#[derive(Debug, Default)]
pub struct SendReport {
    /// Requests written to the socket
    pub sent: usize,
    /// Failed requests by position in the batch
    pub failures: Vec<(usize, NetworkError)>,
    /// Requests never attempted because of cancellation
    pub skipped: usize,
    pub cancelled: bool,
}

impl SendReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}
