//! VBAN text request client
//!
//! Sends each positional argument as one text request to a VBAN mixer.
//!
//! ```text
//! vbantxt -h 192.168.1.20 "Strip[0].Mute=1" "Bus[1].Gain=-6"
//! vbantxt -s Command2 -d 50 "Command.Restart=1"
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vbantxt::{
    config::{ConnectionSource, EndpointArgs, FileSource, HomeSource, SendOptions},
    constants::*,
    network::TextSender,
    protocol::BitrateIndex,
};

/// Send VBAN text requests over UDP.
///
/// Without --host the connection is read from ~/.vbantxt_cli/config.toml.
#[derive(Parser, Debug)]
#[command(name = "vbantxt", version, about, disable_help_flag = true)]
struct Cli {
    /// VBAN host
    #[arg(short = 'h', long)]
    host: Option<String>,

    /// VBAN server port [default: 6980]
    #[arg(short, long)]
    port: Option<u16>,

    /// Stream name for text requests [default: Command1]
    #[arg(short, long)]
    streamname: Option<String>,

    /// VBAN bps; values outside the bps table fall back to auto
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    bps: i64,

    /// VBAN channel
    #[arg(short, long, default_value_t = 0)]
    channel: u8,

    /// Delay between requests in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_DELAY_MS)]
    delay: u64,

    /// Log level: 0 = warn, 1 = info, 2 = debug
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    loglevel: u8,

    /// Config file to read when no host is given
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Text requests, sent in the given order
    messages: Vec<String>,
}

fn level_name(loglevel: u8) -> &'static str {
    match loglevel {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --loglevel
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level_name(cli.loglevel).into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = EndpointArgs {
        host: cli.host.clone(),
        port: cli.port,
        streamname: cli.streamname.clone(),
    };
    let source: Box<dyn ConnectionSource> = match &cli.config {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(HomeSource),
    };

    let (bitrate, known) = BitrateIndex::lookup(cli.bps);
    if !known {
        tracing::warn!(bps = cli.bps, "Unsupported bps value, using auto");
    }
    let options = SendOptions {
        bitrate,
        channel: cli.channel,
        delay: Duration::from_millis(cli.delay),
    };

    let mut sender = TextSender::open(&args, source.as_ref(), &options)
        .await
        .context("failed to set up VBAN connection")?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let report = sender.run(&cli.messages, &cancel).await;

    let stats = sender.stats();
    tracing::info!(
        "Sent {} of {} requests ({} bytes), {} failed, {} skipped",
        report.sent,
        cli.messages.len(),
        stats.bytes_sent,
        report.failures.len(),
        report.skipped
    );

    Ok(())
}
