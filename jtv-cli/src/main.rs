//! Command-line host for the jtv live source.
//!
//! Resolves a `jtv://` channel URI, pulls the live stream over RTMP, and
//! writes the FLV byte stream to stdout or a file. Logs go to stderr so
//! the media stream can be piped onward.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jtv_engine::{SourceConfig, StreamController, DEFAULT_CHUNK_SIZE};

#[derive(Debug, Parser)]
#[command(name = "jtv-cli", about = "Pull a live channel's FLV stream over RTMP")]
struct Args {
    /// Channel URI, e.g. jtv://channelname
    uri: String,

    /// Write the FLV stream to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Base URL of the channel resolution endpoint
    #[arg(long, env = "JTV_RESOLVER_BASE")]
    resolver_base: Option<String>,

    /// Bytes requested per read
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Transport verbosity; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Initialize logging on stderr.
///
/// The verbosity flag is passed through to the RTMP transport as a tracing
/// directive; `RUST_LOG` overrides everything.
fn init_logging(verbose: u8) {
    let transport_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "warn,jtv_cli=info,jtv_engine=info,jtv_resolver=info,jtv_transport={transport_level}"
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = SourceConfig::default();
    if let Some(base) = args.resolver_base.clone() {
        config.resolver_base_url = base;
    }

    let controller = StreamController::with_config(config);
    controller
        .start(&args.uri)
        .with_context(|| format!("failed to start stream for {}", args.uri))?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    let mut total: u64 = 0;
    loop {
        match controller.read(args.chunk_size) {
            Ok(Some(chunk)) => {
                out.write_all(&chunk).context("failed to write media chunk")?;
                total += chunk.len() as u64;
            }
            Ok(None) => {
                info!("End of stream");
                break;
            }
            Err(e) => {
                // The controller has already torn the session down.
                return Err(e).context("stream read failed");
            }
        }
    }

    out.flush().ok();
    controller.stop()?;
    info!(bytes = total, "Stream finished");

    Ok(())
}
