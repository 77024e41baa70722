use anyhow::{Context, Result};
use clap::Parser;
use pemfc_feeder::{
    playback::{self, parse_interval, Channel, HttpSubmitter, PlaybackConfig, Span, TokioPacer},
    rows,
};
use reqwest::Client;
use std::{path::PathBuf, time::Duration};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Send rows `start..end` of a PEMFC sensor CSV to a single unit.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// CSV file to replay
    #[arg(short, long)]
    file: PathBuf,

    /// Unit id substituted into the URL
    #[arg(short, long)]
    pemfc: u32,

    /// First row to send (0-based)
    #[arg(short, long, allow_negative_numbers = true)]
    start: i64,

    /// Row to stop before (exclusive)
    #[arg(short, long, allow_negative_numbers = true)]
    end: i64,

    /// Destination URL; `{pemfc_id}` is replaced by the unit id
    #[arg(short, long)]
    url: String,

    /// Seconds to wait after each row
    #[arg(short = 't', long = "time", value_parser = parse_interval)]
    interval: Duration,
}

impl Args {
    fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            channels: vec![Channel::from_template(self.pemfc, self.start, &self.url)],
            span: Span::Until(self.end),
            interval: self.interval,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();

    let args = Args::parse();
    info!(
        file = %args.file.display(),
        pemfc = args.pemfc,
        start = args.start,
        end = args.end,
        "startup"
    );

    let rows = rows::load_rows(&args.file)
        .with_context(|| format!("loading telemetry from {}", args.file.display()))?;
    let config = args.playback_config();

    let submitter = HttpSubmitter::new(Client::new());
    match playback::run(&rows, &config, &submitter, &TokioPacer).await {
        Ok(report) => info!(sent = report.attempts, ok = report.accepted, "done"),
        Err(e) if e.is_range_error() => error!("{}", e),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
