use anyhow::{Context, Result};
use clap::Parser;
use pemfc_feeder::{
    playback::{
        self, parse_interval, Channel, ChannelSpec, HttpSubmitter, PlaybackConfig, Span, TokioPacer,
    },
    rows,
};
use reqwest::Client;
use std::{path::PathBuf, time::Duration};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Replay PEMFC sensor rows from a CSV file to one or more units, posting
/// one JSON object per unit per step.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// CSV file to replay (e.g. full_csv_data.csv)
    #[arg(short, long)]
    file: PathBuf,

    /// Unit id and 0-based start row, as ID:START; repeat once per unit
    #[arg(short, long = "channel", value_name = "ID:START", required = true)]
    channels: Vec<ChannelSpec>,

    /// Number of rows to send per unit
    #[arg(short, long)]
    offset: usize,

    /// Destination URL; `{pemfc_id}` is replaced by the unit id
    #[arg(short, long)]
    url: String,

    /// Seconds to wait after each step
    #[arg(short = 't', long = "time", value_parser = parse_interval)]
    interval: Duration,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();

    let args = Args::parse();
    info!(file = %args.file.display(), channels = args.channels.len(), "startup");

    let rows = rows::load_rows(&args.file)
        .with_context(|| format!("loading telemetry from {}", args.file.display()))?;

    let config = PlaybackConfig {
        channels: args
            .channels
            .iter()
            .map(|c| Channel::from_template(c.id, c.start, &args.url))
            .collect(),
        span: Span::Count(args.offset),
        interval: args.interval,
    };

    let submitter = HttpSubmitter::new(Client::new());
    match playback::run(&rows, &config, &submitter, &TokioPacer).await {
        Ok(report) => info!(?report, "all done"),
        // range errors end the run without sending; not a process failure
        Err(e) if e.is_range_error() => error!("{}", e),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
