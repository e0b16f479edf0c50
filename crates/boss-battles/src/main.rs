//! Boss Battles encounter server.
//!
//! Reads commands from a serial port (or a file, or stdin), runs the encounter on a
//! fixed tick, and prints the state to stdout. Logs go to stderr, or to a
//! file with `--log-file`.
//!
//! ```bash
//! boss-battles --port /dev/ttyACM0 --baud 115200 --turn-time 15
//! boss-battles --replay session.txt --seed 7
//! boss-battles --stdin --seed 42 --config encounter.json
//! ```

mod reader;
mod render;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use boss_battles_core::ability::AbilityRegistry;
use boss_battles_core::config::EncounterConfig;
use boss_battles_core::server::{EncounterServer, Reader, Renderer};
use clap::Parser;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reader::{ChannelReader, LineSource, DEFAULT_BAUD_RATE};
use render::{JsonRenderer, TextRenderer};

const DEFAULT_LOG_FILTER: &str = "boss_battles=info,boss_battles_core=info";

#[derive(Debug, Parser)]
#[command(version, about = "Run a boss battle encounter")]
struct Args {
    /// Serial port to read commands from.
    #[arg(short, long, conflicts_with_all = ["stdin", "replay"])]
    port: Option<String>,

    /// Serial line speed.
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Read commands from a recorded file instead of a port.
    #[arg(long, conflicts_with = "stdin")]
    replay: Option<PathBuf>,

    /// Read commands from stdin instead of a port.
    #[arg(long)]
    stdin: bool,

    /// JSON encounter configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds players get per round.
    #[arg(short, long)]
    turn_time: Option<u64>,

    /// Seed for dice, tokens and boss decisions.
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between ticks.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print snapshots as JSON lines instead of text frames.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn source(&self) -> Result<LineSource> {
        match (&self.port, &self.replay, self.stdin) {
            (Some(port), _, _) => Ok(LineSource::Serial {
                port: port.clone(),
                baud_rate: self.baud,
            }),
            (None, Some(path), _) => Ok(LineSource::File(path.clone())),
            (None, None, true) => Ok(LineSource::Stdin),
            (None, None, false) => bail!("no input: pass --port <device>, --replay <file> or --stdin"),
        }
    }

    fn encounter_config(&self) -> Result<EncounterConfig> {
        let mut config = match &self.config {
            Some(path) => EncounterConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => EncounterConfig::default(),
        };
        if let Some(secs) = self.turn_time {
            config = config.with_turn_time_secs(secs);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config.validate().context("invalid encounter configuration")?;
        Ok(config)
    }
}

/// Installs the subscriber. The guard must live until exit so file logs flush.
fn init_tracing(log_file: Option<&PathBuf>) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = init_tracing(args.log_file.as_ref())?;

    let config = args.encounter_config()?;
    let reader = ChannelReader::new(args.source()?);
    let registry = Arc::new(AbilityRegistry::with_defaults());
    let tick = Duration::from_millis(args.tick_ms.max(1));

    if args.json {
        run(EncounterServer::new(config, registry, reader, JsonRenderer::new()), tick).await
    } else {
        run(EncounterServer::new(config, registry, reader, TextRenderer::new()), tick).await
    }
}

async fn run<R: Reader, W: Renderer>(mut server: EncounterServer<R, W>, tick: Duration) -> Result<()> {
    server.start().context("opening input")?;
    info!(seed = server.seed(), ?tick, "encounter running");

    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                server.tick();
                if !server.is_running() {
                    break;
                }
            }
            result = &mut ctrl_c => {
                if let Err(err) = result {
                    warn!(%err, "failed to listen for ctrl-c");
                }
                info!("interrupted");
                break;
            }
        }
    }

    server.shutdown();
    Ok(())
}
