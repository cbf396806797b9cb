//! vpin-replay: compute a rolling VPIN series from a Databento MBP-1 CSV.
//!
//! Usage:
//!   vpin-replay --input xnas-itch-20240108.mbp-1.csv.gz --output vpin.csv
//!   vpin-replay --input mbp.csv --bucket-threshold 5000 --rolling-window 50 --alert-threshold 0.7

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use vpin_core::config::{AppConfig, ClassificationMethod};
use vpin_replay::{replay, MbpCsvReader, OutputCsvWriter, PriceFormat};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Midpoint,
    LastTrade,
    BidAsk,
}

impl From<Method> for ClassificationMethod {
    fn from(m: Method) -> Self {
        match m {
            Method::Midpoint => ClassificationMethod::Midpoint,
            Method::LastTrade => ClassificationMethod::LastTrade,
            Method::BidAsk => ClassificationMethod::BidAsk,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "vpin-replay", about = "Replay MBP-1 CSV through the VPIN engine")]
struct Args {
    /// MBP-1 CSV input; `.gz` files are decompressed.
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV path. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Volume per bucket.
    #[arg(long)]
    bucket_threshold: Option<u64>,

    /// Number of buckets in the rolling average.
    #[arg(long)]
    rolling_window: Option<usize>,

    /// Smallest trade size that is classified.
    #[arg(long)]
    min_trade_size: Option<u32>,

    /// Trade classification rule.
    #[arg(long, value_enum)]
    method: Option<Method>,

    /// Decode input on a separate thread.
    #[arg(long, default_value_t = false)]
    pipelined: bool,

    /// Bounded channel capacity for --pipelined.
    #[arg(long)]
    channel_capacity: Option<usize>,

    /// Prices are raw 1e-9 integers instead of decimal text.
    #[arg(long, default_value_t = false)]
    raw_prices: bool,

    /// Log a warning when rolling VPIN reaches this level.
    #[arg(long)]
    alert_threshold: Option<f64>,

    /// Emit JSON logs.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(v) = self.bucket_threshold {
            config.engine.bucket_threshold = v;
        }
        if let Some(v) = self.rolling_window {
            config.engine.rolling_window = v;
        }
        if let Some(v) = self.min_trade_size {
            config.engine.minimum_trade_size = v;
        }
        if let Some(m) = self.method {
            config.engine.classification_method = m.into();
        }
        if self.pipelined {
            config.pipeline.enabled = true;
        }
        if let Some(v) = self.channel_capacity {
            config.pipeline.channel_capacity = v;
        }
        if self.alert_threshold.is_some() {
            config.alert.threshold = self.alert_threshold;
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

/// Wall-clock milliseconds for logging, saturating at `u64::MAX`.
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = AppConfig::load(args.config.clone())?;
    args.apply_overrides(&mut config);
    config.validate()?;

    vpin_core::logging::init_tracing(config.logging.json);

    tracing::info!(
        input = %args.input.display(),
        bucket_threshold = config.engine.bucket_threshold,
        rolling_window = config.engine.rolling_window,
        minimum_trade_size = config.engine.minimum_trade_size,
        method = ?config.engine.classification_method,
        pipelined = config.pipeline.enabled,
        "starting vpin-replay"
    );

    let format = if args.raw_prices {
        PriceFormat::Raw
    } else {
        PriceFormat::Decimal
    };
    let source = MbpCsvReader::open(&args.input, format)?;

    let out: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = OutputCsvWriter::new(out);

    let started = Instant::now();
    let summary = replay(&config, source, &mut writer)?;
    let elapsed = started.elapsed();

    let stats = summary.stats;
    tracing::info!(
        events = stats.events,
        qualifying_trades = stats.qualifying_trades,
        buy = stats.buy_trades,
        sell = stats.sell_trades,
        unclassified = stats.unclassified_trades,
        degenerate_skipped = stats.degenerate_skipped,
        buckets = stats.buckets_completed,
        final_vpin = summary.final_vpin,
        alerts = summary.alerts.len(),
        rows = writer.rows_written(),
        elapsed_ms = elapsed_ms(elapsed),
        "replay complete"
    );

    Ok(())
}
