//! Drive a decoded event stream through the engine into an output writer.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, warn};
use vpin_core::config::AppConfig;
use vpin_core::types::{EventRecord, OutputRecord, Timestamp};
use vpin_engine::{run_pipelined, EngineStats, OrderFlowEngine, ToxicityMonitor, ToxicityTransition};

use crate::sink::OutputCsvWriter;
use crate::source::DecodeError;

/// Outcome of a completed replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub stats: EngineStats,
    /// Rolling VPIN after the last event.
    pub final_vpin: Option<f64>,
    /// Toxicity threshold crossings, in order, with the event that caused them.
    pub alerts: Vec<(Timestamp, ToxicityTransition)>,
}

/// Replay `source` with the settings in `config`, writing one row per event.
///
/// Uses the threaded pipeline when `config.pipeline.enabled` is set. Stops at
/// the first decode or write error; rows before it have already been written.
pub fn replay<I, W>(config: &AppConfig, source: I, writer: &mut OutputCsvWriter<W>) -> Result<ReplaySummary>
where
    I: IntoIterator<Item = Result<EventRecord, DecodeError>> + Send,
    W: Write,
{
    let mut engine = OrderFlowEngine::new(config.engine.clone()).context("invalid engine configuration")?;
    let mut monitor = ToxicityMonitor::from_config(&config.alert).context("invalid alert configuration")?;
    let mut alerts = Vec::new();

    let mut sink = |row: OutputRecord| -> Result<(), csv::Error> {
        if let Some(transition) = monitor.as_mut().and_then(|m| m.observe(row.rolling_vpin)) {
            match transition {
                ToxicityTransition::Entered(vpin) => {
                    warn!(ts_event = %row.ts_event, vpin, "order flow turned toxic")
                }
                ToxicityTransition::Cleared(vpin) => {
                    info!(ts_event = %row.ts_event, vpin, "order flow toxicity cleared")
                }
            }
            alerts.push((row.ts_event, transition));
        }
        writer.write(&row)
    };

    if config.pipeline.enabled {
        run_pipelined(&mut engine, source, config.pipeline.channel_capacity, &mut sink)?;
    } else {
        for item in source {
            let event = item?;
            sink(engine.process(&event)).context("failed to write output row")?;
        }
    }
    writer.flush().context("failed to flush output")?;

    Ok(ReplaySummary {
        stats: *engine.stats(),
        final_vpin: engine.rolling_vpin(),
        alerts,
    })
}
