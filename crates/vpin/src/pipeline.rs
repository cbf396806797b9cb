//! Two-stage ingest: a producer thread decodes events into a bounded channel
//! while the calling thread runs the engine.
//!
//! ```text
//!  source ──► [vpin-source thread] ──bounded──► engine.process ──► sink
//! ```
//!
//! All engine state stays on the consumer side, so classification and
//! bucketing run strictly in arrival order. Output is identical to feeding the
//! same events through [`OrderFlowEngine::process`] in a loop.

use std::io;
use std::thread;

use crossbeam::channel::{self, Receiver};
use tracing::debug;
use vpin_core::types::{EventRecord, OutputRecord};

use crate::engine::OrderFlowEngine;

/// Failure of a pipelined run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError<E, S> {
    /// The source yielded an error; events before it were processed.
    #[error("event source failed: {0}")]
    Source(#[source] E),
    /// The sink rejected an output record.
    #[error("output sink failed: {0}")]
    Sink(#[source] S),
    /// The producer thread could not be started.
    #[error("failed to spawn producer thread: {0}")]
    Spawn(#[source] io::Error),
    /// The producer thread panicked.
    #[error("producer thread panicked")]
    ProducerPanicked,
}

/// Drive `engine` over `source` with decoding on a separate thread.
///
/// `capacity` bounds the number of decoded events in flight; `0` makes the
/// channel a rendezvous. The producer stops at the first source error, which
/// is returned once every event received before it has been processed and
/// sunk. A sink error stops the consumer and unblocks the producer.
///
/// Returns the number of events processed.
pub fn run_pipelined<I, E, S, F>(
    engine: &mut OrderFlowEngine,
    source: I,
    capacity: usize,
    mut sink: F,
) -> Result<u64, PipelineError<E, S>>
where
    I: IntoIterator<Item = Result<EventRecord, E>> + Send,
    E: Send,
    F: FnMut(OutputRecord) -> Result<(), S>,
{
    thread::scope(|scope| {
        let (tx, rx) = channel::bounded::<Result<EventRecord, E>>(capacity);

        let producer = thread::Builder::new()
            .name("vpin-source".into())
            .spawn_scoped(scope, move || {
                for item in source {
                    let failed = item.is_err();
                    if tx.send(item).is_err() {
                        debug!("consumer hung up, stopping producer");
                        break;
                    }
                    if failed {
                        break;
                    }
                }
            })
            .map_err(PipelineError::Spawn)?;

        let result = consume(engine, &rx, &mut sink);
        drop(rx);

        match (result, producer.join()) {
            (Err(e), _) => Err(e),
            (Ok(_), Err(_)) => Err(PipelineError::ProducerPanicked),
            (Ok(n), Ok(())) => Ok(n),
        }
    })
}

fn consume<E, S, F>(
    engine: &mut OrderFlowEngine,
    rx: &Receiver<Result<EventRecord, E>>,
    sink: &mut F,
) -> Result<u64, PipelineError<E, S>>
where
    F: FnMut(OutputRecord) -> Result<(), S>,
{
    let mut processed = 0u64;
    for item in rx.iter() {
        let event = item.map_err(PipelineError::Source)?;
        sink(engine.process(&event)).map_err(PipelineError::Sink)?;
        processed += 1;
    }
    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::fmt;
    use vpin_core::config::EngineConfig;
    use vpin_core::types::{Price, Timestamp};

    #[derive(Debug, PartialEq)]
    struct Boom(u64);

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "boom at {}", self.0)
        }
    }

    impl Error for Boom {}

    fn engine() -> OrderFlowEngine {
        OrderFlowEngine::new(EngineConfig {
            bucket_threshold: 100,
            rolling_window: 3,
            minimum_trade_size: 1,
            ..EngineConfig::default()
        })
        .unwrap()
    }

    fn trade(i: u64) -> EventRecord {
        let price = if i % 3 == 0 { 10.02 } else { 10.00 };
        EventRecord::trade(Timestamp(i), Price::from(price), 40, Price::from(10.00), Price::from(10.02))
    }

    #[test]
    fn test_processes_all_events_in_order() {
        let events: Vec<Result<EventRecord, Boom>> = (0..1_000).map(|i| Ok(trade(i))).collect();
        let mut eng = engine();
        let mut seen = Vec::new();
        let n = run_pipelined(&mut eng, events, 8, |out| {
            seen.push(out.ts_event.as_nanos());
            Ok::<(), Boom>(())
        })
        .unwrap();
        assert_eq!(n, 1_000);
        assert_eq!(seen, (0..1_000).collect::<Vec<_>>());
        assert_eq!(eng.stats().events, 1_000);
    }

    #[test]
    fn test_source_error_after_prior_events() {
        let events: Vec<Result<EventRecord, Boom>> = vec![Ok(trade(0)), Ok(trade(1)), Err(Boom(2)), Ok(trade(3))];
        let mut eng = engine();
        let mut count = 0;
        let err = run_pipelined(&mut eng, events, 1, |_| {
            count += 1;
            Ok::<(), Boom>(())
        })
        .unwrap_err();
        assert!(matches!(err, PipelineError::Source(Boom(2))));
        assert_eq!(count, 2);
        assert_eq!(eng.stats().events, 2);
    }

    #[test]
    fn test_sink_error_stops_consumer() {
        let events = (0..10_000).map(|i| Ok::<_, Boom>(trade(i)));
        let mut eng = engine();
        let err = run_pipelined(&mut eng, events, 4, |out| {
            if out.ts_event.as_nanos() == 5 {
                Err(Boom(5))
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert!(matches!(err, PipelineError::Sink(Boom(5))));
        assert_eq!(eng.stats().events, 6);
    }

    #[test]
    fn test_rendezvous_channel() {
        let events = (0..50).map(|i| Ok::<_, Boom>(trade(i)));
        let mut eng = engine();
        let n = run_pipelined(&mut eng, events, 0, |_| Ok::<(), Boom>(())).unwrap();
        assert_eq!(n, 50);
    }

    #[test]
    fn test_error_display() {
        let err: PipelineError<Boom, Boom> = PipelineError::Source(Boom(1));
        assert_eq!(err.to_string(), "event source failed: boom at 1");
        let source = err.source().expect("source error is chained");
        assert_eq!(source.to_string(), "boom at 1");

        let err: PipelineError<Boom, Boom> = PipelineError::Sink(Boom(4));
        assert_eq!(err.to_string(), "output sink failed: boom at 4");
        assert!(err.source().is_some());

        let err: PipelineError<Boom, Boom> =
            PipelineError::Spawn(io::Error::new(io::ErrorKind::Other, "no threads"));
        assert_eq!(err.to_string(), "failed to spawn producer thread: no threads");

        let err: PipelineError<Boom, Boom> = PipelineError::ProducerPanicked;
        assert_eq!(err.to_string(), "producer thread panicked");
        assert!(err.source().is_none());
    }
}
