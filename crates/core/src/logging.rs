//! Tracing subscriber setup.
//!
//! [`init_tracing`] installs one of two output modes:
//! - **JSON mode** (`json = true`): one JSON object per line with nanosecond
//!   wall-clock timestamps, for piping replay logs into other tooling.
//! - **Pretty mode** (`json = false`): human-readable output for the terminal.
//!
//! Logs go to stderr so that stdout stays free for data output.
//!
//! Both modes respect `RUST_LOG` (e.g., `RUST_LOG=vpin_engine=trace` to see
//! every completed bucket).

use std::fmt;

use tracing_subscriber::fmt::format::{FmtSpan, Writer};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// # Panics
///
/// Panics if the global subscriber has already been set.
///
/// # Examples
///
/// ```no_run
/// vpin_core::logging::init_tracing(false);
/// ```
pub fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_timer(NanosecondTimer)
            .with_target(true)
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE);

        registry.with(json_layer).init();
    } else {
        let pretty_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE);

        registry.with(pretty_layer).init();
    }
}

/// RFC 3339 UTC timer with nine fractional digits.
#[derive(Debug, Clone)]
struct NanosecondTimer;

impl FormatTime for NanosecondTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = chrono::Utc::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.9fZ"))
    }
}
