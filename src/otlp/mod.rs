//! OpenTelemetry Protocol (OTLP) over HTTP
//!
//! Endpoint composition, the single-attempt sender and response
//! classification.

use std::fmt;

/// Telemetry signal type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Trace spans
    Traces,
    /// Metric data points
    Metrics,
    /// Log records
    Logs,
}

impl Signal {
    /// All signals, in export order
    pub const ALL: [Signal; 3] = [Signal::Traces, Signal::Metrics, Signal::Logs];

    /// Name used in URLs and configuration keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Traces => "traces",
            Signal::Metrics => "metrics",
            Signal::Logs => "logs",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub mod endpoint;
pub mod response;
pub mod sender;

pub use endpoint::compose_signal_url;
pub use response::{ErrorStatus, Outcome, classify};
pub use sender::{OutboundRequest, SignalSender};
