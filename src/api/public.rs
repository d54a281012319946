//! Public API for embedded library usage
//!
//! Bundles one [`SignalSender`] per signal behind a single exporter object.

use std::collections::HashMap;
use tracing::info;

use crate::aws::credentials::{EnvCredentialsProvider, SharedCredentialsProvider};
use crate::config::ExporterConfig;
use crate::error::{ConfigError, ExporterError};
use crate::otlp::{Outcome, Signal, SignalSender};

/// Data Prepper exporter for traces, metrics and logs
///
/// Each signal gets its own sender, all sharing one HTTP connection pool.
/// Sends are independent: they hold no locks and may complete in any order.
/// Every `export_*` call is a single attempt; the returned [`Outcome`] tells
/// the caller's retry layer what to do next.
///
/// # Example
///
/// ```no_run
/// use dataprepper_exporter::{ConfigBuilder, DataPrepperExporter};
///
/// # async fn example() -> Result<(), dataprepper_exporter::ExporterError> {
/// let config = ConfigBuilder::new()
///     .endpoint("http://localhost:21890")
///     .build()?;
/// let exporter = DataPrepperExporter::new(config)?;
///
/// let payload: Vec<u8> = Vec::new(); // serialized ExportTraceServiceRequest
/// let outcome = exporter.export_traces(&payload).await?;
/// if outcome.is_retryable() {
///     // hand back to the retry queue
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DataPrepperExporter {
    config: ExporterConfig,
    senders: HashMap<Signal, SignalSender>,
}

impl DataPrepperExporter {
    /// Create an exporter for all signals, signing with environment credentials
    pub fn new(config: ExporterConfig) -> Result<Self, ExporterError> {
        Self::with_credentials(
            config,
            SharedCredentialsProvider::new(EnvCredentialsProvider::new()),
        )
    }

    /// Create an exporter for all signals with an explicit credentials provider
    pub fn with_credentials(
        config: ExporterConfig,
        credentials: SharedCredentialsProvider,
    ) -> Result<Self, ExporterError> {
        Self::for_signals(config, &Signal::ALL, credentials)
    }

    /// Create an exporter serving only `signals`
    ///
    /// Fails if any requested signal has no usable destination.
    pub fn for_signals(
        config: ExporterConfig,
        signals: &[Signal],
        credentials: SharedCredentialsProvider,
    ) -> Result<Self, ExporterError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ExporterError::Client(format!("Failed to create HTTP client: {}", e)))?;

        let mut senders = HashMap::new();
        for &signal in signals {
            let sender =
                SignalSender::with_client(signal, &config, credentials.clone(), client.clone())?;
            senders.insert(signal, sender);
        }

        info!(
            signals = ?senders.keys().collect::<Vec<_>>(),
            signed = config.sigv4().is_some(),
            "Created Data Prepper exporter"
        );

        Ok(Self { config, senders })
    }

    /// Configuration the exporter was built from
    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    /// Sender for `signal`, if the exporter serves it
    pub fn sender(&self, signal: Signal) -> Option<&SignalSender> {
        self.senders.get(&signal)
    }

    /// Export a serialized payload for `signal`
    pub async fn export(&self, signal: Signal, payload: &[u8]) -> Result<Outcome, ExporterError> {
        let sender = self
            .senders
            .get(&signal)
            .ok_or(ConfigError::MissingEndpoint { signal })?;
        sender.send(payload).await
    }

    /// Export a serialized `ExportTraceServiceRequest`
    pub async fn export_traces(&self, payload: &[u8]) -> Result<Outcome, ExporterError> {
        self.export(Signal::Traces, payload).await
    }

    /// Export a serialized `ExportMetricsServiceRequest`
    pub async fn export_metrics(&self, payload: &[u8]) -> Result<Outcome, ExporterError> {
        self.export(Signal::Metrics, payload).await
    }

    /// Export a serialized `ExportLogsServiceRequest`
    pub async fn export_logs(&self, payload: &[u8]) -> Result<Outcome, ExporterError> {
        self.export(Signal::Logs, payload).await
    }
}
