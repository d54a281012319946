//! Single-attempt OTLP/HTTP sender
//!
//! A [`SignalSender`] is built once per signal from a validated configuration
//! and posts opaque, pre-serialized payloads. Each call makes exactly one
//! attempt and returns an [`Outcome`]; retries belong to the caller.

use flate2::write::GzEncoder;
use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE, HOST, HeaderMap, HeaderName, HeaderValue};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::aws::credentials::{EnvCredentialsProvider, SharedCredentialsProvider};
use crate::aws::routing::PIPELINE_HEADER;
use crate::aws::signer::RequestSigner;
use crate::config::{Compression, ExporterConfig};
use crate::error::{ConfigError, ExporterError};
use crate::otlp::endpoint::compose_signal_url;
use crate::otlp::response::{Outcome, classify};
use crate::otlp::Signal;

/// Media type of the serialized payload
pub const CONTENT_TYPE_PROTOBUF: &str = "application/protobuf";

/// A fully formed request, built per call
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// Target URL
    pub url: Url,
    /// Value of the `Host` header
    pub host: String,
    /// Request headers
    pub headers: HeaderMap,
    /// Body as sent (compressed when compression is on)
    pub body: Vec<u8>,
    /// Deadline for this attempt
    pub deadline: Duration,
}

impl OutboundRequest {
    /// HTTP method used for every export
    pub const METHOD: &'static str = "POST";
}

/// Sender for one signal type
#[derive(Debug, Clone)]
pub struct SignalSender {
    signal: Signal,
    url: Url,
    url_string: String,
    host: String,
    headers: HeaderMap,
    compression: Compression,
    timeout: Duration,
    signer: Option<RequestSigner>,
    client: reqwest::Client,
}

impl SignalSender {
    /// Create a sender for `signal`, signing with environment credentials
    pub fn new(signal: Signal, config: &ExporterConfig) -> Result<Self, ExporterError> {
        Self::with_credentials(
            signal,
            config,
            SharedCredentialsProvider::new(EnvCredentialsProvider::new()),
        )
    }

    /// Create a sender for `signal` with an explicit credentials provider
    pub fn with_credentials(
        signal: Signal,
        config: &ExporterConfig,
        credentials: SharedCredentialsProvider,
    ) -> Result<Self, ExporterError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ExporterError::Client(format!("Failed to create HTTP client: {}", e)))?;
        Self::with_client(signal, config, credentials, client)
    }

    /// Create a sender sharing an existing HTTP client
    pub fn with_client(
        signal: Signal,
        config: &ExporterConfig,
        credentials: SharedCredentialsProvider,
        client: reqwest::Client,
    ) -> Result<Self, ExporterError> {
        config.validate()?;

        let destination = &config.destination;
        let url_string = compose_signal_url(
            destination.base_url(),
            destination.override_url(signal),
            signal,
        )?;
        let url =
            Url::parse(&url_string).map_err(|_| ConfigError::InvalidEndpointUrl { signal })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_PROTOBUF));
        for (name, value) in &destination.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ConfigError::ValidationFailed(format!("header {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ConfigError::ValidationFailed(format!("header {name}: {e}")))?;
            headers.insert(name, value);
        }
        if destination.compression == Compression::Gzip {
            headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        }

        let mut host = authority(&url);
        let mut signer = None;

        if let Some(ref auth) = config.aws_auth {
            let identity = auth.identity()?;
            let routing = auth.routing()?;

            let pipeline = HeaderValue::from_str(&routing.pipeline_name)
                .map_err(|_| ConfigError::InvalidResourcePath(identity.resource()))?;
            headers.insert(HeaderName::from_static(PIPELINE_HEADER), pipeline);
            host = routing.host;

            if let Some(ref sigv4) = auth.sigv4 {
                signer = Some(
                    RequestSigner::new(sigv4.region.clone(), identity.service.clone(), credentials)
                        .with_role_arn(sigv4.role_arn.clone().filter(|r| !r.is_empty()))
                        .with_signed_headers(&sigv4.signed_headers),
                );
            }
        }

        info!(
            signal = %signal,
            url = %url_string,
            host = %host,
            compression = ?destination.compression,
            signed = signer.is_some(),
            "Created Data Prepper signal sender"
        );

        Ok(Self {
            signal,
            url,
            url_string,
            host,
            headers,
            compression: destination.compression,
            timeout: destination.timeout(),
            signer,
            client,
        })
    }

    /// Signal this sender exports
    pub fn signal(&self) -> Signal {
        self.signal
    }

    /// Resolved target URL
    pub fn url(&self) -> &str {
        &self.url_string
    }

    /// `Host` header sent with every request
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether requests are signed
    pub fn is_signed(&self) -> bool {
        self.signer.is_some()
    }

    /// Send `payload` with the configured deadline
    pub async fn send(&self, payload: &[u8]) -> Result<Outcome, ExporterError> {
        self.send_with_deadline(payload, self.timeout).await
    }

    /// Send `payload`, giving up after `deadline`
    ///
    /// `Err` means the request could not be prepared (compression or signing).
    /// Every network-level result, including connection failures and an
    /// expired deadline, is an [`Outcome`].
    pub async fn send_with_deadline(
        &self,
        payload: &[u8],
        deadline: Duration,
    ) -> Result<Outcome, ExporterError> {
        let request = self.build_request(payload, deadline).await?;
        Ok(self.execute(request).await)
    }

    /// Build and, when configured, sign the request for `payload`
    pub async fn build_request(
        &self,
        payload: &[u8],
        deadline: Duration,
    ) -> Result<OutboundRequest, ExporterError> {
        let body = match self.compression {
            Compression::Gzip => gzip(payload)?,
            Compression::None => payload.to_vec(),
        };

        let mut request = OutboundRequest {
            url: self.url.clone(),
            host: self.host.clone(),
            headers: self.headers.clone(),
            body,
            deadline,
        };

        if let Some(ref signer) = self.signer {
            signer.sign(&mut request).await?;
        }

        let host = HeaderValue::from_str(&request.host)
            .map_err(|e| ExporterError::Client(format!("invalid host {}: {}", request.host, e)))?;
        request.headers.insert(HOST, host);

        Ok(request)
    }

    async fn execute(&self, request: OutboundRequest) -> Outcome {
        let OutboundRequest {
            url,
            headers,
            body,
            deadline,
            ..
        } = request;

        debug!(
            signal = %self.signal,
            url = %self.url_string,
            body_bytes = body.len(),
            deadline = ?deadline,
            "Sending export request"
        );

        let response = match self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .timeout(deadline)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    signal = %self.signal,
                    url = %self.url_string,
                    timeout = e.is_timeout(),
                    error = %e,
                    "Export request failed before a response was received"
                );
                return Outcome::TransportFailure {
                    reason: format!("failed to make an HTTP request to {}: {}", self.url_string, e),
                };
            }
        };

        let status = response.status().as_u16();
        let response_headers = response.headers().clone();
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                debug!(error = %e, "Failed to read response body");
                Vec::new()
            }
        };

        let outcome = classify(&self.url_string, status, &response_headers, &body);
        match outcome {
            Outcome::Success => info!(signal = %self.signal, status, "Successfully exported payload"),
            ref failure => warn!(
                signal = %self.signal,
                status,
                retryable = failure.is_retryable(),
                outcome = %failure,
                "Export request was not accepted"
            ),
        }
        outcome
    }
}

fn authority(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

fn gzip(payload: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(payload)?;
    encoder.finish()
}
