//! AWS Signature Version 4 request signing
//!
//! Signs an [`OutboundRequest`] in place. The body digest covers the bytes as
//! they go on the wire, so signing runs after compression.

use aws_credential_types::provider::ProvideCredentials;
use aws_sigv4::http_request::{
    PayloadChecksumKind, SignableBody, SignableRequest, SigningParams, SigningSettings, sign,
};
use aws_sigv4::sign::v4;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderName, HeaderValue};
use std::time::SystemTime;
use tracing::debug;

use crate::aws::credentials::SharedCredentialsProvider;
use crate::error::SigningError;
use crate::otlp::sender::OutboundRequest;

/// Header carrying the hex SHA-256 of the body
pub const CONTENT_SHA256_HEADER: &str = "x-amz-content-sha256";
/// Header carrying the signing timestamp
pub const DATE_HEADER: &str = "x-amz-date";
/// Header carrying the session token of temporary credentials
pub const SECURITY_TOKEN_HEADER: &str = "x-amz-security-token";

/// Signs requests for one region and service
#[derive(Debug, Clone)]
pub struct RequestSigner {
    region: String,
    service: String,
    role_arn: Option<String>,
    extra_signed_headers: Vec<String>,
    credentials: SharedCredentialsProvider,
}

impl RequestSigner {
    /// Create a signer for `region` and `service`
    pub fn new(
        region: impl Into<String>,
        service: impl Into<String>,
        credentials: SharedCredentialsProvider,
    ) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
            role_arn: None,
            extra_signed_headers: Vec::new(),
            credentials,
        }
    }

    /// Role the credentials provider is expected to sign as
    ///
    /// Assuming the role is the provider's job; the signer only reports it.
    pub fn with_role_arn(mut self, role_arn: Option<String>) -> Self {
        self.role_arn = role_arn;
        self
    }

    /// Additional request headers to cover with the signature, when present
    pub fn with_signed_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra_signed_headers = headers
            .into_iter()
            .map(|h| h.as_ref().trim().to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        self
    }

    /// Signing region
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Signing service name
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Role ARN, if configured
    pub fn role_arn(&self) -> Option<&str> {
        self.role_arn.as_deref()
    }

    /// Sign `request` with the current time
    pub async fn sign(&self, request: &mut OutboundRequest) -> Result<(), SigningError> {
        self.sign_at(request, Utc::now()).await
    }

    /// Sign `request` as of `timestamp`
    ///
    /// Identical requests, credentials and timestamps produce identical
    /// headers. Only `host`, the `x-amz-*` headers and configured extra headers
    /// present on the request are signed.
    pub async fn sign_at(
        &self,
        request: &mut OutboundRequest,
        timestamp: DateTime<Utc>,
    ) -> Result<(), SigningError> {
        let credentials = self
            .credentials
            .provide_credentials()
            .await
            .map_err(|e| SigningError::MissingCredentials(e.to_string()))?;
        let identity = credentials.into();

        let mut settings = SigningSettings::default();
        settings.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;

        let params: SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(&self.service)
            .time(SystemTime::from(timestamp))
            .settings(settings)
            .build()
            .map_err(|e| SigningError::Signature(e.to_string()))?
            .into();

        let signed_headers = self.signed_header_values(request)?;
        let signable = SignableRequest::new(
            OutboundRequest::METHOD,
            request.url.as_str(),
            signed_headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
            SignableBody::Bytes(&request.body),
        )
        .map_err(|e| SigningError::Signature(e.to_string()))?;

        let (instructions, _signature) = sign(signable, &params)
            .map_err(|e| SigningError::Signature(e.to_string()))?
            .into_parts();

        for (name, value) in instructions.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| SigningError::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| SigningError::InvalidHeader(format!("{name}: {e}")))?;
            request.headers.insert(name, value);
        }

        debug!(
            region = %self.region,
            service = %self.service,
            role_arn = self.role_arn.as_deref().unwrap_or("none"),
            extra_signed_headers = signed_headers.len() - 1,
            "Signed request"
        );

        Ok(())
    }

    fn signed_header_values(
        &self,
        request: &OutboundRequest,
    ) -> Result<Vec<(String, String)>, SigningError> {
        let mut headers = vec![("host".to_string(), request.host.clone())];
        for name in &self.extra_signed_headers {
            if let Some(value) = request.headers.get(name.as_str()) {
                let value = value
                    .to_str()
                    .map_err(|e| SigningError::InvalidHeader(format!("{name}: {e}")))?;
                headers.push((name.clone(), value.to_string()));
            }
        }
        Ok(headers)
    }
}
