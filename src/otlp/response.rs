//! Response classification
//!
//! Maps an HTTP response to an [`Outcome`] for the retry layer. Nothing here
//! sleeps or loops.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::fmt;
use std::time::Duration;

/// `google.rpc.Status` as returned in OTLP/HTTP error bodies
#[derive(Clone, PartialEq, prost::Message)]
pub struct ErrorStatus {
    /// gRPC status code
    #[prost(int32, tag = "1")]
    pub code: i32,
    /// Developer-facing message
    #[prost(string, tag = "2")]
    pub message: String,
    /// Error details
    #[prost(message, repeated, tag = "3")]
    pub details: Vec<ErrorDetail>,
}

/// `google.protobuf.Any` detail entry
#[derive(Clone, PartialEq, prost::Message)]
pub struct ErrorDetail {
    /// Type URL of the packed message
    #[prost(string, tag = "1")]
    pub type_url: String,
    /// Serialized message
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

impl ErrorStatus {
    /// Decode a response body; empty or undecodable bodies yield `None`
    pub fn from_body(body: &[u8]) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        <Self as prost::Message>::decode(body).ok()
    }
}

/// Result of one send attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The endpoint accepted the payload
    Success,
    /// The endpoint rejected the payload; retrying cannot help
    PermanentFailure {
        /// Failure description
        reason: String,
    },
    /// The endpoint is throttling; wait at least `delay` before retrying
    ThrottledRetry {
        /// Minimum wait before the next attempt
        delay: Duration,
        /// Failure description
        reason: String,
    },
    /// Retryable server-side failure
    TransientRetry {
        /// Failure description
        reason: String,
    },
    /// No response was received (connection failure or deadline)
    TransportFailure {
        /// Failure description
        reason: String,
    },
}

impl Outcome {
    /// Whether the payload was accepted
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Whether the retry layer may try again
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Outcome::Success | Outcome::PermanentFailure { .. })
    }

    /// Server-requested minimum wait, for throttled outcomes
    pub fn retry_delay(&self) -> Option<Duration> {
        match self {
            Outcome::ThrottledRetry { delay, .. } => Some(*delay),
            _ => None,
        }
    }

    /// Failure description, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Success => None,
            Outcome::PermanentFailure { reason }
            | Outcome::ThrottledRetry { reason, .. }
            | Outcome::TransientRetry { reason }
            | Outcome::TransportFailure { reason } => Some(reason),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => f.write_str("success"),
            Outcome::PermanentFailure { reason } => write!(f, "permanent failure: {reason}"),
            Outcome::ThrottledRetry { delay, reason } => {
                write!(f, "throttled (retry after {}s): {reason}", delay.as_secs())
            }
            Outcome::TransientRetry { reason } => write!(f, "retryable failure: {reason}"),
            Outcome::TransportFailure { reason } => write!(f, "transport failure: {reason}"),
        }
    }
}

/// Classify a response received from `url`
pub fn classify(url: &str, status: u16, headers: &HeaderMap, body: &[u8]) -> Outcome {
    if (200..300).contains(&status) {
        return Outcome::Success;
    }

    let reason = failure_message(url, status, ErrorStatus::from_body(body).as_ref());

    match status {
        400 => Outcome::PermanentFailure { reason },
        429 | 503 => Outcome::ThrottledRetry {
            delay: retry_after(headers),
            reason,
        },
        _ => Outcome::TransientRetry { reason },
    }
}

fn failure_message(url: &str, status: u16, error_status: Option<&ErrorStatus>) -> String {
    let mut message = format!(
        "error exporting items, request to {url} responded with HTTP Status Code {status}"
    );
    if let Some(s) = error_status {
        let details: Vec<&str> = s.details.iter().map(|d| d.type_url.as_str()).collect();
        message.push_str(&format!(
            ", Message={}, Details=[{}]",
            s.message,
            details.join(" ")
        ));
    }
    message
}

/// `Retry-After` in whole seconds; zero when absent or not a number
fn retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use reqwest::header::HeaderValue;

    const URL: &str = "http://127.0.0.1:4318/v1/traces";

    fn status_body(code: i32, message: &str) -> Vec<u8> {
        ErrorStatus {
            code,
            message: message.to_string(),
            details: vec![],
        }
        .encode_to_vec()
    }

    fn prefix(code: u16) -> String {
        format!("error exporting items, request to {URL} responded with HTTP Status Code {code}")
    }

    #[test]
    fn test_success_statuses() {
        for status in [200, 201, 202, 204, 299] {
            assert_eq!(classify(URL, status, &HeaderMap::new(), b""), Outcome::Success);
        }
    }

    #[test]
    fn test_bad_request_is_permanent() {
        let outcome = classify(URL, 400, &HeaderMap::new(), &status_body(3, "Bad field"));
        assert_eq!(
            outcome,
            Outcome::PermanentFailure {
                reason: format!("{}, Message=Bad field, Details=[]", prefix(400))
            }
        );
        assert!(!outcome.is_retryable());
    }

    #[test]
    fn test_too_many_requests_with_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        let outcome = classify(URL, 429, &headers, &status_body(3, "Quota exceeded"));

        assert_eq!(
            outcome,
            Outcome::ThrottledRetry {
                delay: Duration::from_secs(30),
                reason: format!("{}, Message=Quota exceeded, Details=[]", prefix(429)),
            }
        );
        assert_eq!(outcome.retry_delay(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_unavailable_without_retry_after() {
        let outcome = classify(URL, 503, &HeaderMap::new(), &status_body(14, "Server overloaded"));
        assert_eq!(
            outcome,
            Outcome::ThrottledRetry {
                delay: Duration::ZERO,
                reason: format!("{}, Message=Server overloaded, Details=[]", prefix(503)),
            }
        );
    }

    #[test]
    fn test_unparseable_retry_after_is_zero() {
        let mut headers = HeaderMap::new();
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(
            classify(URL, 503, &headers, b"").retry_delay(),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_not_found_is_transient_without_message() {
        let outcome = classify(URL, 404, &HeaderMap::new(), b"");
        assert_eq!(outcome, Outcome::TransientRetry { reason: prefix(404) });

        let reason = outcome.reason().unwrap();
        assert!(reason.contains("HTTP Status Code 404"));
        assert!(!reason.contains("Message="));
        assert!(outcome.is_retryable());
    }

    #[test]
    fn test_details_are_listed() {
        let body = ErrorStatus {
            code: 8,
            message: "slow down".to_string(),
            details: vec![ErrorDetail {
                type_url: "type.googleapis.com/google.rpc.RetryInfo".to_string(),
                value: vec![],
            }],
        }
        .encode_to_vec();

        let outcome = classify(URL, 500, &HeaderMap::new(), &body);
        assert_eq!(
            outcome.reason().unwrap(),
            format!(
                "{}, Message=slow down, Details=[type.googleapis.com/google.rpc.RetryInfo]",
                prefix(500)
            )
        );
    }

    #[test]
    fn test_outcome_helpers() {
        assert!(Outcome::Success.is_success());
        assert!(!Outcome::Success.is_retryable());
        assert_eq!(Outcome::Success.reason(), None);
        assert!(
            Outcome::TransportFailure {
                reason: "connection refused".to_string()
            }
            .is_retryable()
        );
    }
}
