//! Per-signal endpoint composition

use url::Url;

use crate::error::ConfigError;
use crate::otlp::Signal;

/// Resolve the URL to POST `signal` to
///
/// A non-empty override is used verbatim after checking that it parses.
/// Otherwise the base endpoint receives the `/v1/<signal>` suffix.
pub fn compose_signal_url(
    base_url: &str,
    override_url: &str,
    signal: Signal,
) -> Result<String, ConfigError> {
    if !override_url.is_empty() {
        Url::parse(override_url).map_err(|_| ConfigError::InvalidEndpointUrl { signal })?;
        return Ok(override_url.to_string());
    }

    if base_url.is_empty() {
        return Err(ConfigError::MissingEndpoint { signal });
    }

    Ok(format!("{}/v1/{}", base_url, signal.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_is_used_verbatim() {
        for base in ["", "http://x", "http://other:4318"] {
            assert_eq!(
                compose_signal_url(base, "http://x/custom/traces", Signal::Traces).unwrap(),
                "http://x/custom/traces"
            );
        }
    }

    #[test]
    fn test_base_gets_signal_suffix() {
        assert_eq!(
            compose_signal_url("http://x", "", Signal::Traces).unwrap(),
            "http://x/v1/traces"
        );
        assert_eq!(
            compose_signal_url("https://1.2.3.4:1234", "", Signal::Logs).unwrap(),
            "https://1.2.3.4:1234/v1/logs"
        );
    }

    #[test]
    fn test_missing_endpoint() {
        let err = compose_signal_url("", "", Signal::Metrics).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingEndpoint {
                signal: Signal::Metrics
            }
        );
        assert_eq!(
            err.to_string(),
            "either endpoint or metrics_endpoint must be specified"
        );
    }

    #[test]
    fn test_invalid_override() {
        let err = compose_signal_url("http://x", "http://[::1/v1/traces", Signal::Traces).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEndpointUrl {
                signal: Signal::Traces
            }
        );

        assert!(compose_signal_url("", "not a url", Signal::Logs).is_err());
    }

    #[test]
    fn test_composition_is_repeatable() {
        let first = compose_signal_url("http://x", "", Signal::Logs);
        let second = compose_signal_url("http://x", "", Signal::Logs);
        assert_eq!(first, second);
    }
}
