// ── Core error types ──
//
// User-facing errors from vizlo-core. Consumers never see envelope result
// codes or JSON parse failures directly: the `From<vizlo_api::Error>` impl
// translates wire-level failures into the taxonomy the controllers act on.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach device at {host}: {reason}")]
    Unreachable { host: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Device request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Setting not found: {key}")]
    SettingNotFound { key: String },

    #[error("Source not found: {name}")]
    SourceNotFound { name: String },

    // ── Operation errors ─────────────────────────────────────────────
    /// The device refused a write because the presented token was stale.
    #[error("Write rejected by device: {message}")]
    Rejected { message: String },

    #[error("Unavailable: {reason}")]
    Unavailable { reason: String },

    /// A controller whose setting does not exist on this device.
    #[error("Controller for {key} is disabled (setting not supported by this device)")]
    ControllerDisabled { key: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The device's `STATUS.RESULT` code, when there was one.
        code: Option<String>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the device may well answer if asked again later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unreachable { .. } | Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vizlo_api::Error> for CoreError {
    fn from(err: vizlo_api::Error) -> Self {
        match err {
            vizlo_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            vizlo_api::Error::Pairing { message } => CoreError::AuthenticationFailed {
                message: format!("pairing: {message}"),
            },
            vizlo_api::Error::Transport(ref e) => {
                let host = e
                    .url()
                    .and_then(|u| u.host_str().map(str::to_owned))
                    .unwrap_or_else(|| "<unknown>".into());
                if e.is_timeout() || e.is_connect() || e.is_request() {
                    CoreError::Unreachable {
                        host,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                    }
                }
            }
            vizlo_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid device address: {e}"),
            },
            vizlo_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            vizlo_api::Error::Tls(msg) => CoreError::Unreachable {
                host: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            vizlo_api::Error::UriNotFound { path } => CoreError::SettingNotFound { key: path },
            vizlo_api::Error::HashMismatch { path } => CoreError::Rejected {
                message: format!("stale hash value for {path}"),
            },
            vizlo_api::Error::Blocked { path } => CoreError::Unavailable {
                reason: format!("device blocked request to {path}"),
            },
            vizlo_api::Error::Device { result, detail } => CoreError::Api {
                message: detail.unwrap_or_else(|| result.clone()),
                code: Some(result),
            },
            vizlo_api::Error::MissingItem { path } => CoreError::Api {
                message: format!("empty response from {path}"),
                code: None,
            },
            vizlo_api::Error::Deserialization { message, .. } => CoreError::Api {
                message,
                code: None,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::CoreError;

    #[test]
    fn hash_mismatch_becomes_rejected() {
        let err: CoreError = vizlo_api::Error::HashMismatch {
            path: "picture/backlight".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Rejected { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn unknown_uri_becomes_setting_not_found() {
        let err: CoreError = vizlo_api::Error::UriNotFound {
            path: "audio/balance".into(),
        }
        .into();
        assert!(matches!(err, CoreError::SettingNotFound { .. }));
    }

    #[test]
    fn api_timeout_is_transient() {
        let err: CoreError = vizlo_api::Error::Timeout { timeout_secs: 5 }.into();
        assert!(err.is_transient());
        assert_eq!(err.to_string(), "Device request timed out after 5s");
    }

    #[tokio::test]
    async fn unclassified_transport_timeout_is_unreachable() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(2)))
            .mount(&server)
            .await;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(50))
            .build()
            .unwrap();
        let err = client.get(server.uri()).send().await.unwrap_err();
        assert!(err.is_timeout());

        let err: CoreError = vizlo_api::Error::Transport(err).into();

        match &err {
            CoreError::Unreachable { host, .. } => assert_eq!(host, "127.0.0.1"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(err.is_transient());
        assert!(!err.to_string().contains("after 0s"));
    }

    #[test]
    fn other_result_codes_keep_the_code() {
        let err: CoreError = vizlo_api::Error::Device {
            result: "VALUE_OUT_OF_RANGE".into(),
            detail: None,
        }
        .into();
        match err {
            CoreError::Api { code, message } => {
                assert_eq!(code.as_deref(), Some("VALUE_OUT_OF_RANGE"));
                assert_eq!(message, "VALUE_OUT_OF_RANGE");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
