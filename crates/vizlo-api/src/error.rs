use thiserror::Error;

/// Top-level error type for the `vizlo-api` crate.
///
/// Covers transport failures, non-success `STATUS.RESULT` codes returned
/// inside the SmartCast envelope, and malformed payloads. `vizlo-core`
/// maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The device refused the auth token (HTTP 401/403 or `REQUIRES_PAIRING`).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A pairing step was refused (wrong PIN, challenge expired, ...).
    #[error("Pairing failed: {message}")]
    Pairing { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Device result codes ─────────────────────────────────────────
    /// `URI_NOT_FOUND`: the category/name pair does not exist on this model.
    #[error("Not found on device: {path}")]
    UriNotFound { path: String },

    /// `HASHVAL_ERROR`: the presented hash is no longer current.
    #[error("Stale hash value for {path}")]
    HashMismatch { path: String },

    /// `BLOCKED`: the device cannot serve this request in its current state
    /// (typically powered off, or an app owns the setting).
    #[error("Request blocked by device: {path}")]
    Blocked { path: String },

    /// Any other non-success result code.
    #[error("Device returned {result}: {}", detail.as_deref().unwrap_or("no detail"))]
    Device {
        result: String,
        detail: Option<String>,
    },

    /// `SUCCESS` envelope that carried no item where one was required.
    #[error("Empty response from {path}")]
    MissingItem { path: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::UriNotFound { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the device rejected a write because its hash moved on.
    pub fn is_stale_token(&self) -> bool {
        matches!(self, Self::HashMismatch { .. })
    }

    /// The raw `STATUS.RESULT` code, if the error came from the envelope.
    pub fn result_code(&self) -> Option<&str> {
        match self {
            Self::UriNotFound { .. } => Some("URI_NOT_FOUND"),
            Self::HashMismatch { .. } => Some("HASHVAL_ERROR"),
            Self::Blocked { .. } => Some("BLOCKED"),
            Self::Device { result, .. } => Some(result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn hash_mismatch_is_stale_token() {
        let err = Error::HashMismatch {
            path: "picture/backlight".into(),
        };
        assert!(err.is_stale_token());
        assert!(!err.is_transient());
        assert_eq!(err.result_code(), Some("HASHVAL_ERROR"));
    }

    #[test]
    fn uri_not_found_is_not_found() {
        let err = Error::UriNotFound {
            path: "audio/balance".into(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_stale_token());
    }

    #[test]
    fn explicit_timeout_is_transient() {
        assert!(Error::Timeout { timeout_secs: 5 }.is_transient());
    }
}
