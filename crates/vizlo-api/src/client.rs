// SmartCast HTTP client
//
// Wraps `reqwest::Client` with base-URL construction, the `AUTH` header,
// and envelope unwrapping. Endpoint groups (settings, power, inputs, apps,
// pairing) are inherent methods in sibling modules so this file stays
// focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use secrecy::SecretString;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{Envelope, StatusOnly};
use crate::transport::TransportConfig;

/// Raw HTTP client for a single SmartCast device.
///
/// Stateless apart from its network identity: every call is an independent
/// request/response exchange. No retries happen at this layer.
#[derive(Clone)]
pub struct SmartCastClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl SmartCastClient {
    /// Create a client for `https://{host}:{port}`.
    ///
    /// `token` is the pairing token; pass `None` only for the pairing flow,
    /// which runs before a token exists.
    pub fn new(
        host: &str,
        port: u16,
        token: Option<&SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("https://{host}:{port}"))?;
        let http = match token {
            Some(token) => transport.build_authenticated_client(token)?,
            None => transport.build_client()?,
        };
        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client` and base URL.
    ///
    /// Used by tests against a plain-HTTP mock server.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout_secs: 0,
        }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an absolute API path (`/state/device/...`).
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        self.parse_envelope(path, resp).await
    }

    /// Send a PUT request with JSON body and unwrap the envelope.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<Envelope<T>, Error> {
        let url = self.url(path)?;
        debug!("PUT {}", url);

        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        self.parse_envelope(path, resp).await
    }

    /// Turn reqwest's timeout flag into the explicit variant so callers
    /// can report the configured bound.
    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Parse the `{ STATUS, ITEMS | ITEM }` envelope, returning the payload on
    /// `SUCCESS` or the error matching `STATUS.RESULT` otherwise.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        resp: reqwest::Response,
    ) -> Result<Envelope<T>, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("device rejected auth token (HTTP {status})"),
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::UriNotFound { path: path.into() });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Device {
                result: format!("HTTP {status}"),
                detail: Some(preview(&body).to_owned()),
            });
        }

        let body = resp.text().await.map_err(|e| self.classify(e))?;
        trace!(path, body = preview(&body), "response body");

        let head: StatusOnly = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;

        if !head.status.is_success() {
            return Err(result_to_error(path, head.status.result, head.status.detail));
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })
    }
}

/// Map a non-success `STATUS.RESULT` code to an [`Error`].
fn result_to_error(path: &str, result: String, detail: Option<String>) -> Error {
    match result.to_ascii_uppercase().as_str() {
        "URI_NOT_FOUND" => Error::UriNotFound { path: path.into() },
        "HASHVAL_ERROR" => Error::HashMismatch { path: path.into() },
        "BLOCKED" => Error::Blocked { path: path.into() },
        "REQUIRES_PAIRING" | "INVALID_AUTH" => Error::Authentication {
            message: detail.unwrap_or(result),
        },
        "CHALLENGE_INCORRECT" | "PAIRING_DENIED" | "MAX_CHALLENGES_EXCEEDED" => Error::Pairing {
            message: detail.unwrap_or(result),
        },
        _ => Error::Device { result, detail },
    }
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::{preview, result_to_error};
    use crate::error::Error;

    #[test]
    fn result_codes_map_to_variants() {
        assert!(matches!(
            result_to_error("p", "HASHVAL_ERROR".into(), None),
            Error::HashMismatch { .. }
        ));
        assert!(matches!(
            result_to_error("p", "uri_not_found".into(), None),
            Error::UriNotFound { .. }
        ));
        assert!(matches!(
            result_to_error("p", "BLOCKED".into(), None),
            Error::Blocked { .. }
        ));
        assert!(matches!(
            result_to_error("p", "REQUIRES_PAIRING".into(), None),
            Error::Authentication { .. }
        ));
        assert!(matches!(
            result_to_error("p", "VALUE_OUT_OF_RANGE".into(), Some("nope".into())),
            Error::Device { .. }
        ));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        assert!(preview(&body).len() <= 200);
    }
}
