// ── Runtime connection configuration ──
//
// These types describe *how* to reach a television. They carry the auth
// token and poll tuning, but never touch disk: the CLI resolves a profile
// into a `DeviceConfig` and hands it in.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use vizlo_api::transport::{TlsMode, TransportConfig};
use vizlo_api::{AppDescriptor, DEFAULT_PORT};

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification. Televisions ship self-signed certificates.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for one television.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Hostname or IP address, without scheme or port.
    pub host: String,
    pub port: u16,
    /// Pairing token sent in the `AUTH` header.
    pub auth_token: SecretString,
    pub tls: TlsVerification,
    /// Bound on every device request.
    pub timeout: Duration,
    /// Interval between scheduled polls.
    pub poll_interval: Duration,
    /// Poll `audio/balance`. Some models do not expose it.
    pub include_balance: bool,
    /// Apps offered by the source selector, in display order.
    pub apps: Vec<AppDescriptor>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            auth_token: SecretString::from(String::new()),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_secs(10),
            include_balance: true,
            apps: vizlo_api::default_catalog(),
        }
    }
}

impl DeviceConfig {
    pub fn new(host: impl Into<String>, auth_token: SecretString) -> Self {
        Self {
            host: host.into(),
            auth_token,
            ..Self::default()
        }
    }

    /// Reject configurations that cannot possibly reach a device.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::Config {
                message: "device host is required".into(),
            });
        }
        if self.auth_token.expose_secret().is_empty() {
            return Err(CoreError::Config {
                message: "auth token is required (run `vizlo pair` to obtain one)".into(),
            });
        }
        if self.poll_interval.is_zero() {
            return Err(CoreError::Config {
                message: "poll interval must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_device_firmware() {
        let config = DeviceConfig::default();
        assert_eq!(config.port, 7345);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert!(config.include_balance);
    }

    #[test]
    fn missing_host_is_fatal() {
        let config = DeviceConfig::new("", SecretString::from("tok".to_string()));
        assert!(matches!(config.validate(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn missing_token_is_fatal() {
        let config = DeviceConfig::new("192.168.1.40", SecretString::from(String::new()));
        assert!(matches!(config.validate(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn complete_config_validates() {
        let config = DeviceConfig::new("192.168.1.40", SecretString::from("tok".to_string()));
        assert!(config.validate().is_ok());
    }
}
