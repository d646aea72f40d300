// ── PIN pairing ──
//
// Obtaining an auth token happens before a `DeviceConfig` is complete, so
// this runs on an unauthenticated client built from host, port and TLS
// settings alone.

use secrecy::SecretString;
use tracing::info;
use vizlo_api::{PairingChallenge, SmartCastClient};

use crate::config::DeviceConfig;
use crate::error::CoreError;

/// One pairing attempt against one device.
pub struct Pairing {
    client: SmartCastClient,
    device_id: String,
    device_name: String,
}

impl Pairing {
    /// Only `host`, `port`, `tls` and `timeout` of `config` are used.
    pub fn new(
        config: &DeviceConfig,
        device_id: impl Into<String>,
        device_name: impl Into<String>,
    ) -> Result<Self, CoreError> {
        if config.host.trim().is_empty() {
            return Err(CoreError::Config {
                message: "device host is required".into(),
            });
        }
        let client = SmartCastClient::new(&config.host, config.port, None, &config.transport())?;
        Ok(Self::with_client(client, device_id, device_name))
    }

    pub fn with_client(
        client: SmartCastClient,
        device_id: impl Into<String>,
        device_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            device_id: device_id.into(),
            device_name: device_name.into(),
        }
    }

    /// Make the device display a PIN.
    pub async fn start(&self) -> Result<PairingChallenge, CoreError> {
        Ok(self
            .client
            .start_pairing(&self.device_id, &self.device_name)
            .await?)
    }

    /// Trade the on-screen PIN for an auth token.
    pub async fn finish(
        &self,
        challenge: PairingChallenge,
        pin: &str,
    ) -> Result<SecretString, CoreError> {
        let token = self
            .client
            .finish_pairing(&self.device_id, challenge, pin.trim())
            .await?;
        info!(device_id = %self.device_id, "paired");
        Ok(token)
    }

    pub async fn cancel(&self, challenge: PairingChallenge) -> Result<(), CoreError> {
        Ok(self.client.cancel_pairing(&self.device_id, challenge).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairing_needs_a_host() {
        let config = DeviceConfig::default();
        assert!(matches!(
            Pairing::new(&config, "vizlo-cli", "vizlo"),
            Err(CoreError::Config { .. })
        ));
    }
}
