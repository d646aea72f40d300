// Pairing endpoints
//
// Two-step PIN pairing: `start` makes the device display a PIN, `finish`
// exchanges that PIN for a long-lived auth token. Runs on an
// unauthenticated client.

use secrecy::SecretString;
use serde_json::json;
use tracing::{debug, info};

use crate::client::SmartCastClient;
use crate::error::Error;
use crate::models::{Envelope, PairingChallenge, PairingResult};

const START_PATH: &str = "/pairing/start";
const PAIR_PATH: &str = "/pairing/pair";
const CANCEL_PATH: &str = "/pairing/cancel";

impl SmartCastClient {
    /// Ask the device to display a pairing PIN.
    ///
    /// `PUT /pairing/start` with `{DEVICE_ID, DEVICE_NAME}`
    pub async fn start_pairing(
        &self,
        device_id: &str,
        device_name: &str,
    ) -> Result<PairingChallenge, Error> {
        debug!(device_id, device_name, "starting pairing");
        let body = json!({
            "DEVICE_ID": device_id,
            "DEVICE_NAME": device_name,
        });
        let envelope: Envelope<PairingChallenge> = self.put(START_PATH, &body).await?;
        envelope.item.ok_or_else(|| Error::MissingItem {
            path: START_PATH.into(),
        })
    }

    /// Complete pairing with the PIN shown on screen.
    ///
    /// `PUT /pairing/pair`; returns the auth token for subsequent requests.
    pub async fn finish_pairing(
        &self,
        device_id: &str,
        challenge: PairingChallenge,
        pin: &str,
    ) -> Result<SecretString, Error> {
        let body = json!({
            "DEVICE_ID": device_id,
            "CHALLENGE_TYPE": challenge.challenge_type,
            "RESPONSE_VALUE": pin,
            "PAIRING_REQ_TOKEN": challenge.pairing_req_token,
        });
        let envelope: Envelope<PairingResult> = self.put(PAIR_PATH, &body).await?;
        let result = envelope.item.ok_or_else(|| Error::MissingItem {
            path: PAIR_PATH.into(),
        })?;
        info!(device_id, "pairing complete");
        Ok(SecretString::from(result.auth_token))
    }

    /// Abandon an in-progress pairing so the PIN disappears from screen.
    pub async fn cancel_pairing(
        &self,
        device_id: &str,
        challenge: PairingChallenge,
    ) -> Result<(), Error> {
        debug!(device_id, "cancelling pairing");
        let body = json!({
            "DEVICE_ID": device_id,
            "CHALLENGE_TYPE": challenge.challenge_type,
            "RESPONSE_VALUE": "1111",
            "PAIRING_REQ_TOKEN": challenge.pairing_req_token,
        });
        let _: Envelope<serde_json::Value> = self.put(CANCEL_PATH, &body).await?;
        Ok(())
    }
}
