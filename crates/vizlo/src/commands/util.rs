//! Shared helpers for command handlers.

use std::time::Duration;

use chrono::Utc;
use vizlo_core::{SettingKey, Snapshot};

use crate::error::CliError;

/// Parse a `category/name` key.
pub fn parse_key(raw: &str) -> Result<SettingKey, CliError> {
    raw.parse::<SettingKey>().map_err(|e| CliError::Validation {
        field: "key".into(),
        reason: e.to_string(),
    })
}

/// "3s ago" style age of the snapshot.
pub fn snapshot_age(snapshot: &Snapshot) -> String {
    snapshot.taken_at.map_or_else(
        || "never".into(),
        |taken| {
            let elapsed = (Utc::now() - taken).to_std().unwrap_or(Duration::ZERO);
            let whole = Duration::from_secs(elapsed.as_secs());
            format!("{} ago", humantime::format_duration(whole))
        },
    )
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
