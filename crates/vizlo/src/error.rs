//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use vizlo_config::ConfigError;
use vizlo_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const UNAVAILABLE: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to television at {host}")]
    #[diagnostic(
        code(vizlo::connection_failed),
        help(
            "Check that the television is on the network and its IP has not changed.\n\
             Reason: {reason}\n\
             Older firmware listens on port 9000: try --port 9000"
        )
    )]
    ConnectionFailed { host: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(vizlo::auth_failed),
        help(
            "The auth token was refused. Pair again with: vizlo pair\n\
             Then store it with: vizlo config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No auth token configured for profile '{profile}'")]
    #[diagnostic(
        code(vizlo::no_credentials),
        help(
            "Obtain one with: vizlo pair --host <ip>\n\
             Or set the VIZLO_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(vizlo::not_found),
        help("Run: vizlo {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Device refusals ──────────────────────────────────────────────

    #[error("Write rejected by the television: {message}")]
    #[diagnostic(
        code(vizlo::rejected),
        help("The setting changed on the device while vizlo was writing. Try again.")
    )]
    Rejected { message: String },

    #[error("Unavailable: {reason}")]
    #[diagnostic(code(vizlo::unavailable))]
    Unavailable { reason: String },

    #[error("Power on blocked: television is in {mode}")]
    #[diagnostic(
        code(vizlo::power_blocked),
        help(
            "In Eco Mode the network interface sleeps with the panel.\n\
             Switch to Quick Start in the television's power settings."
        )
    )]
    PowerBlocked { mode: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(vizlo::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vizlo::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(vizlo::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: vizlo config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(vizlo::no_config),
        help(
            "Create one with: vizlo config init\n\
             Or pass --host and --token directly.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(vizlo::config))]
    Config(Box<ConfigError>),

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(vizlo::timeout),
        help("Increase timeout with --timeout or check that the television is awake.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Unavailable { .. } | Self::PowerBlocked { .. } => exit_code::UNAVAILABLE,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: "(run: vizlo config profiles)".into(),
            },
            other => CliError::Config(Box::new(other)),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unreachable { host, reason } => CliError::ConnectionFailed { host, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::SettingNotFound { key } | CoreError::ControllerDisabled { key } => {
                CliError::NotFound {
                    resource_type: "setting".into(),
                    identifier: key,
                    list_command: "settings dump <category>".into(),
                }
            }

            CoreError::SourceNotFound { name } => CliError::NotFound {
                resource_type: "source".into(),
                identifier: name,
                list_command: "source list".into(),
            },

            CoreError::Rejected { message } => CliError::Rejected { message },

            CoreError::Unavailable { reason } => CliError::Unavailable { reason },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "value".into(),
                reason: message,
            },

            CoreError::Api { message, code } => CliError::ApiError {
                code: code.unwrap_or_else(|| "unknown".into()),
                message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_errors_get_distinct_exit_codes() {
        let cases = [
            (
                CoreError::Unreachable {
                    host: "10.0.0.5".into(),
                    reason: "connection refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::AuthenticationFailed {
                    message: "REQUIRES_PAIRING".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::SettingNotFound {
                    key: "picture/tint".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Rejected {
                    message: "HASHVAL_ERROR".into(),
                },
                exit_code::CONFLICT,
            ),
            (CoreError::Timeout { timeout_secs: 5 }, exit_code::TIMEOUT),
            (
                CoreError::Unavailable {
                    reason: "no sources".into(),
                },
                exit_code::UNAVAILABLE,
            ),
            (
                CoreError::ValidationFailed {
                    message: "120 outside 0..=100".into(),
                },
                exit_code::USAGE,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn missing_token_is_an_auth_error() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "den".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
