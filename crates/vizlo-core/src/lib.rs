//! Polling and control layer between `vizlo-api` and a host (the CLI).
//!
//! - **[`Controller`]**: facade owning the lifecycle. [`connect()`](Controller::connect)
//!   probes the device, runs the first poll, loads source options, and starts
//!   the [`PollScheduler`]. [`connect_once()`](Controller::connect_once)
//!   does the same without background polling.
//!
//! - **[`SettingsCache`]**: runs poll cycles and publishes immutable
//!   [`Snapshot`]s through a `watch` channel. Concurrent refresh requests join
//!   the cycle in flight.
//!
//! - **Controllers** ([`control`]): token-guarded setting writes, numeric
//!   sliders, mute and power switches, and the source selector, each exposing
//!   small capability traits ([`CurrentValue`], [`SetValue`], [`Options`],
//!   [`SelectOption`]).
//!
//! - **[`DeviceSession`]**: the network seam. [`SmartCastSession`] speaks the
//!   SmartCast REST API; tests substitute an in-memory session.

pub mod config;
pub mod control;
pub mod controller;
pub mod error;
pub mod model;
pub mod pairing;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod stream;

#[cfg(test)]
pub(crate) mod test_support;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DeviceConfig, TlsVerification};
pub use control::{
    CurrentValue, MuteSwitch, NumberController, Options, PowerAttributes, PowerOutcome, PowerSwitch,
    SelectOption, SetValue, SettingWriter, SourceController, WriteReceipt,
};
pub use controller::{ConnectionState, Controller};
pub use error::CoreError;
pub use pairing::Pairing;
pub use scheduler::PollScheduler;
pub use session::{DeviceSession, SmartCastSession};
pub use store::{PollPlan, RefreshTicket, SettingsCache};
pub use stream::SnapshotStream;

pub use model::{
    MutationToken, NumberRange, PowerMode, PowerState, SettingCategory, SettingKey,
    SettingReading, SettingValue, Snapshot, Source, SourceKind, SourceList, SourceOptions,
};
pub use vizlo_api::{AppDescriptor, PairingChallenge};
