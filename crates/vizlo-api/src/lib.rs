// vizlo-api: Async Rust client for the SmartCast local control API

pub mod apps;
pub mod client;
pub mod error;
pub mod inputs;
pub mod models;
pub mod pairing;
pub mod power;
pub mod settings;
pub mod transport;

pub use apps::{AppDescriptor, default_catalog, find_app};
pub use client::SmartCastClient;
pub use error::Error;
pub use models::{AppLaunchValue, InputItem, PairingChallenge, ResponseStatus, SettingItem};
pub use transport::{TlsMode, TransportConfig};

/// Default SmartCast API port on current television firmware.
pub const DEFAULT_PORT: u16 = 7345;
