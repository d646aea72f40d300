// ── Controllers ──
//
// Host-facing objects built over one session and one cache. Each kind
// exposes the capability traits below instead of inheriting from a host
// entity type.

mod number;
mod setting;
mod source;
mod switch;

use std::sync::Arc;

use async_trait::async_trait;

pub use number::NumberController;
pub use setting::{SettingWriter, WriteReceipt};
pub use source::SourceController;
pub use switch::{MuteSwitch, PowerAttributes, PowerOutcome, PowerSwitch};

use crate::error::CoreError;
use crate::model::SourceOptions;
use crate::store::RefreshTicket;

/// Read the controller's value from the latest snapshot.
pub trait CurrentValue {
    type Value;

    /// `None` when the last poll did not produce a value.
    fn current_value(&self) -> Option<Self::Value>;
}

/// Push a new value to the device.
#[async_trait]
pub trait SetValue {
    type Value: Send;

    async fn set_value(&self, value: Self::Value) -> Result<WriteReceipt, CoreError>;
}

/// A fixed list of choices.
pub trait Options {
    fn options(&self) -> Arc<SourceOptions>;
}

/// Choose one of the [`Options`].
#[async_trait]
pub trait SelectOption: Options {
    fn current_option(&self) -> Option<String>;

    async fn select_option(&self, option: &str) -> Result<RefreshTicket, CoreError>;
}
