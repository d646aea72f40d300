// ── Domain model ──
//
// Canonical types shared by the session, the cache, and the controllers.
// Wire types stay in `vizlo-api`; these carry only what the core acts on.

pub mod power;
pub mod setting;
pub mod snapshot;
pub mod source;

pub use power::{PowerMode, PowerState};
pub use setting::{
    MutationToken, NumberRange, SettingCategory, SettingKey, SettingReading, SettingValue,
};
pub use snapshot::Snapshot;
pub use source::{Source, SourceKind, SourceList, SourceOptions};
