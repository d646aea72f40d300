// ── Settings store ──
//
// The poll plan, the coalescing snapshot cache, and the ticket handed to
// anyone waiting on a refresh.

mod cache;
mod plan;

pub use cache::{RefreshTicket, SettingsCache};
pub use plan::PollPlan;
