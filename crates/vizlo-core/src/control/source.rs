use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use tracing::{info, warn};

use super::{Options, SelectOption};
use crate::error::CoreError;
use crate::model::{SourceList, SourceOptions};
use crate::session::DeviceSession;
use crate::store::{RefreshTicket, SettingsCache};

/// Selector over inputs and apps.
///
/// The option list is loaded separately from the poll cycle and kept until
/// the next [`load`](Self::load).
pub struct SourceController {
    session: Arc<dyn DeviceSession>,
    cache: Arc<SettingsCache>,
    options: ArcSwap<SourceOptions>,
}

impl SourceController {
    pub fn new(session: Arc<dyn DeviceSession>, cache: Arc<SettingsCache>) -> Self {
        Self {
            session,
            cache,
            options: ArcSwap::from_pointee(SourceOptions::NotLoaded),
        }
    }

    /// Fetch inputs and apps. A failure leaves the selector `Unavailable`,
    /// never with an empty list.
    pub async fn load(&self) -> Arc<SourceOptions> {
        let options = match self.session.read_source_list().await {
            Ok(list) if list.is_empty() => {
                warn!("device reported no inputs or apps");
                SourceOptions::Unavailable {
                    reason: "device reported no inputs or apps".into(),
                }
            }
            Ok(list) => {
                info!(
                    inputs = list.inputs.len(),
                    apps = list.apps.len(),
                    "source options loaded"
                );
                SourceOptions::Loaded(list)
            }
            Err(e) => {
                warn!(error = %e, "failed to load source options");
                SourceOptions::Unavailable {
                    reason: e.to_string(),
                }
            }
        };
        let options = Arc::new(options);
        self.options.store(Arc::clone(&options));
        options
    }

    pub fn is_available(&self) -> bool {
        self.options.load().is_available()
    }

    fn loaded(&self) -> Result<SourceList, CoreError> {
        match self.options.load().as_ref() {
            SourceOptions::Loaded(list) => Ok(list.clone()),
            SourceOptions::NotLoaded => Err(CoreError::Unavailable {
                reason: "source options have not been loaded".into(),
            }),
            SourceOptions::Unavailable { reason } => Err(CoreError::Unavailable {
                reason: reason.clone(),
            }),
        }
    }
}

impl Options for SourceController {
    fn options(&self) -> Arc<SourceOptions> {
        self.options.load_full()
    }
}

#[async_trait]
impl SelectOption for SourceController {
    fn current_option(&self) -> Option<String> {
        self.cache.snapshot().current_source.clone()
    }

    /// Exact-name match, inputs first, then apps.
    async fn select_option(&self, option: &str) -> Result<RefreshTicket, CoreError> {
        let list = self.loaded()?;

        if list.has_input(option) {
            self.session.activate_input(option).await?;
            info!(input = option, "input selected");
        } else if let Some(app) = list.app(option) {
            self.session.launch_app(app).await?;
            info!(app = option, "app launched");
        } else {
            return Err(CoreError::SourceNotFound {
                name: option.to_owned(),
            });
        }

        Ok(self.cache.request_refresh())
    }
}
