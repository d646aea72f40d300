use std::sync::Arc;

use async_trait::async_trait;

use super::{CurrentValue, SetValue, SettingWriter, WriteReceipt};
use crate::error::CoreError;
use crate::model::{NumberRange, SettingKey, SettingValue};
use crate::session::DeviceSession;
use crate::store::SettingsCache;

/// A numeric slider over one setting.
pub struct NumberController {
    writer: SettingWriter,
    range: NumberRange,
}

impl NumberController {
    pub fn new(
        key: SettingKey,
        range: NumberRange,
        session: Arc<dyn DeviceSession>,
        cache: Arc<SettingsCache>,
    ) -> Self {
        Self {
            writer: SettingWriter::new(key, session, cache),
            range,
        }
    }

    pub fn key(&self) -> &SettingKey {
        self.writer.key()
    }

    pub fn range(&self) -> NumberRange {
        self.range
    }

    pub fn is_disabled(&self) -> bool {
        self.writer.is_disabled()
    }
}

/// List-valued settings read as a two-position slider: `"Off"` is 0,
/// anything else 1.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn numeric(value: &SettingValue) -> f64 {
    match value {
        SettingValue::Number(n) => *n as f64,
        SettingValue::Text(text) if text == "Off" => 0.0,
        SettingValue::Text(_) => 1.0,
    }
}

impl CurrentValue for NumberController {
    type Value = f64;

    fn current_value(&self) -> Option<f64> {
        self.writer.current().as_ref().map(numeric)
    }
}

#[async_trait]
impl SetValue for NumberController {
    type Value = f64;

    async fn set_value(&self, value: f64) -> Result<WriteReceipt, CoreError> {
        if !self.range.contains(value) {
            return Err(CoreError::ValidationFailed {
                message: format!("{} must be within {}, got {value}", self.key(), self.range),
            });
        }
        // Range-checked above.
        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let value = value.trunc() as i64;
        self.writer.write(SettingValue::Number(value)).await
    }
}
