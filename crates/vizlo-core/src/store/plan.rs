use crate::model::SettingKey;

const PICTURE_SETTINGS: [&str; 6] = [
    "backlight",
    "brightness",
    "contrast",
    "color",
    "tint",
    "sharpness",
];

/// What one poll cycle reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPlan {
    pub settings: Vec<SettingKey>,
    pub current_source: bool,
    pub power: bool,
    pub power_mode: bool,
}

impl PollPlan {
    /// Picture sliders, volume, mute, and optionally balance, plus the
    /// current source, power state, and power mode.
    pub fn standard(include_balance: bool) -> Self {
        let mut settings: Vec<SettingKey> =
            PICTURE_SETTINGS.iter().map(|name| SettingKey::picture(*name)).collect();
        settings.push(SettingKey::audio("volume"));
        if include_balance {
            settings.push(SettingKey::audio("balance"));
        }
        settings.push(SettingKey::audio("mute"));

        Self {
            settings,
            current_source: true,
            power: true,
            power_mode: true,
        }
    }

    pub fn contains(&self, key: &SettingKey) -> bool {
        self.settings.contains(key)
    }
}

impl Default for PollPlan {
    fn default() -> Self {
        Self::standard(true)
    }
}
