use serde::{Deserialize, Serialize};
use strum::Display;
use vizlo_api::AppDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SourceKind {
    Input,
    App,
}

/// One selectable entry of the source selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub kind: SourceKind,
}

/// Physical inputs followed by launchable apps, each in the order the
/// session reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceList {
    pub inputs: Vec<String>,
    pub apps: Vec<AppDescriptor>,
}

impl SourceList {
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.apps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inputs.len() + self.apps.len()
    }

    pub fn sources(&self) -> Vec<Source> {
        let inputs = self.inputs.iter().map(|name| Source {
            name: name.clone(),
            kind: SourceKind::Input,
        });
        let apps = self.apps.iter().map(|app| Source {
            name: app.name.clone(),
            kind: SourceKind::App,
        });
        inputs.chain(apps).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.inputs
            .iter()
            .map(String::as_str)
            .chain(self.apps.iter().map(|app| app.name.as_str()))
            .collect()
    }

    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.iter().any(|input| input == name)
    }

    pub fn app(&self, name: &str) -> Option<&AppDescriptor> {
        self.apps.iter().find(|app| app.name == name)
    }
}

/// State of the source selector's option list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceOptions {
    /// No load attempted yet.
    #[default]
    NotLoaded,
    /// The last load failed; the selector should report itself unavailable
    /// rather than offer an empty list.
    Unavailable { reason: String },
    Loaded(SourceList),
}

impl SourceOptions {
    pub fn list(&self) -> Option<&SourceList> {
        match self {
            Self::Loaded(list) => Some(list),
            Self::NotLoaded | Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> SourceList {
        SourceList {
            inputs: vec!["HDMI-1".into(), "HDMI-2".into()],
            apps: vec![
                AppDescriptor::new("YouTube", "1", 5),
                AppDescriptor::new("Netflix", "1", 3),
            ],
        }
    }

    #[test]
    fn inputs_precede_apps_in_reported_order() {
        assert_eq!(list().names(), ["HDMI-1", "HDMI-2", "YouTube", "Netflix"]);
        let sources = list().sources();
        assert_eq!(sources[1].kind, SourceKind::Input);
        assert_eq!(sources[2].kind, SourceKind::App);
    }

    #[test]
    fn lookups_are_exact() {
        let list = list();
        assert!(list.has_input("HDMI-1"));
        assert!(!list.has_input("hdmi-1"));
        assert!(list.app("Netflix").is_some());
        assert!(list.app("netflix").is_none());
    }
}
