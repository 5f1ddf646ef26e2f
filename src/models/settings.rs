use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Theme {
    Light,
    Dark,
    Auto,
}

impl Theme {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    pub(crate) fn all() -> &'static [Theme] {
        &[Self::Light, Self::Dark, Self::Auto]
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub(crate) const DEFAULT_SHORTCUT: &str = "CommandOrControl+Shift+V";

/// The single settings record of an installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppSettings {
    pub(crate) language: String,
    pub(crate) auto_start: bool,
    pub(crate) notifications: bool,
    pub(crate) theme: Theme,
    pub(crate) shortcut_paste: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: "en".into(),
            auto_start: false,
            notifications: true,
            theme: Theme::Auto,
            shortcut_paste: DEFAULT_SHORTCUT.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AppSettingsPatch {
    pub(crate) language: Option<String>,
    pub(crate) auto_start: Option<bool>,
    pub(crate) notifications: Option<bool>,
    pub(crate) theme: Option<Theme>,
    pub(crate) shortcut_paste: Option<String>,
}

impl AppSettingsPatch {
    pub(crate) fn apply_to(&self, settings: &mut AppSettings) {
        if let Some(language) = &self.language {
            settings.language = language.clone();
        }
        if let Some(auto_start) = self.auto_start {
            settings.auto_start = auto_start;
        }
        if let Some(notifications) = self.notifications {
            settings.notifications = notifications;
        }
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(shortcut) = &self.shortcut_paste {
            settings.shortcut_paste = shortcut.clone();
        }
    }
}
