use serde::Serialize;

pub(crate) const DEFAULT_FOLDER_ICON: &str = "📁";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CustomFolder {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) icon: Option<String>,
    pub(crate) expanded: bool,
}

impl CustomFolder {
    pub(crate) fn icon(&self) -> &str {
        self.icon
            .as_deref()
            .filter(|i| !i.is_empty())
            .unwrap_or(DEFAULT_FOLDER_ICON)
    }

    /// Find a folder by name (case-insensitive) in a slice.
    pub(crate) fn find_by_name<'a>(folders: &'a [CustomFolder], name: &str) -> Option<&'a CustomFolder> {
        let lower = name.to_lowercase();
        folders.iter().find(|f| f.name.to_lowercase() == lower)
    }
}

impl std::fmt::Display for CustomFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.icon(), self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewCustomFolder {
    pub(crate) name: String,
    pub(crate) icon: Option<String>,
}

impl NewCustomFolder {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
        }
    }

    pub(crate) fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CustomFolderPatch {
    pub(crate) name: Option<String>,
    pub(crate) icon: Option<Option<String>>,
    pub(crate) expanded: Option<bool>,
}

impl CustomFolderPatch {
    pub(crate) fn apply_to(&self, folder: &mut CustomFolder) {
        if let Some(name) = &self.name {
            folder.name = name.clone();
        }
        if let Some(icon) = &self.icon {
            folder.icon = icon.clone();
        }
        if let Some(expanded) = self.expanded {
            folder.expanded = expanded;
        }
    }
}
