use serde::Serialize;

use crate::locale::Locale;

/// Where a rule came from.
///
/// Built-in rules are seeded from the bundled defaults and carry a translation
/// key instead of a free-text label. They are protected from category
/// bulk-delete and never exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub(crate) enum Origin {
    Builtin {
        #[serde(rename = "descriptionKey")]
        key: String,
    },
    Custom {
        #[serde(rename = "description", skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

impl Origin {
    pub(crate) fn builtin(key: impl Into<String>) -> Self {
        Self::Builtin { key: key.into() }
    }

    pub(crate) fn custom(label: impl Into<String>) -> Self {
        Self::Custom {
            label: Some(label.into()),
        }
    }

    pub(crate) fn unlabeled() -> Self {
        Self::Custom { label: None }
    }

    /// Rebuild from the two nullable store columns. A description key always
    /// wins: its presence is what marks a built-in.
    pub(crate) fn from_columns(description_key: Option<String>, description: Option<String>) -> Self {
        match description_key.filter(|k| !k.is_empty()) {
            Some(key) => Self::Builtin { key },
            None => Self::Custom { label: description },
        }
    }

    pub(crate) fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin { .. })
    }

    pub(crate) fn description_key(&self) -> Option<&str> {
        match self {
            Self::Builtin { key } => Some(key),
            Self::Custom { .. } => None,
        }
    }

    pub(crate) fn description(&self) -> Option<&str> {
        match self {
            Self::Builtin { .. } => None,
            Self::Custom { label } => label.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FilterRule {
    pub(crate) id: String,
    #[serde(flatten)]
    pub(crate) origin: Origin,
    pub(crate) pattern: String,
    pub(crate) replacement: String,
    pub(crate) use_regex: bool,
    pub(crate) enabled: bool,
    pub(crate) category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) folder: Option<String>,
}

impl FilterRule {
    pub(crate) fn from_new(id: String, rule: NewFilterRule) -> Self {
        Self {
            id,
            origin: rule.origin,
            pattern: rule.pattern,
            replacement: rule.replacement,
            use_regex: rule.use_regex,
            enabled: rule.enabled,
            category: rule.category,
            subcategory: rule.subcategory,
            folder: rule.folder,
        }
    }

    pub(crate) fn is_builtin(&self) -> bool {
        self.origin.is_builtin()
    }

    /// Label shown to the user: translated key for built-ins, the free-text
    /// description for custom rules, the pattern as a last resort.
    pub(crate) fn display_name(&self, locale: &Locale) -> String {
        match &self.origin {
            Origin::Builtin { key } => locale.translate(key, &[]),
            Origin::Custom { label: Some(label) } if !label.trim().is_empty() => label.clone(),
            Origin::Custom { .. } => self.pattern.clone(),
        }
    }

    /// Strip the identity, e.g. to clone a rule under a fresh id.
    pub(crate) fn to_new(&self) -> NewFilterRule {
        NewFilterRule {
            origin: self.origin.clone(),
            pattern: self.pattern.clone(),
            replacement: self.replacement.clone(),
            use_regex: self.use_regex,
            enabled: self.enabled,
            category: self.category.clone(),
            subcategory: self.subcategory.clone(),
            folder: self.folder.clone(),
        }
    }
}

/// A rule that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewFilterRule {
    pub(crate) origin: Origin,
    pub(crate) pattern: String,
    pub(crate) replacement: String,
    pub(crate) use_regex: bool,
    pub(crate) enabled: bool,
    pub(crate) category: String,
    pub(crate) subcategory: Option<String>,
    pub(crate) folder: Option<String>,
}

pub(crate) const DEFAULT_CATEGORY: &str = "Custom";

impl NewFilterRule {
    pub(crate) fn literal(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            origin: Origin::unlabeled(),
            pattern: pattern.into(),
            replacement: replacement.into(),
            use_regex: false,
            enabled: true,
            category: DEFAULT_CATEGORY.to_string(),
            subcategory: None,
            folder: None,
        }
    }

    pub(crate) fn regex(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            use_regex: true,
            ..Self::literal(pattern, replacement)
        }
    }

    pub(crate) fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub(crate) fn in_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder = Some(folder_id.into());
        self
    }

    pub(crate) fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub(crate) fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Partial update for a rule. `None` leaves a field untouched; for the
/// nullable fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FilterRulePatch {
    pub(crate) description: Option<Option<String>>,
    pub(crate) pattern: Option<String>,
    pub(crate) replacement: Option<String>,
    pub(crate) use_regex: Option<bool>,
    pub(crate) enabled: Option<bool>,
    pub(crate) category: Option<String>,
    pub(crate) subcategory: Option<Option<String>>,
    pub(crate) folder: Option<Option<String>>,
}

impl FilterRulePatch {
    pub(crate) fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }

    pub(crate) fn folder(folder_id: Option<String>) -> Self {
        Self {
            folder: Some(folder_id),
            ..Self::default()
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `rule`. The id and the built-in key are never touched; a
    /// description only applies to custom rules.
    pub(crate) fn apply_to(&self, rule: &mut FilterRule) {
        if let Some(description) = &self.description {
            if let Origin::Custom { label } = &mut rule.origin {
                *label = description.clone();
            }
        }
        if let Some(pattern) = &self.pattern {
            rule.pattern = pattern.clone();
        }
        if let Some(replacement) = &self.replacement {
            rule.replacement = replacement.clone();
        }
        if let Some(use_regex) = self.use_regex {
            rule.use_regex = use_regex;
        }
        if let Some(enabled) = self.enabled {
            rule.enabled = enabled;
        }
        if let Some(category) = &self.category {
            rule.category = category.clone();
        }
        if let Some(subcategory) = &self.subcategory {
            rule.subcategory = subcategory.clone();
        }
        if let Some(folder) = &self.folder {
            rule.folder = folder.clone();
        }
    }
}
