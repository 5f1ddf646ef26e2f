use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FilterError, Result};
use crate::models::{FilterRule, NewFilterRule, Origin, DEFAULT_CATEGORY};

pub(crate) const TEMPLATE_VERSION: &str = "1.0.0";
pub(crate) const DEFAULT_TEMPLATE_DESCRIPTION: &str = "Custom template";
pub(crate) const DEFAULT_TEMPLATE_AUTHOR: &str = "Anonymous";

/// A shareable rule set: metadata plus a `filters` array.
///
/// The same document shape is used for the bundled defaults, which carry a
/// `descriptionKey` per entry and no metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) version: Option<String>,
    pub(crate) filters: Vec<TemplateEntry>,
}

/// One element of the `filters` array. Entries that do not have the shape of
/// a filter are kept as raw JSON so the rest of the document still imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum TemplateEntry {
    Filter(TemplateFilter),
    Malformed(serde_json::Value),
}

impl TemplateEntry {
    pub(crate) fn into_filter(self) -> std::result::Result<TemplateFilter, serde_json::Error> {
        match self {
            Self::Filter(filter) => Ok(filter),
            Self::Malformed(value) => serde_json::from_value(value),
        }
    }

    /// The entry's pattern as written, for failure reports.
    pub(crate) fn pattern_text(&self) -> String {
        match self {
            Self::Filter(filter) => filter.pattern.clone(),
            Self::Malformed(value) => match value.get("pattern") {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TemplateFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) pattern: String,
    #[serde(default)]
    pub(crate) replacement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) use_regex: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) subcategory: Option<String>,
}

impl TemplateFilter {
    pub(crate) fn from_rule(rule: &FilterRule) -> Self {
        Self {
            description_key: None,
            category: Some(rule.category.clone()),
            description: rule.origin.description().map(str::to_string),
            pattern: rule.pattern.clone(),
            replacement: rule.replacement.clone(),
            use_regex: Some(rule.use_regex),
            enabled: Some(rule.enabled),
            subcategory: rule.subcategory.clone(),
        }
    }

    /// Missing flags default to on; a missing category lands in `Custom`.
    pub(crate) fn into_new(self) -> NewFilterRule {
        let origin = match self.description_key.filter(|k| !k.is_empty()) {
            Some(key) => Origin::builtin(key),
            None => Origin::Custom {
                label: self.description.filter(|d| !d.is_empty()),
            },
        };
        NewFilterRule {
            origin,
            pattern: self.pattern,
            replacement: self.replacement,
            use_regex: self.use_regex.unwrap_or(true),
            enabled: self.enabled.unwrap_or(true),
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            subcategory: self.subcategory,
            folder: None,
        }
    }
}

/// User-supplied export metadata; blanks fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TemplateMeta {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) author: Option<String>,
}

impl TemplateMeta {
    pub(crate) fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Template {
    pub(crate) fn from_rules(meta: TemplateMeta, rules: &[FilterRule]) -> Self {
        let non_blank = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        Self {
            name: Some(meta.name),
            description: Some(
                non_blank(meta.description).unwrap_or_else(|| DEFAULT_TEMPLATE_DESCRIPTION.into()),
            ),
            author: Some(non_blank(meta.author).unwrap_or_else(|| DEFAULT_TEMPLATE_AUTHOR.into())),
            version: Some(TEMPLATE_VERSION.into()),
            filters: rules
                .iter()
                .map(|rule| TemplateEntry::Filter(TemplateFilter::from_rule(rule)))
                .collect(),
        }
    }

    /// Parse a template document. The only structural requirement is a
    /// `filters` array; everything else is optional. Entries are checked one
    /// by one on import.
    pub(crate) fn parse(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if !value.get("filters").is_some_and(|f| f.is_array()) {
            return Err(FilterError::InvalidTemplate(
                "missing 'filters' array".into(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub(crate) fn read(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub(crate) fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub(crate) fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub(crate) fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("template")
    }
}

/// File name for an exported template: every character outside `[A-Za-z0-9]`
/// becomes `_`. A blank name gets a dated default.
pub(crate) fn template_file_name(name: &str) -> String {
    if name.trim().is_empty() {
        let date = chrono::Local::now().format("%Y%m%d");
        return format!("clipfilter-template-{date}.json");
    }
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}.json")
}

/// Result of importing a template: how many entries were added and why the
/// others were not.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ImportReport {
    pub(crate) imported: usize,
    pub(crate) failures: Vec<ImportFailure>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ImportFailure {
    pub(crate) index: usize,
    pub(crate) pattern: String,
    pub(crate) reason: String,
}
