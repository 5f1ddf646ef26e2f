use thiserror::Error;

/// Errors surfaced by the filter manager and engine.
///
/// Precondition failures (`NothingToExport`, `NothingToDelete`,
/// `ProtectedCategory`) are distinct variants so callers can message the user
/// instead of treating them as crashes.
#[derive(Debug, Error)]
pub(crate) enum FilterError {
    /// A regex rule whose pattern does not compile.
    #[error("Invalid regex '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// A rule with nothing to match.
    #[error("Pattern must not be empty")]
    EmptyPattern,
    #[error("Folder name must not be empty")]
    EmptyFolderName,
    /// Export requested while every rule is a built-in.
    #[error("No custom filters to export (built-in filters are never exported)")]
    NothingToExport,
    /// Bulk delete of custom rules requested while none exist.
    #[error("No custom filters to delete")]
    NothingToDelete,
    /// Category bulk-delete blocked by a built-in rule.
    #[error("Cannot delete default category '{category}'")]
    ProtectedCategory { category: String },
    /// Template document without a usable `filters` array.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
    #[error("Invalid shortcut '{shortcut}': {reason}")]
    InvalidShortcut { shortcut: String, reason: String },
    #[error("Unknown language '{0}'")]
    UnknownLanguage(String),
    #[error("Template JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Rule store read/write failure.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub(crate) type Result<T> = std::result::Result<T, FilterError>;
