use serde_json::Value;
use tracing::warn;

/// Locale tables compiled into the binary, keyed by language code.
const BUNDLED: &[(&str, &str)] = &[
    ("en", include_str!("../../assets/locales/en.json")),
    ("fr", include_str!("../../assets/locales/fr.json")),
];

pub(crate) const FALLBACK_LOCALE: &str = "en";

/// Translation lookup over a nested JSON table.
///
/// Keys are dotted paths (`notifications.itemsFiltered`); `{name}`
/// placeholders are replaced from `params`. Anything unresolved comes back
/// as the key itself.
#[derive(Debug, Clone)]
pub(crate) struct Locale {
    code: String,
    table: Value,
}

impl Locale {
    /// Load a bundled locale, falling back to English for unknown codes.
    pub(crate) fn load(code: &str) -> Self {
        if let Some(locale) = Self::parse_bundled(code) {
            return locale;
        }
        if code != FALLBACK_LOCALE {
            warn!(locale = code, "unknown locale, falling back to {FALLBACK_LOCALE}");
        }
        Self::parse_bundled(FALLBACK_LOCALE).unwrap_or_else(|| Self {
            code: FALLBACK_LOCALE.into(),
            table: Value::Null,
        })
    }

    fn parse_bundled(code: &str) -> Option<Self> {
        let (_, raw) = BUNDLED.iter().find(|(c, _)| *c == code)?;
        match serde_json::from_str(raw) {
            Ok(table) => Some(Self {
                code: code.to_string(),
                table,
            }),
            Err(e) => {
                warn!(locale = code, error = %e, "bundled locale is not valid JSON");
                None
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn from_json(code: &str, raw: &str) -> serde_json::Result<Self> {
        Ok(Self {
            code: code.to_string(),
            table: serde_json::from_str(raw)?,
        })
    }

    pub(crate) fn code(&self) -> &str {
        &self.code
    }

    pub(crate) fn available() -> Vec<&'static str> {
        BUNDLED.iter().map(|(code, _)| *code).collect()
    }

    pub(crate) fn is_available(code: &str) -> bool {
        BUNDLED.iter().any(|(c, _)| *c == code)
    }

    pub(crate) fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        let mut value = &self.table;
        for part in key.split('.') {
            match value.get(part) {
                Some(next) => value = next,
                None => return key.to_string(),
            }
        }
        let Some(text) = value.as_str() else {
            return key.to_string();
        };

        let mut out = text.to_string();
        for (name, replacement) in params {
            out = out.replace(&format!("{{{name}}}"), replacement);
        }
        out
    }

    /// Translated category name, or the raw name when the table has none.
    pub(crate) fn category(&self, category: &str) -> String {
        let key = format!("categories.{category}");
        let translated = self.translate(&key, &[]);
        if translated == key {
            category.to_string()
        } else {
            translated
        }
    }
}
