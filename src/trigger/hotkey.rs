use std::fmt;

use crate::error::{FilterError, Result};

/// Modifier keys accepted in a shortcut accelerator.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub(crate) enum Modifier {
    /// Cmd on macOS, Ctrl elsewhere.
    CommandOrControl,
    Ctrl,
    Alt,
    Shift,
    /// Cmd/Super/Windows key.
    Super,
}

impl Modifier {
    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "commandorcontrol" | "cmdorctrl" => Some(Self::CommandOrControl),
            "control" | "ctrl" => Some(Self::Ctrl),
            "alt" | "option" | "altgr" => Some(Self::Alt),
            "shift" => Some(Self::Shift),
            "super" | "meta" | "command" | "cmd" => Some(Self::Super),
            _ => None,
        }
    }

    /// Name used when showing the shortcut on the current platform.
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::CommandOrControl if cfg!(target_os = "macos") => "Cmd",
            Self::CommandOrControl | Self::Ctrl => "Ctrl",
            Self::Alt => "Alt",
            Self::Shift => "Shift",
            Self::Super if cfg!(target_os = "macos") => "Cmd",
            Self::Super => "Super",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CommandOrControl => "CommandOrControl",
            Self::Ctrl => "Control",
            Self::Alt => "Alt",
            Self::Shift => "Shift",
            Self::Super => "Super",
        };
        f.write_str(name)
    }
}

const NAMED_KEYS: &[&str] = &[
    "Space", "Tab", "Enter", "Return", "Escape", "Esc", "Backspace", "Delete", "Insert", "Home",
    "End", "PageUp", "PageDown", "Up", "Down", "Left", "Right", "Plus",
];

/// A parsed `shortcutPaste` accelerator such as `CommandOrControl+Shift+V`.
///
/// Modifiers are sorted and deduplicated so that `Shift+Ctrl+V` and
/// `Ctrl+Shift+V` compare equal. The key is stored in its canonical case.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Hotkey {
    pub(crate) modifiers: Vec<Modifier>,
    pub(crate) key: String,
}

impl Hotkey {
    pub(crate) fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| FilterError::InvalidShortcut {
            shortcut: input.to_string(),
            reason: reason.to_string(),
        };

        let tokens: Vec<&str> = input.split('+').map(str::trim).collect();
        if tokens.iter().any(|t| t.is_empty()) {
            return Err(invalid("empty key segment"));
        }

        let mut modifiers = Vec::new();
        let mut key = None;
        for token in tokens {
            if let Some(modifier) = Modifier::parse(token) {
                if key.is_some() {
                    return Err(invalid("modifiers must come before the key"));
                }
                modifiers.push(modifier);
            } else if key.is_some() {
                return Err(invalid("more than one non-modifier key"));
            } else {
                key = Some(canonical_key(token).ok_or_else(|| invalid("unknown key"))?);
            }
        }

        let key = key.ok_or_else(|| invalid("missing key"))?;
        if modifiers.is_empty() {
            return Err(invalid("a global shortcut needs at least one modifier"));
        }
        modifiers.sort();
        modifiers.dedup();
        Ok(Self { modifiers, key })
    }

    /// Human-readable form for the current platform, e.g. `Ctrl+Shift+V`.
    pub(crate) fn label(&self) -> String {
        let mut parts: Vec<&str> = self.modifiers.iter().map(Modifier::label).collect();
        parts.dedup();
        parts.push(&self.key);
        parts.join("+")
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{modifier}+")?;
        }
        f.write_str(&self.key)
    }
}

fn canonical_key(token: &str) -> Option<String> {
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return (c.is_ascii_alphanumeric() || c.is_ascii_punctuation())
            .then(|| c.to_ascii_uppercase().to_string());
    }

    if let Some(n) = token
        .strip_prefix(['F', 'f'])
        .and_then(|n| n.parse::<u8>().ok())
    {
        return (1..=24).contains(&n).then(|| format!("F{n}"));
    }

    NAMED_KEYS
        .iter()
        .find(|name| name.eq_ignore_ascii_case(token))
        .map(|name| name.to_string())
}

#[cfg(test)]
#[path = "hotkey_tests.rs"]
mod tests;
