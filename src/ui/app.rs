use anyhow::Result;
use std::collections::HashSet;

use crate::filter::{self, FilterOutcome};
use crate::locale::Locale;
use crate::manager::{is_unfiled, FilterManager, Group, RuleStore};
use crate::models::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Filters,
    Tester,
    Settings,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Filters, Self::Tester, Self::Settings]
    }

    pub(crate) fn title(&self, locale: &Locale) -> String {
        match self {
            Self::Filters => locale.translate("config.filtersTab", &[]),
            Self::Tester => locale.translate("config.testTab", &[]),
            Self::Settings => locale.translate("config.settingsTab", &[]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// What the edit line is bound to while in `InputMode::Editing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditTarget {
    TestInput,
    Shortcut,
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteFilter { id: String, name: String },
    DeleteFolder { id: String, name: String },
    DeleteCategory { category: String },
    ResetDefaults,
    DeleteAllCustom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SettingsField {
    Language,
    Theme,
    Notifications,
    AutoStart,
    Shortcut,
}

impl SettingsField {
    pub(crate) fn all() -> &'static [SettingsField] {
        &[
            Self::Language,
            Self::Theme,
            Self::Notifications,
            Self::AutoStart,
            Self::Shortcut,
        ]
    }

    pub(crate) fn label(&self, locale: &Locale) -> String {
        let key = match self {
            Self::Language => "settings.language",
            Self::Theme => "settings.theme",
            Self::Notifications => "settings.notifications",
            Self::AutoStart => "settings.autoStart",
            Self::Shortcut => "settings.pasteShortcut",
        };
        locale.translate(key, &[])
    }

    pub(crate) fn value(&self, settings: &AppSettings) -> String {
        let on_off = |b: bool| if b { "on" } else { "off" }.to_string();
        match self {
            Self::Language => settings.language.clone(),
            Self::Theme => settings.theme.to_string(),
            Self::Notifications => on_off(settings.notifications),
            Self::AutoStart => on_off(settings.auto_start),
            Self::Shortcut => settings.shortcut_paste.clone(),
        }
    }
}

/// One line of the filters tree: a group header or a rule under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ListRow {
    Folder {
        folder: CustomFolder,
        enabled: usize,
        total: usize,
    },
    Category {
        name: String,
        enabled: usize,
        total: usize,
        collapsed: bool,
    },
    Rule(FilterRule),
}

impl ListRow {
    pub(crate) fn group(&self) -> Option<Group> {
        match self {
            Self::Folder { folder, .. } => Some(Group::Folder(folder.id.clone())),
            Self::Category { name, .. } => Some(Group::Category(name.clone())),
            Self::Rule(_) => None,
        }
    }
}

/// Lay rules out as folders (in stored order) followed by the categories of
/// unfiled rules (sorted). A non-empty `search` keeps only matching rules,
/// drops empty groups and shows every group expanded.
pub(crate) fn build_rows(
    filters: &[FilterRule],
    folders: &[CustomFolder],
    collapsed: &HashSet<String>,
    search: &str,
    locale: &Locale,
) -> Vec<ListRow> {
    let needle = search.trim().to_lowercase();
    let searching = !needle.is_empty();
    let matches = |r: &FilterRule| {
        !searching
            || r.display_name(locale).to_lowercase().contains(&needle)
            || r.pattern.to_lowercase().contains(&needle)
            || r.category.to_lowercase().contains(&needle)
    };
    let enabled = |rules: &[&FilterRule]| rules.iter().filter(|r| r.enabled).count();

    let mut rows = Vec::new();
    for folder in folders {
        let members: Vec<&FilterRule> = filters
            .iter()
            .filter(|r| r.folder.as_deref() == Some(folder.id.as_str()))
            .collect();
        let shown: Vec<&FilterRule> = members.iter().copied().filter(|r| matches(r)).collect();
        if searching && shown.is_empty() {
            continue;
        }
        rows.push(ListRow::Folder {
            folder: folder.clone(),
            enabled: enabled(&members),
            total: members.len(),
        });
        if folder.expanded || searching {
            rows.extend(shown.into_iter().cloned().map(ListRow::Rule));
        }
    }

    let unfiled: Vec<&FilterRule> = filters.iter().filter(|r| is_unfiled(r, folders)).collect();
    let mut categories: Vec<&str> = unfiled.iter().map(|r| r.category.as_str()).collect();
    categories.sort_unstable();
    categories.dedup();

    for category in categories {
        let members: Vec<&FilterRule> = unfiled
            .iter()
            .copied()
            .filter(|r| r.category == category)
            .collect();
        let shown: Vec<&FilterRule> = members.iter().copied().filter(|r| matches(r)).collect();
        if searching && shown.is_empty() {
            continue;
        }
        let is_collapsed = !searching && collapsed.contains(category);
        rows.push(ListRow::Category {
            name: category.to_string(),
            enabled: enabled(&members),
            total: members.len(),
            collapsed: is_collapsed,
        });
        if !is_collapsed {
            rows.extend(shown.into_iter().cloned().map(ListRow::Rule));
        }
    }
    rows
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) locale: Locale,

    // Filters
    pub(crate) filters: Vec<FilterRule>,
    pub(crate) folders: Vec<CustomFolder>,
    pub(crate) rows: Vec<ListRow>,
    pub(crate) row_index: usize,
    pub(crate) row_scroll: usize,
    pub(crate) collapsed_categories: HashSet<String>,

    // Tester
    pub(crate) test_input: String,
    pub(crate) test_outcome: Option<FilterOutcome>,

    // Settings
    pub(crate) settings: AppSettings,
    pub(crate) settings_index: usize,

    // Editing
    pub(crate) edit_target: EditTarget,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Filters,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,
            locale: Locale::load(crate::locale::FALLBACK_LOCALE),

            filters: Vec::new(),
            folders: Vec::new(),
            rows: Vec::new(),
            row_index: 0,
            row_scroll: 0,
            collapsed_categories: HashSet::new(),

            test_input: String::new(),
            test_outcome: None,

            settings: AppSettings::default(),
            settings_index: 0,

            edit_target: EditTarget::TestInput,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Reload everything from the store and rebuild the derived views.
    pub(crate) fn refresh<S: RuleStore>(&mut self, manager: &FilterManager<S>) -> Result<()> {
        self.settings = manager.settings()?;
        if self.locale.code() != self.settings.language {
            self.locale = Locale::load(&self.settings.language);
        }
        self.filters = manager.filters()?;
        self.folders = manager.custom_folders()?;
        self.rebuild_rows();
        self.run_test();
        Ok(())
    }

    pub(crate) fn rebuild_rows(&mut self) {
        self.rows = build_rows(
            &self.filters,
            &self.folders,
            &self.collapsed_categories,
            &self.search_input,
            &self.locale,
        );
        if self.row_index >= self.rows.len() {
            self.row_index = self.rows.len().saturating_sub(1);
        }
        if self.row_scroll > self.row_index {
            self.row_scroll = self.row_index;
        }
    }

    /// Re-run the tester over the current input with the loaded rules.
    pub(crate) fn run_test(&mut self) {
        self.test_outcome = if self.test_input.is_empty() {
            None
        } else {
            Some(filter::apply_filters(&self.filters, &self.test_input))
        };
    }

    pub(crate) fn selected_row(&self) -> Option<&ListRow> {
        self.rows.get(self.row_index)
    }

    pub(crate) fn selected_rule(&self) -> Option<&FilterRule> {
        match self.selected_row()? {
            ListRow::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    pub(crate) fn selected_folder(&self) -> Option<&CustomFolder> {
        match self.selected_row()? {
            ListRow::Folder { folder, .. } => Some(folder),
            _ => None,
        }
    }

    /// The group of the selected header, or of the header above the selected
    /// rule.
    pub(crate) fn selected_group(&self) -> Option<Group> {
        self.rows
            .get(..=self.row_index)?
            .iter()
            .rev()
            .find_map(ListRow::group)
    }

    pub(crate) fn selected_setting(&self) -> SettingsField {
        SettingsField::all()
            .get(self.settings_index)
            .copied()
            .unwrap_or(SettingsField::Language)
    }

    pub(crate) fn folder_name(&self, id: &str) -> Option<&str> {
        self.folders
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.name.as_str())
    }

    pub(crate) fn confirm(&mut self, action: PendingAction, message: String) {
        self.pending_action = Some(action);
        self.confirm_message = message;
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
