mod filter_rule;
mod folder;
mod settings;

pub(crate) use filter_rule::{FilterRule, FilterRulePatch, NewFilterRule, Origin, DEFAULT_CATEGORY};
pub(crate) use folder::{CustomFolder, CustomFolderPatch, NewCustomFolder};
pub(crate) use settings::{AppSettings, AppSettingsPatch, Theme, DEFAULT_SHORTCUT};

#[cfg(test)]
mod tests;
