mod defaults;
mod store;
mod template;

pub(crate) use defaults::default_filters;
pub(crate) use store::RuleStore;
pub(crate) use template::{
    template_file_name, ImportFailure, ImportReport, Template, TemplateMeta,
};

use std::path::Path;
use tracing::{debug, info};

use crate::error::{FilterError, Result};
use crate::filter::{validate_pattern, FilterEngine, FilterOutcome};
use crate::locale::Locale;
use crate::models::*;
use crate::trigger::Hotkey;

/// A set of rules that can be toggled together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Group {
    /// Every rule filed in the folder with this id.
    Folder(String),
    /// Every unfiled rule with this category.
    Category(String),
}

/// Owns the rule store and implements every rule, folder and settings
/// operation on top of it.
///
/// The store is the source of truth: each operation loads the collection,
/// changes it and writes the whole collection back. Nothing is cached, so a
/// failed write leaves no visible change.
pub(crate) struct FilterManager<S> {
    store: S,
    last_match_count: usize,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// A rule is unfiled when it has no folder or its folder no longer exists.
pub(crate) fn is_unfiled(rule: &FilterRule, folders: &[CustomFolder]) -> bool {
    match &rule.folder {
        None => true,
        Some(id) => !folders.iter().any(|f| &f.id == id),
    }
}

impl<S: RuleStore> FilterManager<S> {
    /// Wrap a store, seeding the bundled defaults when it has no rules.
    pub(crate) fn open(store: S) -> Result<Self> {
        let mut manager = Self {
            store,
            last_match_count: 0,
        };
        manager.seed_if_empty()?;
        Ok(manager)
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn seed_if_empty(&mut self) -> Result<usize> {
        if !self.store.load_filters()?.is_empty() {
            return Ok(0);
        }
        let seeded = seed_defaults()?;
        self.store.save_filters(&seeded)?;
        info!(count = seeded.len(), "seeded default filters");
        Ok(seeded.len())
    }

    // ── Rules ─────────────────────────────────────────────────

    pub(crate) fn filters(&self) -> Result<Vec<FilterRule>> {
        Ok(self.store.load_filters()?)
    }

    pub(crate) fn find_filter(&self, id: &str) -> Result<Option<FilterRule>> {
        Ok(self.filters()?.into_iter().find(|r| r.id == id))
    }

    pub(crate) fn add_filter(&mut self, new: NewFilterRule) -> Result<FilterRule> {
        validate_pattern(&new.pattern, new.use_regex)?;
        let mut filters = self.filters()?;
        let rule = FilterRule::from_new(new_id(), new);
        filters.push(rule.clone());
        self.store.save_filters(&filters)?;
        info!(id = %rule.id, category = %rule.category, "added filter");
        Ok(rule)
    }

    /// Merge `patch` into the rule with `id`. Unknown ids are ignored.
    pub(crate) fn update_filter(
        &mut self,
        id: &str,
        patch: &FilterRulePatch,
    ) -> Result<Option<FilterRule>> {
        let mut filters = self.filters()?;
        let Some(rule) = filters.iter_mut().find(|r| r.id == id) else {
            debug!(id, "update of unknown filter ignored");
            return Ok(None);
        };
        patch.apply_to(rule);
        if patch.pattern.is_some() || patch.use_regex.is_some() {
            validate_pattern(&rule.pattern, rule.use_regex)?;
        }
        let updated = rule.clone();
        self.store.save_filters(&filters)?;
        info!(id, "updated filter");
        Ok(Some(updated))
    }

    pub(crate) fn delete_filter(&mut self, id: &str) -> Result<bool> {
        let mut filters = self.filters()?;
        let before = filters.len();
        filters.retain(|r| r.id != id);
        if filters.len() == before {
            debug!(id, "delete of unknown filter ignored");
            return Ok(false);
        }
        self.store.save_filters(&filters)?;
        info!(id, "deleted filter");
        Ok(true)
    }

    /// File a rule under a folder, or unfile it with `None`.
    pub(crate) fn move_filter_to_folder(
        &mut self,
        id: &str,
        folder_id: Option<&str>,
    ) -> Result<Option<FilterRule>> {
        self.update_filter(id, &FilterRulePatch::folder(folder_id.map(str::to_string)))
    }

    /// Clone a rule into a folder under a fresh id. The original stays where
    /// it is. Unknown rule or folder ids give `None`.
    pub(crate) fn copy_filter_to_folder(
        &mut self,
        id: &str,
        folder_id: &str,
    ) -> Result<Option<FilterRule>> {
        if self.find_folder(folder_id)?.is_none() {
            return Ok(None);
        }
        let mut filters = self.filters()?;
        let Some(source) = filters.iter().find(|r| r.id == id) else {
            return Ok(None);
        };
        let copy = FilterRule::from_new(new_id(), source.to_new().in_folder(folder_id));
        filters.push(copy.clone());
        self.store.save_filters(&filters)?;
        info!(source = id, copy = %copy.id, folder = folder_id, "copied filter to folder");
        Ok(Some(copy))
    }

    // ── Folders ───────────────────────────────────────────────

    pub(crate) fn custom_folders(&self) -> Result<Vec<CustomFolder>> {
        Ok(self.store.load_folders()?)
    }

    pub(crate) fn find_folder(&self, id: &str) -> Result<Option<CustomFolder>> {
        Ok(self.custom_folders()?.into_iter().find(|f| f.id == id))
    }

    pub(crate) fn add_custom_folder(&mut self, new: NewCustomFolder) -> Result<CustomFolder> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(FilterError::EmptyFolderName);
        }
        let mut folders = self.custom_folders()?;
        let folder = CustomFolder {
            id: new_id(),
            name: name.to_string(),
            icon: new.icon.filter(|i| !i.is_empty()),
            expanded: true,
        };
        folders.push(folder.clone());
        self.store.save_folders(&folders)?;
        info!(id = %folder.id, name = %folder.name, "added folder");
        Ok(folder)
    }

    pub(crate) fn update_custom_folder(
        &mut self,
        id: &str,
        patch: &CustomFolderPatch,
    ) -> Result<Option<CustomFolder>> {
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(FilterError::EmptyFolderName);
        }
        let mut folders = self.custom_folders()?;
        let Some(folder) = folders.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };
        patch.apply_to(folder);
        let updated = folder.clone();
        self.store.save_folders(&folders)?;
        info!(id, "updated folder");
        Ok(Some(updated))
    }

    /// Delete a folder together with every rule filed in it, in one store
    /// write. Returns the number of rules removed.
    pub(crate) fn delete_custom_folder(&mut self, id: &str) -> Result<usize> {
        let mut filters = self.filters()?;
        let mut folders = self.custom_folders()?;
        let rules_before = filters.len();
        let folders_before = folders.len();

        filters.retain(|r| r.folder.as_deref() != Some(id));
        folders.retain(|f| f.id != id);

        let removed = rules_before - filters.len();
        if removed == 0 && folders.len() == folders_before {
            debug!(id, "delete of unknown folder ignored");
            return Ok(0);
        }
        self.store.save_all(&filters, &folders)?;
        info!(id, rules = removed, "deleted folder");
        Ok(removed)
    }

    // ── Queries ───────────────────────────────────────────────

    pub(crate) fn filters_by_folder(&self, folder_id: &str) -> Result<Vec<FilterRule>> {
        Ok(self
            .filters()?
            .into_iter()
            .filter(|r| r.folder.as_deref() == Some(folder_id))
            .collect())
    }

    /// Unfiled rules of a category.
    pub(crate) fn filters_by_category(&self, category: &str) -> Result<Vec<FilterRule>> {
        let folders = self.custom_folders()?;
        Ok(self
            .filters()?
            .into_iter()
            .filter(|r| r.category == category && is_unfiled(r, &folders))
            .collect())
    }

    /// Sorted, distinct categories of the unfiled rules.
    pub(crate) fn categories(&self) -> Result<Vec<String>> {
        let folders = self.custom_folders()?;
        let mut categories: Vec<String> = self
            .filters()?
            .into_iter()
            .filter(|r| is_unfiled(r, &folders))
            .map(|r| r.category)
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    pub(crate) fn group_filters(&self, group: &Group) -> Result<Vec<FilterRule>> {
        match group {
            Group::Folder(id) => self.filters_by_folder(id),
            Group::Category(category) => self.filters_by_category(category),
        }
    }

    // ── Bulk operations ───────────────────────────────────────

    /// Delete every unfiled rule of a category. Refused when any of them is a
    /// built-in.
    pub(crate) fn delete_category(&mut self, category: &str) -> Result<usize> {
        let folders = self.custom_folders()?;
        let mut filters = self.filters()?;
        let in_category = |r: &FilterRule| r.category == category && is_unfiled(r, &folders);

        if filters.iter().any(|r| in_category(r) && r.is_builtin()) {
            return Err(FilterError::ProtectedCategory {
                category: category.to_string(),
            });
        }

        let before = filters.len();
        filters.retain(|r| !in_category(r));
        let removed = before - filters.len();
        if removed > 0 {
            self.store.save_filters(&filters)?;
            info!(category, removed, "deleted category");
        }
        Ok(removed)
    }

    /// Enable or disable every rule of a group. Returns how many changed.
    pub(crate) fn set_group_enabled(&mut self, group: &Group, enabled: bool) -> Result<usize> {
        let ids: Vec<String> = self.group_filters(group)?.into_iter().map(|r| r.id).collect();
        let mut filters = self.filters()?;
        let mut changed = 0;
        for rule in filters.iter_mut().filter(|r| ids.contains(&r.id)) {
            if rule.enabled != enabled {
                rule.enabled = enabled;
                changed += 1;
            }
        }
        if changed > 0 {
            self.store.save_filters(&filters)?;
            info!(?group, enabled, changed, "toggled group");
        }
        Ok(changed)
    }

    /// Disable the group if every rule in it is enabled, enable it otherwise.
    /// Returns the new state, or `None` for an empty group.
    pub(crate) fn toggle_group(&mut self, group: &Group) -> Result<Option<bool>> {
        let members = self.group_filters(group)?;
        if members.is_empty() {
            return Ok(None);
        }
        let enable = !members.iter().all(|r| r.enabled);
        self.set_group_enabled(group, enable)?;
        Ok(Some(enable))
    }

    /// Replace the whole rule collection with a fresh copy of the bundled
    /// defaults. Custom rules are lost; folders are kept.
    pub(crate) fn reset_to_defaults(&mut self) -> Result<usize> {
        let seeded = seed_defaults()?;
        self.store.save_filters(&seeded)?;
        info!(count = seeded.len(), "reset filters to defaults");
        Ok(seeded.len())
    }

    /// Turn built-in rules back on without touching anything else, optionally
    /// limited to one category. Returns how many were re-enabled.
    pub(crate) fn reenable_builtins(&mut self, category: Option<&str>) -> Result<usize> {
        let folders = self.custom_folders()?;
        let mut filters = self.filters()?;
        let mut changed = 0;
        for rule in filters.iter_mut() {
            let in_scope = match category {
                None => true,
                Some(c) => rule.category == c && is_unfiled(rule, &folders),
            };
            if in_scope && rule.is_builtin() && !rule.enabled {
                rule.enabled = true;
                changed += 1;
            }
        }
        if changed > 0 {
            self.store.save_filters(&filters)?;
            info!(category = category.unwrap_or("*"), changed, "re-enabled built-in filters");
        }
        Ok(changed)
    }

    /// Delete every custom rule and every folder (with the rules filed in
    /// them). Returns `(rules, folders)` removed.
    pub(crate) fn delete_all_custom(&mut self) -> Result<(usize, usize)> {
        let mut filters = self.filters()?;
        if filters.iter().all(|r| r.is_builtin()) {
            return Err(FilterError::NothingToDelete);
        }
        let folders = self.custom_folders()?;

        let before = filters.len();
        filters.retain(|r| r.is_builtin() && is_unfiled(r, &folders));
        let removed = before - filters.len();

        self.store.save_all(&filters, &[])?;
        info!(rules = removed, folders = folders.len(), "deleted all custom filters");
        Ok((removed, folders.len()))
    }

    // ── Filtering ─────────────────────────────────────────────

    pub(crate) fn engine(&self) -> Result<FilterEngine> {
        Ok(FilterEngine::new(&self.filters()?))
    }

    pub(crate) fn apply_filters(&mut self, text: &str) -> Result<FilterOutcome> {
        let engine = self.engine()?;
        let outcome = engine.apply(text);
        self.last_match_count = outcome.matches;
        debug!(
            rules = engine.active_count(),
            matches = outcome.matches,
            skipped = outcome.skipped.len(),
            "applied filters"
        );
        Ok(outcome)
    }

    /// Matches replaced by the most recent `apply_filters` call.
    pub(crate) fn last_match_count(&self) -> usize {
        self.last_match_count
    }

    // ── Settings ──────────────────────────────────────────────

    pub(crate) fn settings(&self) -> Result<AppSettings> {
        Ok(self.store.load_settings()?)
    }

    pub(crate) fn update_settings(&mut self, patch: &AppSettingsPatch) -> Result<AppSettings> {
        if let Some(language) = &patch.language {
            if !Locale::is_available(language) {
                return Err(FilterError::UnknownLanguage(language.clone()));
            }
        }
        if let Some(shortcut) = &patch.shortcut_paste {
            Hotkey::parse(shortcut)?;
        }
        let mut settings = self.settings()?;
        patch.apply_to(&mut settings);
        self.store.save_settings(&settings)?;
        info!(?patch, "updated settings");
        Ok(settings)
    }

    // ── Templates ─────────────────────────────────────────────

    /// Package the custom rules as a template. Built-ins are never exported.
    pub(crate) fn export_template(&self, meta: TemplateMeta) -> Result<Template> {
        let custom: Vec<FilterRule> = self
            .filters()?
            .into_iter()
            .filter(|r| !r.is_builtin())
            .collect();
        if custom.is_empty() {
            return Err(FilterError::NothingToExport);
        }
        Ok(Template::from_rules(meta, &custom))
    }

    pub(crate) fn write_template(&self, meta: TemplateMeta, path: &Path) -> Result<Template> {
        let template = self.export_template(meta)?;
        template.write(path)?;
        info!(path = %path.display(), count = template.filters.len(), "exported template");
        Ok(template)
    }

    /// Add every valid entry of a template as a new rule. Invalid entries are
    /// reported and skipped; the valid ones are stored in one write.
    pub(crate) fn import_template(&mut self, template: &Template) -> Result<ImportReport> {
        let mut filters = self.filters()?;
        let mut report = ImportReport::default();

        for (index, entry) in template.filters.iter().enumerate() {
            let new = match entry.clone().into_filter() {
                Ok(filter) => filter.into_new(),
                Err(e) => {
                    report.failures.push(ImportFailure {
                        index,
                        pattern: entry.pattern_text(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if let Err(e) = validate_pattern(&new.pattern, new.use_regex) {
                report.failures.push(ImportFailure {
                    index,
                    pattern: new.pattern,
                    reason: e.to_string(),
                });
                continue;
            }
            filters.push(FilterRule::from_new(new_id(), new));
            report.imported += 1;
        }

        if report.imported > 0 {
            self.store.save_filters(&filters)?;
        }
        info!(
            template = template.display_name(),
            imported = report.imported,
            failed = report.failures.len(),
            "imported template"
        );
        Ok(report)
    }
}

fn seed_defaults() -> Result<Vec<FilterRule>> {
    Ok(default_filters()?
        .into_iter()
        .map(|rule| FilterRule::from_new(new_id(), rule))
        .collect())
}

#[cfg(test)]
mod tests;
