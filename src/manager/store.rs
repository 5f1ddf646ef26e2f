use anyhow::Result;

use crate::models::{AppSettings, CustomFolder, FilterRule};

/// Whole-collection persistence for rules, folders and settings.
///
/// Loads return the stored snapshot; saves replace it. A save that fails must
/// leave the previous snapshot readable.
pub(crate) trait RuleStore {
    fn load_filters(&self) -> Result<Vec<FilterRule>>;
    fn save_filters(&mut self, filters: &[FilterRule]) -> Result<()>;

    fn load_folders(&self) -> Result<Vec<CustomFolder>>;
    fn save_folders(&mut self, folders: &[CustomFolder]) -> Result<()>;

    fn load_settings(&self) -> Result<AppSettings>;
    fn save_settings(&mut self, settings: &AppSettings) -> Result<()>;

    /// Replace rules and folders together. Stores that can should do this
    /// atomically.
    fn save_all(&mut self, filters: &[FilterRule], folders: &[CustomFolder]) -> Result<()> {
        self.save_filters(filters)?;
        self.save_folders(folders)
    }
}
