mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

use crate::manager::RuleStore;
use crate::models::*;

/// SQLite-backed rule store. Every write replaces a whole collection inside
/// one transaction.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })?)
    }

    // ── Filters ───────────────────────────────────────────────

    pub(crate) fn get_filters(&self) -> Result<Vec<FilterRule>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description_key, description, pattern, replacement, use_regex, enabled, category, subcategory, folder
             FROM filters ORDER BY position",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(FilterRule {
                id: row.get(0)?,
                origin: Origin::from_columns(row.get(1)?, row.get(2)?),
                pattern: row.get(3)?,
                replacement: row.get(4)?,
                use_regex: row.get(5)?,
                enabled: row.get(6)?,
                category: row.get(7)?,
                subcategory: row.get(8)?,
                folder: row.get(9)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn replace_filters(&mut self, filters: &[FilterRule]) -> Result<()> {
        let tx = self.conn.transaction()?;
        write_filters(&tx, filters)?;
        tx.commit().context("Failed to save filters")?;
        Ok(())
    }

    // ── Custom folders ────────────────────────────────────────

    pub(crate) fn get_folders(&self) -> Result<Vec<CustomFolder>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, icon, expanded FROM custom_folders ORDER BY position")?;
        let rows = stmt.query_map([], |row| {
            Ok(CustomFolder {
                id: row.get(0)?,
                name: row.get(1)?,
                icon: row.get(2)?,
                expanded: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn replace_folders(&mut self, folders: &[CustomFolder]) -> Result<()> {
        let tx = self.conn.transaction()?;
        write_folders(&tx, folders)?;
        tx.commit().context("Failed to save folders")?;
        Ok(())
    }

    /// Filters and folders in one transaction, so a folder cascade is never
    /// half-applied.
    pub(crate) fn replace_filters_and_folders(
        &mut self,
        filters: &[FilterRule],
        folders: &[CustomFolder],
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        write_filters(&tx, filters)?;
        write_folders(&tx, folders)?;
        tx.commit().context("Failed to save filters and folders")?;
        Ok(())
    }

    // ── Settings ──────────────────────────────────────────────

    pub(crate) fn get_settings(&self) -> Result<AppSettings> {
        let row = self
            .conn
            .query_row(
                "SELECT language, auto_start, notifications, theme, shortcut_paste FROM settings WHERE id = 1",
                [],
                |row| {
                    Ok(AppSettings {
                        language: row.get(0)?,
                        auto_start: row.get(1)?,
                        notifications: row.get(2)?,
                        theme: Theme::parse(&row.get::<_, String>(3)?).unwrap_or(Theme::Auto),
                        shortcut_paste: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(row.unwrap_or_default())
    }

    pub(crate) fn set_settings(&mut self, settings: &AppSettings) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO settings (id, language, auto_start, notifications, theme, shortcut_paste)
                 VALUES (1, ?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                    language = excluded.language,
                    auto_start = excluded.auto_start,
                    notifications = excluded.notifications,
                    theme = excluded.theme,
                    shortcut_paste = excluded.shortcut_paste",
                params![
                    settings.language,
                    settings.auto_start,
                    settings.notifications,
                    settings.theme.as_str(),
                    settings.shortcut_paste,
                ],
            )
            .context("Failed to save settings")?;
        Ok(())
    }
}

fn write_filters(conn: &Connection, filters: &[FilterRule]) -> Result<()> {
    conn.execute("DELETE FROM filters", [])?;
    let mut stmt = conn.prepare(
        "INSERT INTO filters (id, position, description_key, description, pattern, replacement, use_regex, enabled, category, subcategory, folder)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    for (position, rule) in filters.iter().enumerate() {
        stmt.execute(params![
            rule.id,
            position as i64,
            rule.origin.description_key(),
            rule.origin.description(),
            rule.pattern,
            rule.replacement,
            rule.use_regex,
            rule.enabled,
            rule.category,
            rule.subcategory,
            rule.folder,
        ])
        .with_context(|| format!("Failed to write filter {}", rule.id))?;
    }
    Ok(())
}

fn write_folders(conn: &Connection, folders: &[CustomFolder]) -> Result<()> {
    conn.execute("DELETE FROM custom_folders", [])?;
    let mut stmt = conn.prepare(
        "INSERT INTO custom_folders (id, position, name, icon, expanded) VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (position, folder) in folders.iter().enumerate() {
        stmt.execute(params![
            folder.id,
            position as i64,
            folder.name,
            folder.icon,
            folder.expanded,
        ])
        .with_context(|| format!("Failed to write folder {}", folder.id))?;
    }
    Ok(())
}

impl RuleStore for Database {
    fn load_filters(&self) -> Result<Vec<FilterRule>> {
        self.get_filters()
    }

    fn save_filters(&mut self, filters: &[FilterRule]) -> Result<()> {
        self.replace_filters(filters)
    }

    fn load_folders(&self) -> Result<Vec<CustomFolder>> {
        self.get_folders()
    }

    fn save_folders(&mut self, folders: &[CustomFolder]) -> Result<()> {
        self.replace_folders(folders)
    }

    fn load_settings(&self) -> Result<AppSettings> {
        self.get_settings()
    }

    fn save_settings(&mut self, settings: &AppSettings) -> Result<()> {
        self.set_settings(settings)
    }

    fn save_all(&mut self, filters: &[FilterRule], folders: &[CustomFolder]) -> Result<()> {
        self.replace_filters_and_folders(filters, folders)
    }
}
