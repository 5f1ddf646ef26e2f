pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS filters (
    id              TEXT PRIMARY KEY,
    position        INTEGER NOT NULL,
    description_key TEXT,
    description     TEXT,
    pattern         TEXT NOT NULL,
    replacement     TEXT NOT NULL DEFAULT '',
    use_regex       BOOLEAN NOT NULL DEFAULT 0,
    enabled         BOOLEAN NOT NULL DEFAULT 1,
    category        TEXT NOT NULL DEFAULT 'Custom',
    subcategory     TEXT,
    folder          TEXT
);

CREATE INDEX IF NOT EXISTS idx_filters_position ON filters(position);
CREATE INDEX IF NOT EXISTS idx_filters_folder ON filters(folder);

CREATE TABLE IF NOT EXISTS custom_folders (
    id       TEXT PRIMARY KEY,
    position INTEGER NOT NULL,
    name     TEXT NOT NULL,
    icon     TEXT,
    expanded BOOLEAN NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS settings (
    id             INTEGER PRIMARY KEY CHECK (id = 1),
    language       TEXT NOT NULL DEFAULT 'en',
    auto_start     BOOLEAN NOT NULL DEFAULT 0,
    notifications  BOOLEAN NOT NULL DEFAULT 1,
    theme          TEXT NOT NULL DEFAULT 'auto',
    shortcut_paste TEXT NOT NULL DEFAULT 'CommandOrControl+Shift+V'
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
