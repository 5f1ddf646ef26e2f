mod db;
mod error;
mod filter;
mod locale;
mod manager;
mod models;
mod run;
mod trigger;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::db::Database;
use crate::manager::FilterManager;

fn main() -> Result<()> {
    let cli = run::Cli::parse();
    let data_dir = get_data_dir()?;
    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| data_dir.join("clipfilter.db"));

    match cli.command {
        Some(command) => {
            run::init_logging(cli.verbose);
            let mut manager = open_manager(&db_path)?;
            run::as_cli(command, cli.json, &mut manager)
        }
        None => {
            run::init_file_logging(&data_dir.join("clipfilter.log"), cli.verbose)?;
            let mut manager = open_manager(&db_path)?;
            run::as_tui(&mut manager)
        }
    }
}

fn open_manager(db_path: &Path) -> Result<FilterManager<Database>> {
    let db = Database::open(db_path)?;
    FilterManager::open(db).context("Failed to load filters")
}

fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "clipfilter", "ClipFilter")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}
