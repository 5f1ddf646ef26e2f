use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;

use crate::locale::Locale;
use crate::manager::{template_file_name, FilterManager, Group, RuleStore, Template, TemplateMeta};
use crate::models::*;
use crate::trigger::{self, CommandInjector, DesktopNotifier, PasteOutcome, PasteTarget, SystemClipboard};
use crate::ui::util::{parse_on_off, truncate};

#[derive(Parser)]
#[command(name = "clipfilter")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Rule database to use instead of the one in the data directory
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) db: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub(crate) json: bool,

    /// Without a command the interactive rule manager starts
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List filters in application order
    List {
        /// Only rules filed in this folder (id or name)
        #[arg(long, conflicts_with = "category")]
        folder: Option<String>,
        /// Only unfiled rules of this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Add a filter
    Add(AddArgs),
    /// Change fields of a filter
    Update(UpdateArgs),
    /// Delete a filter
    Delete { id: String },
    /// Enable or disable every rule of a folder or category
    Toggle {
        #[arg(long, conflicts_with = "category", required_unless_present = "category")]
        folder: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// List custom folders
    Folders,
    /// Create a folder
    FolderAdd {
        name: String,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Rename a folder or change its icon
    FolderUpdate {
        /// Folder id or name
        folder: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a folder and every rule filed in it
    FolderDelete { folder: String },
    /// File a rule under a folder; without a folder the rule is unfiled
    Move { id: String, folder: Option<String> },
    /// Copy a rule into a folder
    Copy { id: String, folder: String },
    /// Filter text from the argument or stdin and print the result
    Apply { text: Option<String> },
    /// Filter the clipboard and paste it into the focused window
    Paste,
    /// Show settings
    Settings,
    /// Change a setting
    Set { key: SettingKey, value: String },
    /// Replace all filters with the bundled defaults
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Re-enable built-in filters, optionally in one category
    Reenable { category: Option<String> },
    /// List categories of unfiled rules
    Categories,
    /// Delete every unfiled rule of a category
    DeleteCategory { category: String },
    /// Delete all custom filters and folders
    DeleteCustom {
        #[arg(long)]
        yes: bool,
    },
    /// Import filters from a template file
    Import { path: PathBuf },
    /// Export custom filters as a template file
    Export(ExportArgs),
}

#[derive(Args)]
pub(crate) struct AddArgs {
    pattern: String,
    #[arg(default_value = "")]
    replacement: String,
    /// Treat the pattern as a regular expression
    #[arg(short, long)]
    regex: bool,
    #[arg(short, long, default_value = DEFAULT_CATEGORY)]
    category: String,
    #[arg(short, long)]
    description: Option<String>,
    /// Folder id or name
    #[arg(short, long)]
    folder: Option<String>,
    #[arg(long)]
    disabled: bool,
}

#[derive(Args)]
pub(crate) struct UpdateArgs {
    id: String,
    #[arg(long)]
    pattern: Option<String>,
    #[arg(long)]
    replacement: Option<String>,
    #[arg(long)]
    regex: Option<bool>,
    #[arg(long)]
    enabled: Option<bool>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args)]
pub(crate) struct ExportArgs {
    /// Output file (default: derived from the template name)
    path: Option<PathBuf>,
    #[arg(short, long, default_value = "My Template")]
    name: String,
    #[arg(short, long)]
    description: Option<String>,
    #[arg(short, long)]
    author: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum SettingKey {
    Language,
    Theme,
    Notifications,
    AutoStart,
    Shortcut,
}

pub(crate) fn as_cli<S: RuleStore>(
    command: Commands,
    json: bool,
    manager: &mut FilterManager<S>,
) -> Result<()> {
    let locale = Locale::load(&manager.settings()?.language);
    let out = Output { json };

    match command {
        Commands::List { folder, category } => cli_list(manager, &locale, out, folder, category),
        Commands::Add(args) => cli_add(manager, out, args),
        Commands::Update(args) => cli_update(manager, out, args),
        Commands::Delete { id } => {
            let rule = resolve_filter(manager, &id)?;
            manager.delete_filter(&rule.id)?;
            println!("Deleted filter {}", rule.display_name(&locale));
            Ok(())
        }
        Commands::Toggle { folder, category } => {
            let group = match (folder, category) {
                (Some(folder), _) => Group::Folder(resolve_folder(manager, &folder)?.id),
                (None, Some(category)) => Group::Category(category),
                (None, None) => bail!("Use --folder or --category"),
            };
            match manager.toggle_group(&group)? {
                Some(true) => println!("Enabled all rules"),
                Some(false) => println!("Disabled all rules"),
                None => println!("No rules in that group"),
            }
            Ok(())
        }
        Commands::Folders => cli_folders(manager, out),
        Commands::FolderAdd { name, icon } => {
            let new = match icon {
                Some(icon) => NewCustomFolder::new(name).with_icon(icon),
                None => NewCustomFolder::new(name),
            };
            let folder = manager.add_custom_folder(new)?;
            out.item(&folder, || format!("Created folder {folder} ({})", short_id(&folder.id)))
        }
        Commands::FolderUpdate { folder, name, icon } => {
            let folder = resolve_folder(manager, &folder)?;
            let patch = CustomFolderPatch {
                name,
                icon: icon.map(|i| Some(i).filter(|i| !i.is_empty())),
                ..CustomFolderPatch::default()
            };
            if let Some(updated) = manager.update_custom_folder(&folder.id, &patch)? {
                out.item(&updated, || format!("Updated folder {updated}"))?;
            }
            Ok(())
        }
        Commands::FolderDelete { folder } => {
            let folder = resolve_folder(manager, &folder)?;
            let removed = manager.delete_custom_folder(&folder.id)?;
            println!("Deleted folder {folder} and {removed} filter(s)");
            Ok(())
        }
        Commands::Move { id, folder } => {
            let rule = resolve_filter(manager, &id)?;
            let target = folder
                .map(|f| resolve_folder(manager, &f))
                .transpose()?;
            manager.move_filter_to_folder(&rule.id, target.as_ref().map(|f| f.id.as_str()))?;
            match target {
                Some(folder) => println!("Moved {} to {folder}", rule.display_name(&locale)),
                None => println!("Unfiled {}", rule.display_name(&locale)),
            }
            Ok(())
        }
        Commands::Copy { id, folder } => {
            let rule = resolve_filter(manager, &id)?;
            let folder = resolve_folder(manager, &folder)?;
            let copy = manager
                .copy_filter_to_folder(&rule.id, &folder.id)?
                .context("Filter or folder disappeared")?;
            out.item(&copy, || {
                format!("Copied {} to {folder} ({})", rule.display_name(&locale), short_id(&copy.id))
            })
        }
        Commands::Apply { text } => cli_apply(manager, out, text),
        Commands::Paste => cli_paste(manager, &locale, out),
        Commands::Settings => {
            let settings = manager.settings()?;
            out.item(&settings, || format_settings(&settings))
        }
        Commands::Set { key, value } => cli_set(manager, out, key, &value),
        Commands::Reset { yes } => {
            if !yes {
                bail!("{} (pass --yes)", locale.translate("settings.resetAllConfirm", &[]));
            }
            let count = manager.reset_to_defaults()?;
            println!(
                "{}",
                locale.translate("settings.filtersReset", &[("count", &count.to_string())])
            );
            Ok(())
        }
        Commands::Reenable { category } => {
            let count = manager.reenable_builtins(category.as_deref())?;
            println!("Re-enabled {count} built-in filter(s)");
            Ok(())
        }
        Commands::Categories => {
            let categories = manager.categories()?;
            if json {
                return out.item(&categories, String::new);
            }
            for category in &categories {
                let rules = manager.filters_by_category(category)?;
                let enabled = rules.iter().filter(|r| r.enabled).count();
                println!(
                    "{} {:<20} {enabled}/{}",
                    category_icon(category),
                    locale.category(category),
                    rules.len()
                );
            }
            Ok(())
        }
        Commands::DeleteCategory { category } => {
            let removed = manager.delete_category(&category)?;
            println!("Deleted {removed} filter(s) from {category}");
            Ok(())
        }
        Commands::DeleteCustom { yes } => {
            if !yes {
                let custom = manager.filters()?.iter().filter(|r| !r.is_builtin()).count();
                bail!(
                    "{} (pass --yes)",
                    locale.translate("settings.deleteAllConfirm", &[("count", &custom.to_string())])
                );
            }
            let (rules, folders) = manager.delete_all_custom()?;
            println!(
                "{}",
                locale.translate(
                    "settings.customFiltersDeleted",
                    &[("rules", &rules.to_string()), ("folders", &folders.to_string())]
                )
            );
            Ok(())
        }
        Commands::Import { path } => {
            let path = expand_home(&path);
            let template = Template::read(&path)
                .with_context(|| format!("Failed to read template: {}", path.display()))?;
            let report = manager.import_template(&template)?;
            for failure in &report.failures {
                eprintln!(
                    "Skipped entry {} ('{}'): {}",
                    failure.index + 1,
                    failure.pattern,
                    failure.reason
                );
            }
            println!(
                "{}",
                locale.translate("templates.imported", &[("count", &report.imported.to_string())])
            );
            Ok(())
        }
        Commands::Export(args) => {
            let path = args
                .path
                .map(|p| expand_home(&p))
                .unwrap_or_else(|| PathBuf::from(template_file_name(&args.name)));
            let meta = TemplateMeta {
                name: args.name,
                description: args.description,
                author: args.author,
            };
            let template = manager.write_template(meta, &path)?;
            println!(
                "{} -> {}",
                locale.translate(
                    "templates.exported",
                    &[
                        ("name", template.display_name()),
                        ("count", &template.filters.len().to_string())
                    ]
                ),
                path.display()
            );
            Ok(())
        }
    }
}

#[derive(Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    /// Print `value` as JSON, or the human-readable text otherwise.
    fn item<T: Serialize>(self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value).context("render json")?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

fn cli_list<S: RuleStore>(
    manager: &FilterManager<S>,
    locale: &Locale,
    out: Output,
    folder: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let rules = match (&folder, &category) {
        (Some(folder), _) => manager.filters_by_folder(&resolve_folder(manager, folder)?.id)?,
        (None, Some(category)) => manager.filters_by_category(category)?,
        (None, None) => manager.filters()?,
    };
    if out.json {
        return out.item(&rules, String::new);
    }
    if rules.is_empty() {
        println!("{}", locale.translate("config.noFilters", &[]));
        return Ok(());
    }

    let folders = manager.custom_folders()?;
    println!(
        "{:<8} {:<3} {:<28} {:<14} {:<24} Replacement",
        "ID", "On", "Name", "Group", "Pattern"
    );
    println!("{}", "─".repeat(92));
    for rule in &rules {
        let group = rule
            .folder
            .as_ref()
            .and_then(|id| folders.iter().find(|f| &f.id == id))
            .map(|f| f.name.clone())
            .unwrap_or_else(|| locale.category(&rule.category));
        let kind = if rule.use_regex { "/" } else { "" };
        println!(
            "{:<8} {:<3} {:<28} {:<14} {:<24} {}",
            short_id(&rule.id),
            if rule.enabled { "✓" } else { "·" },
            truncate(&rule.display_name(locale), 28),
            truncate(&group, 14),
            truncate(&format!("{kind}{}{kind}", rule.pattern), 24),
            rule.replacement,
        );
    }
    Ok(())
}

fn cli_add<S: RuleStore>(manager: &mut FilterManager<S>, out: Output, args: AddArgs) -> Result<()> {
    let mut new = if args.regex {
        NewFilterRule::regex(args.pattern, args.replacement)
    } else {
        NewFilterRule::literal(args.pattern, args.replacement)
    }
    .in_category(args.category);
    if let Some(description) = args.description {
        new = new.with_origin(Origin::custom(description));
    }
    if let Some(folder) = args.folder {
        new = new.in_folder(resolve_folder(manager, &folder)?.id);
    }
    if args.disabled {
        new = new.disabled();
    }
    let rule = manager.add_filter(new)?;
    out.item(&rule, || format!("Added filter {}", short_id(&rule.id)))
}

fn cli_update<S: RuleStore>(
    manager: &mut FilterManager<S>,
    out: Output,
    args: UpdateArgs,
) -> Result<()> {
    let rule = resolve_filter(manager, &args.id)?;
    let patch = FilterRulePatch {
        description: args.description.map(|d| Some(d).filter(|d| !d.is_empty())),
        pattern: args.pattern,
        replacement: args.replacement,
        use_regex: args.regex,
        enabled: args.enabled,
        category: args.category,
        ..FilterRulePatch::default()
    };
    if patch.is_empty() {
        bail!("Nothing to update");
    }
    match manager.update_filter(&rule.id, &patch)? {
        Some(updated) => out.item(&updated, || format!("Updated filter {}", short_id(&updated.id))),
        None => bail!("Filter {} not found", args.id),
    }
}

fn cli_folders<S: RuleStore>(manager: &FilterManager<S>, out: Output) -> Result<()> {
    let folders = manager.custom_folders()?;
    if out.json {
        return out.item(&folders, String::new);
    }
    if folders.is_empty() {
        println!("No folders");
        return Ok(());
    }
    println!("{:<8} {:<24} Filters", "ID", "Name");
    println!("{}", "─".repeat(42));
    for folder in &folders {
        let count = manager.filters_by_folder(&folder.id)?.len();
        println!("{:<8} {:<24} {count}", short_id(&folder.id), folder.to_string());
    }
    Ok(())
}

fn cli_apply<S: RuleStore>(
    manager: &mut FilterManager<S>,
    out: Output,
    text: Option<String>,
) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    let outcome = manager.apply_filters(&text)?;
    for skipped in &outcome.skipped {
        eprintln!("Skipped filter {} ('{}'): {}", short_id(&skipped.id), skipped.pattern, skipped.reason);
    }
    if out.json {
        return out.item(&outcome, String::new);
    }
    print!("{}", outcome.text);
    eprintln!("{} match(es)", outcome.matches);
    Ok(())
}

fn cli_paste<S: RuleStore>(manager: &mut FilterManager<S>, locale: &Locale, out: Output) -> Result<()> {
    let mut clipboard = SystemClipboard::new()?;
    let mut injector = CommandInjector::for_current_platform();
    let mut notifier = DesktopNotifier;
    let target = PasteTarget {
        clipboard: &mut clipboard,
        injector: &mut injector,
        notifier: &mut notifier,
    };
    let outcome = trigger::paste_filtered(manager, target, locale)?;
    if out.json {
        let value = match outcome {
            PasteOutcome::EmptyClipboard => serde_json::json!({ "pasted": false }),
            PasteOutcome::Pasted { chars, matches, notified } => serde_json::json!({
                "pasted": true,
                "chars": chars,
                "matches": matches,
                "notified": notified,
            }),
        };
        return out.item(&value, String::new);
    }
    match outcome {
        PasteOutcome::EmptyClipboard => eprintln!("Clipboard is empty"),
        PasteOutcome::Pasted { matches, .. } => eprintln!(
            "{}",
            locale.translate("notifications.itemsFiltered", &[("count", &matches.to_string())])
        ),
    }
    Ok(())
}

fn cli_set<S: RuleStore>(
    manager: &mut FilterManager<S>,
    out: Output,
    key: SettingKey,
    value: &str,
) -> Result<()> {
    let mut patch = AppSettingsPatch::default();
    match key {
        SettingKey::Language => patch.language = Some(value.trim().to_lowercase()),
        SettingKey::Theme => {
            patch.theme = Some(Theme::parse(value).with_context(|| {
                let names: Vec<&str> = Theme::all().iter().map(Theme::as_str).collect();
                format!("Unknown theme '{value}' (expected {})", names.join(", "))
            })?)
        }
        SettingKey::Notifications => patch.notifications = Some(parse_bool(value)?),
        SettingKey::AutoStart => patch.auto_start = Some(parse_bool(value)?),
        SettingKey::Shortcut => patch.shortcut_paste = Some(value.trim().to_string()),
    }
    let settings = manager.update_settings(&patch)?;
    out.item(&settings, || format_settings(&settings))
}

fn format_settings(settings: &AppSettings) -> String {
    [
        format!("language       {}", settings.language),
        format!("theme          {}", settings.theme),
        format!("notifications  {}", on_off(settings.notifications)),
        format!("auto-start     {}", on_off(settings.auto_start)),
        format!("shortcut       {}", settings.shortcut_paste),
    ]
    .join("\n")
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    parse_on_off(value).with_context(|| format!("Expected on/off, got '{}'", value.trim()))
}

/// Look a rule up by full id or unique id prefix.
pub(crate) fn resolve_filter<S: RuleStore>(
    manager: &FilterManager<S>,
    id: &str,
) -> Result<FilterRule> {
    if let Some(rule) = manager.find_filter(id)? {
        return Ok(rule);
    }
    let mut matches = manager
        .filters()?
        .into_iter()
        .filter(|r| r.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(rule), None) if !id.is_empty() => Ok(rule),
        (Some(_), Some(_)) => bail!("Filter id '{id}' is ambiguous"),
        _ => bail!("Filter '{id}' not found"),
    }
}

/// Look a folder up by id, unique id prefix or name.
pub(crate) fn resolve_folder<S: RuleStore>(
    manager: &FilterManager<S>,
    key: &str,
) -> Result<CustomFolder> {
    let folders = manager.custom_folders()?;
    if let Some(folder) = folders.iter().find(|f| f.id == key) {
        return Ok(folder.clone());
    }
    if let Some(folder) = CustomFolder::find_by_name(&folders, key) {
        return Ok(folder.clone());
    }
    let mut matches = folders.into_iter().filter(|f| f.id.starts_with(key));
    match (matches.next(), matches.next()) {
        (Some(folder), None) if !key.is_empty() => Ok(folder),
        (Some(_), Some(_)) => bail!("Folder id '{key}' is ambiguous"),
        _ => bail!("Folder '{key}' not found"),
    }
}

pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

pub(crate) fn category_icon(category: &str) -> &'static str {
    match category {
        "Developer" => "💻",
        "Finance" => "💰",
        "Personal" => "👤",
        "Health" => "🏥",
        "HR" => "👔",
        "System" => "⚙️",
        "Communication" => "💬",
        _ => "🏷️",
    }
}

pub(crate) fn expand_home(path: &std::path::Path) -> PathBuf {
    match path.to_str().and_then(|p| p.strip_prefix("~/")) {
        Some(rest) => directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
