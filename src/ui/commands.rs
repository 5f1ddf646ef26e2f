use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use super::app::{App, EditTarget, InputMode, PendingAction, Screen};
use super::util::parse_on_off;
use crate::db::Database;
use crate::manager::{is_unfiled, FilterManager, Group, Template, TemplateMeta};
use crate::models::*;

type Manager = FilterManager<Database>;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Manager) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit ClipFilter", cmd_quit, r);
    register_command!("quit", "Quit ClipFilter", cmd_quit, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("f", "Go to Filters", cmd_filters, r);
    register_command!("filters", "Go to Filters", cmd_filters, r);
    register_command!("s", "Go to Settings", cmd_settings, r);
    register_command!("settings", "Go to Settings", cmd_settings, r);
    register_command!(
        "test",
        "Try the filters on text (e.g. :test mail me@example.com)",
        cmd_test,
        r
    );
    register_command!(
        "add",
        "Add a literal filter (e.g. :add secret => [X])",
        cmd_add,
        r
    );
    register_command!(
        "regex",
        "Add a regex filter (e.g. :regex \\d{4} => ####)",
        cmd_regex,
        r
    );
    register_command!(
        "describe",
        "Label the selected custom filter",
        cmd_describe,
        r
    );
    register_command!(
        "category",
        "Set the selected filter's category (e.g. :category Finance)",
        cmd_category,
        r
    );
    register_command!("folder", "Create folder (e.g. :folder Work)", cmd_folder, r);
    register_command!(
        "rename-folder",
        "Rename the selected folder",
        cmd_rename_folder,
        r
    );
    register_command!("icon", "Set the selected folder's icon", cmd_icon, r);
    register_command!(
        "move",
        "Move the selected filter to a folder (no name: unfile)",
        cmd_move,
        r
    );
    register_command!(
        "copy",
        "Copy the selected filter into a folder",
        cmd_copy,
        r
    );
    register_command!(
        "toggle",
        "Enable/disable the selected folder or category",
        cmd_toggle,
        r
    );
    register_command!(
        "delete",
        "Delete the selected filter, folder or category",
        cmd_delete,
        r
    );
    register_command!(
        "reenable",
        "Re-enable built-in filters (optionally one category)",
        cmd_reenable,
        r
    );
    register_command!("reset", "Restore the default filters", cmd_reset, r);
    register_command!(
        "delete-custom",
        "Delete all custom filters and folders",
        cmd_delete_custom,
        r
    );
    register_command!(
        "import",
        "Import a template (e.g. :import ~/filters.json)",
        cmd_import,
        r
    );
    register_command!(
        "export",
        "Export custom filters (e.g. :export ~/my_filters.json)",
        cmd_export,
        r
    );
    register_command!("lang", "Set language (e.g. :lang fr)", cmd_lang, r);
    register_command!("theme", "Set theme: light, dark or auto", cmd_theme, r);
    register_command!(
        "shortcut",
        "Set the filtered paste shortcut",
        cmd_shortcut,
        r
    );
    register_command!(
        "notifications",
        "Turn paste notifications on/off",
        cmd_notifications,
        r
    );
    register_command!(
        "autostart",
        "Turn start with system on/off",
        cmd_autostart,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, manager: &mut Manager) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        if let Err(e) = (cmd.run)(args, app, manager) {
            tracing::warn!(command = cmd_name, error = %e, "command failed");
            app.set_status(format!("Error: {e}"));
        }
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Split `pattern => replacement`. Without an arrow the replacement is empty.
fn split_rule_args(args: &str) -> (&str, &str) {
    match args.split_once("=>") {
        Some((pattern, replacement)) => (pattern.trim(), replacement.trim()),
        None => (args, ""),
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _m: &mut Manager) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _m: &mut Manager) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_filters(_args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    app.screen = Screen::Filters;
    app.refresh(m)
}

fn cmd_settings(_args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    app.screen = Screen::Settings;
    app.refresh(m)
}

fn cmd_test(args: &str, app: &mut App, _m: &mut Manager) -> anyhow::Result<()> {
    app.screen = Screen::Tester;
    if args.is_empty() {
        app.edit_target = EditTarget::TestInput;
        app.command_input = app.test_input.clone();
        app.input_mode = InputMode::Editing;
        return Ok(());
    }
    app.test_input = args.to_string();
    app.run_test();
    Ok(())
}

fn add_rule(args: &str, use_regex: bool, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    let (pattern, replacement) = split_rule_args(args);
    if pattern.is_empty() {
        let name = if use_regex { "regex" } else { "add" };
        app.set_status(format!("Usage: :{name} <pattern> => <replacement>"));
        return Ok(());
    }

    let mut new = if use_regex {
        NewFilterRule::regex(pattern, replacement)
    } else {
        NewFilterRule::literal(pattern, replacement)
    };
    // New rules land in the group under the cursor
    match app.selected_group() {
        Some(Group::Folder(id)) => new = new.in_folder(id),
        Some(Group::Category(category)) => new = new.in_category(category),
        None => {}
    }

    let rule = m.add_filter(new)?;
    app.refresh(m)?;
    if let Some(pos) = app
        .rows
        .iter()
        .position(|r| matches!(r, super::app::ListRow::Rule(x) if x.id == rule.id))
    {
        app.row_index = pos;
    }
    app.set_status(format!("Added filter: {}", rule.display_name(&app.locale)));
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    add_rule(args, false, app, m)
}

fn cmd_regex(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    add_rule(args, true, app, m)
}

fn cmd_describe(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    let Some(rule) = app.selected_rule().cloned() else {
        app.set_status("Select a filter first");
        return Ok(());
    };
    if rule.is_builtin() {
        app.set_status("Default filters keep their translated name");
        return Ok(());
    }
    let patch = FilterRulePatch {
        description: Some(Some(args.to_string()).filter(|d| !d.is_empty())),
        ..FilterRulePatch::default()
    };
    m.update_filter(&rule.id, &patch)?;
    app.refresh(m)?;
    app.set_status("Description updated");
    Ok(())
}

fn cmd_category(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :category <name>");
        return Ok(());
    }
    let Some(rule) = app.selected_rule().cloned() else {
        app.set_status("Select a filter first");
        return Ok(());
    };
    let patch = FilterRulePatch {
        category: Some(args.to_string()),
        ..FilterRulePatch::default()
    };
    m.update_filter(&rule.id, &patch)?;
    app.refresh(m)?;
    app.set_status(format!("Moved to category: {}", app.locale.category(args)));
    Ok(())
}

fn cmd_folder(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :folder <name>");
        return Ok(());
    }
    let folder = m.add_custom_folder(NewCustomFolder::new(args))?;
    app.refresh(m)?;
    app.set_status(
        app.locale
            .translate("folders.created", &[("name", &folder.name)]),
    );
    Ok(())
}

fn cmd_rename_folder(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    let Some(folder) = app.selected_folder().cloned() else {
        app.set_status("Select a folder first");
        return Ok(());
    };
    let patch = CustomFolderPatch {
        name: Some(args.to_string()),
        ..CustomFolderPatch::default()
    };
    m.update_custom_folder(&folder.id, &patch)?;
    app.refresh(m)?;
    app.set_status(format!("Renamed folder to: {}", args.trim()));
    Ok(())
}

fn cmd_icon(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    let Some(folder) = app.selected_folder().cloned() else {
        app.set_status("Select a folder first");
        return Ok(());
    };
    let patch = CustomFolderPatch {
        icon: Some(Some(args.to_string()).filter(|i| !i.is_empty())),
        ..CustomFolderPatch::default()
    };
    m.update_custom_folder(&folder.id, &patch)?;
    app.refresh(m)?;
    Ok(())
}

fn cmd_move(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    let Some(rule) = app.selected_rule().cloned() else {
        app.set_status("Select a filter first");
        return Ok(());
    };
    if args.is_empty() {
        m.move_filter_to_folder(&rule.id, None)?;
        app.refresh(m)?;
        app.set_status(format!("Unfiled: {}", rule.display_name(&app.locale)));
        return Ok(());
    }
    let Some(folder) = CustomFolder::find_by_name(&app.folders, args).cloned() else {
        app.set_status(format!("Folder '{args}' not found"));
        return Ok(());
    };
    m.move_filter_to_folder(&rule.id, Some(&folder.id))?;
    app.refresh(m)?;
    app.set_status(format!("Moved {} to {folder}", rule.display_name(&app.locale)));
    Ok(())
}

fn cmd_copy(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    let Some(rule) = app.selected_rule().cloned() else {
        app.set_status("Select a filter first");
        return Ok(());
    };
    let Some(folder) = CustomFolder::find_by_name(&app.folders, args).cloned() else {
        app.set_status(format!("Folder '{args}' not found"));
        return Ok(());
    };
    m.copy_filter_to_folder(&rule.id, &folder.id)?;
    app.refresh(m)?;
    app.set_status(format!("Copied {} to {folder}", rule.display_name(&app.locale)));
    Ok(())
}

fn cmd_toggle(_args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    let Some(group) = app.selected_group() else {
        app.set_status("Nothing selected");
        return Ok(());
    };
    let state = m.toggle_group(&group)?;
    app.refresh(m)?;
    match state {
        Some(true) => app.set_status("Group enabled"),
        Some(false) => app.set_status("Group disabled"),
        None => app.set_status("Group is empty"),
    }
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _m: &mut Manager) -> anyhow::Result<()> {
    use super::app::ListRow;

    let Some(row) = app.selected_row().cloned() else {
        app.set_status("Nothing to delete");
        return Ok(());
    };
    match row {
        ListRow::Rule(rule) => {
            let name = rule.display_name(&app.locale);
            let message = app
                .locale
                .translate("config.deleteConfirm", &[("name", &name)]);
            app.confirm(PendingAction::DeleteFilter { id: rule.id, name }, message);
        }
        ListRow::Folder { folder, total, .. } => {
            let message = app.locale.translate(
                "folders.deleteConfirm",
                &[("name", &folder.name), ("count", &total.to_string())],
            );
            app.confirm(
                PendingAction::DeleteFolder {
                    id: folder.id,
                    name: folder.name,
                },
                message,
            );
        }
        ListRow::Category { name, .. } => {
            let protected = app
                .filters
                .iter()
                .any(|r| r.category == name && r.is_builtin() && is_unfiled(r, &app.folders));
            if protected {
                app.set_status(app.locale.translate("errors.cannotDeleteDefault", &[]));
                return Ok(());
            }
            let message = format!("Delete every filter in '{}'?", app.locale.category(&name));
            app.confirm(PendingAction::DeleteCategory { category: name }, message);
        }
    }
    Ok(())
}

fn cmd_reenable(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    let category = Some(args).filter(|a| !a.is_empty());
    let count = m.reenable_builtins(category)?;
    app.refresh(m)?;
    app.set_status(format!("Re-enabled {count} default filter(s)"));
    Ok(())
}

fn cmd_reset(_args: &str, app: &mut App, _m: &mut Manager) -> anyhow::Result<()> {
    let message = app.locale.translate("settings.resetAllConfirm", &[]);
    app.confirm(PendingAction::ResetDefaults, message);
    Ok(())
}

fn cmd_delete_custom(_args: &str, app: &mut App, _m: &mut Manager) -> anyhow::Result<()> {
    let count = app.filters.iter().filter(|r| !r.is_builtin()).count();
    if count == 0 && app.folders.is_empty() {
        app.set_status("No custom filters to delete");
        return Ok(());
    }
    let message = app
        .locale
        .translate("settings.deleteAllConfirm", &[("count", &count.to_string())]);
    app.confirm(PendingAction::DeleteAllCustom, message);
    Ok(())
}

fn cmd_import(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :import <path>");
        return Ok(());
    }
    let path = crate::run::expand_home(Path::new(args));
    let template = Template::read(&path)?;
    let report = m.import_template(&template)?;
    app.refresh(m)?;

    let mut msg = app.locale.translate(
        "templates.imported",
        &[("count", &report.imported.to_string())],
    );
    if !report.failures.is_empty() {
        msg.push_str(&format!(" ({} skipped)", report.failures.len()));
    }
    app.set_status(msg);
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :export <path>");
        return Ok(());
    }
    let path = crate::run::expand_home(Path::new(args));
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("My Template")
        .to_string();
    let template = match m.write_template(TemplateMeta::named(name), &path) {
        Ok(template) => template,
        Err(crate::error::FilterError::NothingToExport) => {
            app.set_status(app.locale.translate("templates.noCustomFilters", &[]));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    app.set_status(format!(
        "{} -> {}",
        app.locale.translate(
            "templates.exported",
            &[
                ("name", template.display_name()),
                ("count", &template.filters.len().to_string())
            ]
        ),
        path.display()
    ));
    Ok(())
}

fn update_settings(app: &mut App, m: &mut Manager, patch: AppSettingsPatch) -> anyhow::Result<()> {
    m.update_settings(&patch)?;
    app.refresh(m)?;
    app.set_status("Settings saved");
    Ok(())
}

fn cmd_lang(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!(
            "Usage: :lang <{}>",
            crate::locale::Locale::available().join("|")
        ));
        return Ok(());
    }
    let patch = AppSettingsPatch {
        language: Some(args.to_lowercase()),
        ..AppSettingsPatch::default()
    };
    update_settings(app, m, patch)
}

fn cmd_theme(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    let Some(theme) = Theme::parse(args) else {
        app.set_status("Usage: :theme <light|dark|auto>");
        return Ok(());
    };
    let patch = AppSettingsPatch {
        theme: Some(theme),
        ..AppSettingsPatch::default()
    };
    update_settings(app, m, patch)
}

fn cmd_shortcut(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!("Usage: :shortcut <accelerator>, e.g. {DEFAULT_SHORTCUT}"));
        return Ok(());
    }
    let patch = AppSettingsPatch {
        shortcut_paste: Some(args.to_string()),
        ..AppSettingsPatch::default()
    };
    update_settings(app, m, patch)
}

fn cmd_notifications(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    let Some(on) = parse_on_off(args) else {
        app.set_status("Usage: :notifications <on|off>");
        return Ok(());
    };
    let patch = AppSettingsPatch {
        notifications: Some(on),
        ..AppSettingsPatch::default()
    };
    update_settings(app, m, patch)
}

fn cmd_autostart(args: &str, app: &mut App, m: &mut Manager) -> anyhow::Result<()> {
    let Some(on) = parse_on_off(args) else {
        app.set_status("Usage: :autostart <on|off>");
        return Ok(());
    };
    let patch = AppSettingsPatch {
        auto_start: Some(on),
        ..AppSettingsPatch::default()
    };
    update_settings(app, m, patch)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
