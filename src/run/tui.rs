use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::db::Database;
use crate::manager::{FilterManager, Group};
use crate::models::{AppSettingsPatch, CustomFolderPatch, FilterRulePatch, Theme};
use crate::ui::app::{App, EditTarget, InputMode, ListRow, PendingAction, Screen, SettingsField};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

type Manager = FilterManager<Database>;

pub(crate) fn as_tui(manager: &mut Manager) -> Result<()> {
    let mut app = App::new();
    app.refresh(manager)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, manager);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    manager: &mut Manager,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab + status + command bars, table borders + header, details pane
            let content_height = f.area().height.saturating_sub(10) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, manager)?,
                InputMode::Command => handle_command_input(key, app, manager)?,
                InputMode::Search => handle_search_input(key, app),
                InputMode::Editing => handle_editing_input(key, app, manager)?,
                InputMode::Confirm => handle_confirm_input(key, app, manager)?,
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, manager: &mut Manager) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') if app.screen == Screen::Filters => {
            app.input_mode = InputMode::Search;
            app.search_input.clear();
            app.rebuild_rows();
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('1') => switch_screen(app, manager, Screen::Filters)?,
        KeyCode::Char('2') => switch_screen(app, manager, Screen::Tester)?,
        KeyCode::Char('3') => switch_screen(app, manager, Screen::Settings)?,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, manager, screens[next])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, manager, screens[prev])?;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Esc => {
            if !app.search_input.is_empty() {
                app.search_input.clear();
                app.rebuild_rows();
            }
            app.status_message.clear();
        }
        _ => match app.screen {
            Screen::Filters => handle_filters_key(key.code, app, manager)?,
            Screen::Tester => handle_tester_key(key.code, app),
            Screen::Settings => handle_settings_key(key.code, app, manager)?,
        },
    }
    Ok(())
}

fn handle_filters_key(code: KeyCode, app: &mut App, manager: &mut Manager) -> Result<()> {
    match code {
        KeyCode::Char(' ') => match app.selected_row().cloned() {
            Some(ListRow::Rule(rule)) => {
                manager.update_filter(&rule.id, &FilterRulePatch::enabled(!rule.enabled))?;
                app.refresh(manager)?;
            }
            Some(_) => toggle_selected_group(app, manager)?,
            None => {}
        },
        KeyCode::Char('t') => toggle_selected_group(app, manager)?,
        KeyCode::Enter => match app.selected_row().cloned() {
            Some(ListRow::Folder { folder, .. }) => {
                let patch = CustomFolderPatch {
                    expanded: Some(!folder.expanded),
                    ..CustomFolderPatch::default()
                };
                manager.update_custom_folder(&folder.id, &patch)?;
                app.refresh(manager)?;
            }
            Some(ListRow::Category { name, .. }) => {
                if !app.collapsed_categories.remove(&name) {
                    app.collapsed_categories.insert(name);
                }
                app.rebuild_rows();
            }
            Some(ListRow::Rule(_)) | None => {}
        },
        KeyCode::Char('D') | KeyCode::Delete => {
            commands::handle_command("delete", app, manager)?;
        }
        _ => {}
    }
    Ok(())
}

fn toggle_selected_group(app: &mut App, manager: &mut Manager) -> Result<()> {
    let Some(group) = app.selected_group() else {
        return Ok(());
    };
    if let Some(enabled) = manager.toggle_group(&group)? {
        let name = match &group {
            Group::Folder(id) => app.folder_name(id).unwrap_or_default().to_string(),
            Group::Category(category) => app.locale.category(category),
        };
        let state = if enabled { "enabled" } else { "disabled" };
        app.set_status(format!("{name}: all filters {state}"));
    }
    app.refresh(manager)
}

fn handle_tester_key(code: KeyCode, app: &mut App) {
    match code {
        KeyCode::Char('e') | KeyCode::Char('i') | KeyCode::Enter => {
            app.edit_target = EditTarget::TestInput;
            app.command_input = app.test_input.clone();
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('x') => {
            app.test_input.clear();
            app.run_test();
        }
        _ => {}
    }
}

fn handle_settings_key(code: KeyCode, app: &mut App, manager: &mut Manager) -> Result<()> {
    if !matches!(code, KeyCode::Enter | KeyCode::Char(' ')) {
        return Ok(());
    }
    let settings = &app.settings;
    let patch = match app.selected_setting() {
        SettingsField::Language => {
            let available = crate::locale::Locale::available();
            let idx = available
                .iter()
                .position(|c| *c == settings.language)
                .unwrap_or(0);
            AppSettingsPatch {
                language: available
                    .get((idx + 1) % available.len().max(1))
                    .map(|c| c.to_string()),
                ..AppSettingsPatch::default()
            }
        }
        SettingsField::Theme => {
            let themes = Theme::all();
            let idx = themes.iter().position(|t| *t == settings.theme).unwrap_or(0);
            AppSettingsPatch {
                theme: Some(themes[(idx + 1) % themes.len()]),
                ..AppSettingsPatch::default()
            }
        }
        SettingsField::Notifications => AppSettingsPatch {
            notifications: Some(!settings.notifications),
            ..AppSettingsPatch::default()
        },
        SettingsField::AutoStart => AppSettingsPatch {
            auto_start: Some(!settings.auto_start),
            ..AppSettingsPatch::default()
        },
        SettingsField::Shortcut => {
            app.edit_target = EditTarget::Shortcut;
            app.command_input = app.settings.shortcut_paste.clone();
            app.input_mode = InputMode::Editing;
            return Ok(());
        }
    };
    manager.update_settings(&patch)?;
    app.refresh(manager)
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, manager: &mut Manager) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
            commands::handle_command(&input, app, manager)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
            app.rebuild_rows();
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            // Live search: filter as you type
            app.row_index = 0;
            app.row_scroll = 0;
            app.rebuild_rows();
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            app.row_index = 0;
            app.row_scroll = 0;
            app.rebuild_rows();
        }
        _ => {}
    }
}

fn handle_editing_input(key: event::KeyEvent, app: &mut App, manager: &mut Manager) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let value = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            match app.edit_target {
                EditTarget::TestInput => {
                    app.test_input = value;
                    app.run_test();
                }
                EditTarget::Shortcut => {
                    let patch = AppSettingsPatch {
                        shortcut_paste: Some(value.trim().to_string()),
                        ..AppSettingsPatch::default()
                    };
                    match manager.update_settings(&patch) {
                        Ok(_) => {
                            app.refresh(manager)?;
                            app.set_status("Shortcut saved");
                        }
                        Err(e) => app.set_status(format!("Error: {e}")),
                    }
                }
            }
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
            app.set_status("Edit cancelled");
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    // The tester follows the edit line live
    if app.edit_target == EditTarget::TestInput && app.input_mode == InputMode::Editing {
        app.test_outcome = if app.command_input.is_empty() {
            None
        } else {
            Some(crate::filter::apply_filters(&app.filters, &app.command_input))
        };
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, manager: &mut Manager) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                if let Err(e) = run_pending(action, app, manager) {
                    app.set_status(format!("Error: {e}"));
                }
                app.refresh(manager)?;
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        _ => {
            // Any other key = cancel
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
    }
    Ok(())
}

fn run_pending(action: PendingAction, app: &mut App, manager: &mut Manager) -> Result<()> {
    match action {
        PendingAction::DeleteFilter { id, name } => {
            manager.delete_filter(&id)?;
            app.set_status(format!("Deleted: {name}"));
        }
        PendingAction::DeleteFolder { id, name } => {
            let removed = manager.delete_custom_folder(&id)?;
            app.set_status(format!("Deleted folder {name} and {removed} filter(s)"));
        }
        PendingAction::DeleteCategory { category } => {
            let removed = manager.delete_category(&category)?;
            app.set_status(format!(
                "Deleted {removed} filter(s) from {}",
                app.locale.category(&category)
            ));
        }
        PendingAction::ResetDefaults => {
            let count = manager.reset_to_defaults()?;
            app.set_status(
                app.locale
                    .translate("settings.filtersReset", &[("count", &count.to_string())]),
            );
        }
        PendingAction::DeleteAllCustom => {
            let (rules, folders) = manager.delete_all_custom()?;
            app.set_status(app.locale.translate(
                "settings.customFiltersDeleted",
                &[("rules", &rules.to_string()), ("folders", &folders.to_string())],
            ));
        }
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, manager: &mut Manager, screen: Screen) -> Result<()> {
    app.screen = screen;
    app.refresh(manager)
}

fn handle_move_down(app: &mut App) {
    match app.screen {
        Screen::Filters => {
            let page = app.visible_rows.max(1);
            scroll_down(&mut app.row_index, &mut app.row_scroll, app.rows.len(), page);
        }
        Screen::Settings => {
            if app.settings_index + 1 < SettingsField::all().len() {
                app.settings_index += 1;
            }
        }
        Screen::Tester => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Filters => scroll_up(&mut app.row_index, &mut app.row_scroll),
        Screen::Settings => app.settings_index = app.settings_index.saturating_sub(1),
        Screen::Tester => {}
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Filters => scroll_to_top(&mut app.row_index, &mut app.row_scroll),
        Screen::Settings => app.settings_index = 0,
        Screen::Tester => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    match app.screen {
        Screen::Filters => {
            let page = app.visible_rows.max(1);
            scroll_to_bottom(&mut app.row_index, &mut app.row_scroll, app.rows.len(), page);
        }
        Screen::Settings => app.settings_index = SettingsField::all().len() - 1,
        Screen::Tester => {}
    }
}
