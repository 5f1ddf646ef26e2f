use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, EditTarget, InputMode, Screen};
use super::commands;
use super::theme::{self, Palette};

pub(crate) fn render(f: &mut Frame, app: &App) {
    let p = theme::palette(app.settings.theme);
    f.render_widget(Block::default().style(p.normal().bg(p.header_bg)), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app, p);
    render_screen(f, chunks[1], app, p);
    render_status_bar(f, chunks[2], app, p);
    render_command_bar(f, chunks[3], app, p);

    if app.show_help {
        render_help_overlay(f, f.area(), p);
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let num = format!("{}", i + 1);
            let title = s.title(&app.locale);
            if *s == app.screen {
                Line::from(vec![
                    Span::styled(format!("{num}:"), p.dim()),
                    Span::styled(title, p.group()),
                ])
            } else {
                Line::from(Span::styled(format!("{num}:{title}"), p.dim()))
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(p.overlay)))
        .style(Style::default().bg(p.header_bg));

    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    match app.screen {
        Screen::Filters => super::screens::filters::render(f, area, app, p),
        Screen::Tester => super::screens::tester::render(f, area, app, p),
        Screen::Settings => super::screens::settings::render(f, area, app, p),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => p.accent,
        InputMode::Command | InputMode::Editing => p.green,
        InputMode::Search => p.yellow,
        InputMode::Confirm => p.red,
    };
    let mode_style = Style::default()
        .fg(p.header_bg)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let info = format!(
        " {} | {} | paste: {}",
        app.locale.translate("app.name", &[]),
        app.locale.code(),
        app.settings.shortcut_paste
    );

    let right = match app.screen {
        Screen::Filters => " space toggle | Enter fold | D delete | ? help ",
        Screen::Tester => " e edit input | :test <text> | ? help ",
        Screen::Settings => " Enter change | :lang :theme | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.chars().count() + info.chars().count() + right.chars().count();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, p.status_bar()),
        Span::styled(" ".repeat(pad), p.status_bar()),
        Span::styled(right, p.status_bar()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(p.accent)),
                Span::styled(&app.command_input, p.command_bar()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Search => {
            let rules = app
                .rows
                .iter()
                .filter(|r| matches!(r, super::app::ListRow::Rule(_)))
                .count();
            let match_info = if !app.search_input.is_empty() {
                format!("  ({rules} matches)")
            } else {
                String::new()
            };
            (
                Line::from(vec![
                    Span::styled("/", Style::default().fg(p.yellow)),
                    Span::styled(&app.search_input, p.command_bar()),
                    Span::styled(match_info, p.dim()),
                ]),
                Some(1 + app.search_input.chars().count() as u16),
            )
        }
        InputMode::Editing => {
            let prompt = match app.edit_target {
                EditTarget::TestInput => "test> ",
                EditTarget::Shortcut => "shortcut> ",
            };
            (
                Line::from(vec![
                    Span::styled(prompt, Style::default().fg(p.green)),
                    Span::styled(&app.command_input, p.command_bar()),
                ]),
                Some((prompt.len() + app.command_input.chars().count()) as u16),
            )
        }
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(p.yellow)),
                Span::styled(" [y/N] ", Style::default().fg(p.red)),
            ]),
            None,
        ),
        InputMode::Normal => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, / to search, ? for help",
                    p.dim(),
                ))
            } else {
                Line::from(Span::styled(&app.status_message, p.command_bar()))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(p.command_bg));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn render_help_overlay(f: &mut Frame, area: Rect, p: &Palette) {
    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default().fg(p.yellow).add_modifier(Modifier::BOLD),
        ))
    };
    let mut help_text = vec![
        Line::from(Span::styled(" ClipFilter Help ", p.group())),
        Line::from(""),
        heading(" Navigation"),
        Line::from(Span::styled(
            "  j/k or Up/Down   Move cursor           1-3        Switch tabs",
            p.normal(),
        )),
        Line::from(Span::styled(
            "  Tab/Shift-Tab    Cycle tabs            g/G        Top/Bottom",
            p.normal(),
        )),
        Line::from(Span::styled(
            "  /                Search filters        Ctrl-q     Quit",
            p.normal(),
        )),
        Line::from(""),
        heading(" Filters"),
        Line::from(Span::styled(
            "  space            Toggle filter/group   Enter      Expand/Collapse",
            p.normal(),
        )),
        Line::from(Span::styled(
            "  t                Toggle whole group    D          Delete selected",
            p.normal(),
        )),
        Line::from(""),
        heading(" Commands"),
    ];

    // Build command list dynamically from COMMANDS registry
    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 1 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<15} {desc}"),
            p.normal(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Press any key to close ", p.dim())));

    // Center the popup, clamped to terminal height
    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 76.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(p.border(true))
            .style(Style::default().bg(p.header_bg)),
    );
    f.render_widget(help, popup_area);
}
