use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::trigger::Hotkey;
use crate::ui::app::{App, EditTarget, InputMode, SettingsField};
use crate::ui::theme::Palette;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(6)])
        .split(area);

    render_fields(f, chunks[0], app, p);
    render_maintenance(f, chunks[1], app, p);
}

fn render_fields(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let editing_shortcut =
        app.input_mode == InputMode::Editing && app.edit_target == EditTarget::Shortcut;

    let rows: Vec<Row> = SettingsField::all()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let mut value = field.value(&app.settings);
            if *field == SettingsField::Shortcut {
                if editing_shortcut {
                    value = format!("{}▏", app.command_input);
                } else if let Ok(hotkey) = Hotkey::parse(&value) {
                    value = format!("{value}  ({})", hotkey.label());
                }
            }
            let style = if i == app.settings_index {
                p.selected()
            } else {
                p.normal()
            };
            Row::new(vec![Cell::from(field.label(&app.locale)), Cell::from(value)]).style(style)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(28), Constraint::Min(20)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(p.border(true))
            .title(Span::styled(
                format!(" {} ", app.locale.translate("settings.title", &[])),
                p.title(true),
            )),
    );
    f.render_widget(table, area);
}

fn render_maintenance(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let builtin = app.filters.iter().filter(|r| r.is_builtin()).count();
    let custom = app.filters.len() - builtin;

    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{builtin}"), p.normal()),
            Span::styled(" default filters, ", p.dim()),
            Span::styled(format!("{custom}"), p.normal()),
            Span::styled(" custom filters, ", p.dim()),
            Span::styled(format!("{}", app.folders.len()), p.normal()),
            Span::styled(" folders", p.dim()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  :export <path>      save custom filters as a template",
            p.normal(),
        )),
        Line::from(Span::styled(
            "  :import <path>      add filters from a template",
            p.normal(),
        )),
        Line::from(Span::styled(
            "  :reenable           turn every default filter back on",
            p.normal(),
        )),
        Line::from(Span::styled(
            "  :reset              restore the default filters",
            p.normal(),
        )),
        Line::from(Span::styled(
            "  :delete-custom      delete all custom filters and folders",
            p.normal(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.border(false))
        .title(Span::styled(" Filters ", p.title(false)));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
