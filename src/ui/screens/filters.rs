use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::{App, ListRow};
use crate::ui::theme::Palette;
use crate::ui::util::{truncate, visible};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(area);

    render_tree(f, chunks[0], app, p);
    render_details(f, chunks[1], app, p);
}

fn render_tree(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let enabled = app.filters.iter().filter(|r| r.enabled).count();
    let mut title = format!(" Filters ({enabled}/{}) ", app.filters.len());
    if !app.search_input.is_empty() {
        title.push_str(&format!("search: '{}' ", app.search_input));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.border(true))
        .title(Span::styled(title, p.title(true)));

    if app.rows.is_empty() {
        let hint = if app.search_input.is_empty() {
            app.locale.translate("config.noFilters", &[])
        } else {
            format!("No filters matching '{}'", app.search_input)
        };
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(hint, p.dim())),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :add <pattern> => <replacement>",
                Style::default().fg(p.accent),
            )),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["", "Name", "Pattern", "Replacement"]
        .iter()
        .map(|h| Cell::from(*h).style(p.header()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .rows
        .iter()
        .enumerate()
        .skip(app.row_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, row)| {
            let cells = match row {
                ListRow::Folder {
                    folder,
                    enabled,
                    total,
                } => {
                    let arrow = if folder.expanded { "▾" } else { "▸" };
                    vec![
                        Cell::from(arrow),
                        Cell::from(Span::styled(folder.to_string(), p.group())),
                        Cell::from(Span::styled(format!("{enabled}/{total} on"), p.dim())),
                        Cell::from(""),
                    ]
                }
                ListRow::Category {
                    name,
                    enabled,
                    total,
                    collapsed,
                } => {
                    let arrow = if *collapsed { "▸" } else { "▾" };
                    vec![
                        Cell::from(arrow),
                        Cell::from(Span::styled(app.locale.category(name), p.group())),
                        Cell::from(Span::styled(format!("{enabled}/{total} on"), p.dim())),
                        Cell::from(""),
                    ]
                }
                ListRow::Rule(rule) => {
                    let (mark, mark_style) = if rule.enabled {
                        ("●", p.enabled())
                    } else {
                        ("○", p.disabled())
                    };
                    let pattern = if rule.use_regex {
                        format!("/{}/", visible(&rule.pattern))
                    } else {
                        visible(&rule.pattern)
                    };
                    vec![
                        Cell::from(Span::styled(mark, mark_style)),
                        Cell::from(format!("  {}", truncate(&rule.display_name(&app.locale), 36))),
                        Cell::from(truncate(&pattern, 40)),
                        Cell::from(truncate(&visible(&rule.replacement), 20)),
                    ]
                }
            };
            let style = if i == app.row_index {
                p.selected()
            } else if matches!(row, ListRow::Rule(r) if !r.enabled) {
                p.dim()
            } else {
                p.normal()
            };
            Row::new(cells).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Min(24),
        Constraint::Min(20),
        Constraint::Length(20),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}

fn render_details(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let lines = match app.selected_row() {
        Some(ListRow::Rule(rule)) => {
            let folder = rule
                .folder
                .as_deref()
                .and_then(|id| app.folder_name(id))
                .unwrap_or("-");
            let origin = if rule.is_builtin() { "default" } else { "custom" };
            vec![
                Line::from(vec![
                    Span::styled("Category ", p.dim()),
                    Span::styled(app.locale.category(&rule.category), p.normal()),
                    Span::styled("   Folder ", p.dim()),
                    Span::styled(folder, p.normal()),
                    Span::styled("   Type ", p.dim()),
                    Span::styled(
                        if rule.use_regex { "regex" } else { "text" },
                        p.normal(),
                    ),
                    Span::styled(format!("   {origin}"), p.dim()),
                ]),
                Line::from(vec![
                    Span::styled("Id ", p.dim()),
                    Span::styled(rule.id.as_str(), p.dim()),
                ]),
            ]
        }
        Some(ListRow::Folder { .. }) => vec![Line::from(Span::styled(
            "Enter expand/collapse | space toggle all | :rename-folder | :icon | :delete",
            p.dim(),
        ))],
        Some(ListRow::Category { .. }) => vec![Line::from(Span::styled(
            "Enter expand/collapse | space toggle all | :reenable <category> | :delete",
            p.dim(),
        ))],
        None => Vec::new(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.border(false));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
