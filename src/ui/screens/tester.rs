use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::ui::app::{App, EditTarget, InputMode};
use crate::ui::theme::Palette;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Min(4),
        ])
        .split(area);

    let editing = app.input_mode == InputMode::Editing && app.edit_target == EditTarget::TestInput;
    let input = if editing {
        app.command_input.as_str()
    } else {
        app.test_input.as_str()
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.border(editing))
        .title(Span::styled(
            format!(" {} ", app.locale.translate("test.inputLabel", &[])),
            p.title(editing),
        ));
    let input_text = if input.is_empty() && !editing {
        Paragraph::new(Span::styled(
            "Press e to type sample text, or use :test <text>",
            p.dim(),
        ))
    } else {
        Paragraph::new(input).style(p.normal())
    };
    f.render_widget(input_text.wrap(Wrap { trim: false }).block(input_block), chunks[0]);

    let (output, summary) = match &app.test_outcome {
        Some(outcome) if outcome.matches > 0 => (
            outcome.text.as_str(),
            app.locale
                .translate("test.matches", &[("count", &outcome.matches.to_string())]),
        ),
        Some(outcome) => (
            outcome.text.as_str(),
            app.locale.translate("test.noMatches", &[]),
        ),
        None => ("", String::new()),
    };
    let output_block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.border(false))
        .title(Span::styled(
            format!(
                " {} {summary} ",
                app.locale.translate("test.outputLabel", &[])
            ),
            p.title(false),
        ));
    f.render_widget(
        Paragraph::new(output)
            .style(p.normal())
            .wrap(Wrap { trim: false })
            .block(output_block),
        chunks[1],
    );

    render_hits(f, chunks[2], app, p);
}

fn render_hits(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let mut items: Vec<ListItem> = Vec::new();
    if let Some(outcome) = &app.test_outcome {
        for hit in &outcome.hits {
            let name = app
                .filters
                .iter()
                .find(|r| r.id == hit.id)
                .map(|r| r.display_name(&app.locale))
                .unwrap_or_else(|| hit.id.clone());
            items.push(ListItem::new(Line::from(vec![
                Span::styled(format!("{:>4}× ", hit.matches), p.enabled()),
                Span::styled(name, p.normal()),
            ])));
        }
        for skipped in &outcome.skipped {
            items.push(ListItem::new(Line::from(vec![
                Span::styled("   ! ", p.disabled()),
                Span::styled(
                    format!("'{}' skipped: {}", skipped.pattern, skipped.reason),
                    p.dim(),
                ),
            ])));
        }
    }

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(p.border(false))
            .title(Span::styled(" Matched filters ", p.title(false))),
    );
    f.render_widget(list, area);
}
