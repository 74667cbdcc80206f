use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use pdfsum_core::View;

use crate::app::App;
use crate::view::{format_size, spinner_char, truncate};

/// Render the document list beside the selected document's summary.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = if area.width >= 100 {
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).split(area)
    } else {
        Layout::vertical([Constraint::Percentage(40), Constraint::Percentage(60)]).split(area)
    };

    render_table(f, chunks[0], app);

    if app.state.is_loading(View::Library) {
        render_loading(f, chunks[1], app);
    } else if app.state.selected_id.is_some() {
        crate::view::summary::render(f, chunks[1], &app.state, &app.theme, app.scroll);
    } else {
        let hint = Paragraph::new(Span::styled(
            " Press Enter to open the highlighted document",
            Style::default().fg(app.theme.dim),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border_style()),
        );
        f.render_widget(hint, chunks[1]);
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let title = if app.state.list_loading {
        format!(" {} Documents ", spinner_char(app.tick))
    } else {
        format!(" Documents ({}) ", app.state.documents.len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(title);

    if app.state.documents.is_empty() {
        let msg = if app.state.list_loading {
            "Loading..."
        } else {
            "No documents yet. Press R to refresh."
        };
        let p = Paragraph::new(Span::styled(msg, Style::default().fg(theme.dim))).block(block);
        f.render_widget(p, area);
        return;
    }

    let header = Row::new(["Name", "Status", "Size"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
    }))
    .height(1);

    let name_width = (area.width as usize).saturating_sub(24);
    let rows: Vec<Row> = app
        .state
        .documents
        .iter()
        .map(|doc| {
            let status = doc.summary_status.as_ref();
            let marker = if app.state.selected_id.as_deref() == Some(doc.id.as_str()) {
                "\u{25B8} "
            } else {
                "  "
            };
            Row::new(vec![
                Cell::from(Line::from(vec![
                    Span::styled(marker, Style::default().fg(theme.active)),
                    Span::raw(truncate(&doc.original_name, name_width)),
                ])),
                Cell::from(status.map(|s| s.as_str()).unwrap_or("-").to_string())
                    .style(Style::default().fg(theme.status_color(status))),
                Cell::from(doc.size_bytes.map(format_size).unwrap_or_default())
                    .style(Style::default().fg(theme.dim)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(10),
            Constraint::Length(9),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(theme.highlight_style());

    let mut state = TableState::default().with_selected(Some(app.library_cursor));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_loading(f: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", spinner_char(app.tick)),
            Style::default().fg(app.theme.spinner),
        ),
        Span::styled("Loading summary...", Style::default().fg(app.theme.text)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style());
    f.render_widget(Paragraph::new(line).block(block), area);
}
