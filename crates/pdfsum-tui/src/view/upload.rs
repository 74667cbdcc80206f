use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use pdfsum_core::{Mode, View};

use crate::app::{App, InputMode};
use crate::theme::Theme;
use crate::view::{format_size, spinner_char, truncate};

/// Render the upload form: file path, mode selector, then the preview,
/// submission progress or resulting summary.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(3),
    ])
    .split(area);

    render_path(f, chunks[0], app);
    render_modes(f, chunks[1], app, &app.theme);

    let body = chunks[2];
    if app.state.is_loading(View::Upload) {
        render_progress(f, body, app);
    } else if app.state.show_preview {
        render_preview(f, body, app);
    } else if app.state.summary_text.is_some() || app.state.metadata.is_some() {
        crate::view::summary::render(f, body, &app.state, &app.theme, app.scroll);
    } else {
        render_placeholder(f, body, &app.theme);
    }
}

fn render_path(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let editing = app.input_mode == InputMode::TextInput;

    let line = if editing {
        Line::from(vec![
            Span::styled(app.path_input.as_str(), Style::default().fg(theme.text)),
            Span::styled("\u{2588}", Style::default().fg(theme.active)),
        ])
    } else if let Some(file) = &app.state.selected_file {
        let width = (area.width as usize).saturating_sub(16);
        Line::from(vec![
            Span::styled(
                truncate(&file.name, width),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", format_size(file.size())),
                Style::default().fg(theme.dim),
            ),
        ])
    } else {
        Line::from(Span::styled(
            "No file chosen (press o to enter a path)",
            Style::default().fg(theme.dim),
        ))
    };

    let border = if editing {
        Style::default().fg(theme.active)
    } else {
        theme.border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" PDF (max {}MB) ", app.limit.max_mb));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_modes(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let mut spans = vec![Span::styled(" Mode:", Style::default().fg(theme.dim))];
    for mode in Mode::all() {
        let style = if *mode == app.state.mode {
            theme.highlight_style().fg(theme.active)
        } else {
            Style::default().fg(theme.dim)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} ", mode.label()), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_progress(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let message = match app.polling {
        Some((attempt, max)) if max > 0 => {
            format!("Waiting for summary ({attempt}/{max})  c: stop waiting")
        }
        _ => "Uploading...".to_string(),
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ),
        Span::styled(message, Style::default().fg(theme.text)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Summarizing ");
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_preview(f: &mut Frame, area: Rect, app: &App) {
    let text = app.state.preview.as_deref().unwrap_or_default();
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border_style())
                .title(" Preview (p to hide) "),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    f.render_widget(paragraph, area);
}

fn render_placeholder(f: &mut Frame, area: Rect, theme: &Theme) {
    let dim = Style::default().fg(theme.dim);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Choose a PDF with o, pick a mode with m,", dim)),
        Line::from(Span::styled("  then press Enter to summarize it.", dim)),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    f.render_widget(Paragraph::new(lines).block(block), area);
}
