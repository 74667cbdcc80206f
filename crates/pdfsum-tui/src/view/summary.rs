use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use pdfsum_core::ViewState;

use crate::theme::Theme;

/// Render the summary currently held in the view state, with its
/// statistics, takeaways and version history.
pub fn render(f: &mut Frame, area: Rect, state: &ViewState, theme: &Theme, scroll: u16) {
    let title = state
        .detail
        .as_ref()
        .and_then(|d| d.original_name.as_deref())
        .or(state.selected_id.as_deref())
        .map(|n| format!(" {n} "))
        .unwrap_or_else(|| " Summary ".to_string());

    let paragraph = Paragraph::new(lines(state, theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(title),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

fn lines<'a>(state: &'a ViewState, theme: &Theme) -> Vec<Line<'a>> {
    let bold = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(theme.dim);
    let mut out = Vec::new();

    if let Some(meta) = &state.metadata {
        let status = meta.status.as_ref();
        let mut spans = vec![Span::styled(
            status.map(|s| s.as_str()).unwrap_or("-").to_string(),
            Style::default().fg(theme.status_color(status)),
        )];
        if let Some(lang) = &meta.language {
            spans.push(Span::styled(format!("  language: {lang}"), dim));
        }
        if let Some(updated) = meta.updated_at.as_ref().or(meta.created_at.as_ref()) {
            spans.push(Span::styled(format!("  updated {updated}"), dim));
        }
        out.push(Line::from(spans));
    }

    if let Some(err) = state
        .detail
        .as_ref()
        .and_then(|d| d.summary.error_message.as_deref())
    {
        out.push(Line::from(Span::styled(err, Style::default().fg(theme.failed))));
    }

    let mut facts = Vec::new();
    if let Some(stats) = state.stats {
        facts.push(format!(
            "{} pages, {} words, ~{} min read",
            stats.pages, stats.words, stats.reading_time_minutes
        ));
    }
    if let Some(ms) = state.process_time_ms {
        facts.push(format!("processed in {:.1}s", ms as f64 / 1000.0));
    }
    if !facts.is_empty() {
        out.push(Line::from(Span::styled(facts.join(" | "), dim)));
    }
    out.push(Line::from(""));

    match state.summary_text.as_deref() {
        Some(text) => out.extend(text.lines().map(Line::from)),
        None => out.push(Line::from(Span::styled("No summary text.", dim))),
    }

    if !state.takeaways.is_empty() {
        out.push(Line::from(""));
        out.push(Line::from(Span::styled("Key takeaways", bold)));
        for t in &state.takeaways {
            out.push(Line::from(format!("  \u{2022} {t}")));
        }
    }

    if !state.history.is_empty() {
        out.push(Line::from(""));
        out.push(Line::from(Span::styled("History", bold)));
        for entry in &state.history {
            let version = entry
                .version
                .map(|v| format!("v{v}"))
                .unwrap_or_else(|| "v?".into());
            let mut spans = vec![
                Span::styled(format!("  {version:<4}"), Style::default().fg(theme.text)),
                Span::styled(
                    format!(" {:<9}", entry.mode.as_ref().map(|m| m.label()).unwrap_or("-")),
                    dim,
                ),
                Span::styled(
                    format!(" {}", entry.created_at.as_deref().unwrap_or("")),
                    dim,
                ),
            ];
            if entry.is_latest {
                spans.push(Span::styled(
                    "  latest",
                    Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
                ));
            }
            out.push(Line::from(spans));
        }
    }
    out
}
