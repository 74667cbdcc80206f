use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use pdfsum_core::Mode;

use crate::app::Modal;
use crate::theme::Theme;
use crate::view::{centered_rect, truncate};

/// Render the regenerate or delete popup.
pub fn render(f: &mut Frame, modal: &Modal, theme: &Theme) {
    match modal {
        Modal::Regenerate { mode, .. } => render_regenerate(f, mode, theme),
        Modal::ConfirmDelete { name, .. } => render_delete(f, name, theme),
    }
}

fn key(k: &str, color: ratatui::style::Color) -> Span<'static> {
    Span::styled(
        k.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn render_regenerate(f: &mut Frame, selected: &Mode, theme: &Theme) {
    let popup = centered_rect(44, 8, f.area());

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Regenerate with mode:",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
    ];
    let mut modes = vec![Span::raw("  ")];
    for mode in Mode::all() {
        let style = if mode == selected {
            theme.highlight_style().fg(theme.active)
        } else {
            Style::default().fg(theme.dim)
        };
        modes.push(Span::styled(format!(" {} ", mode.label()), style));
    }
    lines.push(Line::from(modes));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("  "),
        key("m", theme.active),
        Span::styled(": mode   ", Style::default().fg(theme.dim)),
        key("Enter", theme.success),
        Span::styled(": go   ", Style::default().fg(theme.dim)),
        key("Esc", theme.active),
        Span::styled(": cancel", Style::default().fg(theme.dim)),
    ]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.active))
            .title(" Regenerate Summary "),
    );
    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn render_delete(f: &mut Frame, name: &str, theme: &Theme) {
    let popup = centered_rect(48, 6, f.area());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  Delete {}?", truncate(name, 36)),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("  "),
            key("y", theme.failed),
            Span::styled(": delete   ", Style::default().fg(theme.dim)),
            key("n / Esc", theme.active),
            Span::styled(": cancel", Style::default().fg(theme.dim)),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.failed))
            .title(" Delete File "),
    );
    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

/// Render the quit confirmation dialog shown while a submission is running.
pub fn render_quit(f: &mut Frame, theme: &Theme) {
    let popup = centered_rect(46, 6, f.area());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  A summary is still running. Quit anyway?",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("  "),
            key("q", theme.failed),
            Span::styled(": quit   ", Style::default().fg(theme.dim)),
            key("Esc", theme.active),
            Span::styled(": cancel", Style::default().fg(theme.dim)),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.failed))
            .title(" Confirm Quit "),
    );
    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
