use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let popup = centered_rect(60, 30, f.area());

    let lines = vec![
        Line::from(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_header("Views", theme),
        key_line("u", "Upload view", theme),
        key_line("l", "Library view", theme),
        key_line("Esc", "Back / close popup", theme),
        Line::from(""),
        section_header("Upload", theme),
        key_line("o", "Enter the path of a PDF", theme),
        key_line("m / Tab", "Cycle summary mode", theme),
        key_line("p", "Show / hide preview", theme),
        key_line("Enter", "Submit and wait for the summary", theme),
        key_line("c", "Stop waiting for the summary", theme),
        Line::from(""),
        section_header("Library", theme),
        key_line("j / \u{2193}", "Move down", theme),
        key_line("k / \u{2191}", "Move up", theme),
        key_line("PgDn / PgUp", "Scroll summary", theme),
        key_line("Enter", "Open highlighted document", theme),
        key_line("r", "Regenerate summary", theme),
        key_line("d", "Delete document", theme),
        key_line("t / P", "Download summary as text / PDF", theme),
        key_line("R", "Refresh list", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q", "Quit", theme),
        key_line("Ctrl+c", "Force quit", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<16}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
