use ratatui::style::{Color, Modifier, Style};

use pdfsum_core::SummaryStatus;
use pdfsum_core::notice::NoticeLevel;

/// Color theme for the TUI.
pub struct Theme {
    pub success: Color,
    pub pending: Color,
    pub failed: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub spinner: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Deep blue header with bright accents.
    pub fn default_theme() -> Self {
        Self {
            success: Color::Rgb(0, 200, 80),
            pending: Color::Rgb(255, 200, 0),
            failed: Color::Rgb(255, 80, 80),

            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            highlight_bg: Color::Rgb(30, 40, 80),
            active: Color::Rgb(60, 140, 255),
            spinner: Color::Rgb(60, 140, 255),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
        }
    }

    /// Plain 16-color theme for terminals without truecolor.
    pub fn mono() -> Self {
        Self {
            success: Color::Green,
            pending: Color::Yellow,
            failed: Color::Red,

            header_fg: Color::Black,
            header_bg: Color::White,
            border: Color::DarkGray,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::DarkGray,
            active: Color::Cyan,
            spinner: Color::Cyan,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    /// Pick a theme by name, falling back to the default.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("mono") => Self::mono(),
            _ => Self::default_theme(),
        }
    }

    pub fn status_color(&self, status: Option<&SummaryStatus>) -> Color {
        match status {
            Some(SummaryStatus::Success) => self.success,
            Some(SummaryStatus::Pending) => self.pending,
            Some(SummaryStatus::Failed) => self.failed,
            _ => self.dim,
        }
    }

    pub fn notice_color(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Info => self.active,
            NoticeLevel::Warning => self.pending,
            NoticeLevel::Error => self.failed,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
