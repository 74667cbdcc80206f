mod backend;
mod update;


use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc;

use pdfsum_core::flows::UploadLimit;
use pdfsum_core::{DocumentListItem, Mode, Notice, Transition, View, ViewState};

use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// How long a notice stays in the footer, in ticks.
const NOTICE_TICKS: usize = 60;

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Editing the file path on the upload view.
    TextInput,
}

/// A popup that captures input until it is confirmed or dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Regenerate { id: String, mode: Mode },
    ConfirmDelete { id: String, name: String },
}

pub struct App {
    pub state: ViewState,
    pub theme: Theme,
    pub input_mode: InputMode,
    pub modal: Option<Modal>,
    pub confirm_quit: bool,
    pub show_help: bool,
    pub should_quit: bool,
    pub tick: usize,

    /// Highlighted row in the library list.
    pub library_cursor: usize,
    /// Vertical scroll of the summary or preview pane.
    pub scroll: u16,
    pub path_input: String,
    /// `(attempt, max_attempts)` while a submission is polling.
    pub polling: Option<(u32, u32)>,
    /// The notice shown in the footer and the tick it was shown at.
    pub notice: Option<(Notice, usize)>,

    pub limit: UploadLimit,
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(mode: Mode, limit: UploadLimit, theme: Theme) -> Self {
        Self {
            state: ViewState::new(mode),
            theme,
            input_mode: InputMode::Normal,
            modal: None,
            confirm_quit: false,
            show_help: false,
            should_quit: false,
            tick: 0,
            library_cursor: 0,
            scroll: 0,
            path_input: String::new(),
            polling: None,
            notice: None,
            limit,
            backend_cmd_tx: None,
        }
    }

    /// Send a command to the backend task, if one is attached.
    pub fn send(&self, cmd: BackendCommand) {
        if let Some(tx) = &self.backend_cmd_tx {
            if tx.send(cmd).is_err() {
                tracing::warn!("backend channel closed");
            }
        }
    }

    /// Apply transitions and move any new notice into the footer.
    pub fn apply(&mut self, transitions: impl IntoIterator<Item = Transition>) {
        self.state.apply_all(transitions);
        if let Some(notice) = self.state.take_notice() {
            self.notice = Some((notice, self.tick));
        }
        let len = self.state.documents.len();
        if self.library_cursor >= len {
            self.library_cursor = len.saturating_sub(1);
        }
    }

    /// Whether a submission is uploading or polling.
    pub fn is_submitting(&self) -> bool {
        self.state.is_loading(View::Upload)
    }

    pub fn highlighted(&self) -> Option<&DocumentListItem> {
        self.state.documents.get(self.library_cursor)
    }

    /// The document that regenerate and delete act on: the highlighted row
    /// in the library, otherwise the document currently shown.
    pub fn target_document(&self) -> Option<(String, String)> {
        if self.state.view == View::Library {
            if let Some(doc) = self.highlighted() {
                return Some((doc.id.clone(), doc.original_name.clone()));
            }
        }
        let id = self.state.selected_id.clone()?;
        let name = self
            .state
            .detail
            .as_ref()
            .and_then(|d| d.original_name.clone())
            .unwrap_or_else(|| id.clone());
        Some((id, name))
    }

    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        self.render_tabs(f, chunks[0]);
        match self.state.view {
            View::Upload => crate::view::upload::render(f, chunks[1], self),
            View::Library => crate::view::library::render(f, chunks[1], self),
        }
        self.render_footer(f, chunks[2]);

        if let Some(modal) = &self.modal {
            crate::view::modal::render(f, modal, &self.theme);
        }
        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
        if self.confirm_quit {
            crate::view::modal::render_quit(f, &self.theme);
        }
    }

    fn render_tabs(&self, f: &mut ratatui::Frame, area: Rect) {
        let theme = &self.theme;
        let mut spans = vec![Span::styled(" pdfsum ", theme.header_style())];
        for view in [View::Upload, View::Library] {
            let style = if view == self.state.view {
                theme.highlight_style().fg(theme.active)
            } else {
                ratatui::style::Style::default().fg(theme.dim)
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!(" {} ", view.label()), style));
        }
        spans.push(Span::styled(
            format!("  mode: {}", self.state.mode.label()),
            ratatui::style::Style::default().fg(theme.text),
        ));
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_footer(&self, f: &mut ratatui::Frame, area: Rect) {
        let theme = &self.theme;
        let line = match &self.notice {
            Some((notice, _)) => Line::from(Span::styled(
                format!(" {}", notice.text),
                ratatui::style::Style::default().fg(theme.notice_color(notice.level)),
            )),
            None => {
                let hints = match (self.state.view, &self.input_mode) {
                    (_, InputMode::TextInput) => " Enter:open  Esc:cancel",
                    (View::Upload, _) => {
                        " o:file  m:mode  p:preview  Enter:submit  l:library  ?:help  q:quit"
                    }
                    (View::Library, _) => {
                        " j/k:move  Enter:open  r:regenerate  d:delete  t/P:download  R:refresh  u:upload  q:quit"
                    }
                };
                Line::from(Span::styled(hints, theme.footer_style()))
            }
        };
        f.render_widget(Paragraph::new(line), area);
    }

    fn expire_notice(&mut self) {
        if let Some((_, shown_at)) = self.notice {
            if self.tick.wrapping_sub(shown_at) >= NOTICE_TICKS {
                self.notice = None;
            }
        }
    }
}
