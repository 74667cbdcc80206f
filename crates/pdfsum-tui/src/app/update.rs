use std::path::PathBuf;

use pdfsum_core::flows;
use pdfsum_core::{DownloadFormat, Notice, Transition, View};

use super::{App, InputMode, Modal};
use crate::action::Action;
use crate::tui_event::BackendCommand;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        if let Action::Tick = action {
            self.tick = self.tick.wrapping_add(1);
            self.expire_notice();
            return false;
        }

        // Quit confirmation: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit | Action::Yes => self.quit(),
                Action::Back | Action::No => self.confirm_quit = false,
                _ => {}
            }
            return self.should_quit;
        }

        if self.show_help {
            match action {
                Action::Quit => self.request_quit(),
                Action::ToggleHelp | Action::Back => self.show_help = false,
                _ => {}
            }
            return self.should_quit;
        }

        if self.modal.is_some() {
            self.update_modal(action);
            return self.should_quit;
        }

        if self.input_mode == InputMode::TextInput {
            self.update_path_input(action);
            return self.should_quit;
        }

        match action {
            Action::Quit => self.request_quit(),
            Action::ToggleHelp => self.show_help = true,
            Action::ShowUpload => self.switch_view(View::Upload),
            Action::ShowLibrary => self.switch_view(View::Library),
            Action::Back => {
                if self.state.view == View::Library {
                    self.switch_view(View::Upload);
                }
            }
            Action::Refresh => self.refresh_library(),
            Action::EditPath => {
                if !self.is_submitting() {
                    self.switch_view(View::Upload);
                    self.input_mode = InputMode::TextInput;
                }
            }
            Action::CycleMode => {
                if !self.is_submitting() {
                    let next = self.state.mode.next();
                    self.apply([Transition::ModeChanged(next)]);
                }
            }
            Action::TogglePreview => {
                self.scroll = 0;
                self.apply([Transition::TogglePreview]);
            }
            Action::MoveDown => self.move_cursor(1),
            Action::MoveUp => self.move_cursor(-1),
            Action::GoTop => {
                self.library_cursor = 0;
                self.scroll = 0;
            }
            Action::GoBottom => {
                self.library_cursor = self.state.documents.len().saturating_sub(1);
            }
            Action::ScrollDown => self.scroll = self.scroll.saturating_add(10),
            Action::ScrollUp => self.scroll = self.scroll.saturating_sub(10),
            Action::Confirm => match self.state.view {
                View::Upload => self.submit(),
                View::Library => self.open_highlighted(),
            },
            Action::Regenerate => {
                if let Some((id, _)) = self.target_document() {
                    self.modal = Some(Modal::Regenerate {
                        id,
                        mode: self.state.mode.clone(),
                    });
                } else {
                    self.apply([Transition::Notify(Notice::warning("Select a document first"))]);
                }
            }
            Action::Delete => {
                if let Some((id, name)) = self.target_document() {
                    self.modal = Some(Modal::ConfirmDelete { id, name });
                } else {
                    self.apply([Transition::Notify(Notice::warning("Select a document first"))]);
                }
            }
            Action::DownloadText => self.download(DownloadFormat::Txt),
            Action::DownloadPdf => self.download(DownloadFormat::Pdf),
            Action::CancelJob => {
                if self.polling.is_some() {
                    self.send(BackendCommand::CancelPoll);
                }
            }
            _ => {}
        }
        self.should_quit
    }

    /// Quit, asking first while a submission is in flight.
    fn request_quit(&mut self) {
        if self.is_submitting() {
            self.confirm_quit = true;
        } else {
            self.quit();
        }
    }

    fn quit(&mut self) {
        if self.is_submitting() {
            self.send(BackendCommand::CancelPoll);
        }
        self.should_quit = true;
    }

    fn switch_view(&mut self, view: View) {
        self.scroll = 0;
        self.apply([Transition::SwitchView(view)]);
        if view == View::Library && self.state.documents.is_empty() && !self.state.list_loading {
            self.refresh_library();
        }
    }

    pub(crate) fn refresh_library(&mut self) {
        self.apply([Transition::ListLoading]);
        self.send(BackendCommand::LoadLibrary);
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.state.view {
            View::Library => {
                let len = self.state.documents.len();
                if len == 0 {
                    return;
                }
                let next = self.library_cursor as isize + delta;
                self.library_cursor = next.clamp(0, len as isize - 1) as usize;
            }
            View::Upload => {
                self.scroll = if delta > 0 {
                    self.scroll.saturating_add(1)
                } else {
                    self.scroll.saturating_sub(1)
                };
            }
        }
    }

    fn submit(&mut self) {
        if self.is_submitting() {
            return;
        }
        if let Err(notice) = flows::validate_submission(self.state.selected_file.as_ref(), self.limit)
        {
            self.apply([Transition::Notify(notice)]);
            return;
        }
        let Some(file) = self.state.selected_file.clone() else {
            return;
        };
        let mode = self.state.mode.clone();
        self.scroll = 0;
        self.polling = Some((0, 0));
        self.apply([Transition::SubmitStarted]);
        self.send(BackendCommand::Submit { file, mode });
    }

    pub(crate) fn open(&mut self, id: String) {
        self.scroll = 0;
        let token = self.state.begin_selection(id);
        self.send(BackendCommand::LoadDetail(token));
    }

    fn open_highlighted(&mut self) {
        if let Some(id) = self.highlighted().map(|d| d.id.clone()) {
            self.open(id);
        }
    }

    fn download(&mut self, format: DownloadFormat) {
        match self.state.selected_id.clone() {
            Some(id) => self.send(BackendCommand::Download { id, format }),
            None => self.apply([Transition::Notify(Notice::no_document_selected())]),
        }
    }

    fn update_modal(&mut self, action: Action) {
        let Some(modal) = self.modal.take() else {
            return;
        };
        match (modal, action) {
            (_, Action::Quit) => self.request_quit(),
            (_, Action::Back | Action::No) => {}
            (Modal::Regenerate { id, mode }, Action::CycleMode | Action::MoveDown) => {
                self.modal = Some(Modal::Regenerate {
                    id,
                    mode: mode.next(),
                });
            }
            (Modal::Regenerate { id, mode }, Action::Confirm | Action::Yes) => {
                self.apply([Transition::RegenerateStarted]);
                let selection = self.state.selection_seq();
                self.send(BackendCommand::Regenerate {
                    id,
                    mode,
                    selection,
                });
            }
            (Modal::ConfirmDelete { id, .. }, Action::Confirm | Action::Yes) => {
                self.send(BackendCommand::Delete { id });
            }
            (modal, _) => self.modal = Some(modal),
        }
    }

    fn update_path_input(&mut self, action: Action) {
        match action {
            Action::Quit => self.request_quit(),
            Action::Back => self.input_mode = InputMode::Normal,
            Action::Confirm => {
                self.input_mode = InputMode::Normal;
                let path = self.path_input.trim();
                if !path.is_empty() {
                    self.send(BackendCommand::OpenFile(PathBuf::from(path)));
                }
            }
            Action::TextInput(c) => self.path_input.push(c),
            Action::Backspace => {
                self.path_input.pop();
            }
            _ => {}
        }
    }
}
