use pdfsum_core::flows;
use pdfsum_core::{Notice, PollEvent, Transition, View};

use super::App;
use crate::tui_event::{BackendCommand, BackendEvent};

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::FileRead(Ok(file)) => {
                let transition = flows::choose_file(file, self.limit);
                let accepted = matches!(transition, Transition::FileChosen(_));
                self.scroll = 0;
                self.apply([transition]);
                if let Some(file) = self.state.selected_file.clone().filter(|_| accepted) {
                    self.send(BackendCommand::Preview(file));
                }
            }
            BackendEvent::FileRead(Err(message)) => {
                self.apply([Transition::Notify(Notice::error(message))]);
            }
            BackendEvent::Transitions(transitions) => {
                let finished = transitions
                    .iter()
                    .any(|t| matches!(t, Transition::LoadingFinished(View::Upload)));
                self.apply(transitions);
                if finished {
                    self.polling = None;
                }
            }
            BackendEvent::Poll(PollEvent::Waiting {
                attempt,
                max_attempts,
            }) => {
                self.polling = Some((attempt, max_attempts));
            }
            BackendEvent::Poll(PollEvent::Checked { attempt, status }) => {
                tracing::debug!(attempt, ?status, "poll attempt");
            }
            BackendEvent::Regenerated {
                id,
                selection,
                outcome,
            } => {
                // Something was opened after the request went out; leave it
                let current = self.state.selection_seq() == selection;
                match outcome {
                    Ok(()) => {
                        self.refresh_library();
                        if current {
                            self.open(id);
                        } else {
                            tracing::debug!(%id, "regenerated document no longer selected");
                        }
                    }
                    Err(notice) => {
                        let mut transitions = vec![Transition::Notify(notice)];
                        if current {
                            transitions.push(Transition::LoadingFinished(View::Library));
                        }
                        self.apply(transitions);
                    }
                }
            }
        }
    }
}
