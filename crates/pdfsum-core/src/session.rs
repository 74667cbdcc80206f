//! Sequential driver that runs flows against a [`ViewState`] it owns.
//!
//! The CLI and the integration tests use this; the TUI runs the same flows
//! on a background task and applies their transitions itself.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::SummaryApi;
use crate::flows::{self, UploadLimit};
use crate::model::{DownloadFormat, Mode};
use crate::notice::Notice;
use crate::poll::{PollConfig, PollEvent};
use crate::state::{Transition, View, ViewState};
use crate::upload::UploadFile;
use crate::Config;

pub struct Session {
    api: Arc<dyn SummaryApi>,
    state: ViewState,
    poll: PollConfig,
    limit: UploadLimit,
    download_dir: PathBuf,
}

impl Session {
    pub fn new(api: Arc<dyn SummaryApi>, config: &Config) -> Self {
        Self {
            api,
            state: ViewState::new(config.default_mode.clone()),
            poll: config.poll_config(),
            limit: config.upload_limit(),
            download_dir: config.download_dir.clone(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.state.take_notice()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.state.apply(Transition::ModeChanged(mode));
    }

    /// Pick a file and, if it is accepted, load its preview.
    /// Returns whether the file was accepted.
    pub async fn choose_file(&mut self, file: UploadFile) -> bool {
        let transition = flows::choose_file(file, self.limit);
        let accepted = matches!(transition, Transition::FileChosen(_));
        self.state.apply(transition);
        if let Some(file) = self.state.selected_file.clone().filter(|_| accepted) {
            let preview = flows::fetch_preview(self.api.as_ref(), &file).await;
            self.state.apply(preview);
        }
        accepted
    }

    /// Submit the chosen file and wait for its summary.
    ///
    /// Returns `true` when a finished summary was applied.
    pub async fn submit(
        &mut self,
        cancel: &CancellationToken,
        on_event: impl FnMut(PollEvent),
    ) -> bool {
        if let Err(notice) = flows::validate_submission(self.state.selected_file.as_ref(), self.limit)
        {
            self.state.apply(Transition::Notify(notice));
            return false;
        }
        let Some(file) = self.state.selected_file.clone() else {
            return false;
        };
        let mode = self.state.mode.clone();

        self.state.apply(Transition::SubmitStarted);
        let transitions = flows::submit(
            self.api.as_ref(),
            &file,
            &mode,
            self.limit,
            self.poll,
            cancel,
            on_event,
        )
        .await;
        let resolved = transitions
            .iter()
            .any(|t| matches!(t, Transition::SubmitResolved { .. }));
        self.state.apply_all(transitions);
        resolved
    }

    /// Reload the document list. Returns whether it was replaced.
    pub async fn refresh_library(&mut self) -> bool {
        self.state.apply(Transition::ListLoading);
        let loaded = flows::load_library(self.api.as_ref()).await;
        let ok = matches!(loaded, Transition::ListLoaded(_));
        self.state.apply(loaded);
        ok
    }

    /// Load detail and history for `id`. Returns whether it was applied.
    pub async fn open(&mut self, id: &str) -> bool {
        let token = self.state.begin_selection(id);
        let loaded = flows::load_detail(self.api.as_ref(), token).await;
        let ok = matches!(loaded, Transition::DetailLoaded { .. });
        self.state.apply(loaded) && ok
    }

    /// Regenerate the summary of `id`, then reload the list and its detail.
    pub async fn regenerate(&mut self, id: &str, mode: &Mode) -> bool {
        self.state.apply(Transition::RegenerateStarted);
        match flows::regenerate(self.api.as_ref(), id, mode).await {
            Ok(()) => {
                self.refresh_library().await;
                self.open(id).await
            }
            Err(notice) => {
                self.state.apply_all([
                    Transition::Notify(notice),
                    Transition::LoadingFinished(View::Library),
                ]);
                false
            }
        }
    }

    /// Delete `id` after `confirm` agrees. Declining sends nothing.
    pub async fn delete(&mut self, id: &str, confirm: impl FnOnce(&str) -> bool) -> bool {
        if !confirm("Delete this file?") {
            return false;
        }
        let transitions = flows::delete(self.api.as_ref(), id).await;
        let deleted = transitions
            .iter()
            .any(|t| matches!(t, Transition::Deleted { .. }));
        self.state.apply_all(transitions);
        deleted
    }

    /// Save the selected document's summary as `format`.
    pub async fn download(&mut self, format: DownloadFormat) -> Result<PathBuf, Notice> {
        let result = flows::download(
            self.api.as_ref(),
            self.state.selected_id.as_deref(),
            format,
            &self.download_dir,
        )
        .await;
        self.state.apply(flows::download_notice(result.clone()));
        result
    }
}
