//! The client's view state and the transitions that change it.
//!
//! Flows never touch [`ViewState`] directly. They return [`Transition`]
//! values, and the owner of the state applies them in order. Detail loads
//! carry a [`SelectionToken`]; results for a superseded selection are
//! dropped so a slow response can never overwrite a newer one.

use crate::model::{
    DocumentDetail, DocumentListItem, HistoryEntry, Metadata, Mode, Stats,
};
use crate::normalize::{metadata_from_summary, stats_from_summary};
use crate::notice::Notice;
use crate::upload::UploadFile;

/// Top-level view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Upload,
    Library,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            Self::Upload => "Upload",
            Self::Library => "Library",
        }
    }
}

/// Identifies one detail load. Only the token from the latest
/// [`ViewState::begin_selection`] is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionToken {
    pub seq: u64,
    pub id: String,
}

#[derive(Debug, Clone)]
pub enum Transition {
    /// A file passed validation and is now the form's file.
    FileChosen(UploadFile),
    /// A file failed validation; the form is left without a file.
    FileRejected(Notice),
    /// Extracted text for the form file named `file`.
    PreviewLoaded {
        file: String,
        text: String,
    },
    PreviewUnavailable {
        file: String,
    },
    ModeChanged(Mode),
    SwitchView(View),
    TogglePreview,
    SubmitStarted,
    /// The poll loop saw a finished summary for `id`.
    SubmitResolved {
        id: String,
        detail: DocumentDetail,
    },
    ListLoading,
    ListLoaded(Vec<DocumentListItem>),
    ListFailed,
    DetailLoaded {
        token: SelectionToken,
        detail: DocumentDetail,
        history: Vec<HistoryEntry>,
    },
    DetailFailed {
        token: SelectionToken,
    },
    RegenerateStarted,
    Deleted {
        id: String,
    },
    Notify(Notice),
    /// The long-running operation behind this view's spinner ended.
    LoadingFinished(View),
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub view: View,
    /// Spinner flags, one per view; a submission and a detail load can
    /// run at the same time.
    pub upload_loading: bool,
    pub library_loading: bool,
    pub list_loading: bool,
    pub documents: Vec<DocumentListItem>,

    pub selected_id: Option<String>,
    pub detail: Option<DocumentDetail>,
    pub summary_text: Option<String>,
    pub takeaways: Vec<String>,
    pub stats: Option<Stats>,
    pub metadata: Option<Metadata>,
    pub process_time_ms: Option<u64>,
    pub history: Vec<HistoryEntry>,

    pub selected_file: Option<UploadFile>,
    pub mode: Mode,
    pub preview: Option<String>,
    pub show_preview: bool,

    /// Latest message for the user; front-ends take it when shown.
    pub notice: Option<Notice>,

    selection_seq: u64,
}

impl ViewState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn is_loading(&self, view: View) -> bool {
        match view {
            View::Upload => self.upload_loading,
            View::Library => self.library_loading,
        }
    }

    /// Sequence of the latest selection. Anything started under an older
    /// value has been superseded.
    pub fn selection_seq(&self) -> u64 {
        self.selection_seq
    }

    fn is_form_file(&self, name: &str) -> bool {
        self.selected_file.as_ref().is_some_and(|f| f.name == name)
    }

    /// Start a detail load for `id`: switch to the library view, mark it
    /// loading and invalidate every earlier token.
    pub fn begin_selection(&mut self, id: impl Into<String>) -> SelectionToken {
        self.selection_seq += 1;
        self.view = View::Library;
        self.library_loading = true;
        SelectionToken {
            seq: self.selection_seq,
            id: id.into(),
        }
    }

    pub fn is_current(&self, token: &SelectionToken) -> bool {
        token.seq == self.selection_seq
    }

    /// Apply one transition. Returns `false` when it was ignored as stale.
    pub fn apply(&mut self, transition: Transition) -> bool {
        match transition {
            Transition::FileChosen(file) => {
                self.reset_form_output();
                self.selected_file = Some(file);
            }
            Transition::FileRejected(notice) => {
                self.reset_form_output();
                self.selected_file = None;
                self.notice = Some(notice);
            }
            Transition::PreviewLoaded { file, text } => {
                if !self.is_form_file(&file) {
                    tracing::debug!(%file, "dropping preview for a replaced file");
                    return false;
                }
                self.preview = Some(text);
                self.show_preview = true;
            }
            Transition::PreviewUnavailable { file } => {
                if !self.is_form_file(&file) {
                    return false;
                }
                self.preview = None;
                self.show_preview = false;
            }
            Transition::ModeChanged(mode) => self.mode = mode,
            Transition::SwitchView(view) => self.view = view,
            Transition::TogglePreview => {
                self.show_preview = !self.show_preview && self.preview.is_some();
            }
            Transition::SubmitStarted => {
                self.upload_loading = true;
                self.clear_summary();
            }
            Transition::SubmitResolved { id, detail } => {
                // A finished submission replaces whatever selection was loading.
                self.selection_seq += 1;
                self.library_loading = false;
                self.show_summary(&detail);
                self.detail = Some(detail);
                self.history.clear();
                self.selected_id = Some(id);
            }
            Transition::ListLoading => self.list_loading = true,
            Transition::ListLoaded(documents) => {
                self.documents = documents;
                self.list_loading = false;
            }
            Transition::ListFailed => self.list_loading = false,
            Transition::DetailLoaded {
                token,
                detail,
                history,
            } => {
                if !self.is_current(&token) {
                    tracing::debug!(id = %token.id, seq = token.seq, "dropping stale detail");
                    return false;
                }
                self.show_summary(&detail);
                self.detail = Some(detail);
                self.history = history;
                self.selected_id = Some(token.id);
                self.library_loading = false;
            }
            Transition::DetailFailed { token } => {
                if !self.is_current(&token) {
                    return false;
                }
                self.library_loading = false;
            }
            Transition::RegenerateStarted => {
                self.view = View::Library;
                self.library_loading = true;
            }
            Transition::Deleted { id } => {
                self.documents.retain(|d| d.id != id);
                if self.selected_id.as_deref() == Some(id.as_str()) {
                    self.selection_seq += 1;
                    self.selected_id = None;
                    self.detail = None;
                    self.history.clear();
                    self.clear_summary();
                    self.view = View::Upload;
                    self.library_loading = false;
                }
            }
            Transition::Notify(notice) => self.notice = Some(notice),
            Transition::LoadingFinished(View::Upload) => self.upload_loading = false,
            Transition::LoadingFinished(View::Library) => self.library_loading = false,
        }
        true
    }

    /// Apply transitions in order.
    pub fn apply_all(&mut self, transitions: impl IntoIterator<Item = Transition>) {
        for t in transitions {
            self.apply(t);
        }
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    fn clear_summary(&mut self) {
        self.summary_text = None;
        self.takeaways.clear();
        self.stats = None;
        self.metadata = None;
        self.process_time_ms = None;
    }

    fn reset_form_output(&mut self) {
        self.clear_summary();
        self.preview = None;
        self.show_preview = false;
    }

    fn show_summary(&mut self, detail: &DocumentDetail) {
        let s = &detail.summary;
        self.summary_text = s.summary_text.clone().filter(|t| !t.is_empty());
        self.process_time_ms = s.process_time_ms.filter(|ms| *ms > 0);
        self.takeaways = s.takeaways.clone();
        self.stats = stats_from_summary(s);
        self.metadata = Some(metadata_from_summary(s));
    }
}
