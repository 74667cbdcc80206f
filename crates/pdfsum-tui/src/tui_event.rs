use std::path::PathBuf;

use pdfsum_core::{
    DownloadFormat, Mode, Notice, PollEvent, SelectionToken, Transition, UploadFile,
};

/// Commands sent from the TUI to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Read a PDF from disk so it can become the form's file.
    OpenFile(PathBuf),
    /// Ask the backend for the extracted text of an accepted file.
    Preview(UploadFile),
    /// Upload and poll until the summary resolves.
    Submit { file: UploadFile, mode: Mode },
    /// Stop waiting on the current submission.
    CancelPoll,
    LoadLibrary,
    /// Load detail and history for the selection this token names.
    LoadDetail(SelectionToken),
    /// `selection` is the view state's selection sequence when the user
    /// confirmed, echoed back in [`BackendEvent::Regenerated`].
    Regenerate {
        id: String,
        mode: Mode,
        selection: u64,
    },
    Delete { id: String },
    Download { id: String, format: DownloadFormat },
}

/// Events flowing from the backend tasks to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// Result of [`BackendCommand::OpenFile`].
    FileRead(Result<UploadFile, String>),
    /// View-state changes to apply in order.
    Transitions(Vec<Transition>),
    /// Progress from the submission poll loop.
    Poll(PollEvent),
    /// Result of a regenerate request for `id`.
    Regenerated {
        id: String,
        selection: u64,
        outcome: Result<(), Notice>,
    },
}
