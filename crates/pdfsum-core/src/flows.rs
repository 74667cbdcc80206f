//! One async function per user operation.
//!
//! Each flow talks to the backend and answers with the [`Transition`]s to
//! apply; none of them touches the view state.

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, SummaryApi};
use crate::model::{DownloadFormat, Mode};
use crate::normalize::{normalize_detail, normalize_history};
use crate::notice::{Notice, submit_error_message};
use crate::poll::{PollConfig, PollEvent, PollOutcome, poll_until_resolved};
use crate::state::{SelectionToken, Transition, View};
use crate::upload::UploadFile;

/// Size limit for uploads, in bytes and in the MB figure shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimit {
    pub max_mb: u64,
}

impl UploadLimit {
    pub fn bytes(self) -> u64 {
        self.max_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for UploadLimit {
    fn default() -> Self {
        Self {
            max_mb: crate::DEFAULT_MAX_UPLOAD_MB,
        }
    }
}

/// Accept or reject a picked file before anything is sent.
pub fn choose_file(file: UploadFile, limit: UploadLimit) -> Transition {
    match file.check_size(limit.bytes()) {
        Ok(()) => Transition::FileChosen(file),
        Err(_) => Transition::FileRejected(Notice::file_too_large(file.size(), limit.max_mb)),
    }
}

/// Preview text for a file that already passed [`choose_file`]. Failures
/// are logged and leave the preview empty.
pub async fn fetch_preview(api: &dyn SummaryApi, file: &UploadFile) -> Transition {
    match api.preview(file).await {
        Ok(resp) => Transition::PreviewLoaded {
            file: file.name.clone(),
            text: resp.preview_text,
        },
        Err(e) => {
            tracing::warn!(file = %file.name, error = %e, "preview failed");
            Transition::PreviewUnavailable {
                file: file.name.clone(),
            }
        }
    }
}

/// Check the submit preconditions. `Err` carries the notice to show.
pub fn validate_submission(file: Option<&UploadFile>, limit: UploadLimit) -> Result<(), Notice> {
    let file = file.ok_or_else(Notice::no_file_selected)?;
    file.check_size(limit.bytes())
        .map_err(|_| Notice::file_too_large(file.size(), limit.max_mb))
}

/// Upload `file`, poll until the summary resolves, then refresh the list.
///
/// Expects [`Transition::SubmitStarted`] to have been applied; always ends
/// with [`Transition::LoadingFinished`] for the upload view.
pub async fn submit(
    api: &dyn SummaryApi,
    file: &UploadFile,
    mode: &Mode,
    limit: UploadLimit,
    poll: PollConfig,
    cancel: &CancellationToken,
    on_event: impl FnMut(PollEvent),
) -> Vec<Transition> {
    let mut out = submit_inner(api, file, mode, limit, poll, cancel, on_event).await;
    out.push(Transition::LoadingFinished(View::Upload));
    out
}

async fn submit_inner(
    api: &dyn SummaryApi,
    file: &UploadFile,
    mode: &Mode,
    limit: UploadLimit,
    poll: PollConfig,
    cancel: &CancellationToken,
    on_event: impl FnMut(PollEvent),
) -> Vec<Transition> {
    let created = match api.create_document(file, mode).await {
        Ok(created) => created,
        Err(e) => {
            tracing::warn!(file = %file.name, error = %e, "submission failed");
            return vec![Transition::Notify(submit_failure_notice(&e, limit))];
        }
    };
    let Some(id) = created.id.filter(|id| !id.is_empty()) else {
        return vec![Transition::Notify(Notice::missing_id())];
    };
    tracing::info!(id = %id, file = %file.name, mode = %mode, "document submitted");

    match poll_until_resolved(api, &id, poll, cancel, on_event).await {
        Ok(PollOutcome::Resolved { detail, attempts }) => {
            tracing::info!(id = %id, attempts, "summary ready");
            vec![
                Transition::SubmitResolved { id, detail },
                Transition::ListLoading,
                load_library(api).await,
            ]
        }
        Ok(PollOutcome::Cancelled { .. }) => {
            vec![Transition::Notify(Notice::info(
                "Stopped waiting; the summary will appear in the library when ready",
            ))]
        }
        Ok(_) => vec![Transition::Notify(Notice::still_processing())],
        Err(e) => {
            tracing::warn!(id = %id, error = %e, "poll failed");
            vec![Transition::Notify(Notice::connection_failed(e))]
        }
    }
}

fn submit_failure_notice(e: &ApiError, limit: UploadLimit) -> Notice {
    match e {
        ApiError::Status {
            status,
            detail,
            body,
        } => Notice::error(submit_error_message(
            *status,
            detail.as_deref(),
            body,
            limit.max_mb,
        )),
        other => Notice::connection_failed(other),
    }
}

/// Fetch the document list. Expects [`Transition::ListLoading`] first.
pub async fn load_library(api: &dyn SummaryApi) -> Transition {
    match api.list_documents().await {
        Ok(docs) => {
            tracing::debug!(count = docs.len(), "library loaded");
            Transition::ListLoaded(docs)
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to load library");
            Transition::ListFailed
        }
    }
}

/// Fetch detail and history for `token.id` concurrently.
///
/// A failed history request degrades to an empty history; a failed detail
/// request leaves the displayed document untouched.
pub async fn load_detail(api: &dyn SummaryApi, token: SelectionToken) -> Transition {
    let (detail, history) = tokio::join!(api.get_document(&token.id), api.get_history(&token.id));

    let history = match history {
        Ok(payload) => normalize_history(payload),
        Err(e) => {
            tracing::warn!(id = %token.id, error = %e, "failed to load history");
            Vec::new()
        }
    };

    match detail {
        Ok(payload) => Transition::DetailLoaded {
            detail: normalize_detail(payload),
            history,
            token,
        },
        Err(e) => {
            tracing::warn!(id = %token.id, error = %e, "failed to load document");
            Transition::DetailFailed { token }
        }
    }
}

/// Ask the backend for a new summary version. On `Ok` the caller reloads
/// the list and the document detail.
pub async fn regenerate(api: &dyn SummaryApi, id: &str, mode: &Mode) -> Result<(), Notice> {
    match api.regenerate(id, mode).await {
        Ok(()) => {
            tracing::info!(id, mode = %mode, "regeneration requested");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(id, error = %e, "regeneration failed");
            Err(if e.is_transport() {
                Notice::regenerate_crashed()
            } else {
                Notice::regenerate_failed()
            })
        }
    }
}

/// Delete `id` (confirmation is the caller's job) and refresh the list.
pub async fn delete(api: &dyn SummaryApi, id: &str) -> Vec<Transition> {
    match api.delete_document(id).await {
        Ok(()) => {
            tracing::info!(id, "document deleted");
            vec![
                Transition::Deleted { id: id.to_string() },
                Transition::ListLoading,
                load_library(api).await,
            ]
        }
        Err(e) => {
            tracing::warn!(id, error = %e, "delete failed");
            let notice = if e.is_transport() {
                Notice::delete_crashed()
            } else {
                Notice::delete_failed()
            };
            vec![Transition::Notify(notice)]
        }
    }
}

/// Download the rendered summary of the selected document into `dir`.
///
/// Without a selection no request is sent.
pub async fn download(
    api: &dyn SummaryApi,
    selected_id: Option<&str>,
    format: DownloadFormat,
    dir: &Path,
) -> Result<PathBuf, Notice> {
    let id = selected_id.ok_or_else(Notice::no_document_selected)?;
    let bytes = api.download(id, format).await.map_err(|e| {
        tracing::warn!(id, error = %e, "download failed");
        Notice::error(format!("Download failed: {e}"))
    })?;

    let path = dir.join(format.filename());
    let saved = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, &bytes).await
    };
    saved.await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "could not save download");
        Notice::error(format!("Could not save {}: {e}", path.display()))
    })?;
    tracing::info!(id, path = %path.display(), bytes = bytes.len(), "download saved");
    Ok(path)
}

/// The notice reporting a download result.
pub fn download_notice(result: Result<PathBuf, Notice>) -> Transition {
    Transition::Notify(match result {
        Ok(path) => Notice::info(format!("Saved {}", path.display())),
        Err(notice) => notice,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_limit_saturates_instead_of_overflowing() {
        let limit = UploadLimit { max_mb: u64::MAX };
        assert_eq!(limit.bytes(), u64::MAX);

        let file = UploadFile::new("big.pdf", vec![0; 16]);
        assert!(matches!(choose_file(file, limit), Transition::FileChosen(_)));
    }

    #[test]
    fn default_limit_is_ten_megabytes() {
        assert_eq!(UploadLimit::default().bytes(), 10 * 1024 * 1024);
    }
}
