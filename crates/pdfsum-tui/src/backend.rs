//! Runs client flows off the UI thread and reports their transitions.

use std::path::PathBuf;
use std::sync::Arc;

use pdfsum_core::flows::{self, UploadLimit};
use pdfsum_core::{PollConfig, SummaryApi, UploadFile};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tui_event::{BackendCommand, BackendEvent};

/// Settings the backend needs from the resolved config.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub limit: UploadLimit,
    pub poll: PollConfig,
    pub download_dir: PathBuf,
}

/// Receive commands until the channel closes, spawning a task per command so
/// slow requests never block the next one.
pub async fn run(
    api: Arc<dyn SummaryApi>,
    settings: BackendSettings,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    tx: mpsc::UnboundedSender<BackendEvent>,
) {
    // Replaced on every submission; cancelled by CancelPoll.
    let mut poll_cancel = CancellationToken::new();
    // Cancelled and replaced whenever a newer detail load starts.
    let mut detail_cancel = CancellationToken::new();

    while let Some(cmd) = cmd_rx.recv().await {
        tracing::debug!(?cmd, "backend command");
        let api = api.clone();
        let tx = tx.clone();
        match cmd {
            BackendCommand::OpenFile(path) => {
                tokio::spawn(async move {
                    let read = UploadFile::from_path(&path)
                        .await
                        .map_err(|e| format!("{}: {e}", path.display()));
                    let _ = tx.send(BackendEvent::FileRead(read));
                });
            }
            BackendCommand::Preview(file) => {
                tokio::spawn(async move {
                    let t = flows::fetch_preview(api.as_ref(), &file).await;
                    let _ = tx.send(BackendEvent::Transitions(vec![t]));
                });
            }
            BackendCommand::Submit { file, mode } => {
                poll_cancel.cancel();
                poll_cancel = CancellationToken::new();
                let cancel = poll_cancel.clone();
                let limit = settings.limit;
                let poll = settings.poll;
                tokio::spawn(async move {
                    let progress = tx.clone();
                    let transitions = flows::submit(
                        api.as_ref(),
                        &file,
                        &mode,
                        limit,
                        poll,
                        &cancel,
                        |event| {
                            let _ = progress.send(BackendEvent::Poll(event));
                        },
                    )
                    .await;
                    let _ = tx.send(BackendEvent::Transitions(transitions));
                });
            }
            BackendCommand::CancelPoll => poll_cancel.cancel(),
            BackendCommand::LoadLibrary => {
                tokio::spawn(async move {
                    let t = flows::load_library(api.as_ref()).await;
                    let _ = tx.send(BackendEvent::Transitions(vec![t]));
                });
            }
            BackendCommand::LoadDetail(token) => {
                detail_cancel.cancel();
                detail_cancel = CancellationToken::new();
                let cancel = detail_cancel.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            tracing::debug!(id = %token.id, "detail load superseded");
                        }
                        t = flows::load_detail(api.as_ref(), token.clone()) => {
                            let _ = tx.send(BackendEvent::Transitions(vec![t]));
                        }
                    }
                });
            }
            BackendCommand::Regenerate {
                id,
                mode,
                selection,
            } => {
                tokio::spawn(async move {
                    let outcome = flows::regenerate(api.as_ref(), &id, &mode).await;
                    let _ = tx.send(BackendEvent::Regenerated {
                        id,
                        selection,
                        outcome,
                    });
                });
            }
            BackendCommand::Delete { id } => {
                tokio::spawn(async move {
                    let transitions = flows::delete(api.as_ref(), &id).await;
                    let _ = tx.send(BackendEvent::Transitions(transitions));
                });
            }
            BackendCommand::Download { id, format } => {
                let dir = settings.download_dir.clone();
                tokio::spawn(async move {
                    let result = flows::download(api.as_ref(), Some(&id), format, &dir).await;
                    let _ = tx.send(BackendEvent::Transitions(vec![flows::download_notice(result)]));
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfsum_core::api::mock::MockApi;
    use pdfsum_core::{Mode, Transition, View, ViewState};
    use std::time::Duration;

    fn settings(dir: &std::path::Path) -> BackendSettings {
        BackendSettings {
            limit: UploadLimit::default(),
            poll: PollConfig {
                interval: Duration::from_millis(10),
                max_attempts: 3,
            },
            download_dir: dir.to_path_buf(),
        }
    }

    #[tokio::test]
    async fn submit_reports_progress_then_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(MockApi::new());
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(run(api.clone(), settings(dir.path()), cmd_rx, tx));

        cmd_tx
            .send(BackendCommand::Submit {
                file: UploadFile::new("a.pdf", vec![1]),
                mode: Mode::Short,
            })
            .unwrap();

        let mut saw_poll = false;
        let transitions = loop {
            match rx.recv().await.unwrap() {
                BackendEvent::Poll(_) => saw_poll = true,
                BackendEvent::Transitions(t) => break t,
                other => panic!("unexpected event {other:?}"),
            }
        };
        assert!(saw_poll);
        assert!(matches!(
            transitions.last(),
            Some(Transition::LoadingFinished(View::Upload))
        ));

        let mut state = ViewState::default();
        state.apply_all(transitions);
        assert_eq!(state.selected_id.as_deref(), Some("doc-1"));
        assert_eq!(api.create_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_detail_load_cancels_older() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(MockApi::new().with_delay(Duration::from_millis(500)));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(run(api, settings(dir.path()), cmd_rx, tx));

        let mut state = ViewState::default();
        let first = state.begin_selection("doc-a");
        let second = state.begin_selection("doc-b");
        cmd_tx.send(BackendCommand::LoadDetail(first)).unwrap();
        cmd_tx.send(BackendCommand::LoadDetail(second)).unwrap();

        let Some(BackendEvent::Transitions(t)) = rx.recv().await else {
            panic!("expected transitions");
        };
        state.apply_all(t);
        assert_eq!(state.selected_id.as_deref(), Some("doc-b"));

        drop(cmd_tx);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn failed_regenerate_reports_notice_with_selection() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(
            MockApi::new().with_regenerate(Err(pdfsum_core::ApiError::Transport("down".into()))),
        );
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(run(api, settings(dir.path()), cmd_rx, tx));

        cmd_tx
            .send(BackendCommand::Regenerate {
                id: "doc-1".into(),
                mode: Mode::Bullet,
                selection: 4,
            })
            .unwrap();

        let Some(BackendEvent::Regenerated {
            id,
            selection,
            outcome,
        }) = rx.recv().await
        else {
            panic!("expected a regenerate result");
        };
        assert_eq!((id.as_str(), selection), ("doc-1", 4));
        assert_eq!(
            outcome.unwrap_err().text,
            "Something went wrong while regenerating the summary"
        );
    }
}
