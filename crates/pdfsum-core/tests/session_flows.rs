//! Library, regenerate, delete and download flows driven through `Session`.

use std::sync::Arc;
use std::time::Duration;

use pdfsum_core::api::ApiError;
use pdfsum_core::api::mock::{MockApi, detail, list_item};
use pdfsum_core::flows;
use pdfsum_core::model::HistoryPayload;
use pdfsum_core::{
    Config, DownloadFormat, Mode, Session, SummaryStatus, Transition, UploadFile, View, ViewState,
};
use tokio_util::sync::CancellationToken;

fn history_json(json: &str) -> HistoryPayload {
    serde_json::from_str(json).unwrap()
}

fn config_with_dir(dir: &std::path::Path) -> Config {
    Config {
        download_dir: dir.to_path_buf(),
        ..Config::default()
    }
}

fn session(api: &Arc<MockApi>) -> Session {
    Session::new(api.clone(), &Config::default())
}

#[tokio::test]
async fn oversized_file_is_rejected_without_requests() {
    let api = Arc::new(MockApi::new());
    let mut session = session(&api);

    let big = UploadFile::new("big.pdf", vec![0; 10 * 1024 * 1024 + 1]);
    assert!(!session.choose_file(big).await);
    assert!(!session.submit(&CancellationToken::new(), |_| {}).await);

    assert_eq!(api.total_calls(), 0);
    assert!(session.state().selected_file.is_none());
}

#[tokio::test]
async fn file_at_limit_gets_a_preview() {
    let api = Arc::new(MockApi::new());
    let mut session = session(&api);

    let exact = UploadFile::new("exact.pdf", vec![0; 10 * 1024 * 1024]);
    assert!(session.choose_file(exact).await);

    assert_eq!(api.preview_calls(), 1);
    assert_eq!(session.state().preview.as_deref(), Some("Extracted preview"));
    assert!(session.state().show_preview);
}

#[tokio::test]
async fn preview_failure_leaves_preview_empty() {
    let api = Arc::new(MockApi::new().with_preview(Err(ApiError::Status {
        status: 500,
        detail: None,
        body: String::new(),
    })));
    let mut session = session(&api);

    assert!(session.choose_file(UploadFile::new("a.pdf", vec![1])).await);
    assert!(session.state().preview.is_none());
    assert!(!session.state().show_preview);
    assert!(session.state().notice.is_none());
}

#[tokio::test]
async fn submit_without_file_sends_nothing() {
    let api = Arc::new(MockApi::new());
    let mut session = session(&api);

    assert!(!session.submit(&CancellationToken::new(), |_| {}).await);
    assert_eq!(api.total_calls(), 0);
    assert_eq!(session.take_notice().unwrap().text, "Choose a PDF file first");
}

#[tokio::test]
async fn submit_errors_map_to_user_messages() {
    let cases = [
        (413, None, "", "File too large! Maximum size is 10MB"),
        (400, Some("file too large"), "", "File too large! Maximum size is 10MB"),
        (422, Some("unsupported mode"), "", "unsupported mode"),
        (400, None, "only PDF files are allowed", "only PDF files are allowed"),
        (502, None, "", "Request failed (status 502)"),
    ];
    for (status, detail, body, expected) in cases {
        let api = Arc::new(MockApi::new().with_create(Err(ApiError::Status {
            status,
            detail: detail.map(String::from),
            body: body.to_string(),
        })));
        let mut session = session(&api);
        session.choose_file(UploadFile::new("a.pdf", vec![1])).await;

        assert!(!session.submit(&CancellationToken::new(), |_| {}).await);
        assert_eq!(session.take_notice().unwrap().text, expected);
        assert_eq!(api.detail_calls(), 0);
    }
}

#[tokio::test]
async fn open_sorts_history_and_flags_latest() {
    let api = Arc::new(MockApi::new().with_history(Ok(history_json(
        r#"{"history":[{"id":"s3","version":3,"mode":"short"},{"id":"s1","version":1},{"id":"s2","version":2}]}"#,
    ))));
    let mut session = session(&api);

    assert!(session.open("doc-1").await);

    let state = session.state();
    let versions: Vec<_> = state.history.iter().map(|h| h.version).collect();
    assert_eq!(versions, vec![Some(3), Some(2), Some(1)]);
    let latest: Vec<_> = state.history.iter().filter(|h| h.is_latest).collect();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].version, Some(3));
    assert_eq!(latest[0].mode, Some(Mode::Short));
    assert_eq!(state.view, View::Library);
    assert_eq!(api.detail_calls(), 1);
    assert_eq!(api.history_calls(), 1);
}

#[tokio::test]
async fn history_failure_degrades_to_empty() {
    let api = Arc::new(
        MockApi::new().with_history(Err(ApiError::Transport("connection reset".into()))),
    );
    let mut session = session(&api);

    assert!(session.open("doc-1").await);
    assert!(session.state().history.is_empty());
    assert_eq!(session.state().selected_id.as_deref(), Some("doc-1"));
}

#[tokio::test]
async fn detail_failure_keeps_displayed_document() {
    let api = Arc::new(MockApi::new().with_detail_sequence(vec![
        Ok(detail("doc-1", SummaryStatus::Success)),
        Err(ApiError::Status {
            status: 404,
            detail: None,
            body: String::new(),
        }),
    ]));
    let mut session = session(&api);

    assert!(session.open("doc-1").await);
    assert!(!session.open("doc-2").await);

    let state = session.state();
    assert_eq!(state.selected_id.as_deref(), Some("doc-1"));
    assert_eq!(state.summary_text.as_deref(), Some("Summary of doc-1"));
    assert!(!state.library_loading);
}

#[tokio::test(start_paused = true)]
async fn slow_detail_for_previous_selection_is_dropped() {
    let api: Arc<MockApi> = Arc::new(MockApi::new().with_delay(Duration::from_millis(200)));
    let mut state = ViewState::default();

    let first = state.begin_selection("doc-a");
    let second = state.begin_selection("doc-b");

    let (late, fresh) = tokio::join!(
        flows::load_detail(api.as_ref(), first),
        flows::load_detail(api.as_ref(), second),
    );
    assert!(state.apply(fresh));
    assert!(!state.apply(late));
    assert_eq!(state.selected_id.as_deref(), Some("doc-b"));
}

#[tokio::test]
async fn regenerate_reloads_list_and_detail() {
    let api = Arc::new(
        MockApi::new().with_list(Ok(vec![list_item("doc-1", SummaryStatus::Success)])),
    );
    let mut session = session(&api);

    assert!(session.regenerate("doc-1", &Mode::Bullet).await);

    assert_eq!(api.regenerate_calls(), 1);
    assert_eq!(api.list_calls(), 1);
    assert_eq!(api.detail_calls(), 1);
    assert_eq!(api.history_calls(), 1);
    assert_eq!(
        api.requests()[0],
        "POST /api/pdfs/doc-1/summary mode=bullet"
    );
    assert_eq!(session.state().selected_id.as_deref(), Some("doc-1"));
}

#[tokio::test]
async fn regenerate_failure_stops_without_reload() {
    let api = Arc::new(MockApi::new().with_regenerate(Err(ApiError::Status {
        status: 500,
        detail: None,
        body: String::new(),
    })));
    let mut session = session(&api);

    assert!(!session.regenerate("doc-1", &Mode::Short).await);
    assert_eq!(api.list_calls(), 0);
    assert_eq!(api.detail_calls(), 0);
    assert_eq!(
        session.take_notice().unwrap().text,
        "Failed to regenerate the summary"
    );
    assert!(!session.state().library_loading);
}

#[tokio::test]
async fn deleting_selected_document_clears_view_state() {
    let api = Arc::new(MockApi::new());
    let mut session = session(&api);
    assert!(session.open("doc-1").await);
    assert!(session.state().stats.is_some());

    assert!(session.delete("doc-1", |_| true).await);

    let state = session.state();
    assert_eq!(state.view, View::Upload);
    assert!(state.selected_id.is_none());
    assert!(state.detail.is_none());
    assert!(state.summary_text.is_none());
    assert!(state.stats.is_none());
    assert!(state.history.is_empty());
    assert_eq!(api.delete_calls(), 1);
    assert_eq!(api.list_calls(), 1);
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let api = Arc::new(MockApi::new());
    let mut session = session(&api);

    let mut asked = None;
    let deleted = session
        .delete("doc-1", |question| {
            asked = Some(question.to_string());
            false
        })
        .await;

    assert!(!deleted);
    assert_eq!(asked.as_deref(), Some("Delete this file?"));
    assert_eq!(api.total_calls(), 0);
}

#[tokio::test]
async fn failed_delete_keeps_state() {
    let api = Arc::new(MockApi::new().with_delete(Err(ApiError::Status {
        status: 200,
        detail: None,
        body: String::new(),
    })));
    let mut session = session(&api);
    session.open("doc-1").await;

    assert!(!session.delete("doc-1", |_| true).await);
    assert_eq!(session.state().selected_id.as_deref(), Some("doc-1"));
    assert_eq!(session.take_notice().unwrap().text, "Failed to delete the file");
    assert_eq!(api.list_calls(), 0);

    let api = Arc::new(MockApi::new().with_delete(Err(ApiError::Transport("refused".into()))));
    let mut session = Session::new(api.clone(), &Config::default());
    assert!(!session.delete("doc-1", |_| true).await);
    assert_eq!(
        session.take_notice().unwrap().text,
        "Something went wrong while deleting the file"
    );
}

#[tokio::test]
async fn download_without_selection_sends_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(MockApi::new());
    let mut session = Session::new(api.clone(), &config_with_dir(dir.path()));

    let err = session.download(DownloadFormat::Pdf).await.unwrap_err();

    assert_eq!(err.text, "Select or open a PDF before downloading");
    assert_eq!(api.total_calls(), 0);
    assert!(!dir.path().join("summary.pdf").exists());
}

#[tokio::test]
async fn download_saves_fixed_filename() {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(MockApi::new().with_download(Ok(b"plain summary".to_vec())));
    let mut session = Session::new(api.clone(), &config_with_dir(dir.path()));
    session.open("doc-1").await;

    let path = session.download(DownloadFormat::Txt).await.unwrap();

    assert_eq!(path, dir.path().join("summary.txt"));
    assert_eq!(std::fs::read(&path).unwrap(), b"plain summary");
    assert!(
        api.requests()
            .contains(&"POST /api/download/txt pdf_id=doc-1".to_string())
    );
}

#[test]
fn applying_transitions_in_order_is_deterministic() {
    let mut state = ViewState::new(Mode::Short);
    state.apply_all([
        Transition::SwitchView(View::Library),
        Transition::ListLoading,
        Transition::ListLoaded(vec![list_item("a", SummaryStatus::Pending)]),
    ]);
    assert_eq!(state.view, View::Library);
    assert!(!state.list_loading);
    assert_eq!(state.documents.len(), 1);
    assert_eq!(state.mode, Mode::Short);
}
