//! In-memory [`SummaryApi`] for tests. Built for this crate's own tests
//! and, behind the `test-util` feature, for downstream crates' tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::{ApiError, ApiFuture, SummaryApi};
use crate::model::{
    CreatedDocument, DetailPayload, DocumentListItem, DownloadFormat, FileRecord,
    HistoryPayload, Mode, PreviewResponse, SummaryRecord, SummaryStatus,
};
use crate::upload::UploadFile;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Scripted responses for one endpoint: a sequence popped per call, with
/// the last response repeated once the sequence runs out.
struct Endpoint<T> {
    queue: Mutex<Vec<Result<T, ApiError>>>,
    fallback: Mutex<Result<T, ApiError>>,
    calls: AtomicUsize,
}

impl<T: Clone> Endpoint<T> {
    fn new(response: Result<T, ApiError>) -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
            fallback: Mutex::new(response),
            calls: AtomicUsize::new(0),
        }
    }

    /// An empty sequence keeps the current fallback.
    fn script(&self, mut responses: Vec<Result<T, ApiError>>) {
        responses.reverse();
        if let Some(last) = responses.first() {
            *lock(&self.fallback) = last.clone();
        }
        *lock(&self.queue) = responses;
    }

    fn next(&self) -> Result<T, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match lock(&self.queue).pop() {
            Some(resp) => resp,
            None => lock(&self.fallback).clone(),
        }
    }

    fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// A hand-rolled mock of the backend.
///
/// Every endpoint has a default answer (an empty library, a finished summary,
/// successful mutations) that tests override with `with_*` builders. Calls
/// are counted per endpoint and logged in order.
pub struct MockApi {
    preview: Endpoint<PreviewResponse>,
    list: Endpoint<Vec<DocumentListItem>>,
    create: Endpoint<CreatedDocument>,
    detail: Endpoint<DetailPayload>,
    history: Endpoint<HistoryPayload>,
    regenerate: Endpoint<()>,
    delete: Endpoint<()>,
    download: Endpoint<Vec<u8>>,
    delay: Option<Duration>,
    log: Mutex<Vec<String>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            preview: Endpoint::new(Ok(PreviewResponse {
                preview_text: "Extracted preview".into(),
            })),
            list: Endpoint::new(Ok(Vec::new())),
            create: Endpoint::new(Ok(CreatedDocument {
                id: Some("doc-1".into()),
                original_name: None,
            })),
            detail: Endpoint::new(Ok(detail("doc-1", SummaryStatus::Success))),
            history: Endpoint::new(Ok(HistoryPayload::default())),
            regenerate: Endpoint::new(Ok(())),
            delete: Endpoint::new(Ok(())),
            download: Endpoint::new(Ok(b"summary".to_vec())),
            delay: None,
            log: Mutex::new(Vec::new()),
        }
    }

    /// Simulated latency applied to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_preview(self, resp: Result<PreviewResponse, ApiError>) -> Self {
        self.preview.script(vec![resp]);
        self
    }

    pub fn with_list(self, resp: Result<Vec<DocumentListItem>, ApiError>) -> Self {
        self.list.script(vec![resp]);
        self
    }

    pub fn with_create(self, resp: Result<CreatedDocument, ApiError>) -> Self {
        self.create.script(vec![resp]);
        self
    }

    pub fn with_detail(self, resp: Result<DetailPayload, ApiError>) -> Self {
        self.detail.script(vec![resp]);
        self
    }

    /// Detail responses in call order; the last one repeats.
    pub fn with_detail_sequence(self, responses: Vec<Result<DetailPayload, ApiError>>) -> Self {
        self.detail.script(responses);
        self
    }

    pub fn with_history(self, resp: Result<HistoryPayload, ApiError>) -> Self {
        self.history.script(vec![resp]);
        self
    }

    pub fn with_regenerate(self, resp: Result<(), ApiError>) -> Self {
        self.regenerate.script(vec![resp]);
        self
    }

    pub fn with_delete(self, resp: Result<(), ApiError>) -> Self {
        self.delete.script(vec![resp]);
        self
    }

    pub fn with_download(self, resp: Result<Vec<u8>, ApiError>) -> Self {
        self.download.script(vec![resp]);
        self
    }

    pub fn preview_calls(&self) -> usize {
        self.preview.count()
    }

    pub fn list_calls(&self) -> usize {
        self.list.count()
    }

    pub fn create_calls(&self) -> usize {
        self.create.count()
    }

    pub fn detail_calls(&self) -> usize {
        self.detail.count()
    }

    pub fn history_calls(&self) -> usize {
        self.history.count()
    }

    pub fn regenerate_calls(&self) -> usize {
        self.regenerate.count()
    }

    pub fn delete_calls(&self) -> usize {
        self.delete.count()
    }

    pub fn download_calls(&self) -> usize {
        self.download.count()
    }

    /// Every request made so far, as `"METHOD path"`.
    pub fn requests(&self) -> Vec<String> {
        lock(&self.log).clone()
    }

    pub fn total_calls(&self) -> usize {
        lock(&self.log).len()
    }

    fn record(&self, line: String) {
        lock(&self.log).push(line);
    }

    fn respond<'a, T: Send + 'a>(&'a self, result: Result<T, ApiError>) -> ApiFuture<'a, T> {
        let delay = self.delay;
        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            result
        })
    }
}

impl SummaryApi for MockApi {
    fn preview<'a>(&'a self, _file: &'a UploadFile) -> ApiFuture<'a, PreviewResponse> {
        self.record("POST /api/pdfs/preview".into());
        self.respond(self.preview.next())
    }

    fn list_documents(&self) -> ApiFuture<'_, Vec<DocumentListItem>> {
        self.record("GET /api/pdfs".into());
        self.respond(self.list.next())
    }

    fn create_document<'a>(
        &'a self,
        _file: &'a UploadFile,
        mode: &'a Mode,
    ) -> ApiFuture<'a, CreatedDocument> {
        self.record(format!("POST /api/pdfs mode={mode}"));
        self.respond(self.create.next())
    }

    fn get_document<'a>(&'a self, id: &'a str) -> ApiFuture<'a, DetailPayload> {
        self.record(format!("GET /api/pdfs/{id}"));
        self.respond(self.detail.next())
    }

    fn get_history<'a>(&'a self, id: &'a str) -> ApiFuture<'a, HistoryPayload> {
        self.record(format!("GET /api/pdfs/{id}/history"));
        self.respond(self.history.next())
    }

    fn regenerate<'a>(&'a self, id: &'a str, mode: &'a Mode) -> ApiFuture<'a, ()> {
        self.record(format!("POST /api/pdfs/{id}/summary mode={mode}"));
        self.respond(self.regenerate.next())
    }

    fn delete_document<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()> {
        self.record(format!("DELETE /api/pdfs/{id}"));
        self.respond(self.delete.next())
    }

    fn download<'a>(&'a self, id: &'a str, format: DownloadFormat) -> ApiFuture<'a, Vec<u8>> {
        self.record(format!("POST {} pdf_id={id}", format.endpoint()));
        self.respond(self.download.next())
    }
}

/// A wrapped detail payload with the given summary status.
pub fn detail(id: &str, status: SummaryStatus) -> DetailPayload {
    let done = !status.is_pending();
    DetailPayload::Wrapped {
        file: FileRecord {
            id: Some(id.to_string()),
            original_name: Some(format!("{id}.pdf")),
            ..Default::default()
        },
        summary: Some(SummaryRecord {
            status: Some(status),
            summary_text: done.then(|| format!("Summary of {id}")),
            takeaways: if done {
                vec!["First point".into(), "Second point".into()]
            } else {
                Vec::new()
            },
            pages: done.then_some(3),
            words: done.then_some(600),
            reading_time_minutes: done.then_some(3),
            process_time_ms: done.then_some(1500),
            language: done.then(|| "en".to_string()),
            ..Default::default()
        }),
    }
}

/// A list row for `id` with the given status.
pub fn list_item(id: &str, status: SummaryStatus) -> DocumentListItem {
    DocumentListItem {
        id: id.to_string(),
        original_name: format!("{id}.pdf"),
        summary_status: Some(status),
        size_bytes: None,
        created_at: None,
        process_time_ms: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_sequence_keeps_default_answer() {
        let api = MockApi::new().with_detail_sequence(Vec::new());
        assert!(api.get_document("doc-1").await.is_ok());
        assert_eq!(api.detail_calls(), 1);
    }

    #[tokio::test]
    async fn last_scripted_response_repeats() {
        let api = MockApi::new().with_detail_sequence(vec![
            Ok(detail("doc-1", SummaryStatus::Pending)),
            Err(ApiError::Transport("down".into())),
        ]);
        assert!(api.get_document("doc-1").await.is_ok());
        assert!(api.get_document("doc-1").await.is_err());
        assert!(api.get_document("doc-1").await.is_err());
        assert_eq!(api.detail_calls(), 3);
    }
}
