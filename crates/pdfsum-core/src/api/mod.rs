//! HTTP contract of the summarization backend.

pub mod http;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::model::{
    CreatedDocument, DetailPayload, DocumentListItem, DownloadFormat, HistoryPayload, Mode,
    PreviewResponse,
};
use crate::upload::UploadFile;

/// Boxed future returned by every [`SummaryApi`] call.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("{0}")]
    Transport(String),

    /// Non-success status. `detail` is the JSON `detail` field when present,
    /// `body` the raw response text.
    #[error("HTTP {status}")]
    Status {
        status: u16,
        detail: Option<String>,
        body: String,
    },

    #[error("expected a JSON response, got {}", content_type.as_deref().unwrap_or("no content type"))]
    NotJson { content_type: Option<String> },

    #[error("malformed response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when no HTTP response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// The backend endpoints this client consumes.
pub trait SummaryApi: Send + Sync {
    /// `POST /api/pdfs/preview`: extract text without storing the file.
    fn preview<'a>(&'a self, file: &'a UploadFile) -> ApiFuture<'a, PreviewResponse>;

    /// `GET /api/pdfs`.
    fn list_documents(&self) -> ApiFuture<'_, Vec<DocumentListItem>>;

    /// `POST /api/pdfs`: store the file and start summarization.
    fn create_document<'a>(
        &'a self,
        file: &'a UploadFile,
        mode: &'a Mode,
    ) -> ApiFuture<'a, CreatedDocument>;

    /// `GET /api/pdfs/{id}`. Fails with [`ApiError::NotJson`] when the
    /// response is not JSON.
    fn get_document<'a>(&'a self, id: &'a str) -> ApiFuture<'a, DetailPayload>;

    /// `GET /api/pdfs/{id}/history`.
    fn get_history<'a>(&'a self, id: &'a str) -> ApiFuture<'a, HistoryPayload>;

    /// `POST /api/pdfs/{id}/summary` with `{mode}`.
    fn regenerate<'a>(&'a self, id: &'a str, mode: &'a Mode) -> ApiFuture<'a, ()>;

    /// `DELETE /api/pdfs/{id}`. Only 204 counts as success.
    fn delete_document<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()>;

    /// `POST /api/download/{txt,pdf}` with `{pdf_id}`; the body is opaque.
    fn download<'a>(&'a self, id: &'a str, format: DownloadFormat) -> ApiFuture<'a, Vec<u8>>;
}
