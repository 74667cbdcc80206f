//! reqwest implementation of [`SummaryApi`].

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use super::{ApiError, ApiFuture, SummaryApi};
use crate::Config;
use crate::model::{
    CreatedDocument, DetailPayload, DocumentListItem, DownloadFormat, HistoryPayload, Mode,
    PreviewResponse,
};
use crate::upload::UploadFile;

pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pdfsum/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn document_url(&self, id: &str, suffix: &str) -> String {
        self.url(&format!("/api/pdfs/{}{suffix}", urlencoding::encode(id)))
    }
}

fn file_part(file: &UploadFile) -> Result<Part, ApiError> {
    Ok(Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str("application/pdf")?)
}

/// Turn a non-success response into [`ApiError::Status`], keeping both the
/// JSON `detail` field (if any) and the raw text.
pub(crate) async fn error_for_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from));
    Err(ApiError::Status {
        status: status.as_u16(),
        detail,
        body,
    })
}

/// Fail with [`ApiError::NotJson`] unless the content type is JSON.
pub(crate) fn ensure_json(resp: &Response) -> Result<(), ApiError> {
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    match content_type {
        Some(ct) if ct.to_ascii_lowercase().contains("application/json") => Ok(()),
        content_type => Err(ApiError::NotJson { content_type }),
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

impl SummaryApi for HttpApi {
    fn preview<'a>(&'a self, file: &'a UploadFile) -> ApiFuture<'a, PreviewResponse> {
        Box::pin(async move {
            let form = Form::new().part("file", file_part(file)?);
            tracing::debug!(file = %file.name, bytes = file.size(), "requesting preview");
            let resp = self
                .client
                .post(self.url("/api/pdfs/preview"))
                .multipart(form)
                .send()
                .await?;
            read_json(error_for_status(resp).await?).await
        })
    }

    fn list_documents(&self) -> ApiFuture<'_, Vec<DocumentListItem>> {
        Box::pin(async move {
            let resp = self.client.get(self.url("/api/pdfs")).send().await?;
            let docs: Option<Vec<DocumentListItem>> =
                read_json(error_for_status(resp).await?).await?;
            Ok(docs.unwrap_or_default())
        })
    }

    fn create_document<'a>(
        &'a self,
        file: &'a UploadFile,
        mode: &'a Mode,
    ) -> ApiFuture<'a, CreatedDocument> {
        Box::pin(async move {
            let form = Form::new()
                .part("file", file_part(file)?)
                .text("mode", mode.as_str().to_string());
            tracing::debug!(file = %file.name, mode = %mode, "submitting document");
            let resp = self
                .client
                .post(self.url("/api/pdfs"))
                .multipart(form)
                .send()
                .await?;
            read_json(error_for_status(resp).await?).await
        })
    }

    fn get_document<'a>(&'a self, id: &'a str) -> ApiFuture<'a, DetailPayload> {
        Box::pin(async move {
            let resp = self.client.get(self.document_url(id, "")).send().await?;
            let resp = error_for_status(resp).await?;
            ensure_json(&resp)?;
            read_json(resp).await
        })
    }

    fn get_history<'a>(&'a self, id: &'a str) -> ApiFuture<'a, HistoryPayload> {
        Box::pin(async move {
            let resp = self
                .client
                .get(self.document_url(id, "/history"))
                .send()
                .await?;
            read_json(error_for_status(resp).await?).await
        })
    }

    fn regenerate<'a>(&'a self, id: &'a str, mode: &'a Mode) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let resp = self
                .client
                .post(self.document_url(id, "/summary"))
                .json(&serde_json::json!({ "mode": mode.as_str() }))
                .send()
                .await?;
            error_for_status(resp).await?;
            Ok(())
        })
    }

    fn delete_document<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let resp = self.client.delete(self.document_url(id, "")).send().await?;
            if resp.status() == StatusCode::NO_CONTENT {
                return Ok(());
            }
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(ApiError::Status {
                status,
                detail: None,
                body,
            })
        })
    }

    fn download<'a>(&'a self, id: &'a str, format: DownloadFormat) -> ApiFuture<'a, Vec<u8>> {
        Box::pin(async move {
            let resp = self
                .client
                .post(self.url(format.endpoint()))
                .json(&serde_json::json!({ "pdf_id": id }))
                .send()
                .await?;
            let bytes = error_for_status(resp).await?.bytes().await?;
            Ok(bytes.to_vec())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, content_type: Option<&str>, body: &'static str) -> Response {
        let mut builder = ::http::Response::builder().status(status);
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        Response::from(builder.body(body).unwrap())
    }

    #[tokio::test]
    async fn success_passes_through() {
        let resp = response(201, Some("application/json"), r#"{"id":"abc"}"#);
        let resp = error_for_status(resp).await.unwrap();
        let created: CreatedDocument = read_json(resp).await.unwrap();
        assert_eq!(created.id.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn status_error_keeps_detail_and_body() {
        let resp = response(400, Some("application/json"), r#"{"detail":"bad mode"}"#);
        match error_for_status(resp).await.unwrap_err() {
            ApiError::Status {
                status,
                detail,
                body,
            } => {
                assert_eq!(status, 400);
                assert_eq!(detail.as_deref(), Some("bad mode"));
                assert!(body.contains("bad mode"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn plain_text_error_has_no_detail() {
        let resp = response(413, Some("text/plain"), "file too large (max 10MB)\n");
        let err = error_for_status(resp).await.unwrap_err();
        assert_eq!(err.status(), Some(413));
        if let ApiError::Status { detail, body, .. } = err {
            assert!(detail.is_none());
            assert_eq!(body, "file too large (max 10MB)\n");
        }
    }

    #[test]
    fn json_content_type_detection() {
        assert!(ensure_json(&response(200, Some("application/json; charset=utf-8"), "{}")).is_ok());
        assert_eq!(
            ensure_json(&response(200, Some("text/html"), "<html>")),
            Err(ApiError::NotJson {
                content_type: Some("text/html".into())
            })
        );
        assert_eq!(
            ensure_json(&response(200, None, "{}")),
            Err(ApiError::NotJson { content_type: None })
        );
    }

    #[tokio::test]
    async fn malformed_json_is_decode_error() {
        let resp = response(200, Some("application/json"), "{not json");
        let err = read_json::<CreatedDocument>(resp).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn urls_are_joined_without_double_slash() {
        let api = HttpApi::new("http://localhost:8080/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080");
        assert_eq!(
            api.document_url("a b/c", "/history"),
            "http://localhost:8080/api/pdfs/a%20b%2Fc/history"
        );
    }
}
