//! Wire and canonical types for the summarization backend.
//!
//! Wire types are lenient: every field is optional and `null` is accepted
//! wherever the backend may omit a value. [`crate::normalize`] turns them into
//! the canonical records the view state works with.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Summarization style. Unknown values pass through unvalidated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    Short,
    #[default]
    Detailed,
    Bullet,
    Other(String),
}

impl Mode {
    pub fn all() -> &'static [Mode] {
        &[Mode::Short, Mode::Detailed, Mode::Bullet]
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Short => "short",
            Self::Detailed => "detailed",
            Self::Bullet => "bullet",
            Self::Other(s) => s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Short => "Short",
            Self::Detailed => "Detailed",
            Self::Bullet => "Bullet points",
            Self::Other(s) => s,
        }
    }

    /// Next mode in the short → detailed → bullet cycle.
    pub fn next(&self) -> Mode {
        match self {
            Self::Short => Self::Detailed,
            Self::Detailed => Self::Bullet,
            Self::Bullet | Self::Other(_) => Self::Short,
        }
    }
}

impl From<&str> for Mode {
    fn from(s: &str) -> Self {
        match s {
            "short" => Self::Short,
            "detailed" => Self::Detailed,
            "bullet" => Self::Bullet,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Mode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Mode::from(s.as_str()))
    }
}

/// Processing status of one summary version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryStatus {
    Pending,
    Success,
    Failed,
    Other(String),
}

impl SummaryStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for SummaryStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "success" => Self::Success,
            "failed" | "failure" | "error" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SummaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SummaryStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// An empty status string counts as absent, same as a missing field.
fn status_or_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SummaryStatus>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw
        .filter(|s| !s.is_empty())
        .map(|s| SummaryStatus::from(s.as_str())))
}

fn nullable<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Identifiers are opaque strings, but some backends emit them as numbers.
fn opaque_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }
    Ok(Option::<Raw>::deserialize(d)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// One row of `GET /api/pdfs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentListItem {
    #[serde(deserialize_with = "opaque_id_required")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub original_name: String,
    #[serde(default, deserialize_with = "status_or_none")]
    pub summary_status: Option<SummaryStatus>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub process_time_ms: Option<u64>,
}

fn opaque_id_required<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    opaque_id(d)?.ok_or_else(|| serde::de::Error::custom("document id is null"))
}

/// Response of `POST /api/pdfs`. The id is optional so a successful response
/// without one can be reported instead of failing to decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedDocument {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
}

/// Response of `POST /api/pdfs/preview`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub preview_text: String,
}

/// File-level fields of a document detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// One summary as embedded in a detail payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(default, deserialize_with = "status_or_none")]
    pub status: Option<SummaryStatus>,
    #[serde(default)]
    pub summary_text: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub takeaways: Vec<String>,
    #[serde(default)]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub words: Option<u64>,
    #[serde(default)]
    pub reading_time_minutes: Option<u32>,
    #[serde(default)]
    pub process_time_ms: Option<u64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// `GET /api/pdfs/{id}` arrives either wrapped (`{file, summary}`) or flat
/// (file fields at the top level next to `summary`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DetailPayload {
    Wrapped {
        file: FileRecord,
        #[serde(default)]
        summary: Option<SummaryRecord>,
    },
    Flat(FlatDetail),
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlatDetail {
    #[serde(flatten)]
    pub file: FileRecord,
    #[serde(default)]
    pub summary: Option<SummaryRecord>,
}

impl DetailPayload {
    /// The embedded summary status, if the backend reported one.
    pub fn status(&self) -> Option<&SummaryStatus> {
        let summary = match self {
            Self::Wrapped { summary, .. } => summary.as_ref(),
            Self::Flat(flat) => flat.summary.as_ref(),
        };
        summary.and_then(|s| s.status.as_ref())
    }
}

/// Canonical document detail, independent of the payload shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentDetail {
    pub id: Option<String>,
    pub original_name: Option<String>,
    pub size_bytes: Option<u64>,
    pub mime_type: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub summary: SummaryRecord,
}

/// Response of `GET /api/pdfs/{id}/history`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryPayload {
    #[serde(default)]
    pub history: Option<Vec<RawHistoryEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHistoryEntry {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub summary_text: Option<String>,
    #[serde(default, deserialize_with = "status_or_none")]
    pub status: Option<SummaryStatus>,
    #[serde(default)]
    pub process_time_ms: Option<u64>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub words: Option<u64>,
    #[serde(default)]
    pub reading_time_minutes: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub takeaways: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// One summary version, newest first, with the newest flagged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: Option<String>,
    pub version: Option<i64>,
    pub mode: Option<Mode>,
    pub created_at: Option<String>,
    pub summary_text: Option<String>,
    pub status: Option<SummaryStatus>,
    pub process_time_ms: Option<u64>,
    pub pages: Option<u32>,
    pub words: Option<u64>,
    pub reading_time_minutes: Option<u32>,
    pub takeaways: Vec<String>,
    pub language: Option<String>,
    pub is_latest: bool,
}

/// Document statistics shown next to a summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub pages: u32,
    pub words: u64,
    pub reading_time_minutes: u32,
}

/// Summary metadata shown next to a summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub language: Option<String>,
    pub status: Option<SummaryStatus>,
}

/// Rendered artifact kinds offered by the download endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    Txt,
    Pdf,
}

impl DownloadFormat {
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Txt => "/api/download/txt",
            Self::Pdf => "/api/download/pdf",
        }
    }

    /// Fixed name the artifact is saved under.
    pub fn filename(self) -> &'static str {
        match self {
            Self::Txt => "summary.txt",
            Self::Pdf => "summary.pdf",
        }
    }
}

impl std::str::FromStr for DownloadFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Txt),
            "pdf" => Ok(Self::Pdf),
            other => Err(format!("unknown download format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_round_trips_known_and_unknown_values() {
        assert_eq!(Mode::from("short"), Mode::Short);
        assert_eq!(Mode::from("haiku"), Mode::Other("haiku".into()));
        assert_eq!(serde_json::to_string(&Mode::Bullet).unwrap(), "\"bullet\"");
        let parsed: Mode = serde_json::from_str("\"haiku\"").unwrap();
        assert_eq!(parsed.as_str(), "haiku");
    }

    #[test]
    fn mode_cycle_visits_all_three() {
        let mut mode = Mode::Short;
        let mut seen = vec![mode.clone()];
        for _ in 0..2 {
            mode = mode.next();
            seen.push(mode.clone());
        }
        assert_eq!(seen, Mode::all());
        assert_eq!(mode.next(), Mode::Short);
    }

    #[test]
    fn empty_status_is_absent() {
        let item: DocumentListItem =
            serde_json::from_str(r#"{"id":"a","original_name":"x.pdf","summary_status":""}"#)
                .unwrap();
        assert_eq!(item.summary_status, None);

        let summary: SummaryRecord = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(summary.status, Some(SummaryStatus::Pending));
    }

    #[test]
    fn null_takeaways_become_empty() {
        let summary: SummaryRecord =
            serde_json::from_str(r#"{"status":"success","takeaways":null}"#).unwrap();
        assert!(summary.takeaways.is_empty());
    }

    #[test]
    fn list_item_accepts_numeric_id() {
        let item: DocumentListItem = serde_json::from_str(r#"{"id":42}"#).unwrap();
        assert_eq!(item.id, "42");
        assert_eq!(item.original_name, "");
    }

    #[test]
    fn detail_payload_picks_shape() {
        let wrapped: DetailPayload =
            serde_json::from_str(r#"{"file":{"id":"a"},"summary":{"status":"success"}}"#).unwrap();
        assert!(matches!(wrapped, DetailPayload::Wrapped { .. }));
        assert_eq!(wrapped.status(), Some(&SummaryStatus::Success));

        let flat: DetailPayload =
            serde_json::from_str(r#"{"id":"a","summary":{"status":"pending"}}"#).unwrap();
        assert!(matches!(flat, DetailPayload::Flat(_)));
        assert_eq!(flat.status(), Some(&SummaryStatus::Pending));

        let bare: DetailPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(bare.status(), None);
    }

    #[test]
    fn download_format_parses_and_names() {
        assert_eq!("TXT".parse::<DownloadFormat>().unwrap(), DownloadFormat::Txt);
        assert_eq!(DownloadFormat::Pdf.filename(), "summary.pdf");
        assert!("docx".parse::<DownloadFormat>().is_err());
    }
}
