//! Payload normalization: one canonical shape per entity, whatever the
//! backend sent.

use crate::model::{
    DetailPayload, DocumentDetail, FileRecord, HistoryEntry, HistoryPayload, Metadata,
    RawHistoryEntry, Stats, SummaryRecord,
};

/// Map either detail shape onto [`DocumentDetail`]. A missing summary becomes
/// an empty one.
pub fn normalize_detail(payload: DetailPayload) -> DocumentDetail {
    let (file, summary) = match payload {
        DetailPayload::Wrapped { file, summary } => (file, summary),
        DetailPayload::Flat(flat) => (flat.file, flat.summary),
    };
    let FileRecord {
        id,
        original_name,
        size_bytes,
        mime_type,
        created_at,
        updated_at,
    } = file;

    DocumentDetail {
        id,
        original_name,
        size_bytes,
        mime_type,
        created_at,
        updated_at,
        summary: summary.unwrap_or_default(),
    }
}

/// Sort newest version first and flag the head as latest.
///
/// Missing versions sort as 0; the sort is stable so ties keep input order.
pub fn normalize_history(payload: HistoryPayload) -> Vec<HistoryEntry> {
    let mut raw = payload.history.unwrap_or_default();
    raw.sort_by_key(|e| std::cmp::Reverse(e.version.unwrap_or(0)));

    raw.into_iter()
        .enumerate()
        .map(|(idx, e)| history_entry(e, idx == 0))
        .collect()
}

fn history_entry(raw: RawHistoryEntry, is_latest: bool) -> HistoryEntry {
    HistoryEntry {
        id: raw.id,
        version: raw.version,
        mode: raw.mode,
        created_at: raw.created_at,
        summary_text: raw.summary_text,
        status: raw.status,
        process_time_ms: raw.process_time_ms,
        pages: raw.pages,
        words: raw.words,
        reading_time_minutes: raw.reading_time_minutes,
        takeaways: raw.takeaways,
        language: raw.language,
        is_latest,
    }
}

/// Stats exist only when at least one counter is non-zero.
pub fn stats_from_summary(summary: &SummaryRecord) -> Option<Stats> {
    let pages = summary.pages.unwrap_or(0);
    let words = summary.words.unwrap_or(0);
    let reading_time_minutes = summary.reading_time_minutes.unwrap_or(0);

    if pages == 0 && words == 0 && reading_time_minutes == 0 {
        return None;
    }
    Some(Stats {
        pages,
        words,
        reading_time_minutes,
    })
}

pub fn metadata_from_summary(summary: &SummaryRecord) -> Metadata {
    Metadata {
        created_at: summary.created_at.clone(),
        updated_at: summary.updated_at.clone(),
        language: summary.language.clone(),
        status: summary.status.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SummaryStatus;

    fn history(json: &str) -> Vec<HistoryEntry> {
        normalize_history(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn history_sorted_descending_with_single_latest() {
        let entries = history(
            r#"{"history":[{"id":"a","version":3},{"id":"b","version":1},{"id":"c","version":2}]}"#,
        );
        let versions: Vec<_> = entries.iter().map(|e| e.version).collect();
        assert_eq!(versions, vec![Some(3), Some(2), Some(1)]);
        assert!(entries[0].is_latest);
        assert_eq!(entries.iter().filter(|e| e.is_latest).count(), 1);
    }

    #[test]
    fn history_missing_version_sorts_last_and_ties_are_stable() {
        let entries = history(
            r#"{"history":[{"id":"x"},{"id":"a","version":1},{"id":"b","version":1}]}"#,
        );
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["a", "b", "x"]);
        assert!(entries[0].is_latest);
    }

    #[test]
    fn history_absent_or_null_is_empty() {
        assert!(history("{}").is_empty());
        assert!(history(r#"{"history":null}"#).is_empty());
    }

    #[test]
    fn flat_and_wrapped_details_match() {
        let summary = r#"{"status":"success","summary_text":"Findings","takeaways":["a","b"],"pages":4,"words":900,"reading_time_minutes":4,"process_time_ms":1200,"language":"en"}"#;
        let wrapped = format!(
            r#"{{"file":{{"id":"doc-1","original_name":"paper.pdf","size_bytes":2048}},"summary":{summary}}}"#
        );
        let flat = format!(
            r#"{{"id":"doc-1","original_name":"paper.pdf","size_bytes":2048,"summary":{summary}}}"#
        );

        let a = normalize_detail(serde_json::from_str(&wrapped).unwrap());
        let b = normalize_detail(serde_json::from_str(&flat).unwrap());
        assert_eq!(a, b);
        assert_eq!(a.id.as_deref(), Some("doc-1"));
        assert_eq!(a.summary.status, Some(SummaryStatus::Success));
        assert_eq!(a.summary.takeaways, vec!["a", "b"]);
    }

    #[test]
    fn stats_require_a_nonzero_counter() {
        let empty = SummaryRecord {
            pages: Some(0),
            ..Default::default()
        };
        assert_eq!(stats_from_summary(&empty), None);

        let words_only = SummaryRecord {
            words: Some(350),
            ..Default::default()
        };
        assert_eq!(
            stats_from_summary(&words_only),
            Some(Stats {
                pages: 0,
                words: 350,
                reading_time_minutes: 0
            })
        );
    }
}
