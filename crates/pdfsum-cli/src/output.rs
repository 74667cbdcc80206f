use std::io::Write;

use indicatif::HumanBytes;
use owo_colors::OwoColorize;
use pdfsum_core::notice::NoticeLevel;
use pdfsum_core::{DocumentListItem, HistoryEntry, Notice, PollEvent, SummaryStatus, ViewState};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn status_label(status: Option<&SummaryStatus>, color: ColorMode) -> String {
    let text = status.map(|s| s.as_str().to_string()).unwrap_or_else(|| "-".into());
    if !color.enabled() {
        return text;
    }
    match status {
        Some(SummaryStatus::Success) => text.green().to_string(),
        Some(SummaryStatus::Pending) => text.yellow().to_string(),
        Some(SummaryStatus::Failed) => text.red().to_string(),
        _ => text.dimmed().to_string(),
    }
}

pub fn print_notice(w: &mut dyn Write, notice: &Notice, color: ColorMode) -> std::io::Result<()> {
    if !color.enabled() {
        return writeln!(w, "{}", notice.text);
    }
    match notice.level {
        NoticeLevel::Info => writeln!(w, "{}", notice.text.cyan()),
        NoticeLevel::Warning => writeln!(w, "{}", notice.text.yellow()),
        NoticeLevel::Error => writeln!(w, "{}", notice.text.red()),
    }
}

/// Spinner message for a poll progress event.
pub fn poll_message(event: &PollEvent) -> String {
    match event {
        PollEvent::Waiting {
            attempt,
            max_attempts,
        } => format!("Waiting for summary ({attempt}/{max_attempts})"),
        PollEvent::Checked { attempt, status } => format!(
            "Attempt {attempt}: {}",
            status.as_ref().map(|s| s.as_str()).unwrap_or("no status yet")
        ),
    }
}

pub fn print_preview(
    w: &mut dyn Write,
    file_name: &str,
    preview: Option<&str>,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Preview:".bold().cyan(), file_name.bold())?;
    } else {
        writeln!(w, "Preview: {}", file_name)?;
    }
    writeln!(w)?;
    match preview {
        Some(text) if !text.trim().is_empty() => writeln!(w, "{}", text.trim_end())?,
        _ => writeln!(w, "(no preview available)")?,
    }
    Ok(())
}

pub fn print_documents(
    w: &mut dyn Write,
    documents: &[DocumentListItem],
    color: ColorMode,
) -> std::io::Result<()> {
    if documents.is_empty() {
        return writeln!(w, "No documents uploaded yet.");
    }

    let id_width = documents.iter().map(|d| d.id.len()).max().unwrap_or(2).max(2);
    if color.enabled() {
        writeln!(
            w,
            "{}",
            format!("{:<id_width$}  {:<8}  {:>9}  NAME", "ID", "STATUS", "SIZE").bold()
        )?;
    } else {
        writeln!(w, "{:<id_width$}  {:<8}  {:>9}  NAME", "ID", "STATUS", "SIZE")?;
    }

    for doc in documents {
        let status = status_label(doc.summary_status.as_ref(), ColorMode(false));
        let status = format!("{status:<8}");
        let status = if color.enabled() {
            match doc.summary_status {
                Some(SummaryStatus::Success) => status.green().to_string(),
                Some(SummaryStatus::Pending) => status.yellow().to_string(),
                Some(SummaryStatus::Failed) => status.red().to_string(),
                _ => status,
            }
        } else {
            status
        };
        let size = doc
            .size_bytes
            .map(|b| HumanBytes(b).to_string())
            .unwrap_or_else(|| "-".into());
        writeln!(
            w,
            "{:<id_width$}  {}  {:>9}  {}",
            doc.id, status, size, doc.original_name
        )?;
    }
    Ok(())
}

/// Print the summary currently held in the view state.
pub fn print_summary(w: &mut dyn Write, state: &ViewState, color: ColorMode) -> std::io::Result<()> {
    let name = state
        .detail
        .as_ref()
        .and_then(|d| d.original_name.as_deref())
        .or(state.selected_id.as_deref())
        .unwrap_or("document");
    let status = state.metadata.as_ref().and_then(|m| m.status.as_ref());

    if color.enabled() {
        writeln!(w, "{} [{}]", name.bold(), status_label(status, color))?;
    } else {
        writeln!(w, "{} [{}]", name, status_label(status, color))?;
    }

    if let Some(err) = state
        .detail
        .as_ref()
        .and_then(|d| d.summary.error_message.as_deref())
    {
        print_notice(w, &Notice::error(err), color)?;
    }

    writeln!(w)?;
    match state.summary_text.as_deref() {
        Some(text) => writeln!(w, "{}", text.trim_end())?,
        None => writeln!(w, "(no summary text)")?,
    }

    if !state.takeaways.is_empty() {
        writeln!(w)?;
        if color.enabled() {
            writeln!(w, "{}", "Key takeaways".bold())?;
        } else {
            writeln!(w, "Key takeaways")?;
        }
        for t in &state.takeaways {
            writeln!(w, "  - {}", t)?;
        }
    }

    let mut facts = Vec::new();
    if let Some(stats) = state.stats {
        facts.push(format!(
            "{} pages, {} words, ~{} min read",
            stats.pages, stats.words, stats.reading_time_minutes
        ));
    }
    if let Some(ms) = state.process_time_ms {
        facts.push(format!("processed in {:.1}s", ms as f64 / 1000.0));
    }
    if let Some(meta) = &state.metadata {
        if let Some(lang) = &meta.language {
            facts.push(format!("language: {lang}"));
        }
        if let Some(updated) = meta.updated_at.as_ref().or(meta.created_at.as_ref()) {
            facts.push(format!("updated {updated}"));
        }
    }
    if !facts.is_empty() {
        writeln!(w)?;
        let line = facts.join(" | ");
        if color.enabled() {
            writeln!(w, "{}", line.dimmed())?;
        } else {
            writeln!(w, "{}", line)?;
        }
    }
    Ok(())
}

pub fn print_history(
    w: &mut dyn Write,
    history: &[HistoryEntry],
    color: ColorMode,
) -> std::io::Result<()> {
    if history.is_empty() {
        return writeln!(w, "No summary history.");
    }
    for entry in history {
        let version = entry
            .version
            .map(|v| format!("v{v}"))
            .unwrap_or_else(|| "v?".into());
        let mode = entry.mode.as_ref().map(|m| m.as_str()).unwrap_or("-");
        let created = entry.created_at.as_deref().unwrap_or("-");
        let latest = if entry.is_latest { " (latest)" } else { "" };
        let status = status_label(entry.status.as_ref(), color);

        if color.enabled() {
            writeln!(
                w,
                "{}{}  {}  {}  {}",
                version.bold(),
                latest.green(),
                mode,
                status,
                created.dimmed()
            )?;
        } else {
            writeln!(w, "{}{}  {}  {}  {}", version, latest, mode, status, created)?;
        }
        if let Some(text) = entry.summary_text.as_deref() {
            let first = text.lines().next().unwrap_or("");
            let short: String = first.chars().take(100).collect();
            let ellipsis = if first.chars().count() > 100 { "..." } else { "" };
            writeln!(w, "    {short}{ellipsis}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfsum_core::{Mode, Transition, View};

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn documents_table_without_color() {
        let docs = vec![DocumentListItem {
            id: "abc".into(),
            original_name: "paper.pdf".into(),
            summary_status: Some(SummaryStatus::Success),
            size_bytes: Some(2048),
            created_at: None,
            process_time_ms: None,
        }];
        let out = render(|w| print_documents(w, &docs, ColorMode(false)));
        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].starts_with("ID "));
        assert!(lines[1].starts_with("abc  success"));
        assert!(lines[1].ends_with("paper.pdf"));
    }

    #[test]
    fn empty_library_message() {
        let out = render(|w| print_documents(w, &[], ColorMode(false)));
        assert_eq!(out, "No documents uploaded yet.\n");
    }

    #[test]
    fn history_marks_latest() {
        let entry = |v: i64, latest: bool| HistoryEntry {
            id: None,
            version: Some(v),
            mode: Some(Mode::Short),
            created_at: None,
            summary_text: Some("line one\nline two".into()),
            status: Some(SummaryStatus::Success),
            process_time_ms: None,
            pages: None,
            words: None,
            reading_time_minutes: None,
            takeaways: Vec::new(),
            language: None,
            is_latest: latest,
        };
        let out = render(|w| print_history(w, &[entry(2, true), entry(1, false)], ColorMode(false)));
        assert!(out.starts_with("v2 (latest)  short  success"));
        assert!(out.contains("\nv1  short"));
        assert!(!out.contains("line two"));
    }

    #[test]
    fn summary_without_detail_still_renders() {
        let mut state = ViewState::default();
        state.apply(Transition::SwitchView(View::Library));
        let out = render(|w| print_summary(w, &state, ColorMode(false)));
        assert!(out.starts_with("document [-]"));
        assert!(out.contains("(no summary text)"));
    }

    #[test]
    fn poll_messages() {
        assert_eq!(
            poll_message(&PollEvent::Waiting {
                attempt: 2,
                max_attempts: 30
            }),
            "Waiting for summary (2/30)"
        );
        assert_eq!(
            poll_message(&PollEvent::Checked {
                attempt: 2,
                status: None
            }),
            "Attempt 2: no status yet"
        );
    }
}
