use crate::models::JournalEntry;

pub const EXPORT_TITLE: &str = "Your Clarity Journal";
pub const EXPORT_FILE_NAME: &str = "Clarity_Journal.txt";

/// Renders every entry as one plain-text document, or `None` when there is nothing to export.
pub fn export_journal(entries: &[JournalEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let body = entries
        .iter()
        .map(|entry| {
            format!(
                "Date: {}\n\n{}",
                entry.date.format("%Y-%m-%d %H:%M:%S"),
                entry.entry
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    Some(format!("{EXPORT_TITLE}\n\n{body}\n"))
}

/// Entries newest first, the order the journal history is shown in.
pub fn history(entries: &[JournalEntry]) -> Vec<JournalEntry> {
    entries.iter().rev().cloned().collect()
}
