//! Output formatting utilities.

/// One document as shown by `inspect`.
pub struct DocumentRow {
    pub index: usize,
    pub file_name: String,
    pub mime_type: String,
    pub hash: String,
    pub size_bytes: u64,
    pub document_id: String,
    pub subject: String,
    pub closure_date: String,
}

/// Formats a document as a simple table row.
pub fn format_table_row(row: &DocumentRow) -> String {
    format!(
        "{:<4} {:<20} {:<24} {:<24} {:>10} {:<16} {}",
        row.index,
        row.document_id,
        truncate(&row.file_name, 24),
        truncate(&row.mime_type, 24),
        row.size_bytes,
        truncate(&row.hash, 16),
        truncate(&row.subject, 40)
    )
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!(
        "{:<4} {:<20} {:<24} {:<24} {:>10} {:<16} {}",
        "#", "DOCUMENT_ID", "NAME", "TYPE", "BYTES", "SHA256", "SUBJECT"
    );
    println!("{}", "-".repeat(130));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
