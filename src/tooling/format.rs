//! Format listings, query results, and status as text.

use crate::views::{DirectoryEntry, FileRecord, TreeStats};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Format a directory listing as human-readable text.
pub fn format_listing_text(path: &str, entries: &[DirectoryEntry]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading(path)));
    if entries.is_empty() {
        out.push_str("  (empty)\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Type", "Content"]);
    for entry in entries {
        let detail = match (&entry.content, entry.children) {
            (Some(content), _) => content.clone(),
            (None, Some(children)) => format!("{} item(s)", children),
            (None, None) => String::new(),
        };
        let name = if entry.entry_type.is_directory() {
            format!("{}/", entry.name)
        } else {
            entry.name.clone()
        };
        table.add_row(vec![name, entry.entry_type.label().to_string(), detail]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// Format flat file records as a table.
pub fn format_records_text(title: &str, records: &[FileRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading(title)));
    if records.is_empty() {
        out.push_str("No files found.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Type", "Content"]);
    for record in records {
        table.add_row(vec![
            record.name.clone(),
            record.kind.label().to_string(),
            record.content.clone(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// Status output for JSON.
#[derive(Debug, Clone, Serialize)]
pub struct StatusOutput {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<String>,
    pub snapshot_key: String,
    pub cursor: String,
    pub tree: TreeStats,
}

pub fn format_status_text(status: &StatusOutput) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Store")));
    out.push_str(&format!("  Backend: {}\n", status.backend));
    if let Some(ref path) = status.store_path {
        out.push_str(&format!("  Path: {}\n", path));
    }
    out.push_str(&format!("  Snapshot key: {}\n", status.snapshot_key));
    out.push_str(&format!("  Current directory: {}\n\n", status.cursor));

    out.push_str(&format!("{}\n\n", format_section_heading("Tree")));
    out.push_str(&format!("  Folders: {}\n", status.tree.directories));
    out.push_str(&format!("  Files: {}\n\n", status.tree.files));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Type", "Files"]);
    for row in &status.tree.by_kind {
        table.add_row(vec![row.kind.label().to_string(), row.files.to_string()]);
    }
    out.push_str(&format!("{}\n", table));
    out
}
