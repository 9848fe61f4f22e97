use chrono::{DateTime, Utc};
use colored::Colorize;
use scratchbookapp::format::Block;
use scratchbookapp::library::LibrarySnapshot;
use scratchbookapp::model::NoteIndex;
use std::path::Path;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const SCRATCH_MARKER: &str = "∞";

pub(super) fn print_success(message: &str) {
    println!("{}", message.green());
}

pub(super) fn print_notes(notes: &NoteIndex, scratch_path: &str) {
    if notes.is_empty() {
        println!("No notes found.");
        return;
    }

    for (i, (path, metadata)) in notes.iter().enumerate() {
        let left_prefix = if path == scratch_path {
            format!("  {} ", SCRATCH_MARKER)
        } else {
            "    ".to_string()
        };
        let idx_str = format!("{}. ", i + 1);
        let time_ago = metadata
            .modified
            .map(format_time_ago)
            .unwrap_or_else(|| " ".repeat(TIME_WIDTH));

        let fixed_width = left_prefix.width() + idx_str.width() + TIME_WIDTH + 2;
        let available = LINE_WIDTH.saturating_sub(fixed_width);

        // Name first, the path only when there is room left for it.
        let name_display = truncate_to_width(&metadata.name, available);
        let remaining = available.saturating_sub(name_display.width());
        let path_display = if remaining > 4 {
            truncate_to_width(&format!(" {}", path), remaining)
        } else {
            String::new()
        };
        let padding = remaining.saturating_sub(path_display.width());

        println!(
            "{}{}{}{}{}  {}",
            left_prefix,
            idx_str.yellow(),
            name_display.bold(),
            path_display.dimmed(),
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

pub(super) fn print_note(path: &str, name: &str, blocks: &[Block]) {
    println!("{} {}", name.bold(), path.dimmed());
    for block in blocks {
        let language = if block.auto_detect {
            format!("{} (auto)", block.language)
        } else {
            block.language.clone()
        };
        println!("{}", format!("── {}", language).dimmed());
        println!("{}", block.text);
    }
}

pub(super) fn print_status(snapshot: &LibrarySnapshot, root: &Path) {
    println!("{} {}", "Library:".bold(), root.display());
    println!("{} {}", "Current:".bold(), snapshot.current_note_path);
    println!(
        "{} {}",
        "Notes:".bold(),
        snapshot.notes.len().to_string().yellow()
    );
    println!("{}", "Recent:".bold());
    for path in &snapshot.recent_note_paths {
        println!("    {}", path);
    }
    if snapshot.needs_reload {
        println!("{}", "Library state is stale, reload required".yellow());
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
