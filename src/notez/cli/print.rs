use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use notez::backend::NotesBackend;
use notez::client::{Mode, NoteEditorClient};
use notez::error::Failure;
use notez::model::{Note, NoteId};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 6;
const SELECTED_MARKER: &str = "▸";

pub(super) fn print_success(message: &str) {
    println!("{}", message.green());
}

pub(super) fn print_info(message: &str) {
    println!("{}", message.dimmed());
}

pub(super) fn print_warning(message: &str) {
    println!("{}", message.yellow());
}

pub(super) fn print_failure(failure: &Failure) {
    println!("{}", failure.message().red());
}

pub(super) fn print_notes(notes: &[Note], selected: Option<&NoteId>) {
    if notes.is_empty() {
        println!("No notes yet.");
        return;
    }

    for note in notes {
        let is_selected = selected == Some(&note.id);
        let marker = if is_selected {
            format!(" {} ", SELECTED_MARKER)
        } else {
            "   ".to_string()
        };

        let id_str = format!("{:>width$}. ", note.id, width = ID_WIDTH);
        let time_ago = note
            .updated_at
            .map(format_time_ago)
            .unwrap_or_else(|| " ".repeat(TIME_WIDTH));

        let tags = note.tags.to_string();
        let fixed_width = marker.width() + id_str.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);

        let title = truncate_to_width(&note.title, available);
        let remaining = available.saturating_sub(title.width());
        let tags_display = if tags.is_empty() || remaining < 4 {
            String::new()
        } else {
            truncate_to_width(&format!("  {}", tags), remaining)
        };
        let padding = remaining.saturating_sub(tags_display.width());

        let title_colored = if is_selected {
            title.bold()
        } else {
            title.normal()
        };

        println!(
            "{}{}{}{}{}{}",
            marker,
            id_str.yellow(),
            title_colored,
            tags_display.cyan(),
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

pub(super) fn print_full_note(note: &Note) {
    println!("{} {}", note.id.to_string().yellow(), note.title.bold());
    if !note.tags.is_empty() {
        println!("{}", format!("Tags: {}", note.tags).cyan());
    }
    if let Some(updated) = note.updated_at {
        println!("{}", format!("Updated {}", format_local(updated)).dimmed());
    }
    println!("--------------------------------");
    println!("{}", note.content);
}

/// Renders the editor panel: heading, draft fields, and which actions are enabled.
pub(super) fn print_draft<B: NotesBackend>(client: &NoteEditorClient<B>) {
    let heading = match client.mode() {
        Mode::Browsing => "New Note".to_string(),
        Mode::Editing(id) => format!("Edit Note {}", id),
        Mode::Saving => "Saving...".to_string(),
    };
    let draft = client.draft();

    println!("{}", heading.bold());
    println!("{} {}", "Title:".dimmed(), draft.title);
    println!("{} {}", "Tags: ".dimmed(), draft.tags_text);
    println!("{}", "Content:".dimmed());
    println!("{}", draft.content);

    let save = if client.can_save() { "save" } else { "save (disabled)" };
    let delete = if client.can_delete() { "rm" } else { "rm (disabled)" };
    println!("{}", format!("[{}] [{}]", save, delete).dimmed());
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let c = if c == '\n' { ' ' } else { c };
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

fn format_local(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate_to_width("abcdef", 4), "abc…");
        assert_eq!(truncate_to_width("abc", 10), "abc");
    }

    #[test]
    fn truncation_flattens_newlines() {
        assert_eq!(truncate_to_width("a\nb", 10), "a b");
    }

    #[test]
    fn time_ago_is_right_aligned() {
        let s = format_time_ago(Utc::now() - chrono::Duration::minutes(5));
        assert!(s.width() >= TIME_WIDTH);
        assert!(s.starts_with(' '));
    }
}
