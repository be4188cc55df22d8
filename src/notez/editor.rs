use crate::error::{NotezError, Result};
use crate::model::Draft;
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

const TAGS_PREFIX: &str = "Tags:";

/// Renders a draft as an editor buffer.
///
/// ```text
/// Title
/// Tags: a, b
///
/// content...
/// ```
pub fn to_buffer(draft: &Draft) -> String {
    format!(
        "{}\n{} {}\n\n{}",
        draft.title, TAGS_PREFIX, draft.tags_text, draft.content
    )
}

/// Parses an editor buffer back into a draft.
/// First line is the title, an optional `Tags:` line follows, then the content.
///
/// One blank separator line before the content is dropped; any further leading
/// blank lines belong to the content. Whitespace around the title and at the
/// end of the content is not preserved.
pub fn from_buffer(buffer: &str) -> Draft {
    let mut lines = buffer.lines().peekable();
    let title = lines.next().unwrap_or_default().trim().to_string();

    let mut tags_text = String::new();
    if let Some(line) = lines.peek() {
        if let Some(rest) = strip_prefix_ignore_case(line, TAGS_PREFIX) {
            tags_text = rest.trim().to_string();
            lines.next();
        }
    }

    if lines.peek().is_some_and(|l| l.trim().is_empty()) {
        lines.next();
    }

    let content = lines
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string();

    Draft {
        title,
        content,
        tags_text,
    }
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&line[prefix.len()..])
    } else {
        None
    }
}

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.is_empty() {
                return Ok(editor);
            }
        }
    }

    for fallback in &["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok((*fallback).to_string());
        }
    }

    Err(NotezError::Editor(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Opens a file in the user's editor and waits for it to close.
/// Returns the contents of the file after editing.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    let path = file_path.as_ref();

    // $EDITOR may carry arguments, e.g. "code --wait".
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or(editor.as_str());

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| NotezError::Editor(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(NotezError::Editor(format!(
            "Editor '{}' exited with non-zero status",
            editor
        )));
    }

    Ok(fs::read_to_string(path)?)
}

/// Round-trips a draft through the user's editor using a temporary file with
/// the given extension.
pub fn edit_draft(initial: &Draft, file_extension: &str) -> Result<Draft> {
    let file_name = format!("notez_edit_{}{}", std::process::id(), file_extension);
    let temp_file = env::temp_dir().join(file_name);

    fs::write(&temp_file, to_buffer(initial))?;
    let result = open_in_editor(&temp_file);
    let _ = fs::remove_file(&temp_file);

    Ok(from_buffer(&result?))
}
