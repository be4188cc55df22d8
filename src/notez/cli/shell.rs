//! Interactive session: one controller, many commands, errors never end it.

use super::print::{print_draft, print_failure, print_info, print_notes, print_success};
use notez::backend::NotesBackend;
use notez::client::{NoteEditorClient, SaveOutcome};
use notez::editor::edit_draft;
use notez::error::Result;
use notez::model::NoteId;
use std::io::{BufRead, Write};
use std::str::FromStr;

const SHELL_HELP: &str = "\
Commands:
  ls              Refresh and list notes
  open <id>       Load a note into the editor
  new             Start a new note
  title <text>    Set the title
  tags <text>     Set tags (comma-separated)
  content <text>  Set the content
  edit            Edit the draft in $EDITOR
  save            Save the draft
  rm [id]         Delete a note (defaults to the open one)
  show            Show the draft
  help            Show this help
  quit            Leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Open(NoteId),
    New,
    Title(String),
    Tags(String),
    Content(String),
    Edit,
    Save,
    Delete(Option<NoteId>),
    Show,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "ls" | "list" => Ok(ShellCommand::List),
            "open" | "o" => {
                if rest.is_empty() {
                    Err("Usage: open <id>".to_string())
                } else {
                    Ok(ShellCommand::Open(NoteId::new(rest)))
                }
            }
            "new" | "n" => Ok(ShellCommand::New),
            "title" => Ok(ShellCommand::Title(rest.to_string())),
            "tags" => Ok(ShellCommand::Tags(rest.to_string())),
            "content" => Ok(ShellCommand::Content(rest.to_string())),
            "edit" | "e" => Ok(ShellCommand::Edit),
            "save" | "s" => Ok(ShellCommand::Save),
            "rm" | "delete" => Ok(ShellCommand::Delete(
                (!rest.is_empty()).then(|| NoteId::new(rest)),
            )),
            "show" => Ok(ShellCommand::Show),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
            other => Err(format!("Unknown command: {} (try 'help')", other)),
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

fn prompt<B: NotesBackend>(client: &NoteEditorClient<B>) -> String {
    match client.selection() {
        Some(id) => format!("notez [{}]> ", id),
        None => "notez [new]> ".to_string(),
    }
}

/// Runs the session until `quit` or end of input.
pub async fn run_session<B: NotesBackend, R: BufRead>(
    client: &mut NoteEditorClient<B>,
    file_ext: &str,
    input: R,
) -> Result<()> {
    client.activate().await.ok();
    print_notes(client.notes(), client.selection());
    show_error(client);

    let mut lines = input.lines();
    loop {
        print!("{}", prompt(client));
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<ShellCommand>() {
            Ok(command) => {
                if let Flow::Quit = execute(client, command, file_ext).await {
                    break;
                }
            }
            Err(message) => print_info(&message),
        }
        show_error(client);
    }
    Ok(())
}

fn show_error<B: NotesBackend>(client: &NoteEditorClient<B>) {
    if let Some(failure) = client.error() {
        print_failure(failure);
    }
}

async fn execute<B: NotesBackend>(
    client: &mut NoteEditorClient<B>,
    command: ShellCommand,
    file_ext: &str,
) -> Flow {
    match command {
        ShellCommand::List => {
            if client.refresh_list().await.is_ok() {
                print_notes(client.notes(), client.selection());
            }
        }
        ShellCommand::Open(id) => {
            if client.load_note(&id).await.is_ok() {
                print_draft(client);
            }
        }
        ShellCommand::New => {
            client.new_note();
            print_draft(client);
        }
        ShellCommand::Title(title) => client.set_title(title),
        ShellCommand::Tags(tags) => client.set_tags_text(tags),
        ShellCommand::Content(content) => client.set_content(content),
        ShellCommand::Edit => match edit_draft(client.draft(), file_ext) {
            Ok(draft) => {
                client.set_draft(draft);
                print_draft(client);
            }
            Err(e) => print_info(&e.to_string()),
        },
        ShellCommand::Save => match client.save_note().await {
            Ok(SaveOutcome::Saved(note)) => {
                print_success(&format!("Note saved ({}): {}", note.id, note.title));
            }
            Ok(SaveOutcome::Disabled) => {
                print_info("Nothing to save: title and content are empty.");
            }
            Err(_) => {}
        },
        ShellCommand::Delete(id) => {
            let target = id.or_else(|| client.selection().cloned());
            if target.is_none() {
                print_info("No note selected.");
            }
            if client.delete_note(target.as_ref()).await.is_ok() {
                if let Some(id) = target {
                    print_success(&format!("Note deleted: {}", id));
                }
            }
        }
        ShellCommand::Show => print_draft(client),
        ShellCommand::Help => println!("{}", SHELL_HELP),
        ShellCommand::Quit => return Flow::Quit,
    }
    Flow::Continue
}
