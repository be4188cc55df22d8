//! # CLI Layer
//!
//! This module is **one possible UI client** for notez; the controller in the
//! library is the application.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Initializes logging
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Builds `AppContext` with the controller and configuration
//! - `handle_*()`: Per-command handlers that drive the controller and print its state
//!
//! One-shot commands return the controller's `Failure` as an error, so the
//! process exits non-zero; the interactive shell keeps going instead.

use super::print::{print_full_note, print_info, print_notes, print_success, print_warning};
use super::setup::{
    print_grouped_help, print_help_for_command, print_subcommand_help, Cli, Commands,
    MiscCommands, NoteCommands,
};
use super::shell::run_session;
use clap::Parser;
use log::debug;
use notez::backend::http::HttpBackend;
use notez::backend::NotesBackend;
use notez::client::{NoteEditorClient, SaveOutcome};
use notez::config::{default_config_dir, ConfigKey, NotezConfig, API_URL_ENV};
use notez::editor::edit_draft;
use notez::error::{NotezError, Result};
use notez::model::NoteId;

struct AppContext {
    client: NoteEditorClient<HttpBackend>,
    config: NotezConfig,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.help {
        if cli.command.is_none() {
            print_grouped_help();
        } else {
            print_subcommand_help(&cli.command);
        }
        return Ok(());
    }

    // Neither help nor config needs to reach the service.
    match &cli.command {
        Some(Commands::Misc(MiscCommands::Help { command })) => {
            match command {
                Some(name) => print_help_for_command(name),
                None => print_grouped_help(),
            }
            return Ok(());
        }
        Some(Commands::Misc(MiscCommands::Config { key, value })) => {
            return handle_config(key.as_deref(), value.as_deref());
        }
        _ => {}
    }

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Note(cmd)) => match cmd {
            NoteCommands::List => handle_list(&mut ctx).await,
            NoteCommands::View { id } => handle_view(&mut ctx, id).await,
            NoteCommands::Create {
                no_editor,
                tags,
                content,
                title,
            } => {
                let title = (!title.is_empty()).then(|| title.join(" "));
                handle_create(&mut ctx, title, tags, content, no_editor).await
            }
            NoteCommands::Edit {
                id,
                title,
                tags,
                content,
                no_editor,
            } => handle_edit(&mut ctx, id, title, tags, content, no_editor).await,
            NoteCommands::Delete { id } => handle_delete(&mut ctx, id).await,
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Shell => handle_shell(&mut ctx).await,
            MiscCommands::Status => handle_status(&ctx).await,
            // Handled before the context was built.
            MiscCommands::Config { .. } | MiscCommands::Help { .. } => Ok(()),
        },
        None => handle_list(&mut ctx).await,
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_dir = default_config_dir()?;
    let env_url = std::env::var(API_URL_ENV).ok();
    let config = NotezConfig::load(&config_dir)?
        .with_overrides(env_url.as_deref(), cli.api_url.as_deref())?;
    debug!(
        "config dir {}, service at {}",
        config_dir.display(),
        config.get_api_url()
    );

    let backend = HttpBackend::new(config.get_api_url())?;
    Ok(AppContext {
        client: NoteEditorClient::new(backend),
        config,
    })
}

async fn handle_list(ctx: &mut AppContext) -> Result<()> {
    ctx.client.activate().await?;
    print_notes(ctx.client.notes(), ctx.client.selection());
    Ok(())
}

async fn handle_view(ctx: &mut AppContext, id: String) -> Result<()> {
    let note = ctx.client.load_note(&NoteId::new(id)).await?;
    print_full_note(&note);
    Ok(())
}

async fn handle_create(
    ctx: &mut AppContext,
    title: Option<String>,
    tags: Option<String>,
    content: Option<String>,
    no_editor: bool,
) -> Result<()> {
    ctx.client.new_note();
    ctx.client.set_title(title.unwrap_or_default());
    ctx.client.set_tags_text(tags.unwrap_or_default());
    ctx.client.set_content(content.unwrap_or_default());

    if !no_editor {
        let edited = edit_draft(ctx.client.draft(), ctx.config.get_file_ext())?;
        ctx.client.set_draft(edited);
    }

    save(ctx).await
}

async fn handle_edit(
    ctx: &mut AppContext,
    id: String,
    title: Option<String>,
    tags: Option<String>,
    content: Option<String>,
    no_editor: bool,
) -> Result<()> {
    ctx.client.load_note(&NoteId::new(id)).await?;
    let loaded = ctx.client.draft().clone();

    if let Some(title) = title {
        ctx.client.set_title(title);
    }
    if let Some(tags) = tags {
        ctx.client.set_tags_text(tags);
    }
    if let Some(content) = content {
        ctx.client.set_content(content);
    }

    if !no_editor {
        let edited = edit_draft(ctx.client.draft(), ctx.config.get_file_ext())?;
        ctx.client.set_draft(edited);
    }

    if ctx.client.draft() == &loaded {
        print_info("No changes.");
        return Ok(());
    }

    save(ctx).await
}

async fn save(ctx: &mut AppContext) -> Result<()> {
    match ctx.client.save_note().await? {
        SaveOutcome::Saved(note) => {
            print_success(&format!("Note saved ({}): {}", note.id, note.title));
            // The save went through; a failed list refresh afterwards is only a warning.
            if let Some(failure) = ctx.client.error() {
                print_warning(failure.message());
            }
            Ok(())
        }
        SaveOutcome::Disabled => Err(NotezError::Api(
            "Nothing to save: title and content are empty.".to_string(),
        )),
    }
}

async fn handle_delete(ctx: &mut AppContext, id: String) -> Result<()> {
    let id = NoteId::new(id);
    ctx.client.delete_note(Some(&id)).await?;
    print_success(&format!("Note deleted: {}", id));
    if let Some(failure) = ctx.client.error() {
        print_warning(failure.message());
    }
    Ok(())
}

async fn handle_status(ctx: &AppContext) -> Result<()> {
    let url = ctx.config.get_api_url();
    match ctx.client.backend().health().await {
        Ok(true) => {
            print_success(&format!("Backend reachable at {}", url));
            Ok(())
        }
        Ok(false) => Err(NotezError::Api(format!(
            "Backend at {} reports it is not healthy",
            url
        ))),
        Err(e) => Err(NotezError::Api(format!(
            "Backend unreachable at {}: {}",
            url, e
        ))),
    }
}

async fn handle_shell(ctx: &mut AppContext) -> Result<()> {
    let stdin = std::io::stdin();
    let file_ext = ctx.config.get_file_ext().to_string();
    run_session(&mut ctx.client, &file_ext, stdin.lock()).await
}

fn handle_config(key: Option<&str>, value: Option<&str>) -> Result<()> {
    let config_dir = default_config_dir()?;
    let mut config = NotezConfig::load(&config_dir)?;

    match (key, value) {
        (None, _) => {
            for key in ConfigKey::all() {
                println!("{} = {}", key.name(), config.get(*key));
            }
        }
        (Some(key), None) => {
            let key: ConfigKey = key.parse()?;
            println!("{} = {}", key.name(), config.get(key));
        }
        (Some(key), Some(value)) => {
            let key: ConfigKey = key.parse()?;
            config.set(key, value)?;
            config.save(&config_dir)?;
            print_success(&format!("{} set to {}", key.name(), config.get(key)));
        }
    }
    Ok(())
}

