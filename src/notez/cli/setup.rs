use clap::{CommandFactory, Parser, Subcommand};

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("NOTEZ_GIT_HASH");
    const GIT_DATE: &str = env!("NOTEZ_GIT_DATE");
    const IS_RELEASE: &str = env!("NOTEZ_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "notez",
    bin_name = "notez",
    version = get_version(),
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Terminal client for a REST note service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the note service (overrides config and $NOTEZ_API_URL)
    #[arg(long, global = true, value_name = "URL", help_heading = "Options")]
    pub api_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Note,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Note => "Note Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "list" | "view" | "create" | "edit" | "delete" => Some(CommandGroup::Note),
            "shell" | "status" | "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[CommandGroup::Note, CommandGroup::Misc]
    }
}

/// Returns the custom grouped help output as a string
pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("notez {version}\n"));
    output.push_str("Terminal client for a REST note service\n");
    output.push('\n');
    output.push_str("Usage: notez [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("      --api-url <URL>  Base URL of the note service\n");
    output.push_str("  -v, --verbose        Verbose output\n");
    output.push_str("  -h, --help           Print help\n");
    output.push_str("  -V, --version        Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints help for a command by name, falling back to the grouped help.
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name || subcmd.get_all_aliases().any(|a| a == name) {
            print!("{}", subcmd.render_help());
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

pub fn print_subcommand_help(command: &Option<Commands>) {
    let name = match command {
        Some(Commands::Note(c)) => match c {
            NoteCommands::List => "list",
            NoteCommands::View { .. } => "view",
            NoteCommands::Create { .. } => "create",
            NoteCommands::Edit { .. } => "edit",
            NoteCommands::Delete { .. } => "delete",
        },
        Some(Commands::Misc(c)) => match c {
            MiscCommands::Shell => "shell",
            MiscCommands::Status => "status",
            MiscCommands::Config { .. } => "config",
            MiscCommands::Help { .. } => "help",
        },
        None => {
            print_grouped_help();
            return;
        }
    };

    print_help_for_command(name);
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Note(NoteCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// List notes
    #[command(alias = "ls", display_order = 1)]
    List,

    /// Show one note
    #[command(alias = "v", display_order = 2)]
    View {
        /// Id of the note
        id: String,
    },

    /// Create a new note
    #[command(alias = "n", display_order = 3)]
    Create {
        /// Skip opening the editor
        #[arg(long)]
        no_editor: bool,

        /// Tags, comma-separated
        #[arg(short, long)]
        tags: Option<String>,

        /// Note content
        #[arg(short, long)]
        content: Option<String>,

        /// Title words (joined with spaces)
        #[arg(trailing_var_arg = true)]
        title: Vec<String>,
    },

    /// Edit a note (opens the editor unless fields are given with --no-editor)
    #[command(alias = "e", display_order = 4)]
    Edit {
        /// Id of the note
        id: String,

        /// Replace the title
        #[arg(long)]
        title: Option<String>,

        /// Replace the tags, comma-separated
        #[arg(short, long)]
        tags: Option<String>,

        /// Replace the content
        #[arg(short, long)]
        content: Option<String>,

        /// Skip opening the editor
        #[arg(long)]
        no_editor: bool,
    },

    /// Delete a note
    #[command(alias = "rm", display_order = 5)]
    Delete {
        /// Id of the note
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Interactive editing session
    #[command(display_order = 10)]
    Shell,

    /// Check that the note service is reachable
    #[command(display_order = 11)]
    Status,

    /// Get or set configuration
    #[command(display_order = 12)]
    Config {
        /// Configuration key (api-url, file-ext)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print help for notez or a subcommand
    #[command(display_order = 13)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}
