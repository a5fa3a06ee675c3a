//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::logging;
use crate::setup;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

/// Terminal rheumatology assistant
#[derive(Parser)]
#[command(name = "rheumassist")]
#[command(version)]
#[command(about = "Upload a rheumatology case recording and analyze it with a hosted language model")]
#[command(long_about = "Upload a rheumatology case recording and analyze it with a hosted language model.\n\nDEFAULT COMMAND:\n    If no command is specified, the interactive assistant ('tui') is opened.\n\nEXAMPLES:\n    # Open the assistant\n    $ rheumassist\n\n    # Open the assistant with a recording already selected\n    $ rheumassist tui visit.mp3\n\n    # Analyze without the UI and save the result\n    $ rheumassist analyze visit.mp3 -o analysis.json\n\n    # Save your inference API key\n    $ rheumassist auth")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/rheumassist/rheumassist.toml\n    Credentials:        ~/.local/share/rheumassist/credentials\n    Logs:               ~/.local/state/rheumassist/rheumassist.log.*"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive assistant (default)
    ///
    /// Type the path of an audio file and press Enter to select it,
    /// Ctrl-A to analyze, Tab to switch views, Esc to quit.
    #[command(visible_alias = "t")]
    Tui {
        /// Audio file to select on startup
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Analyze an audio file without the interactive UI
    ///
    /// Prints the raw JSON returned by the inference endpoint.
    #[command(visible_alias = "a")]
    Analyze {
        /// Path to the case recording
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the result to a file instead of stdout
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<String>,
    },

    /// Save the inference API key
    Auth {
        /// Remove the stored API key instead
        #[arg(long)]
        remove: bool,
    },

    /// Open configuration file in your preferred editor
    ///
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// Show recent log entries from the application
    Logs,

    /// Generate shell completion script
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the application based on command-line arguments.
///
/// # Errors
/// - If logging initialization or setup fails
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that don't need logging or config setup
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "rheumassist", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Logs) => return commands::handle_logs(),
        _ => {}
    }

    logging::init_logging()?;
    setup::ensure_config()?;

    match cli.command {
        None => commands::handle_tui(None).await?,
        Some(Commands::Tui { file }) => commands::handle_tui(file).await?,
        Some(Commands::Analyze { file, output }) => {
            commands::handle_analyze(file, output).await?;
        }
        Some(Commands::Auth { remove }) => {
            if let Err(e) = commands::handle_auth(remove) {
                // cliclack already displayed the cancellation
                let err_msg = e.to_string();
                if err_msg.contains("cancelled") || err_msg.contains("interrupted") {
                    process::exit(0);
                }
                return Err(e);
            }
        }
        Some(Commands::Config) => commands::handle_config()?,
        Some(Commands::Completions { .. }) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
