//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands::{self, ProcessOptions, View};
use crate::config;
use crate::logging;
use crate::setup;
use anyhow::anyhow;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

/// Writes the default config on first run and refreshes an outdated version stamp.
fn check_and_run_setup() -> Result<(), anyhow::Error> {
    let config_path = config::get_config_path()?;

    setup::run_setup(&config_path).map_err(|e| {
        tracing::error!("Setup failed: {e}");
        anyhow!("Setup failed: {e}")
    })?;

    match setup::version::check_setup_needed(&config_path)? {
        Some(old_version) => {
            tracing::info!(
                "Migrating config from version {} to {}",
                old_version,
                env!("CARGO_PKG_VERSION")
            );
            setup::version::update_config_version(&config_path).map_err(|e| {
                tracing::error!("Failed to update config version: {e}");
                anyhow!("Failed to update config version: {e}")
            })?;
        }
        None => {
            tracing::debug!("Config version up to date ({})", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// English speech to Japanese subtitles
#[derive(Parser)]
#[command(name = "ejsub")]
#[command(version)]
#[command(about = "English speech to Japanese subtitles")]
#[command(long_about = "English speech to Japanese subtitles.\n\nRecognizes English speech in a WAV file, translates each segment into\nJapanese, and renders SRT subtitles and a bilingual transcript.\n\nEXAMPLES:\n    # Set up the OpenAI API key\n    $ ejsub auth\n    \n    # Show the bilingual transcript\n    $ ejsub process talk.wav\n    \n    # Write talk.srt and talk.txt next to talk.wav\n    $ ejsub process talk.wav --save --view none\n    \n    # Print only the SRT file\n    $ ejsub process talk.wav --view srt > talk.srt\n    \n    # Help converting MP3 and other formats\n    $ ejsub convert-help")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/ejsub/ejsub.toml\n    Credentials:        ~/.local/share/ejsub/credentials.toml\n    Logs:               ~/.local/state/ejsub/ejsub.log.*"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Japanese subtitles for WAV files
    ///
    /// Each file is recognized, translated segment by segment, and printed in
    /// the chosen view. Files are processed one after another.
    #[command(visible_alias = "p")]
    Process {
        /// WAV files to process
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// What to print for each processed file
        #[arg(short, long, value_enum, default_value_t = View::Bilingual)]
        view: View,

        /// Save <name>.srt and <name>.txt for each file
        #[arg(short, long)]
        save: bool,

        /// Directory for saved files (defaults to each input's directory)
        #[arg(short, long, value_name = "DIR", requires = "save")]
        out_dir: Option<PathBuf>,
    },

    /// Set and verify the OpenAI API key
    #[command(visible_alias = "a")]
    Auth {
        /// Use a different OpenAI-compatible API endpoint
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },

    /// Show how to convert other audio formats to WAV
    #[command(name = "convert-help")]
    ConvertHelp,

    /// Open configuration file in your preferred editor
    ///
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   ejsub completions bash > ejsub.bash
    ///   ejsub completions zsh > _ejsub
    ///   ejsub completions fish > ejsub.fish
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If setup fails
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that need neither logging nor config
    match &cli.command {
        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "ejsub", &mut io::stdout());
            return Ok(());
        }
        Commands::Logs => return commands::handle_logs(),
        Commands::ConvertHelp => return commands::handle_convert_help(),
        _ => {}
    }

    logging::init_logging()?;
    check_and_run_setup()?;

    match cli.command {
        Commands::Process {
            files,
            view,
            save,
            out_dir,
        } => {
            commands::handle_process(
                files,
                ProcessOptions {
                    view,
                    save,
                    out_dir,
                },
            )
            .await?;
        }
        Commands::Auth { base_url } => {
            if let Err(e) = commands::handle_auth(base_url).await {
                // cliclack has already shown its own cancellation message
                let err_msg = e.to_string();
                if err_msg.contains("cancelled") || err_msg.contains("interrupted") {
                    process::exit(0);
                }
                return Err(e);
            }
        }
        Commands::Config => {
            commands::handle_config()?;
        }
        Commands::Completions { .. } | Commands::Logs | Commands::ConvertHelp => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_process_defaults_to_bilingual_view() {
        let cli = Cli::try_parse_from(["ejsub", "process", "a.wav", "b.wav"]).unwrap();
        match cli.command {
            Commands::Process {
                files, view, save, ..
            } => {
                assert_eq!(files, vec![PathBuf::from("a.wav"), PathBuf::from("b.wav")]);
                assert_eq!(view, View::Bilingual);
                assert!(!save);
            }
            _ => panic!("expected process"),
        }
    }

    #[test]
    fn test_process_requires_a_file() {
        assert!(Cli::try_parse_from(["ejsub", "process"]).is_err());
    }

    #[test]
    fn test_out_dir_requires_save() {
        assert!(Cli::try_parse_from(["ejsub", "process", "a.wav", "-o", "subs"]).is_err());
        assert!(Cli::try_parse_from(["ejsub", "process", "a.wav", "-s", "-o", "subs"]).is_ok());
    }

    #[test]
    fn test_view_values() {
        let cli = Cli::try_parse_from(["ejsub", "p", "a.wav", "--view", "japanese"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Process {
                view: View::Japanese,
                ..
            }
        ));
    }
}
