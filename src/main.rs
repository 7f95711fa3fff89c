use clap::{Parser, Subcommand};
use dirsort::cli::{OverrideCommand, SortCommand, run_cli_with_config};
use dirsort::output::OutputFormatter;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "dirsort")]
#[command(about = "Sort a directory's files into per-extension folders, and undo it", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file to use instead of the default locations
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Shows how a directory would be sorted, without moving anything
    Preview { dir: PathBuf },

    /// Sorts the files of a directory into per-extension folders
    Sort {
        dir: PathBuf,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Moves files back to where they were before the last sort
    Unsort { dir: PathBuf },

    /// Tells whether the last sort of a directory can be undone
    Status { dir: PathBuf },

    /// Manages folder names used instead of the uppercased extension
    Overrides {
        #[command(subcommand)]
        action: OverrideAction,
    },
}

#[derive(Subcommand, Debug)]
enum OverrideAction {
    /// Lists all overrides
    List,
    /// Sorts files with EXTENSION into FOLDER
    Set { extension: String, folder: String },
    /// Removes the override for EXTENSION
    Remove { extension: String },
    /// Removes all overrides
    Clear,
}

impl From<Commands> for SortCommand {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Preview { dir } => SortCommand::Preview { dir },
            Commands::Sort { dir, yes } => SortCommand::Sort {
                dir,
                assume_yes: yes,
            },
            Commands::Unsort { dir } => SortCommand::Unsort { dir },
            Commands::Status { dir } => SortCommand::Status { dir },
            Commands::Overrides { action } => SortCommand::Overrides(match action {
                OverrideAction::List => OverrideCommand::List,
                OverrideAction::Set { extension, folder } => {
                    OverrideCommand::Set { extension, folder }
                }
                OverrideAction::Remove { extension } => OverrideCommand::Remove { extension },
                OverrideAction::Clear => OverrideCommand::Clear,
            }),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    dirsort::init_logging(cli.verbose);

    match run_cli_with_config(cli.command.into(), cli.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}
