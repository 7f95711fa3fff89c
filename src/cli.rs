//! Command-line front-end for dirsort.
//!
//! This module handles everything the engine deliberately does not:
//! - Loading and editing the settings file
//! - Validating the directory the user typed
//! - Asking for confirmation after the preview
//! - Running sort/unsort on a worker thread and drawing progress
//! - Rendering reports

use crate::config::Settings;
use crate::file_organizer::{FileOrganizer, SortReport, validate_target};
use crate::output::OutputFormatter;
use crate::preview::preview;
use crate::progress::Progress;
use crate::record::has_pending_undo;
use crate::undo::{UndoManager, UnsortReport};
use anyhow::{Context, Result, anyhow};
use dialoguer::Confirm;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

/// A command the CLI can run.
#[derive(Debug, Clone)]
pub enum SortCommand {
    /// Show how a directory would be sorted.
    Preview { dir: PathBuf },
    /// Sort a directory.
    Sort {
        dir: PathBuf,
        /// Skip the confirmation prompt.
        assume_yes: bool,
    },
    /// Undo the last sort of a directory.
    Unsort { dir: PathBuf },
    /// Report whether a directory has a sort that can be undone.
    Status { dir: PathBuf },
    /// Manage folder name overrides.
    Overrides(OverrideCommand),
}

/// Edits to the folder name override table.
#[derive(Debug, Clone)]
pub enum OverrideCommand {
    List,
    Set { extension: String, folder: String },
    Remove { extension: String },
    Clear,
}

/// Runs a command with settings found at the default locations.
///
/// # Examples
///
/// ```no_run
/// use dirsort::cli::{run_cli, SortCommand};
/// use std::path::PathBuf;
///
/// let command = SortCommand::Sort {
///     dir: PathBuf::from("/path/to/downloads"),
///     assume_yes: true,
/// };
/// if let Err(e) = run_cli(command) {
///     eprintln!("Error: {:#}", e);
/// }
/// ```
pub fn run_cli(command: SortCommand) -> Result<()> {
    run_cli_with_config(command, None)
}

/// Runs a command, reading settings from `config_path` if given.
pub fn run_cli_with_config(command: SortCommand, config_path: Option<&Path>) -> Result<()> {
    match command {
        SortCommand::Preview { dir } => {
            let settings = Settings::load(config_path).context("Error loading configuration")?;
            preview_directory(&dir, &settings)
        }
        SortCommand::Sort { dir, assume_yes } => {
            let settings = Settings::load(config_path).context("Error loading configuration")?;
            sort_directory(&dir, &settings, assume_yes).map(|_| ())
        }
        SortCommand::Unsort { dir } => unsort_directory(&dir).map(|_| ()),
        SortCommand::Status { dir } => show_status(&dir),
        SortCommand::Overrides(command) => manage_overrides(command, config_path),
    }
}

/// Prints the preview for a directory.
fn preview_directory(dir: &Path, settings: &Settings) -> Result<()> {
    let dir = validate_target(dir)?;
    OutputFormatter::dry_run_notice("No files will be moved.");
    OutputFormatter::info(&format!("Analyzing contents of: {}", dir.display()));

    match preview(&dir, &settings.category_overrides)? {
        Some(plan) => OutputFormatter::preview_table(&plan),
        None => OutputFormatter::plain("No files to sort in this folder."),
    }
    Ok(())
}

/// Previews, confirms, then sorts a directory.
///
/// Returns `None` when there was nothing to sort or the user declined.
pub fn sort_directory(
    dir: &Path,
    settings: &Settings,
    assume_yes: bool,
) -> Result<Option<SortReport>> {
    let dir = validate_target(dir)?;

    let Some(plan) = preview(&dir, &settings.category_overrides)? else {
        OutputFormatter::plain("No files to sort in this folder.");
        return Ok(None);
    };
    OutputFormatter::preview_table(&plan);

    if !assume_yes {
        let proceed = Confirm::new()
            .with_prompt(format!("Sort {} files?", plan.total_files()))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !proceed {
            OutputFormatter::plain("Sort cancelled.");
            return Ok(None);
        }
    }

    let overrides = settings.category_overrides.clone();
    let worker_dir = dir.clone();
    let report = run_with_progress(plan.total_files(), move |tx| {
        FileOrganizer::sort_with_progress(&worker_dir, &overrides, &tx)
    })?;

    OutputFormatter::success(&format!(
        "Successfully moved {} {}.",
        report.moved,
        if report.moved == 1 { "file" } else { "files" }
    ));
    OutputFormatter::failure_list("move", &report.failures);
    if let Some(warning) = &report.record_warning {
        OutputFormatter::warning(&format!("{}. Undo will not be available.", warning));
    } else if report.undo_available() {
        OutputFormatter::info(&format!(
            "Run 'dirsort unsort {}' to revert changes.",
            dir.display()
        ));
    }

    Ok(Some(report))
}

/// Restores a directory from its sort record.
pub fn unsort_directory(dir: &Path) -> Result<UnsortReport> {
    let dir = validate_target(dir)?;

    if !has_pending_undo(&dir) {
        OutputFormatter::plain("No sort record found to undo.");
        return Ok(UnsortReport::default());
    }

    OutputFormatter::info(&format!("Restoring files in: {}", dir.display()));
    let worker_dir = dir.clone();
    // The total is only known once the record is parsed on the worker.
    let report = run_with_progress(0, move |tx| {
        UndoManager::unsort_with_progress(&worker_dir, &tx)
    })?;

    if !report.record_found {
        OutputFormatter::plain("No sort record found to undo.");
        return Ok(report);
    }

    OutputFormatter::success(&format!(
        "Successfully restored {} {}.",
        report.restored,
        if report.restored == 1 { "file" } else { "files" }
    ));
    if !report.missing.is_empty() {
        OutputFormatter::warning(&format!(
            "{} recorded files were no longer in place and were skipped.",
            report.missing.len()
        ));
    }
    OutputFormatter::failure_list("restore", &report.failures);
    for folder in &report.removed_folders {
        OutputFormatter::plain(&format!("  Removed empty folder {}", folder.display()));
    }

    Ok(report)
}

/// Runs `job` on a worker thread while drawing its progress on this one.
fn run_with_progress<T, F>(expected_total: usize, job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(mpsc::Sender<Progress>) -> crate::error::SortResult<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<Progress>();
    let worker = thread::spawn(move || job(tx));

    let pb = OutputFormatter::create_progress_bar(expected_total as u64);
    for progress in rx {
        pb.set_length(progress.total as u64);
        pb.set_position(progress.index as u64);
        pb.set_message(progress.file_name);
    }
    pb.finish_and_clear();

    let result = worker
        .join()
        .map_err(|_| anyhow!("Worker thread panicked"))?;
    Ok(result?)
}

fn show_status(dir: &Path) -> Result<()> {
    let dir = validate_target(dir)?;
    if has_pending_undo(&dir) {
        OutputFormatter::success(&format!("{} can be unsorted.", dir.display()));
    } else {
        OutputFormatter::plain(&format!("No pending sort to undo in {}.", dir.display()));
    }
    Ok(())
}

fn manage_overrides(command: OverrideCommand, config_path: Option<&Path>) -> Result<()> {
    let target = Settings::active_config_path(config_path)
        .ok_or_else(|| anyhow!("Could not determine the home directory"))?;
    log::info!("Editing overrides in {}", target.display());
    let mut settings = if target.exists() {
        Settings::load_from_file(&target)
            .with_context(|| format!("Error loading {}", target.display()))?
    } else {
        Settings::default()
    };

    match command {
        OverrideCommand::List => {
            if settings.category_overrides.is_empty() {
                OutputFormatter::plain("No folder overrides set.");
            }
            for (ext, folder) in settings.category_overrides.iter() {
                OutputFormatter::plain(&format!(".{} -> {}/", ext, folder));
            }
            return Ok(());
        }
        OverrideCommand::Set { extension, folder } => {
            let key = settings.set_override(&extension, &folder)?;
            OutputFormatter::success(&format!(
                "Files ending in .{} will be sorted into {}/",
                key,
                settings.category_overrides.get(&key).unwrap_or(&folder)
            ));
        }
        OverrideCommand::Remove { extension } => match settings.remove_override(&extension)? {
            Some(folder) => {
                OutputFormatter::success(&format!("Removed override {} -> {}/", extension, folder))
            }
            None => OutputFormatter::plain(&format!("No override set for {}", extension)),
        },
        OverrideCommand::Clear => {
            settings.category_overrides.clear();
            OutputFormatter::success("Cleared all folder overrides.");
        }
    }

    settings
        .save(&target)
        .with_context(|| format!("Error saving {}", target.display()))
}
