//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored output,
//! progress tracking, and formatted tables. This module abstracts away output details,
//! making it easy to change formatting globally.

use crate::error::FileFailure;
use crate::preview::Preview;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Maximum number of failures printed before the rest are summarized.
pub const MAX_DISPLAYED_FAILURES: usize = 10;

/// Maximum number of file names listed per folder in a preview.
pub const MAX_PREVIEW_FILES: usize = 5;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for operations
/// - Preview tables and failure lists
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// OutputFormatter::success("Moved 12 files.");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates and returns a progress bar for file operations.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_with_message("Completed!");
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints the folders a sort would create and the files going into each.
    ///
    /// Only the first [`MAX_PREVIEW_FILES`] names of each folder are listed.
    pub fn preview_table(preview: &Preview) {
        Self::header("PREVIEW");

        let max_folder_len = preview
            .groups()
            .iter()
            .map(|g| g.folder.len() + 1)
            .max()
            .unwrap_or(0)
            .max(6); // At least "Folder" width

        println!(
            "{:<width$} | {}",
            "Folder".bold(),
            "Files".bold(),
            width = max_folder_len
        );
        println!("{}", "-".repeat(max_folder_len + 10));

        for group in preview.groups() {
            let count = group.files.len();
            println!(
                "{:<width$} | {} {}",
                format!("{}/", group.folder),
                count.to_string().green(),
                Self::files_word(count),
                width = max_folder_len
            );
            for name in group.files.iter().take(MAX_PREVIEW_FILES) {
                println!("{:<width$} |   {}", "", name.dimmed(), width = max_folder_len);
            }
            if count > MAX_PREVIEW_FILES {
                println!(
                    "{:<width$} |   {}",
                    "",
                    format!("... and {} more", count - MAX_PREVIEW_FILES).dimmed(),
                    width = max_folder_len
                );
            }
        }

        let total = preview.total_files();
        println!("{}", "-".repeat(max_folder_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            Self::files_word(total),
            width = max_folder_len
        );
    }

    /// Prints per-file failures, truncated to [`MAX_DISPLAYED_FAILURES`].
    pub fn failure_list(action: &str, failures: &[FileFailure]) {
        if failures.is_empty() {
            return;
        }
        Self::error(&format!(
            "Failed to {} {} {}:",
            action,
            failures.len(),
            Self::files_word(failures.len())
        ));
        for failure in failures.iter().take(MAX_DISPLAYED_FAILURES) {
            eprintln!("    - {}", failure);
        }
        if failures.len() > MAX_DISPLAYED_FAILURES {
            eprintln!(
                "    ... and {} more errors",
                failures.len() - MAX_DISPLAYED_FAILURES
            );
        }
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    fn files_word(count: usize) -> &'static str {
        if count == 1 { "file" } else { "files" }
    }
}
