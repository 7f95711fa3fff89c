/// Undoing the last sort.
///
/// This module replays the sort record of a directory in reverse, moving
/// every file back next to where it came from, then deletes the record and
/// removes the category folders the sort left empty.
use crate::error::{FileFailure, SortError, SortResult};
use crate::file_organizer::validate_target;
use crate::naming;
use crate::progress::{Progress, ProgressObserver};
use crate::record::MoveRecord;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of an unsort.
#[derive(Debug, Default)]
pub struct UnsortReport {
    /// False when the directory had no sort record; nothing was done.
    pub record_found: bool,
    /// Number of files moved back.
    pub restored: usize,
    /// Entries that could not be moved back.
    pub failures: Vec<FileFailure>,
    /// Recorded destinations that no longer exist. Not failures.
    pub missing: Vec<PathBuf>,
    /// Category folders removed because they ended up empty.
    pub removed_folders: Vec<PathBuf>,
}

impl UnsortReport {
    /// Returns the total number of record entries processed.
    pub fn total_processed(&self) -> usize {
        self.restored + self.failures.len() + self.missing.len()
    }

    /// Returns true if every recorded file was restored.
    pub fn is_complete_success(&self) -> bool {
        self.record_found && self.failures.is_empty() && self.missing.is_empty()
    }
}

/// Restores directories from their sort record.
pub struct UndoManager;

impl UndoManager {
    /// Undoes the most recent sort of `target`.
    ///
    /// See [`UndoManager::unsort_with_progress`].
    pub fn unsort(target: &Path) -> SortResult<UnsortReport> {
        Self::unsort_with_progress(target, &())
    }

    /// Undoes the most recent sort of `target`, reporting progress per entry.
    ///
    /// # Edge Cases Handled
    ///
    /// * **No record**: returns a report with `record_found == false`
    /// * **Name taken at the original location**: the file comes back as
    ///   `<stem>_restored_<n><.ext>`
    /// * **File gone from its sorted location**: listed in `missing`
    /// * **Move fails**: listed in `failures`, the rest carry on
    /// * **Folder not empty afterwards**: left in place
    ///
    /// The record is deleted once every entry has been tried, whatever the
    /// outcome of the individual moves.
    ///
    /// # Errors
    ///
    /// `InvalidTarget` if `target` is not a directory and `CorruptRecord` if the
    /// record cannot be parsed. In both cases nothing is touched.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::undo::UndoManager;
    /// use std::path::Path;
    ///
    /// match UndoManager::unsort(Path::new("/path/to/directory")) {
    ///     Ok(report) if !report.record_found => println!("Nothing to undo"),
    ///     Ok(report) => println!("Restored {} files", report.restored),
    ///     Err(e) => eprintln!("Unsort failed: {}", e),
    /// }
    /// ```
    pub fn unsort_with_progress(
        target: &Path,
        observer: &dyn ProgressObserver,
    ) -> SortResult<UnsortReport> {
        let base_path = validate_target(target)?;

        let Some(record) = MoveRecord::load(&base_path)? else {
            log::info!("No sort record in {}", base_path.display());
            return Ok(UnsortReport::default());
        };

        let mut report = UnsortReport {
            record_found: true,
            ..UnsortReport::default()
        };
        let mut cleanup_candidates = BTreeSet::new();
        let total = record.len();

        for (index, (destination, original)) in record.iter().enumerate() {
            // Relative entries are relative to the sorted directory.
            let destination = &base_path.join(destination);
            let original = &base_path.join(original);

            if let Some(parent) = destination.parent()
                && parent != base_path
            {
                cleanup_candidates.insert(parent.to_path_buf());
            }

            let file_name = destination
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| destination.display().to_string());

            if !naming::is_taken(destination) {
                log::debug!("Skipping {}: no longer present", destination.display());
                report.missing.push(destination.to_path_buf());
            } else {
                match Self::restore_file(destination, original) {
                    Ok(restored_to) => {
                        log::debug!("{} -> {}", destination.display(), restored_to.display());
                        report.restored += 1;
                    }
                    Err(e) => {
                        log::warn!("Could not restore {}: {}", file_name, e);
                        report.failures.push(FileFailure::new(file_name.clone(), &e));
                    }
                }
            }

            observer.on_progress(&Progress {
                index: index + 1,
                total,
                file_name,
            });
        }

        MoveRecord::delete(&base_path);

        for folder in cleanup_candidates {
            match Self::remove_if_empty(&folder) {
                Ok(true) => report.removed_folders.push(folder),
                Ok(false) => {}
                Err(e) => log::warn!("{}", e),
            }
        }

        log::info!(
            "Restored {}/{} files in {} ({} failed, {} missing)",
            report.restored,
            total,
            base_path.display(),
            report.failures.len(),
            report.missing.len()
        );
        Ok(report)
    }

    /// Moves one file back, picking a `_restored_N` name if the original is taken.
    fn restore_file(destination: &Path, original: &Path) -> SortResult<PathBuf> {
        let restore_to = naming::resolve_restore_collision(original);
        fs::rename(destination, &restore_to).map_err(|e| SortError::MoveFile {
            from: destination.to_path_buf(),
            to: restore_to.clone(),
            source: e,
        })?;
        Ok(restore_to)
    }

    /// Removes `folder` if it exists and is empty. Returns whether it was removed.
    fn remove_if_empty(folder: &Path) -> SortResult<bool> {
        if !folder.is_dir() {
            return Ok(false);
        }
        let mut entries = fs::read_dir(folder).map_err(|e| SortError::Cleanup {
            path: folder.to_path_buf(),
            source: e,
        })?;
        if entries.next().is_some() {
            return Ok(false);
        }
        fs::remove_dir(folder).map_err(|e| SortError::Cleanup {
            path: folder.to_path_buf(),
            source: e,
        })?;
        Ok(true)
    }
}
