/// Sorting files into per-category folders.
///
/// This module enumerates the regular files directly inside a target
/// directory, moves each into the folder for its category, and records every
/// move so it can later be undone by [`crate::undo::UndoManager`].
use crate::error::{FileFailure, SortError, SortResult};
use crate::file_category::{CategoryKey, FolderOverrides};
use crate::naming;
use crate::progress::{Progress, ProgressObserver};
use crate::record::{MoveRecord, RECORD_FILE_NAME};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// A regular file found directly inside the target directory.
#[derive(Debug, Clone)]
pub struct SortableFile {
    /// The file name.
    pub name: String,
    /// The full path to the file.
    pub path: PathBuf,
    /// The file's category.
    pub category: CategoryKey,
}

/// Outcome of a sort run.
#[derive(Debug, Default)]
pub struct SortReport {
    /// Number of files found to sort.
    pub total_files: usize,
    /// Number of files moved.
    pub moved: usize,
    /// Every file that could not be moved.
    pub failures: Vec<FileFailure>,
    /// The moves that were made, as persisted for undo.
    pub record: MoveRecord,
    /// Set when the record could not be written. Moved files stay moved.
    pub record_warning: Option<SortError>,
}

impl SortReport {
    /// True when there was nothing to sort.
    pub fn is_noop(&self) -> bool {
        self.total_files == 0
    }

    /// True when the run can be undone with `unsort`.
    pub fn undo_available(&self) -> bool {
        !self.record.is_empty() && self.record_warning.is_none()
    }
}

/// Checks that `target` is an existing directory and returns its absolute path.
pub fn validate_target(target: &Path) -> SortResult<PathBuf> {
    if !target.exists() {
        return Err(SortError::invalid_target(target, "path does not exist"));
    }
    if !target.is_dir() {
        return Err(SortError::invalid_target(target, "path is not a directory"));
    }
    std::path::absolute(target).map_err(|e| SortError::invalid_target(target, e.to_string()))
}

/// Lists the regular files directly inside `base_path`, in directory order.
///
/// Subdirectories, symlinks and the sort record itself are skipped.
pub fn sortable_files(base_path: &Path) -> SortResult<Vec<SortableFile>> {
    let entries = fs::read_dir(base_path).map_err(|e| SortError::ReadDir {
        path: base_path.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name == RECORD_FILE_NAME {
            continue;
        }
        files.push(SortableFile {
            category: CategoryKey::of(&name),
            path: entry.path(),
            name,
        });
    }
    Ok(files)
}

/// Creates the category folder, reusing it if it already exists.
fn ensure_category_folder(category_path: &Path) -> SortResult<()> {
    match fs::create_dir(category_path) {
        Ok(()) => {
            log::debug!("Created folder {}", category_path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && category_path.is_dir() => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(SortError::CreateFolder {
            path: category_path.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} exists and is not a directory", category_path.display()),
            ),
        }),
        Err(e) => Err(SortError::CreateFolder {
            path: category_path.to_path_buf(),
            source: e,
        }),
    }
}

/// Returns true if `folder` names exactly one direct child of a directory.
fn is_single_folder_name(folder: &str) -> bool {
    let mut components = Path::new(folder).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Moves files into category folders.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Moves one file into `category_folder` inside `base_path`.
    ///
    /// The folder is created if needed. If the file name is already taken in
    /// the folder, a `_N` suffix is added. Returns the final destination.
    ///
    /// `category_folder` must be a single plain folder name; absolute paths,
    /// `.`, `..` and nested paths are refused. Files whose source or
    /// destination path is not valid UTF-8 are left in place, since the move
    /// could not be written to the sort record.
    pub fn move_to_category(
        base_path: &Path,
        file_path: &Path,
        category_folder: &str,
    ) -> SortResult<PathBuf> {
        let category_path = base_path.join(category_folder);
        if !is_single_folder_name(category_folder) {
            return Err(SortError::CreateFolder {
                path: category_path,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "'{}' is not a folder name inside the target directory",
                        category_folder
                    ),
                ),
            });
        }
        ensure_category_folder(&category_path)?;

        let file_name = file_path.file_name().ok_or_else(|| SortError::MoveFile {
            from: file_path.to_path_buf(),
            to: category_path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
        })?;

        let destination = naming::resolve_collision(&category_path.join(file_name));

        if file_path.to_str().is_none() || destination.to_str().is_none() {
            return Err(SortError::MoveFile {
                from: file_path.to_path_buf(),
                to: destination,
                source: io::Error::new(
                    io::ErrorKind::InvalidData,
                    "path is not valid UTF-8 and cannot be recorded for undo",
                ),
            });
        }

        fs::rename(file_path, &destination).map_err(|e| SortError::MoveFile {
            from: file_path.to_path_buf(),
            to: destination.clone(),
            source: e,
        })?;

        Ok(destination)
    }

    /// Sorts every regular file in `target` into its category folder.
    ///
    /// See [`FileOrganizer::sort_with_progress`].
    pub fn sort(target: &Path, overrides: &FolderOverrides) -> SortResult<SortReport> {
        Self::sort_with_progress(target, overrides, &())
    }

    /// Sorts every regular file in `target`, reporting progress after each file.
    ///
    /// A file that cannot be moved is listed in [`SortReport::failures`] and the
    /// run carries on with the rest. When at least one file moved, the record
    /// is written to `target`, replacing any earlier one; if that write fails
    /// the error is returned in [`SortReport::record_warning`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidTarget` or `ReadDir` before anything is moved.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::file_category::FolderOverrides;
    /// use dirsort::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let report = FileOrganizer::sort(Path::new("/path/to/downloads"), &FolderOverrides::default())
    ///     .expect("sort failed");
    /// println!("Moved {} of {} files", report.moved, report.total_files);
    /// ```
    pub fn sort_with_progress(
        target: &Path,
        overrides: &FolderOverrides,
        observer: &dyn ProgressObserver,
    ) -> SortResult<SortReport> {
        let base_path = validate_target(target)?;
        let files = sortable_files(&base_path)?;

        let mut report = SortReport {
            total_files: files.len(),
            ..SortReport::default()
        };

        if files.is_empty() {
            log::info!("No files to sort in {}", base_path.display());
            return Ok(report);
        }

        for (index, file) in files.iter().enumerate() {
            let folder = file.category.display_folder(overrides);

            match Self::move_to_category(&base_path, &file.path, &folder) {
                Ok(destination) => {
                    log::debug!("{} -> {}", file.path.display(), destination.display());
                    report.record.insert(destination, file.path.clone());
                    report.moved += 1;
                }
                Err(e) => {
                    log::warn!("Could not sort {}: {}", file.name, e);
                    report.failures.push(FileFailure::new(&file.name, &e));
                }
            }

            observer.on_progress(&Progress {
                index: index + 1,
                total: files.len(),
                file_name: file.name.clone(),
            });
        }

        if !report.record.is_empty() {
            if crate::record::has_pending_undo(&base_path) {
                log::warn!(
                    "Replacing the previous sort record in {}; the earlier sort can no longer be undone",
                    base_path.display()
                );
            }
            if let Err(e) = report.record.save(&base_path) {
                log::warn!("{}", e);
                report.record_warning = Some(e);
            }
        }

        log::info!(
            "Sorted {}/{} files in {} ({} failed)",
            report.moved,
            report.total_files,
            base_path.display(),
            report.failures.len()
        );
        Ok(report)
    }
}
