//! Read-only dry run of a sort.

use crate::error::SortResult;
use crate::file_category::FolderOverrides;
use crate::file_organizer::{sortable_files, validate_target};
use std::path::Path;

/// Files that would go into one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewGroup {
    /// Display folder name.
    pub folder: String,
    /// File names, in directory order.
    pub files: Vec<String>,
}

/// What a sort would do, grouped by destination folder.
///
/// Groups appear in the order their first file was enumerated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    groups: Vec<PreviewGroup>,
}

impl Preview {
    fn push(&mut self, folder: String, file_name: String) {
        match self.groups.iter_mut().find(|g| g.folder == folder) {
            Some(group) => group.files.push(file_name),
            None => self.groups.push(PreviewGroup {
                folder,
                files: vec![file_name],
            }),
        }
    }

    pub fn groups(&self) -> &[PreviewGroup] {
        &self.groups
    }

    /// Files that would go into `folder`, if any.
    pub fn files_for(&self, folder: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|g| g.folder == folder)
            .map(|g| g.files.as_slice())
    }

    /// Total number of files across all groups.
    pub fn total_files(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum()
    }
}

/// Groups the sortable files of `target` by the folder they would be sorted into.
///
/// Nothing is moved or created. Returns `Ok(None)` when there is nothing to
/// sort, so callers can skip asking for confirmation.
///
/// # Examples
///
/// ```no_run
/// use dirsort::file_category::FolderOverrides;
/// use dirsort::preview::preview;
/// use std::path::Path;
///
/// if let Some(plan) = preview(Path::new("/path/to/downloads"), &FolderOverrides::default()).unwrap() {
///     for group in plan.groups() {
///         println!("{}: {} files", group.folder, group.files.len());
///     }
/// }
/// ```
pub fn preview(target: &Path, overrides: &FolderOverrides) -> SortResult<Option<Preview>> {
    let base_path = validate_target(target)?;
    let files = sortable_files(&base_path)?;

    if files.is_empty() {
        return Ok(None);
    }

    let mut plan = Preview::default();
    for file in files {
        plan.push(file.category.display_folder(overrides), file.name);
    }
    Ok(Some(plan))
}
