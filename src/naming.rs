/// Collision-free destination names.
///
/// When a destination already exists, a numeric suffix is inserted between
/// the file stem and its extension: `a.txt` becomes `a_1.txt`, then `a_2.txt`.
/// Files put back by an unsort use `a_restored_1.txt` so they stay
/// distinguishable from renames made while sorting.
///
/// Nothing is reserved between the existence check and the move that
/// follows; callers are expected to move right away.
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix scheme used when a destination is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixScheme {
    /// `<stem>_<n><.ext>`, used by sort.
    Sort,
    /// `<stem>_restored_<n><.ext>`, used by unsort.
    Restore,
}

impl SuffixScheme {
    fn file_name(self, stem: &str, counter: usize, extension: Option<&str>) -> String {
        let base = match self {
            SuffixScheme::Sort => format!("{}_{}", stem, counter),
            SuffixScheme::Restore => format!("{}_restored_{}", stem, counter),
        };
        match extension {
            Some(ext) => format!("{}.{}", base, ext),
            None => base,
        }
    }
}

/// Returns true if anything, including a dangling symlink, occupies `path`.
pub(crate) fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Returns `desired` if it is free, otherwise the first free suffixed variant.
pub fn resolve_with(desired: &Path, scheme: SuffixScheme) -> PathBuf {
    if !is_taken(desired) {
        return desired.to_path_buf();
    }

    let parent = desired.parent().unwrap_or_else(|| Path::new(""));
    let stem = desired
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = desired
        .extension()
        .map(|e| e.to_string_lossy().to_string());

    let mut counter = 1;
    loop {
        let candidate = parent.join(scheme.file_name(&stem, counter, extension.as_deref()));
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Sort-time collision resolution (`a.txt` → `a_1.txt`).
pub fn resolve_collision(desired: &Path) -> PathBuf {
    resolve_with(desired, SuffixScheme::Sort)
}

/// Restore-time collision resolution (`a.txt` → `a_restored_1.txt`).
pub fn resolve_restore_collision(desired: &Path) -> PathBuf {
    resolve_with(desired, SuffixScheme::Restore)
}
