/// The persisted record of a sort run.
///
/// After a sort, every successful move is written to `last_sort.json` inside
/// the sorted directory as a flat JSON object mapping the file's new path to
/// its original path. The presence of that file is what makes a directory
/// "unsortable"; only one generation is kept.
use crate::error::{SortError, SortResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the record inside the sorted directory.
pub const RECORD_FILE_NAME: &str = "last_sort.json";

/// Mapping from destination path to original path, one entry per moved file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveRecord {
    moves: BTreeMap<PathBuf, PathBuf>,
}

impl MoveRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `original` now lives at `destination`.
    pub fn insert(&mut self, destination: PathBuf, original: PathBuf) {
        self.moves.insert(destination, original);
    }

    /// Looks up where a destination originally came from.
    pub fn original_of(&self, destination: &Path) -> Option<&Path> {
        self.moves.get(destination).map(PathBuf::as_path)
    }

    /// Iterates `(destination, original)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.moves.iter().map(|(d, o)| (d.as_path(), o.as_path()))
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns the path of the record file for a directory.
    pub fn file_path(base_path: &Path) -> PathBuf {
        base_path.join(RECORD_FILE_NAME)
    }

    /// Writes the record into `base_path`, replacing any earlier record.
    pub fn save(&self, base_path: &Path) -> SortResult<()> {
        let record_path = Self::file_path(base_path);

        let json = serde_json::to_string_pretty(self).map_err(|e| SortError::RecordPersist {
            path: record_path.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            ),
        })?;

        fs::write(&record_path, json).map_err(|e| SortError::RecordPersist {
            path: record_path.clone(),
            source: e,
        })?;

        log::debug!(
            "Saved sort record with {} entries to {}",
            self.len(),
            record_path.display()
        );
        Ok(())
    }

    /// Loads the record for `base_path`.
    ///
    /// Returns `Ok(None)` when there is no record. A record that exists but
    /// cannot be read or parsed is a `CorruptRecord` error.
    pub fn load(base_path: &Path) -> SortResult<Option<Self>> {
        let record_path = Self::file_path(base_path);

        if !record_path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&record_path).map_err(|e| SortError::CorruptRecord {
            path: record_path.clone(),
            reason: e.to_string(),
        })?;

        let record = serde_json::from_str(&json).map_err(|e| SortError::CorruptRecord {
            path: record_path.clone(),
            reason: format!("JSON parse error: {}", e),
        })?;

        Ok(Some(record))
    }

    /// Removes the record file. Failures are logged and otherwise ignored.
    pub fn delete(base_path: &Path) {
        let record_path = Self::file_path(base_path);
        if !record_path.exists() {
            return;
        }
        if let Err(e) = fs::remove_file(&record_path) {
            let error = SortError::Cleanup {
                path: record_path,
                source: e,
            };
            log::warn!("{}", error);
        }
    }
}

impl FromIterator<(PathBuf, PathBuf)> for MoveRecord {
    fn from_iter<I: IntoIterator<Item = (PathBuf, PathBuf)>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}

/// Returns true if `base_path` holds a record that `unsort` can replay.
pub fn has_pending_undo(base_path: &Path) -> bool {
    MoveRecord::file_path(base_path).is_file()
}
