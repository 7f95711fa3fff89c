/// Extension-based file classification.
///
/// A file's category is its lowercased extension. The category is turned into
/// the name of the folder the file is sorted into, either through a
/// user-supplied override or by uppercasing the extension.
///
/// # Examples
///
/// ```
/// use dirsort::file_category::{CategoryKey, FolderOverrides};
///
/// let overrides = FolderOverrides::default();
/// let key = CategoryKey::of("Holiday.JPG");
/// assert_eq!(key.as_str(), "jpg");
/// assert_eq!(key.display_folder(&overrides), "JPG");
/// ```
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Category key used for files that have no extension.
pub const NO_EXTENSION: &str = "noextension";

/// Lowercase extension of a file, without the leading dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryKey(String);

impl CategoryKey {
    /// Classifies a file name.
    ///
    /// Dot-files such as `.bashrc` and names ending in a bare `.` have no
    /// extension and fall into [`NO_EXTENSION`].
    ///
    /// ```
    /// use dirsort::file_category::{CategoryKey, NO_EXTENSION};
    ///
    /// assert_eq!(CategoryKey::of("archive.tar.GZ").as_str(), "gz");
    /// assert_eq!(CategoryKey::of("Makefile").as_str(), NO_EXTENSION);
    /// assert_eq!(CategoryKey::of(".bashrc").as_str(), NO_EXTENSION);
    /// ```
    pub fn of(file_name: &str) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .filter(|ext| !ext.is_empty());

        match extension {
            Some(ext) => CategoryKey(ext),
            None => CategoryKey(NO_EXTENSION.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the no-extension sentinel.
    pub fn is_no_extension(&self) -> bool {
        self.0 == NO_EXTENSION
    }

    /// Resolves the folder name files of this category are sorted into.
    ///
    /// An override wins; otherwise the key is uppercased.
    pub fn display_folder(&self, overrides: &FolderOverrides) -> String {
        overrides
            .get(&self.0)
            .map(str::to_string)
            .unwrap_or_else(|| self.0.to_uppercase())
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-function form of [`CategoryKey::of`].
pub fn category_of(file_name: &str) -> CategoryKey {
    CategoryKey::of(file_name)
}

/// Free-function form of [`CategoryKey::display_folder`].
pub fn display_folder(key: &CategoryKey, overrides: &FolderOverrides) -> String {
    key.display_folder(overrides)
}

/// Maps category keys to user-chosen folder names.
///
/// Keys are stored lowercase. The engine only reads this table; validation of
/// the names it contains is the job of whoever builds it (see
/// [`crate::config`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderOverrides(BTreeMap<String, String>);

impl FolderOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a folder name. The key is lowercased before lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Sets the folder name for a category, returning the previous one.
    pub fn insert(&mut self, key: &str, folder: impl Into<String>) -> Option<String> {
        self.0.insert(key.to_lowercase(), folder.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(&key.to_lowercase())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for FolderOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut overrides = FolderOverrides::new();
        for (key, folder) in iter {
            overrides.insert(key.as_ref(), folder);
        }
        overrides
    }
}
