//! User settings: per-category folder name overrides.
//!
//! Settings live in a TOML file owned by the command-line front-end. The sort
//! engine never reads or writes this file; it only receives the resulting
//! [`FolderOverrides`] table.
//!
//! # Configuration File Format
//!
//! ```toml
//! [category_overrides]
//! jpg = "Pictures"
//! txt = "Notes"
//! noextension = "Misc"
//! ```

use crate::file_category::FolderOverrides;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Maximum length of a folder name override.
pub const MAX_FOLDER_NAME_LENGTH: usize = 50;

/// Name of the per-directory config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".dirsortrc.toml";

static INVALID_FOLDER_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid regex"));

static VALID_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+$").expect("valid regex"));

/// Errors that can occur while loading, validating or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Invalid folder name '{name}': {reason}")]
    InvalidFolderName { name: String, reason: String },

    #[error("Invalid extension '{extension}': {reason}")]
    InvalidExtension { extension: String, reason: String },

    #[error("IO error on configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Persistent user settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Folder names to use instead of the uppercased extension.
    #[serde(default)]
    pub category_overrides: FolderOverrides,
}

/// Checks a folder name override and returns it trimmed.
pub fn validate_folder_name(name: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidFolderName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(invalid("folder name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_FOLDER_NAME_LENGTH {
        return Err(invalid(&format!(
            "folder name too long (max {} characters)",
            MAX_FOLDER_NAME_LENGTH
        )));
    }
    if INVALID_FOLDER_CHARS.is_match(trimmed) {
        return Err(invalid(r#"folder name cannot contain any of <>:"/\|?*"#));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(invalid("folder name cannot be '.' or '..'"));
    }
    Ok(trimmed.to_string())
}

/// Normalizes a user-typed extension to a category key.
///
/// `" .JPG "` becomes `"jpg"`. Only letters and digits are accepted.
pub fn normalize_extension(extension: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidExtension {
        extension: extension.to_string(),
        reason: reason.to_string(),
    };

    let normalized = extension.trim().to_lowercase();
    let normalized = normalized.strip_prefix('.').unwrap_or(&normalized);
    if normalized.is_empty() {
        return Err(invalid("extension cannot be empty"));
    }
    if !VALID_EXTENSION.is_match(normalized) {
        return Err(invalid("extension can only contain letters and numbers"));
    }
    Ok(normalized.to_string())
}

impl Settings {
    /// Load settings, with fallback to defaults.
    ///
    /// Attempts to load settings in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.dirsortrc.toml` in the current directory
    /// 3. Look for `~/.config/dirsort/config.toml`
    /// 4. Fall back to default settings
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly provided file is missing, or if any
    /// file found cannot be read, parsed or validated.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::active_config_path(config_path) {
            Some(path) if config_path.is_some() || path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// The file [`Settings::load`] reads, and the one edits should go to.
    ///
    /// This is `config_path` when given, else `.dirsortrc.toml` in the current
    /// directory if it exists, else the per-user file. `None` only when no
    /// home directory is known.
    pub fn active_config_path(config_path: Option<&Path>) -> Option<PathBuf> {
        Self::active_config_path_in(config_path, Path::new(""))
    }

    fn active_config_path_in(config_path: Option<&Path>, working_dir: &Path) -> Option<PathBuf> {
        if let Some(path) = config_path {
            return Some(path.to_path_buf());
        }

        let local_config = working_dir.join(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        Self::user_config_path()
    }

    /// Path of the per-user settings file, `~/.config/dirsort/config.toml`.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("dirsort").join("config.toml"))
    }

    /// Load settings from a specific file and validate them.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let settings: Settings =
            toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        log::debug!("Loaded settings from {}", path.display());
        settings.validated()
    }

    /// Re-checks every override, normalizing keys and trimming names.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let category_overrides = self
            .category_overrides
            .iter()
            .map(|(ext, folder)| -> Result<(String, String), ConfigError> {
                Ok((normalize_extension(ext)?, validate_folder_name(folder)?))
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .collect();

        Ok(Self { category_overrides })
    }

    /// Adds or replaces an override after validating both parts.
    ///
    /// Returns the normalized extension.
    pub fn set_override(&mut self, extension: &str, folder: &str) -> Result<String, ConfigError> {
        let key = normalize_extension(extension)?;
        let folder = validate_folder_name(folder)?;
        self.category_overrides.insert(&key, folder);
        Ok(key)
    }

    /// Removes an override. Returns the folder name it mapped to.
    pub fn remove_override(&mut self, extension: &str) -> Result<Option<String>, ConfigError> {
        let key = normalize_extension(extension)?;
        Ok(self.category_overrides.remove(&key))
    }

    /// Writes settings as TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
