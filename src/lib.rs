//! dirsort - sort a directory's files into per-extension folders, and back
//!
//! This library provides extension-based classification, a collision-free
//! move planner that records every move, a restorer that replays that record
//! to undo a sort, and a read-only preview. The `cli` module is a thin
//! command-line front-end on top of it.

pub mod cli;
pub mod config;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod naming;
pub mod output;
pub mod preview;
pub mod progress;
pub mod record;
pub mod undo;

pub use config::{ConfigError, Settings};
pub use error::{FileFailure, SortError, SortResult};
pub use file_category::{CategoryKey, FolderOverrides, NO_EXTENSION};
pub use file_organizer::{FileOrganizer, SortReport};
pub use preview::{Preview, PreviewGroup};
pub use progress::{Progress, ProgressObserver};
pub use record::{MoveRecord, RECORD_FILE_NAME, has_pending_undo};
pub use undo::{UndoManager, UnsortReport};

pub use cli::{SortCommand, run_cli};

use std::path::Path;

/// Groups the files of `dir` by destination folder without moving anything.
pub fn preview(dir: &Path, overrides: &FolderOverrides) -> SortResult<Option<Preview>> {
    preview::preview(dir, overrides)
}

/// Sorts the files of `dir` into per-category folders.
pub fn sort(dir: &Path, overrides: &FolderOverrides) -> SortResult<SortReport> {
    FileOrganizer::sort(dir, overrides)
}

/// Undoes the last sort of `dir`.
pub fn unsort(dir: &Path) -> SortResult<UnsortReport> {
    UndoManager::unsort(dir)
}

/// Initializes logging. `RUST_LOG` takes precedence over `verbosity`.
///
/// 0 shows warnings, 1 adds info, 2 or more adds debug output.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
