use dirsort::cli::{SortCommand, run_cli_with_config};
use dirsort::{FolderOverrides, MoveRecord, RECORD_FILE_NAME, has_pending_undo, preview, sort, unsort};
/// Integration tests for dirsort
///
/// These tests run the public entry points against real temporary directories.
///
/// Test categories:
/// 1. Sorting and classification
/// 2. Preview
/// 3. Collisions
/// 4. Undo and folder cleanup
/// 5. Partial failure and bookkeeping
/// 6. CLI commands
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary directory with helpers for building and inspecting file trees.
struct TestFixture {
    _temp_dir: TempDir,
    base: PathBuf,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = std::path::absolute(temp_dir.path()).expect("Failed to make path absolute");
        TestFixture {
            _temp_dir: temp_dir,
            base,
        }
    }

    fn path(&self) -> &Path {
        &self.base
    }

    fn create_text_file(&self, rel_path: &str, content: &str) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content.as_bytes())
            .expect("Failed to write file content");
    }

    fn create_files(&self, names: &[&str]) {
        for name in names {
            self.create_text_file(name, name);
        }
    }

    fn create_subdir(&self, name: &str) {
        fs::create_dir(self.path().join(name)).expect("Failed to create subdirectory");
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path)).expect("Failed to read file")
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_dir(), "Directory should exist: {}", path.display());
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "Path should not exist: {}", path.display());
    }

    /// Sorted names of regular files directly in the directory, excluding the record.
    fn top_level_files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let name = entry.file_name().to_string_lossy().to_string();
                (entry.file_type().ok()?.is_file() && name != RECORD_FILE_NAME).then_some(name)
            })
            .collect();
        names.sort();
        names
    }

    /// Sorted names of directories directly in the directory.
    fn top_level_dirs(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| {
                let entry = entry.ok()?;
                entry
                    .file_type()
                    .ok()?
                    .is_dir()
                    .then(|| entry.file_name().to_string_lossy().to_string())
            })
            .collect();
        names.sort();
        names
    }

    fn load_record(&self) -> MoveRecord {
        MoveRecord::load(self.path())
            .expect("Failed to load record")
            .expect("Record should exist")
    }
}

fn no_overrides() -> FolderOverrides {
    FolderOverrides::default()
}

// ============================================================================
// 1. Sorting and classification
// ============================================================================

#[test]
fn test_sort_empty_directory() {
    let fixture = TestFixture::new();

    let report = sort(fixture.path(), &no_overrides()).expect("Sort failed");

    assert!(report.is_noop());
    assert!(report.failures.is_empty());
    assert!(!has_pending_undo(fixture.path()));
    assert!(fixture.top_level_dirs().is_empty());
}

#[test]
fn test_sort_moves_files_into_uppercase_extension_folders() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.txt", "b.txt", "c.jpg"]);

    let report = sort(fixture.path(), &no_overrides()).expect("Sort failed");

    assert_eq!(report.total_files, 3);
    assert_eq!(report.moved, 3);
    assert_eq!(report.record.len(), 3);
    fixture.assert_file_exists("TXT/a.txt");
    fixture.assert_file_exists("TXT/b.txt");
    fixture.assert_file_exists("JPG/c.jpg");
    assert!(fixture.top_level_files().is_empty());
    assert_eq!(fixture.top_level_dirs(), vec!["JPG", "TXT"]);
}

#[test]
fn test_sort_uses_overrides() {
    let fixture = TestFixture::new();
    fixture.create_files(&["song.mp3", "clip.MP4"]);
    let overrides: FolderOverrides = [("mp3", "Music")].into_iter().collect();

    sort(fixture.path(), &overrides).expect("Sort failed");

    fixture.assert_file_exists("Music/song.mp3");
    fixture.assert_file_exists("MP4/clip.MP4");
    fixture.assert_not_exists("MP3");
}

#[test]
fn test_sort_files_without_extension() {
    let fixture = TestFixture::new();
    fixture.create_files(&["README", "Makefile", ".hidden"]);

    sort(fixture.path(), &no_overrides()).expect("Sort failed");

    fixture.assert_file_exists("NOEXTENSION/README");
    fixture.assert_file_exists("NOEXTENSION/Makefile");
    fixture.assert_file_exists("NOEXTENSION/.hidden");
}

#[test]
fn test_sort_mixed_case_extensions_share_folder() {
    let fixture = TestFixture::new();
    fixture.create_files(&["one.PNG", "two.png", "three.Png"]);

    sort(fixture.path(), &no_overrides()).expect("Sort failed");

    fixture.assert_file_exists("PNG/one.PNG");
    fixture.assert_file_exists("PNG/two.png");
    fixture.assert_file_exists("PNG/three.Png");
}

#[test]
fn test_sort_ignores_subdirectories() {
    let fixture = TestFixture::new();
    fixture.create_text_file("nested/inner.txt", "inner");
    fixture.create_files(&["outer.txt"]);

    let report = sort(fixture.path(), &no_overrides()).expect("Sort failed");

    assert_eq!(report.moved, 1);
    fixture.assert_file_exists("nested/inner.txt");
    fixture.assert_file_exists("TXT/outer.txt");
}

#[test]
fn test_sort_preserves_file_content() {
    let fixture = TestFixture::new();
    fixture.create_text_file("notes.md", "# heading\nbody\n");

    sort(fixture.path(), &no_overrides()).expect("Sort failed");

    assert_eq!(fixture.read("MD/notes.md"), "# heading\nbody\n");
}

#[test]
fn test_sort_invalid_target() {
    let fixture = TestFixture::new();
    fixture.create_files(&["file.txt"]);

    assert!(matches!(
        sort(&fixture.path().join("missing"), &no_overrides()),
        Err(dirsort::SortError::InvalidTarget { .. })
    ));
    assert!(matches!(
        sort(&fixture.path().join("file.txt"), &no_overrides()),
        Err(dirsort::SortError::InvalidTarget { .. })
    ));
    fixture.assert_file_exists("file.txt");
}

#[test]
fn test_sort_twice_does_not_sort_record_file() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.txt"]);
    sort(fixture.path(), &no_overrides()).expect("Sort failed");

    fixture.create_files(&["b.txt"]);
    let report = sort(fixture.path(), &no_overrides()).expect("Sort failed");

    assert_eq!(report.total_files, 1);
    fixture.assert_file_exists(RECORD_FILE_NAME);
    fixture.assert_not_exists("JSON");
    fixture.assert_file_exists("TXT/a.txt");
    fixture.assert_file_exists("TXT/b.txt");
}

// ============================================================================
// 2. Preview
// ============================================================================

#[test]
fn test_preview_scenario() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.txt", "b.txt", "c.jpg"]);

    let plan = preview(fixture.path(), &no_overrides())
        .expect("Preview failed")
        .expect("Expected files to sort");

    let mut txt = plan.files_for("TXT").expect("TXT group").to_vec();
    txt.sort();
    assert_eq!(txt, vec!["a.txt", "b.txt"]);
    assert_eq!(plan.files_for("JPG"), Some(&["c.jpg".to_string()][..]));
    assert_eq!(plan.total_files(), 3);

    // Nothing moved
    assert_eq!(fixture.top_level_files(), vec!["a.txt", "b.txt", "c.jpg"]);
    assert!(fixture.top_level_dirs().is_empty());
}

#[test]
fn test_preview_nothing_to_do() {
    let fixture = TestFixture::new();
    fixture.create_subdir("TXT");

    let plan = preview(fixture.path(), &no_overrides()).expect("Preview failed");
    assert!(plan.is_none());
}

#[test]
fn test_preview_matches_sort() {
    let fixture = TestFixture::new();
    fixture.create_files(&["x.rs", "y.toml", "z.rs", "LICENSE"]);
    let overrides: FolderOverrides = [("rs", "Rust")].into_iter().collect();

    let plan = preview(fixture.path(), &overrides)
        .expect("Preview failed")
        .expect("Expected files to sort");
    sort(fixture.path(), &overrides).expect("Sort failed");

    for group in plan.groups() {
        for name in &group.files {
            fixture.assert_file_exists(&format!("{}/{}", group.folder, name));
        }
    }
}

// ============================================================================
// 3. Collisions
// ============================================================================

#[test]
fn test_collision_with_existing_category_file() {
    let fixture = TestFixture::new();
    fixture.create_text_file("TXT/a.txt", "already sorted");
    fixture.create_text_file("a.txt", "fresh");

    let report = sort(fixture.path(), &no_overrides()).expect("Sort failed");

    assert_eq!(report.moved, 1);
    assert_eq!(fixture.read("TXT/a.txt"), "already sorted");
    assert_eq!(fixture.read("TXT/a_1.txt"), "fresh");
    let record = fixture.load_record();
    assert_eq!(
        record.original_of(&fixture.path().join("TXT").join("a_1.txt")),
        Some(fixture.path().join("a.txt").as_path())
    );
}

#[test]
fn test_repeated_collisions_increment_suffix() {
    let fixture = TestFixture::new();
    fixture.create_text_file("TXT/a.txt", "0");
    fixture.create_text_file("TXT/a_1.txt", "1");
    fixture.create_text_file("a.txt", "2");

    sort(fixture.path(), &no_overrides()).expect("Sort failed");

    assert_eq!(fixture.read("TXT/a_2.txt"), "2");
}

// ============================================================================
// 4. Undo and folder cleanup
// ============================================================================

#[test]
fn test_round_trip_scenario() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.txt", "b.txt", "c.jpg"]);

    let sort_report = sort(fixture.path(), &no_overrides()).expect("Sort failed");
    assert_eq!(sort_report.record.len(), 3);
    assert_eq!(fixture.load_record().len(), 3);

    let report = unsort(fixture.path()).expect("Unsort failed");

    assert!(report.record_found);
    assert_eq!(report.restored, 3);
    assert!(report.is_complete_success());
    assert_eq!(fixture.top_level_files(), vec!["a.txt", "b.txt", "c.jpg"]);
    assert!(fixture.top_level_dirs().is_empty());
    assert_eq!(report.removed_folders.len(), 2);
    assert_eq!(fixture.read("c.jpg"), "c.jpg");
}

#[test]
fn test_pending_undo_lifecycle() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.txt"]);

    assert!(!has_pending_undo(fixture.path()));
    sort(fixture.path(), &no_overrides()).expect("Sort failed");
    assert!(has_pending_undo(fixture.path()));
    unsort(fixture.path()).expect("Unsort failed");
    assert!(!has_pending_undo(fixture.path()));
}

#[test]
fn test_unsort_without_record_is_noop() {
    let fixture = TestFixture::new();
    fixture.create_text_file("TXT/a.txt", "x");

    let report = unsort(fixture.path()).expect("Unsort failed");

    assert!(!report.record_found);
    assert_eq!(report.restored, 0);
    fixture.assert_file_exists("TXT/a.txt");
}

#[test]
fn test_unsort_keeps_pre_existing_folder_with_foreign_files() {
    let fixture = TestFixture::new();
    fixture.create_text_file("TXT/old.txt", "old");
    fixture.create_files(&["new.txt", "pic.gif"]);

    sort(fixture.path(), &no_overrides()).expect("Sort failed");
    unsort(fixture.path()).expect("Unsort failed");

    fixture.assert_file_exists("new.txt");
    fixture.assert_file_exists("pic.gif");
    fixture.assert_file_exists("TXT/old.txt");
    fixture.assert_dir_exists("TXT");
    fixture.assert_not_exists("GIF");
}

#[test]
fn test_unsort_after_original_name_reused() {
    let fixture = TestFixture::new();
    fixture.create_text_file("report.pdf", "v1");

    sort(fixture.path(), &no_overrides()).expect("Sort failed");
    fixture.create_text_file("report.pdf", "v2");
    let report = unsort(fixture.path()).expect("Unsort failed");

    assert_eq!(report.restored, 1);
    assert_eq!(fixture.read("report.pdf"), "v2");
    assert_eq!(fixture.read("report_restored_1.pdf"), "v1");
    fixture.assert_not_exists("PDF");
}

#[test]
fn test_unsort_skips_files_removed_after_sort() {
    let fixture = TestFixture::new();
    fixture.create_files(&["keep.txt", "gone.txt"]);

    sort(fixture.path(), &no_overrides()).expect("Sort failed");
    fs::remove_file(fixture.path().join("TXT").join("gone.txt")).expect("Failed to remove file");
    let report = unsort(fixture.path()).expect("Unsort failed");

    assert_eq!(report.restored, 1);
    assert!(report.failures.is_empty());
    assert_eq!(report.missing.len(), 1);
    assert_eq!(fixture.top_level_files(), vec!["keep.txt"]);
    fixture.assert_not_exists("TXT");
    assert!(!has_pending_undo(fixture.path()));
}

#[test]
fn test_unsort_corrupt_record() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.txt"]);
    sort(fixture.path(), &no_overrides()).expect("Sort failed");
    fixture.create_text_file(RECORD_FILE_NAME, "not json at all");

    let result = unsort(fixture.path());

    assert!(matches!(result, Err(dirsort::SortError::CorruptRecord { .. })));
    fixture.assert_file_exists("TXT/a.txt");
    assert!(has_pending_undo(fixture.path()));
}

#[test]
fn test_second_sort_replaces_record() {
    let fixture = TestFixture::new();
    fixture.create_files(&["first.txt"]);
    sort(fixture.path(), &no_overrides()).expect("Sort failed");

    fixture.create_files(&["second.csv"]);
    sort(fixture.path(), &no_overrides()).expect("Sort failed");
    assert_eq!(fixture.load_record().len(), 1);

    unsort(fixture.path()).expect("Unsort failed");

    // Only the second sort is undone.
    assert_eq!(fixture.top_level_files(), vec!["second.csv"]);
    fixture.assert_file_exists("TXT/first.txt");
    fixture.assert_not_exists("CSV");
}

// ============================================================================
// 5. Partial failure and bookkeeping
// ============================================================================

#[cfg(unix)]
#[test]
fn test_partial_failure_moves_the_rest() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.txt", "b.jpg", "c.png"]);
    // A dangling symlink where the TXT folder should go blocks only a.txt.
    std::os::unix::fs::symlink(fixture.path().join("nowhere"), fixture.path().join("TXT"))
        .expect("Failed to create symlink");

    let report = sort(fixture.path(), &no_overrides()).expect("Sort failed");

    assert_eq!(report.total_files, 3);
    assert_eq!(report.moved, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file_name, "a.txt");
    assert!(report.record_warning.is_none());
    assert_eq!(fixture.load_record().len(), 2);
    fixture.assert_file_exists("a.txt");
    fixture.assert_file_exists("JPG/b.jpg");
    fixture.assert_file_exists("PNG/c.png");
}

#[test]
fn test_override_outside_target_is_a_per_file_failure() {
    let fixture = TestFixture::new();
    let outside = TempDir::new().expect("Failed to create temp directory");
    let outside_folder = outside.path().join("Stolen");
    fixture.create_files(&["a.txt", "b.md", "c.jpg"]);

    let overrides: FolderOverrides = [
        ("txt", outside_folder.to_string_lossy().to_string()),
        ("md", "..".to_string()),
    ]
    .into_iter()
    .collect();
    let report = sort(fixture.path(), &overrides).expect("Sort failed");

    assert_eq!(report.moved, 1);
    assert_eq!(report.failures.len(), 2);
    fixture.assert_file_exists("a.txt");
    fixture.assert_file_exists("b.md");
    fixture.assert_file_exists("JPG/c.jpg");
    assert!(!outside_folder.exists());
    assert!(!fixture.path().parent().expect("temp dir has a parent").join("b.md").exists());

    unsort(fixture.path()).expect("Unsort failed");
    assert_eq!(fixture.top_level_files(), vec!["a.txt", "b.md", "c.jpg"]);
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_name_does_not_block_undo() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = TestFixture::new();
    fixture.create_files(&["a.txt", "b.jpg"]);
    let odd = fixture.path().join(OsStr::from_bytes(b"odd\xfe.txt"));
    fs::write(&odd, "x").expect("Failed to write file");

    let report = sort(fixture.path(), &no_overrides()).expect("Sort failed");

    assert_eq!(report.moved, 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.undo_available());
    assert!(odd.exists());
    assert!(has_pending_undo(fixture.path()));

    let unsorted = unsort(fixture.path()).expect("Unsort failed");
    assert_eq!(unsorted.restored, 2);
    fixture.assert_file_exists("a.txt");
    fixture.assert_file_exists("b.jpg");
    assert!(fixture.top_level_dirs().is_empty());
}

#[test]
fn test_unsort_leaves_unrelated_paths_alone() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.txt"]);
    sort(fixture.path(), &no_overrides()).expect("Sort failed");

    // The recorded parent is the only cleanup candidate.
    fixture.create_subdir("EMPTY");
    unsort(fixture.path()).expect("Unsort failed");

    fixture.assert_dir_exists("EMPTY");
    fixture.assert_not_exists("TXT");
}

#[test]
fn test_sort_progress_reaches_total() {
    let fixture = TestFixture::new();
    fixture.create_files(&["1.a", "2.b", "3.c", "4.d"]);

    let (tx, rx) = std::sync::mpsc::channel::<dirsort::Progress>();
    let report = dirsort::FileOrganizer::sort_with_progress(fixture.path(), &no_overrides(), &tx)
        .expect("Sort failed");
    drop(tx);

    let events: Vec<_> = rx.iter().collect();
    assert_eq!(report.moved, 4);
    assert_eq!(events.len(), 4);
    assert_eq!(events.last().map(|p| (p.index, p.total)), Some((4, 4)));
}

#[test]
fn test_unsort_progress_counts_record_entries() {
    let fixture = TestFixture::new();
    fixture.create_files(&["1.a", "2.b"]);
    sort(fixture.path(), &no_overrides()).expect("Sort failed");

    let (tx, rx) = std::sync::mpsc::channel::<dirsort::Progress>();
    dirsort::UndoManager::unsort_with_progress(fixture.path(), &tx).expect("Unsort failed");
    drop(tx);

    let indices: Vec<_> = rx.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![1, 2]);
}

// ============================================================================
// 6. CLI commands
// ============================================================================

#[test]
fn test_cli_sort_and_unsort_with_config_file() {
    let fixture = TestFixture::new();
    let config_dir = TempDir::new().expect("Failed to create temp directory");
    let config = config_dir.path().join("config.toml");
    fs::write(&config, "[category_overrides]\ntxt = \"Notes\"\n").expect("Failed to write config");
    fixture.create_files(&["todo.txt", "photo.heic"]);

    run_cli_with_config(
        SortCommand::Sort {
            dir: fixture.path().to_path_buf(),
            assume_yes: true,
        },
        Some(&config),
    )
    .expect("CLI sort failed");

    fixture.assert_file_exists("Notes/todo.txt");
    fixture.assert_file_exists("HEIC/photo.heic");

    run_cli_with_config(
        SortCommand::Unsort {
            dir: fixture.path().to_path_buf(),
        },
        Some(&config),
    )
    .expect("CLI unsort failed");

    assert_eq!(fixture.top_level_files(), vec!["photo.heic", "todo.txt"]);
    assert!(fixture.top_level_dirs().is_empty());
}

#[test]
fn test_cli_preview_moves_nothing() {
    let fixture = TestFixture::new();
    let config_dir = TempDir::new().expect("Failed to create temp directory");
    let config = config_dir.path().join("config.toml");
    fs::write(&config, "").expect("Failed to write config");
    fixture.create_files(&["a.txt"]);

    run_cli_with_config(
        SortCommand::Preview {
            dir: fixture.path().to_path_buf(),
        },
        Some(&config),
    )
    .expect("CLI preview failed");

    fixture.assert_file_exists("a.txt");
    assert!(!has_pending_undo(fixture.path()));
}

#[test]
fn test_cli_rejects_invalid_directory() {
    let fixture = TestFixture::new();

    let result = run_cli_with_config(
        SortCommand::Status {
            dir: fixture.path().join("missing"),
        },
        None,
    );
    assert!(result.is_err());
}
