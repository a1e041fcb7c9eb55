//! Directory move/copy primitives with zero-byte skip and per-file error
//! isolation.

use crate::save_sync::types::MigrationOutcome;

use std::fs;
use std::path::Path;

/// A zero-length file is a save slot the game created but never populated.
/// Moving one over a populated slot in the destination would wipe it, so both
/// primitives leave them where they are.
fn is_empty_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.len() == 0)
        .unwrap_or(false)
}

/// Rename, falling back to copy-and-delete when source and destination sit on
/// different filesystems.
fn move_entry(source: &Path, dest: &Path) -> Result<(), std::io::Error> {
    if fs::rename(source, dest).is_ok() {
        return Ok(());
    }

    if source.is_dir() {
        copy_dir_all(source, dest)?;
        fs::remove_dir_all(source)?;
    } else {
        fs::copy(source, dest)?;
        fs::remove_file(source)?;
    }
    Ok(())
}

fn copy_dir_all(source: &Path, dest: &Path) -> Result<(), std::io::Error> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Best-effort carry-over of the source modification time
fn preserve_mtime(source: &Path, dest: &Path) {
    if let Ok(meta) = fs::metadata(source)
        && let Ok(mtime) = meta.modified()
        && let Ok(file) = fs::OpenOptions::new().write(true).open(dest)
    {
        let _ = file.set_modified(mtime);
    }
}

/// Move the direct entries of `source_dir` into `dest_dir`.
///
/// Non-recursive: a subdirectory moves as a unit. Zero-byte files stay behind
/// and are counted in `files_skipped_empty`; re-running after a partial
/// failure re-attempts exactly the entries still present.
pub fn move_tree(source_dir: &Path, dest_dir: &Path) -> MigrationOutcome {
    let mut outcome = MigrationOutcome::default();

    let entries = match fs::read_dir(source_dir) {
        Ok(entries) => entries,
        Err(e) => {
            outcome.record_error(source_dir, e);
            return outcome;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                outcome.record_error(source_dir, e);
                continue;
            }
        };

        let source_item = entry.path();
        let dest_item = dest_dir.join(entry.file_name());

        if is_empty_file(&source_item) {
            println!(
                "[voidlauncher] Skipping empty file: {}",
                source_item.display()
            );
            outcome.files_skipped_empty += 1;
            continue;
        }

        match move_entry(&source_item, &dest_item) {
            Ok(()) => outcome.files_moved += 1,
            Err(e) => outcome.record_error(&source_item, e),
        }
    }

    outcome
}

/// Copy `source_dir` into `dest_dir` recursively, re-rooting each file's
/// relative path and preserving modification times.
///
/// Zero-byte files are skipped just like in [`move_tree`]; a per-file failure
/// is recorded and the walk continues.
pub fn copy_tree_recursive(source_dir: &Path, dest_dir: &Path) -> MigrationOutcome {
    let mut outcome = MigrationOutcome::default();

    let walk_path = walkdir::WalkDir::new(source_dir)
        .min_depth(1)
        .follow_links(false);

    for entry in walk_path {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(source_dir).to_path_buf();
                outcome.record_error(&path, e);
                continue;
            }
        };

        let rel_path = match entry.path().strip_prefix(source_dir) {
            Ok(rel) => rel,
            Err(e) => {
                outcome.record_error(entry.path(), e);
                continue;
            }
        };
        let new_path = dest_dir.join(rel_path);

        if entry.file_type().is_dir() {
            if let Err(e) = fs::create_dir_all(&new_path) {
                outcome.record_error(entry.path(), e);
            }
            continue;
        }

        if is_empty_file(entry.path()) {
            println!(
                "[voidlauncher] Skipping empty file: {}",
                entry.path().display()
            );
            outcome.files_skipped_empty += 1;
            continue;
        }

        let result = (|| -> Result<(), std::io::Error> {
            if let Some(parent) = new_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &new_path)?;
            Ok(())
        })();

        match result {
            Ok(()) => {
                preserve_mtime(entry.path(), &new_path);
                outcome.files_moved += 1;
            }
            Err(e) => outcome.record_error(entry.path(), e),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn setup_dirs() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dest).unwrap();
        (dir, src, dest)
    }

    #[test]
    fn test_move_tree_transfers_content() {
        let (_dir, src, dest) = setup_dirs();
        fs::write(src.join("save1.dat"), b"0123456789").unwrap();
        fs::create_dir(src.join("sub")).unwrap();
        fs::write(src.join("sub/nested.sav"), b"xy").unwrap();

        let outcome = move_tree(&src, &dest);

        assert!(outcome.is_clean());
        assert_eq!(outcome.files_moved, 2); // file + subdir, moved as units
        assert!(!src.join("save1.dat").exists());
        assert_eq!(fs::read(dest.join("save1.dat")).unwrap(), b"0123456789");
        assert_eq!(fs::read(dest.join("sub/nested.sav")).unwrap(), b"xy");
    }

    #[test]
    fn test_move_tree_skips_empty_files() {
        let (_dir, src, dest) = setup_dirs();
        fs::write(src.join("save1.dat"), b"0123456789").unwrap();
        fs::write(src.join("save2.dat"), b"").unwrap();

        let outcome = move_tree(&src, &dest);

        assert_eq!(outcome.files_moved, 1);
        assert_eq!(outcome.files_skipped_empty, 1);
        assert!(dest.join("save1.dat").exists());
        assert!(!dest.join("save2.dat").exists());
        // The empty slot stays behind in the source
        assert!(src.join("save2.dat").exists());
    }

    #[test]
    fn test_move_tree_missing_source_records_error() {
        let (_dir, src, dest) = setup_dirs();
        let outcome = move_tree(&src.join("nope"), &dest);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.files_moved, 0);
    }

    #[test]
    fn test_copy_tree_recursive_reroots_subdirs() {
        let (_dir, src, dest) = setup_dirs();
        fs::create_dir_all(src.join("SaveGames/deep")).unwrap();
        fs::write(src.join("SaveGames/slot0.sav"), b"abc").unwrap();
        fs::write(src.join("SaveGames/deep/slot1.sav"), b"def").unwrap();
        fs::write(src.join("empty.sav"), b"").unwrap();

        let outcome = copy_tree_recursive(&src, &dest);

        assert!(outcome.is_clean());
        assert_eq!(outcome.files_moved, 2);
        assert_eq!(outcome.files_skipped_empty, 1);
        assert_eq!(fs::read(dest.join("SaveGames/slot0.sav")).unwrap(), b"abc");
        assert_eq!(
            fs::read(dest.join("SaveGames/deep/slot1.sav")).unwrap(),
            b"def"
        );
        assert!(!dest.join("empty.sav").exists());
        // Copy leaves the source fully intact
        assert!(src.join("SaveGames/slot0.sav").exists());
    }

    #[test]
    fn test_copy_tree_recursive_isolates_per_file_failure() {
        let (_dir, src, dest) = setup_dirs();
        for i in 1..=5 {
            fs::write(src.join(format!("file{i}.dat")), b"data").unwrap();
        }
        // A directory squatting on file2's destination makes that one copy
        // fail while the others go through
        fs::create_dir_all(dest.join("file2.dat")).unwrap();

        let outcome = copy_tree_recursive(&src, &dest);

        assert_eq!(outcome.files_moved, 4);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].0.ends_with("file2.dat"));
        for i in [1, 3, 4, 5] {
            assert_eq!(
                fs::read(dest.join(format!("file{i}.dat"))).unwrap(),
                b"data"
            );
        }
    }

    #[test]
    fn test_copy_tree_preserves_mtime() {
        let (_dir, src, dest) = setup_dirs();
        fs::write(src.join("slot.sav"), b"abc").unwrap();
        let src_mtime = fs::metadata(src.join("slot.sav"))
            .unwrap()
            .modified()
            .unwrap();

        std::thread::sleep(std::time::Duration::from_millis(20));
        let outcome = copy_tree_recursive(&src, &dest);
        assert!(outcome.is_clean());

        let dest_mtime = fs::metadata(dest.join("slot.sav"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(src_mtime, dest_mtime);
    }
}
