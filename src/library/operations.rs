use crate::config::LauncherConfig;
use crate::library::types::Build;
use crate::paths::{GAME_EXECUTABLE, PATH_BACKUPS};

use std::path::{Path, PathBuf};

/// Recursively search an install folder for the game executable
pub fn find_game_executable(install_dir: &Path) -> Option<PathBuf> {
    for entry in walkdir::WalkDir::new(install_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && entry.file_name() == GAME_EXECUTABLE {
            return Some(entry.path().to_path_buf());
        }
    }
    None
}

/// Scan the game destination folder for installed builds.
///
/// Every direct subdirectory is a build; the executable may be missing if an
/// extraction was interrupted, in which case launching it is rejected later.
pub fn scan_library(cfg: &LauncherConfig) -> Vec<Build> {
    let dest = PathBuf::from(&cfg.game_destination_folder);

    let Ok(entries) = std::fs::read_dir(&dest) else {
        println!(
            "[voidlauncher] Game destination folder not found: {}",
            dest.display()
        );
        return Vec::new();
    };

    let mut builds = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let display_name = entry.file_name().to_string_lossy().to_string();
        let executable_path = find_game_executable(&path);
        let backup_root = PATH_BACKUPS.join(&display_name).join("Saved");

        builds.push(Build {
            display_name,
            install_dir: path,
            executable_path,
            backup_root,
        });
    }

    builds.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    builds
}
