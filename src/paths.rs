use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Executable filename to search for inside an installed build
pub const GAME_EXECUTABLE: &str = "VotV.exe";

pub static PATH_HOME: LazyLock<PathBuf> =
    LazyLock::new(|| PathBuf::from(env::var("HOME").unwrap()));

pub static PATH_LOCAL_SHARE: LazyLock<PathBuf> = LazyLock::new(|| PATH_HOME.join(".local/share"));

pub static PATH_LAUNCHER: LazyLock<PathBuf> = LazyLock::new(|| {
    if let Ok(xdg_data_home) = env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg_data_home).join("voidlauncher");
    }
    PATH_LOCAL_SHARE.join("voidlauncher")
});

/// Downloaded build archives live here until extraction finishes
pub static PATH_ARCHIVES: LazyLock<PathBuf> = LazyLock::new(|| PATH_LAUNCHER.join("archives"));

/// Per-build save snapshots: game backups/<build>/Saved
pub static PATH_BACKUPS: LazyLock<PathBuf> =
    LazyLock::new(|| PATH_LAUNCHER.join("game backups"));

/// Where the running game reads and writes its active save state.
///
/// The game keeps saves under the user profile regardless of how it is run,
/// so this resolves relative to $HOME. Overridable via `live_save_folder` in
/// settings.json for nonstandard wine prefixes.
pub fn default_live_save_folder() -> PathBuf {
    PATH_HOME.join("AppData/Local/VotV/Saved")
}
