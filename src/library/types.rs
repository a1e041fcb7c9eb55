use std::path::PathBuf;

/// One installed game version
#[derive(Clone, Debug)]
pub struct Build {
    /// Folder name under the game destination directory, also the backup key
    pub display_name: String,
    /// Root folder of this install
    pub install_dir: PathBuf,
    /// Launchable binary, if the scan found one
    pub executable_path: Option<PathBuf>,
    /// game backups/<display_name>/Saved
    pub backup_root: PathBuf,
}
