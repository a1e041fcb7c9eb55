use crate::config::types::LauncherConfig;
use crate::paths::PATH_LAUNCHER;

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn load_cfg() -> LauncherConfig {
    load_cfg_from(&PATH_LAUNCHER.join("settings.json"))
}

pub fn save_cfg(config: &LauncherConfig) -> Result<(), Box<dyn Error>> {
    save_cfg_to(config, &PATH_LAUNCHER.join("settings.json"))
}

pub fn load_cfg_from(path: &Path) -> LauncherConfig {
    if let Ok(file) = File::open(path)
        && let Ok(config) = serde_json::from_reader::<_, LauncherConfig>(BufReader::new(file))
    {
        return config;
    }

    // Return default settings if file doesn't exist or has error
    LauncherConfig::default()
}

pub fn save_cfg_to(config: &LauncherConfig, path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cfg_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut cfg = LauncherConfig::default();
        cfg.game_destination_folder = "/somewhere/game".to_string();
        cfg.poll_interval_secs = 0.25;
        save_cfg_to(&cfg, &path).unwrap();

        let loaded = load_cfg_from(&path);
        assert_eq!(loaded.game_destination_folder, "/somewhere/game");
        assert_eq!(loaded.poll_interval_secs, 0.25);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_cfg_from(&dir.path().join("nope.json"));
        assert!(!loaded.disable_initial_dialog);
        assert_eq!(loaded.process_names, vec!["VotV".to_string()]);
    }
}
