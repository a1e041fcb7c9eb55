use crate::paths::{PATH_LAUNCHER, default_live_save_folder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_game_destination_folder() -> String {
    PATH_LAUNCHER.join("game").to_string_lossy().to_string()
}

fn default_process_names() -> Vec<String> {
    vec!["VotV".to_string()]
}

fn default_poll_interval_secs() -> f64 {
    1.0
}

fn default_poll_timeout_secs() -> f64 {
    600.0
}

/// Main launcher configuration
///
/// Passed by reference into the migrator and session controller so nothing
/// reads process-wide state behind the caller's back.
#[derive(Serialize, Deserialize, Clone)]
pub struct LauncherConfig {
    /// Where installed builds get extracted, one subfolder per build
    #[serde(default = "default_game_destination_folder")]
    pub game_destination_folder: String,
    /// Skip the first-run notice
    #[serde(default, alias = "dont_show_initial_dialog")]
    pub disable_initial_dialog: bool,
    /// Set whenever the release catalog is (re)imported
    #[serde(default)]
    pub last_refresh_time: String,
    /// Override for the live save folder; empty means the per-user default
    #[serde(default)]
    pub live_save_folder: String,
    /// Process names matched (lowercased, substring) when waiting for the
    /// game to fully terminate
    #[serde(default = "default_process_names")]
    pub process_names: Vec<String>,
    /// Interval between is-the-game-still-running polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: f64,
    /// Upper bound on the termination wait before the backup proceeds anyway
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: f64,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        LauncherConfig {
            game_destination_folder: default_game_destination_folder(),
            disable_initial_dialog: false,
            last_refresh_time: String::new(),
            live_save_folder: String::new(),
            process_names: default_process_names(),
            poll_interval_secs: default_poll_interval_secs(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

impl LauncherConfig {
    /// Resolved live save folder (config override or the per-user default)
    pub fn live_save_folder(&self) -> PathBuf {
        if self.live_save_folder.is_empty() {
            default_live_save_folder()
        } else {
            PathBuf::from(&self.live_save_folder)
        }
    }

    /// Key/value read access for the settings surface
    pub fn get_key(&self, key: &str) -> Option<String> {
        match key {
            "game_destination_folder" => Some(self.game_destination_folder.clone()),
            "disable_initial_dialog" | "dont_show_initial_dialog" => {
                Some(self.disable_initial_dialog.to_string())
            }
            "last_refresh_time" => Some(self.last_refresh_time.clone()),
            "live_save_folder" => Some(self.live_save_folder.clone()),
            "process_names" => Some(self.process_names.join(",")),
            "poll_interval_secs" => Some(self.poll_interval_secs.to_string()),
            "poll_timeout_secs" => Some(self.poll_timeout_secs.to_string()),
            _ => None,
        }
    }

    /// Key/value write access. Returns false for unknown keys or unparsable
    /// values; the config is left unchanged in that case.
    pub fn set_key(&mut self, key: &str, value: &str) -> bool {
        match key {
            "game_destination_folder" => {
                self.game_destination_folder = value.to_string();
                true
            }
            "disable_initial_dialog" | "dont_show_initial_dialog" => {
                match value.parse::<bool>() {
                    Ok(v) => {
                        self.disable_initial_dialog = v;
                        true
                    }
                    Err(_) => false,
                }
            }
            "last_refresh_time" => {
                self.last_refresh_time = value.to_string();
                true
            }
            "live_save_folder" => {
                self.live_save_folder = value.to_string();
                true
            }
            "process_names" => {
                self.process_names = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                !self.process_names.is_empty()
            }
            "poll_interval_secs" => match value.parse::<f64>() {
                Ok(v) if v > 0.0 => {
                    self.poll_interval_secs = v;
                    true
                }
                _ => false,
            },
            "poll_timeout_secs" => match value.parse::<f64>() {
                Ok(v) if v > 0.0 => {
                    self.poll_timeout_secs = v;
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_key_roundtrip() {
        let mut cfg = LauncherConfig::default();

        assert!(cfg.set_key("game_destination_folder", "/tmp/games"));
        assert_eq!(
            cfg.get_key("game_destination_folder").as_deref(),
            Some("/tmp/games")
        );

        assert!(cfg.set_key("disable_initial_dialog", "true"));
        assert!(cfg.disable_initial_dialog);
        // Legacy key name maps to the same setting
        assert_eq!(
            cfg.get_key("dont_show_initial_dialog").as_deref(),
            Some("true")
        );

        assert!(cfg.set_key("process_names", "VotV, VotV-Win64-Shipping"));
        assert_eq!(
            cfg.process_names,
            vec!["VotV".to_string(), "VotV-Win64-Shipping".to_string()]
        );
    }

    #[test]
    fn test_set_key_rejects_bad_values() {
        let mut cfg = LauncherConfig::default();

        assert!(!cfg.set_key("poll_interval_secs", "not a number"));
        assert!(!cfg.set_key("poll_interval_secs", "-2"));
        assert_eq!(cfg.poll_interval_secs, 1.0);

        assert!(!cfg.set_key("no_such_key", "whatever"));
        assert!(!cfg.set_key("process_names", " , ,"));
    }
}
