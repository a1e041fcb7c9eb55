//! Persisted snapshot of the release listing.
//!
//! Fetching the release page is slow, so the listing is cached to disk and
//! reused across runs until the user explicitly refetches (which deletes the
//! snapshot).

use crate::catalog::types::Release;
use crate::paths::PATH_LAUNCHER;

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

fn cache_path() -> PathBuf {
    PATH_LAUNCHER.join("releases.json")
}

pub fn load_cache() -> Option<Vec<Release>> {
    load_cache_from(&cache_path())
}

pub fn save_cache(releases: &[Release]) -> Result<(), Box<dyn Error>> {
    save_cache_to(releases, &cache_path())
}

/// Delete the snapshot so the next import starts clean
pub fn clear_cache() -> Result<(), Box<dyn Error>> {
    clear_cache_at(&cache_path())
}

pub fn load_cache_from(path: &Path) -> Option<Vec<Release>> {
    let file = File::open(path).ok()?;
    serde_json::from_reader(BufReader::new(file)).ok()
}

pub fn save_cache_to(releases: &[Release], path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, releases)?;
    Ok(())
}

pub fn clear_cache_at(path: &Path) -> Result<(), Box<dyn Error>> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("releases.json");

        let releases = vec![
            Release {
                version_name: "pa0081_0008".to_string(),
                description_html: "changelog https://dl.example.com/a.zip".to_string(),
                download_url: None,
            },
            Release {
                version_name: "pa0081_0010".to_string(),
                description_html: String::new(),
                download_url: Some("https://dl.example.com/b.zip".to_string()),
            },
        ];

        save_cache_to(&releases, &path).unwrap();
        let loaded = load_cache_from(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(
            loaded[0].resolved_download_url().as_deref(),
            Some("https://dl.example.com/a.zip")
        );
        assert_eq!(
            loaded[1].resolved_download_url().as_deref(),
            Some("https://dl.example.com/b.zip")
        );

        clear_cache_at(&path).unwrap();
        assert!(load_cache_from(&path).is_none());
        // Clearing an already-missing snapshot is fine
        clear_cache_at(&path).unwrap();
    }
}
