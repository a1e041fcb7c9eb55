use serde::{Deserialize, Serialize};
use std::error::Error;

/// One published build on the release page
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Release {
    pub version_name: String,
    /// Changelog/description as published (may embed the download link)
    #[serde(default)]
    pub description_html: String,
    /// Direct download link, when the page listed one
    #[serde(default)]
    pub download_url: Option<String>,
}

impl Release {
    /// Download link: the explicit one, or the first one buried in the
    /// description text.
    pub fn resolved_download_url(&self) -> Option<String> {
        if let Some(url) = &self.download_url
            && !url.is_empty()
        {
            return Some(url.clone());
        }
        super::pure::find_first_link(&self.description_html)
    }
}

/// Anything that can produce the release listing, in page order.
pub trait CatalogSource {
    fn fetch_releases(&self) -> Result<Vec<Release>, Box<dyn Error>>;
}

/// Release listing read from a JSON file: what a page scraper (or a person)
/// exported. Keeps HTML parsing out of this crate entirely.
pub struct JsonFileSource {
    path: std::path::PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }
}

impl CatalogSource for JsonFileSource {
    fn fetch_releases(&self) -> Result<Vec<Release>, Box<dyn Error>> {
        let data = std::fs::read_to_string(&self.path)?;
        let releases: Vec<Release> = serde_json::from_str(&data)?;
        Ok(releases)
    }
}
