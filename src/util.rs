use semver::Version;
use serde::Deserialize;
use std::error::Error;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const LATEST_RELEASE_URL: &str =
    "https://api.github.com/repos/voidlauncher/voidlauncher/releases/latest";

/// Seconds since the epoch as a config-friendly string
pub fn unix_timestamp_string() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .to_string()
}

/// The slice of the GitHub latest-release payload we care about
#[derive(Deserialize)]
struct LatestRelease {
    tag_name: String,
}

/// Version published as the project's latest GitHub release.
pub fn fetch_latest_launcher_version() -> Result<Version, Box<dyn Error>> {
    let release: LatestRelease = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?
        .get(LATEST_RELEASE_URL)
        .header("User-Agent", "voidlauncher")
        .send()?
        .error_for_status()?
        .json()?;

    parse_release_tag(&release.tag_name)
}

/// Release tags look like `v0.4.2`, or occasionally plain `0.4.2`.
fn parse_release_tag(tag: &str) -> Result<Version, Box<dyn Error>> {
    let version = Version::parse(tag.trim().trim_start_matches('v'))
        .map_err(|e| format!("Unparseable release tag '{}': {}", tag, e))?;
    Ok(version)
}

/// This binary's own version
pub fn current_launcher_version() -> Version {
    Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0))
}
