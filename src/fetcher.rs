//! Build download and extraction.
//!
//! Downloads go to the archives folder, get unpacked into their own build
//! folder under the game destination, and the archive is deleted once the
//! extraction succeeds. The download loop reports a progress fraction and
//! honors a cooperative cancel flag; extraction reports per-entry progress
//! but is not cancellable (leaving a half-unpacked build helps nobody).

use crate::config::LauncherConfig;
use crate::library::sanitize_name;
use crate::paths::PATH_ARCHIVES;

use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use zip::ZipArchive;

/// Which half of an install the progress fraction belongs to
#[derive(Clone, Copy, Debug)]
pub enum InstallPhase {
    Downloading,
    Extracting,
}

#[derive(Debug, PartialEq)]
pub enum DownloadStatus {
    Completed,
    /// The cancel flag was raised; the partial archive has been removed
    Cancelled,
}

/// Copy `reader` into a file at `dest` in chunks, checking the cancel flag
/// between chunks and reporting progress against `total` bytes when known.
///
/// Never leaves a partial file behind: both cancellation and read/write
/// failure remove whatever was written, so nothing downstream can mistake a
/// truncated download for a finished one.
fn stream_with_cancel(
    reader: &mut dyn Read,
    dest: &Path,
    total: Option<u64>,
    progress: &dyn Fn(f64),
    cancel: &AtomicBool,
) -> io::Result<DownloadStatus> {
    let mut file = File::create(dest)?;
    let mut buf = [0u8; 64 * 1024];
    let mut received: u64 = 0;

    progress(0.0);
    let streamed = loop {
        if cancel.load(Ordering::SeqCst) {
            break Ok(DownloadStatus::Cancelled);
        }

        let n = match reader.read(&mut buf) {
            Ok(0) => break Ok(DownloadStatus::Completed),
            Ok(n) => n,
            Err(e) => break Err(e),
        };
        if let Err(e) = file.write_all(&buf[..n]) {
            break Err(e);
        }
        received += n as u64;

        if let Some(total) = total
            && total > 0
        {
            progress((received as f64 / total as f64).min(1.0));
        }
    };
    drop(file);

    match &streamed {
        Ok(DownloadStatus::Completed) => progress(1.0),
        _ => {
            fs::remove_file(dest).ok();
        }
    }
    streamed
}

/// Download `url` to `dest`, reporting progress in [0, 1].
///
/// With an unknown content length the callback only ever sees 0.0 and then
/// 1.0.
pub fn download_archive(
    url: &str,
    dest: &Path,
    progress: &dyn Fn(f64),
    cancel: &AtomicBool,
) -> Result<DownloadStatus, Box<dyn Error>> {
    let client = reqwest::blocking::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(30))
        .build()?;

    let mut response = client.get(url).send()?;
    if !response.status().is_success() {
        return Err(format!("Download failed: HTTP {}", response.status()).into());
    }

    let total = response.content_length();
    let status = stream_with_cancel(&mut response, dest, total, progress, cancel)?;
    if status == DownloadStatus::Cancelled {
        println!("[fetcher] Download cancelled: {}", url);
    }
    Ok(status)
}

/// Unpack a build archive into its install folder.
///
/// Entries whose paths would escape the install folder are skipped, not
/// fatal; everything else propagates, since a build missing files is worse
/// than no build.
pub fn extract_archive(
    zip_path: &Path,
    dest_dir: &Path,
    progress: &dyn Fn(f64),
) -> Result<(), Box<dyn Error>> {
    let mut archive = ZipArchive::new(BufReader::new(File::open(zip_path)?))?;
    fs::create_dir_all(dest_dir)?;

    let total = archive.len();
    for index in 0..total {
        let mut entry = archive.by_index(index)?;

        let Some(rel) = entry.enclosed_name() else {
            println!("[fetcher] Skipping unsafe archive entry: {}", entry.name());
            continue;
        };
        let target = dest_dir.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            io::copy(&mut entry, &mut File::create(&target)?)?;

            // The game binary has to come out executable
            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                let _ = fs::set_permissions(&target, fs::Permissions::from_mode(mode));
            }
        }

        progress((index + 1) as f64 / total as f64);
    }

    Ok(())
}

/// Whether an archive left over from an earlier attempt is worth reusing.
///
/// The central directory sits at the end of a zip, so an archive truncated
/// by a killed run fails to open here and gets re-downloaded instead of
/// wedging every retry.
fn is_reusable_archive(path: &Path) -> bool {
    File::open(path)
        .map_err(|_| ())
        .and_then(|file| ZipArchive::new(BufReader::new(file)).map_err(|_| ()))
        .is_ok()
}

/// Where a version's archive lands while downloading
pub fn archive_path_for(version_name: &str) -> PathBuf {
    PATH_ARCHIVES.join(format!("{}.zip", sanitize_name(version_name)))
}

/// Download and unpack one build into the library.
///
/// Returns the new build folder, or `None` if the download was cancelled.
/// The archive is deleted after a successful extraction, and also when it
/// turns out to be unreadable, so a retry always starts from a good state.
pub fn install_build(
    cfg: &LauncherConfig,
    version_name: &str,
    url: &str,
    progress: &dyn Fn(InstallPhase, f64),
    cancel: &AtomicBool,
) -> Result<Option<PathBuf>, Box<dyn Error>> {
    fs::create_dir_all(&*PATH_ARCHIVES)?;

    let archive = archive_path_for(version_name);
    if archive.exists() && !is_reusable_archive(&archive) {
        println!("[fetcher] Discarding corrupt archive from an earlier attempt");
        fs::remove_file(&archive)?;
    }

    if archive.exists() {
        println!("[fetcher] Reusing archive from an earlier attempt");
    } else {
        println!("[fetcher] Downloading {} from {}", version_name, url);
        let status = download_archive(
            url,
            &archive,
            &|f| progress(InstallPhase::Downloading, f),
            cancel,
        )?;
        if status == DownloadStatus::Cancelled {
            return Ok(None);
        }
    }

    let build_dir = PathBuf::from(&cfg.game_destination_folder).join(sanitize_name(version_name));
    fs::create_dir_all(&build_dir)?;

    println!("[fetcher] Extracting to {}", build_dir.display());
    if let Err(e) = extract_archive(&archive, &build_dir, &|f| {
        progress(InstallPhase::Extracting, f)
    }) {
        if e.downcast_ref::<zip::result::ZipError>().is_some() {
            // Unreadable mid-extraction despite the directory parsing;
            // keeping it would poison every retry
            fs::remove_file(&archive).ok();
        }
        return Err(e);
    }

    fs::remove_file(&archive).ok();
    println!("[fetcher] Installed {}", version_name);

    Ok(Some(build_dir))
}
