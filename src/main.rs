mod catalog;
mod config;
mod fetcher;
mod library;
mod monitor;
mod paths;
mod save_sync;
mod session;
mod util;

use crate::config::{LauncherConfig, load_cfg, save_cfg};
use crate::library::{Build, sanitize_name, scan_library};
use crate::monitor::SystemProcessProbe;
use crate::paths::PATH_LAUNCHER;
use crate::session::{SessionController, SessionEvent};

use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;

#[derive(Parser)]
#[command(name = "voidlauncher", version, about = "Library manager and launcher for Voices of the Void builds")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// List installed builds
    List,
    /// List the cached release catalog
    Releases,
    /// Import a release listing (JSON array) into the catalog cache
    ImportCatalog { file: std::path::PathBuf },
    /// Drop the cached release catalog so the next import starts clean
    Refetch,
    /// Download and extract a build into the library
    Install {
        /// Version name, as listed by `releases`
        version: String,
        /// Download link; defaults to the one in the cached catalog
        #[arg(long)]
        url: Option<String>,
    },
    /// Launch an installed build with save migration around the session
    Play { name: String },
    /// Read a settings key
    Get { key: String },
    /// Write a settings key
    Set { key: String, value: String },
    /// Check GitHub for a newer launcher release
    CheckUpdate,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = std::fs::create_dir_all(&*PATH_LAUNCHER) {
        eprintln!("[voidlauncher] Failed to create data directory: {}", e);
        std::process::exit(1);
    }

    let mut cfg = load_cfg();

    if !cfg.disable_initial_dialog {
        println!(
            "[voidlauncher] Save data is swapped per build around each session; \
             don't delete the 'game backups' folder under {}.",
            PATH_LAUNCHER.display()
        );
        println!("[voidlauncher] (silence this with: voidlauncher set disable_initial_dialog true)");
    }

    let result = match cli.command {
        Cmd::List => cmd_list(&cfg),
        Cmd::Releases => cmd_releases(),
        Cmd::ImportCatalog { file } => cmd_import_catalog(&mut cfg, &file),
        Cmd::Refetch => catalog::clear_cache().map(|_| {
            println!("[voidlauncher] Release cache cleared");
        }),
        Cmd::Install { version, url } => cmd_install(&cfg, &version, url.as_deref()),
        Cmd::Play { name } => cmd_play(&cfg, &name),
        Cmd::Get { key } => cmd_get(&cfg, &key),
        Cmd::Set { key, value } => cmd_set(&mut cfg, &key, &value),
        Cmd::CheckUpdate => cmd_check_update(),
    };

    if let Err(e) = result {
        eprintln!("[voidlauncher] Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_list(cfg: &LauncherConfig) -> Result<(), Box<dyn std::error::Error>> {
    let builds = scan_library(cfg);
    if builds.is_empty() {
        println!("[voidlauncher] No builds installed");
        return Ok(());
    }
    for build in &builds {
        let exe = match &build.executable_path {
            Some(path) => path.display().to_string(),
            None => "(no executable found)".to_string(),
        };
        println!("{}\n    {}", build.display_name, exe);
    }
    Ok(())
}

fn cmd_releases() -> Result<(), Box<dyn std::error::Error>> {
    let Some(releases) = catalog::load_cache() else {
        println!("[voidlauncher] No cached catalog; run import-catalog first");
        return Ok(());
    };
    for release in &releases {
        let link = match release.resolved_download_url() {
            Some(url) => url,
            None => "(no download link)".to_string(),
        };
        println!("{}\n    {}", release.version_name, link);
    }
    Ok(())
}

fn cmd_import_catalog(
    cfg: &mut LauncherConfig,
    file: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    use crate::catalog::CatalogSource;

    let releases = catalog::JsonFileSource::new(file).fetch_releases()?;
    catalog::save_cache(&releases)?;

    cfg.last_refresh_time = util::unix_timestamp_string();
    save_cfg(cfg)?;

    println!("[voidlauncher] Imported {} releases", releases.len());
    Ok(())
}

fn cmd_install(
    cfg: &LauncherConfig,
    version: &str,
    url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = match url {
        Some(url) => url.to_string(),
        None => catalog::load_cache()
            .and_then(|releases| {
                releases
                    .iter()
                    .find(|r| r.version_name == version)
                    .and_then(|r| r.resolved_download_url())
            })
            .ok_or_else(|| {
                format!("No download link known for '{version}'; pass --url or import a catalog")
            })?,
    };

    let progress = |phase: fetcher::InstallPhase, fraction: f64| {
        let label = match phase {
            fetcher::InstallPhase::Downloading => "Downloading",
            fetcher::InstallPhase::Extracting => "Extracting",
        };
        print!("\r[voidlauncher] {}... {:3.0}%", label, fraction * 100.0);
        let _ = std::io::stdout().flush();
    };
    // Shells wanting Ctrl-C style cancellation flip this from a handler;
    // the plain CLI just lets the download run.
    let cancel = AtomicBool::new(false);

    match fetcher::install_build(cfg, version, &url, &progress, &cancel)? {
        Some(build_dir) => {
            println!();
            println!(
                "[voidlauncher] '{}' installed at {}",
                sanitize_name(version),
                build_dir.display()
            );
        }
        None => println!("[voidlauncher] Install cancelled"),
    }
    Ok(())
}

fn cmd_play(cfg: &LauncherConfig, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let builds = scan_library(cfg);
    let build: &Build = builds
        .iter()
        .find(|b| b.display_name == name)
        .ok_or_else(|| format!("No installed build named '{name}'"))?;

    let (tx, rx) = mpsc::channel();
    let controller = SessionController::new(cfg, Arc::new(SystemProcessProbe), tx);
    let handle = controller.launch(build)?;

    for event in rx {
        match event {
            SessionEvent::Restoring => {
                println!("[voidlauncher] Restoring saves for '{}'", build.display_name)
            }
            SessionEvent::Started { pid } => {
                println!("[voidlauncher] Game running (pid {}); waiting for exit", pid)
            }
            SessionEvent::BackingUp => println!("[voidlauncher] Game closed, backing up saves"),
            SessionEvent::Completed(outcome) => {
                println!("[voidlauncher] Session finished: {}", outcome);
                break;
            }
            SessionEvent::Failed(msg) => {
                println!("[voidlauncher] Session failed: {}", msg);
                break;
            }
        }
    }

    let _ = handle.join();
    Ok(())
}

fn cmd_check_update() -> Result<(), Box<dyn std::error::Error>> {
    let latest = util::fetch_latest_launcher_version()?;
    let current = util::current_launcher_version();
    if latest > current {
        println!(
            "[voidlauncher] A newer launcher release is available: {} (running {})",
            latest, current
        );
    } else {
        println!("[voidlauncher] Launcher is up to date ({})", current);
    }
    Ok(())
}

fn cmd_get(cfg: &LauncherConfig, key: &str) -> Result<(), Box<dyn std::error::Error>> {
    match cfg.get_key(key) {
        Some(value) => {
            println!("{}", value);
            Ok(())
        }
        None => Err(format!("Unknown settings key '{key}'").into()),
    }
}

fn cmd_set(
    cfg: &mut LauncherConfig,
    key: &str,
    value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if !cfg.set_key(key, value) {
        return Err(format!("Cannot set '{key}' to '{value}'").into());
    }
    save_cfg(cfg)?;
    println!("[voidlauncher] {} = {}", key, value);
    Ok(())
}
