//! Restore/backup orchestration around one play session.

use crate::config::LauncherConfig;
use crate::library::Build;
use crate::monitor::{ProcessProbe, TerminationWait, wait_for_exit};
use crate::save_sync::operations::{copy_tree_recursive, move_tree};
use crate::save_sync::types::MigrationOutcome;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Stages a build's save snapshot before launch and rebuilds it after exit.
///
/// Filesystem trouble in either phase degrades to per-file errors in the
/// returned outcome; the session always proceeds. At worst the player
/// continues with stale or missing save continuity, which beats aborting
/// mid-migration with the data split across two folders.
pub struct SaveMigrator {
    live_save_folder: PathBuf,
    process_names: Vec<String>,
    poll_interval: Duration,
    poll_timeout: Duration,
    probe: Arc<dyn ProcessProbe + Send + Sync>,
}

impl SaveMigrator {
    pub fn new(cfg: &LauncherConfig, probe: Arc<dyn ProcessProbe + Send + Sync>) -> Self {
        SaveMigrator {
            live_save_folder: cfg.live_save_folder(),
            process_names: cfg.process_names.clone(),
            poll_interval: Duration::from_secs_f64(cfg.poll_interval_secs),
            poll_timeout: Duration::from_secs_f64(cfg.poll_timeout_secs),
            probe,
        }
    }

    /// Move the build's snapshot into the live save folder.
    ///
    /// First-ever launch (no snapshot yet) is a successful no-op, as is a
    /// repeat call against a snapshot the previous call already drained.
    pub fn restore_before_launch(&self, build: &Build) -> MigrationOutcome {
        if let Err(e) = std::fs::create_dir_all(&build.backup_root) {
            println!(
                "[voidlauncher] Warning: could not create backup folder: {}",
                e
            );
        }
        if let Err(e) = std::fs::create_dir_all(&self.live_save_folder) {
            println!(
                "[voidlauncher] Warning: could not create live save folder: {}",
                e
            );
        }

        if !has_entries(&build.backup_root) {
            println!(
                "[voidlauncher] No backup data found for '{}' (first launch?)",
                build.display_name
            );
            return MigrationOutcome::default();
        }

        println!(
            "[voidlauncher] Restoring saves: {} -> {}",
            build.backup_root.display(),
            self.live_save_folder.display()
        );

        let outcome = move_tree(&build.backup_root, &self.live_save_folder);
        println!("[voidlauncher] Restore finished: {}", outcome);
        for (path, err) in &outcome.errors {
            println!("[voidlauncher] Restore error: {}: {}", path.display(), err);
        }
        outcome
    }

    /// Wait for the game to provably terminate, then copy the live save
    /// folder back into the build's snapshot.
    ///
    /// The wait polls the process table rather than trusting the spawned
    /// handle; the shipped binary forks the actual engine process, and
    /// copying while that child still holds the files open would race it.
    pub fn backup_after_exit(&self, build: &Build) -> MigrationOutcome {
        println!(
            "[voidlauncher] Waiting for '{}' to terminate...",
            self.process_names.join(", ")
        );

        let wait = wait_for_exit(
            self.probe.as_ref(),
            &self.process_names,
            self.poll_interval,
            self.poll_timeout,
        );
        if wait == TerminationWait::TimedOut {
            println!(
                "[voidlauncher] Warning: game still reported running after {:?}; backing up anyway",
                self.poll_timeout
            );
        }

        println!(
            "[voidlauncher] Backing up saves: {} -> {}",
            self.live_save_folder.display(),
            build.backup_root.display()
        );

        if let Err(e) = std::fs::create_dir_all(&build.backup_root) {
            println!(
                "[voidlauncher] Warning: could not create backup folder: {}",
                e
            );
        }

        let outcome = copy_tree_recursive(&self.live_save_folder, &build.backup_root);
        println!("[voidlauncher] Backup finished: {}", outcome);
        for (path, err) in &outcome.errors {
            println!("[voidlauncher] Backup error: {}: {}", path.display(), err);
        }
        outcome
    }
}

fn has_entries(path: &std::path::Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
