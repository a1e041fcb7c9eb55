//! Session controller and launch sequence.

use crate::config::LauncherConfig;
use crate::library::Build;
use crate::monitor::ProcessProbe;
use crate::save_sync::SaveMigrator;
use crate::session::types::{SessionEvent, SessionState};

use std::error::Error;
use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Owns the launch sequence for one build at a time.
///
/// The whole sequence runs on a background thread so the shell never blocks;
/// nothing in it is allowed to propagate a failure out of that thread. The
/// `active` flag is the explicit one-session-at-a-time guard - the next
/// restore must not start until the previous backup has finished, because
/// both touch the same live save folder.
pub struct SessionController {
    migrator: Arc<SaveMigrator>,
    events: Sender<SessionEvent>,
    state: Arc<Mutex<SessionState>>,
    active: Arc<AtomicBool>,
}

impl SessionController {
    pub fn new(
        cfg: &LauncherConfig,
        probe: Arc<dyn ProcessProbe + Send + Sync>,
        events: Sender<SessionEvent>,
    ) -> Self {
        SessionController {
            migrator: Arc::new(SaveMigrator::new(cfg, probe)),
            events,
            state: Arc::new(Mutex::new(SessionState::Idle)),
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap()
    }

    /// Start the launch sequence for a build on a background thread.
    ///
    /// Rejects a build whose executable scan came up empty, and rejects a
    /// second launch while one is in flight. The returned handle finishes
    /// once the post-exit backup is done.
    pub fn launch(&self, build: &Build) -> Result<JoinHandle<()>, Box<dyn Error>> {
        let Some(exe) = build.executable_path.clone() else {
            return Err(format!(
                "No game executable found in '{}'",
                build.install_dir.display()
            )
            .into());
        };

        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err("A session is already running".into());
        }

        let migrator = self.migrator.clone();
        let events = self.events.clone();
        let state = self.state.clone();
        let active = self.active.clone();
        let build = build.clone();

        let handle = std::thread::spawn(move || {
            run_session(&migrator, &build, &exe, &events, &state);
            *state.lock().unwrap() = SessionState::Idle;
            active.store(false, Ordering::SeqCst);
        });

        Ok(handle)
    }
}

fn run_session(
    migrator: &SaveMigrator,
    build: &Build,
    exe: &std::path::Path,
    events: &Sender<SessionEvent>,
    state: &Mutex<SessionState>,
) {
    *state.lock().unwrap() = SessionState::Restoring;
    let _ = events.send(SessionEvent::Restoring);

    // A partial restore is logged inside the migrator and the session still
    // proceeds; aborting here would strand the saves mid-migration.
    migrator.restore_before_launch(build);

    println!("[voidlauncher] Launching: {}", exe.display());

    let mut cmd = Command::new(exe);
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    if let Some(dir) = exe.parent() {
        cmd.current_dir(dir);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            println!("[voidlauncher] Failed to spawn game: {}", e);
            let _ = events.send(SessionEvent::Failed(format!("Failed to spawn game: {e}")));
            return;
        }
    };

    println!("[voidlauncher] Game PID: {}", child.id());
    let _ = events.send(SessionEvent::Started { pid: child.id() });
    *state.lock().unwrap() = SessionState::Running;

    let readers = drain_output(&mut child);

    match child.wait() {
        Ok(status) => println!("[voidlauncher] Game exited: {}", status),
        Err(e) => println!("[voidlauncher] Warning: wait on game process failed: {}", e),
    }
    for reader in readers {
        let _ = reader.join();
    }

    *state.lock().unwrap() = SessionState::BackingUp;
    let _ = events.send(SessionEvent::BackingUp);

    // The migrator re-checks the process table itself before copying; the
    // handle above may belong to a stub that exits before the engine does.
    let outcome = migrator.backup_after_exit(build);
    let _ = events.send(SessionEvent::Completed(outcome));
}

/// Stream both pipes line by line on their own threads.
///
/// Dedicated readers keep the pipes drained however much the game prints, so
/// the wait above can never deadlock on a full pipe buffer.
fn drain_output(child: &mut Child) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();

    if let Some(stdout) = child.stdout.take() {
        handles.push(std::thread::spawn(move || {
            for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                println!("[game] {}", line);
            }
        }));
    }

    if let Some(stderr) = child.stderr.take() {
        handles.push(std::thread::spawn(move || {
            for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                eprintln!("[game] {}", line);
            }
        }));
    }

    handles
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::mpsc;

    struct StoppedProbe;
    impl ProcessProbe for StoppedProbe {
        fn any_running(&self, _names: &[String]) -> bool {
            false
        }
    }

    fn session_cfg(root: &std::path::Path) -> LauncherConfig {
        let mut cfg = LauncherConfig::default();
        cfg.live_save_folder = root.join("live/Saved").to_string_lossy().to_string();
        cfg.poll_interval_secs = 0.001;
        cfg.poll_timeout_secs = 5.0;
        cfg
    }

    fn build_with_exe(root: &std::path::Path, exe: Option<std::path::PathBuf>) -> Build {
        Build {
            display_name: "pa0081_0008".to_string(),
            install_dir: root.join("install"),
            executable_path: exe,
            backup_root: root.join("game backups/pa0081_0008/Saved"),
        }
    }

    #[cfg(unix)]
    fn write_script(root: &std::path::Path, body: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = root.join("fakegame.sh");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_launch_rejects_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::channel();
        let controller = SessionController::new(&session_cfg(dir.path()), Arc::new(StoppedProbe), tx);

        let build = build_with_exe(dir.path(), None);
        let err = controller.launch(&build).unwrap_err();
        assert!(err.to_string().contains("No game executable"));
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[test]
    #[cfg(unix)]
    fn test_full_session_restores_runs_and_backs_up() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = session_cfg(dir.path());
        let exe = write_script(dir.path(), "echo hello from the game");
        let build = build_with_exe(dir.path(), Some(exe));

        fs::create_dir_all(&build.backup_root).unwrap();
        fs::write(build.backup_root.join("save1.dat"), b"progress").unwrap();

        let (tx, rx) = mpsc::channel();
        let controller = SessionController::new(&cfg, Arc::new(StoppedProbe), tx);

        let handle = controller.launch(&build).unwrap();
        handle.join().unwrap();
        assert_eq!(controller.state(), SessionState::Idle);

        // Restore moved the save into the live folder, backup copied it back
        let live = cfg.live_save_folder();
        assert_eq!(fs::read(live.join("save1.dat")).unwrap(), b"progress");
        assert_eq!(
            fs::read(build.backup_root.join("save1.dat")).unwrap(),
            b"progress"
        );

        let events: Vec<SessionEvent> = rx.try_iter().collect();
        assert!(matches!(events[0], SessionEvent::Restoring));
        assert!(matches!(events[1], SessionEvent::Started { .. }));
        assert!(matches!(events[2], SessionEvent::BackingUp));
        match &events[3] {
            SessionEvent::Completed(outcome) => assert!(outcome.is_clean()),
            other => panic!("expected Completed, got {:?}", other),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_second_launch_while_active_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = session_cfg(dir.path());
        let exe = write_script(dir.path(), "sleep 0.3");
        let build = build_with_exe(dir.path(), Some(exe));

        let (tx, _rx) = mpsc::channel();
        let controller = SessionController::new(&cfg, Arc::new(StoppedProbe), tx);

        let handle = controller.launch(&build).unwrap();
        let err = controller.launch(&build).unwrap_err();
        assert!(err.to_string().contains("already running"));

        handle.join().unwrap();
        // Once the first session drains, launching works again
        let handle = controller.launch(&build).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_spawn_failure_emits_failed_and_returns_to_idle() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = session_cfg(dir.path());
        let build = build_with_exe(
            dir.path(),
            Some(dir.path().join("does-not-exist/VotV.exe")),
        );

        let (tx, rx) = mpsc::channel();
        let controller = SessionController::new(&cfg, Arc::new(StoppedProbe), tx);

        let handle = controller.launch(&build).unwrap();
        handle.join().unwrap();
        assert_eq!(controller.state(), SessionState::Idle);

        let events: Vec<SessionEvent> = rx.try_iter().collect();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, SessionEvent::Failed(msg) if msg.contains("spawn")))
        );
    }
}
