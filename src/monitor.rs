//! Process monitoring for the launch/backup sequence.
//!
//! The spawned process handle is not enough to know the game is gone: the
//! shipped binary is a launcher stub that forks the real engine process, so
//! the handle can report exit while the engine still holds save-file locks.
//! The probe scans the whole process table instead.

use std::time::{Duration, Instant};

use sysinfo::{ProcessesToUpdate, System};

/// Answers "is anything matching these names still alive?"
///
/// A trait so the wait loop can be driven by a canned sequence in tests.
pub trait ProcessProbe {
    fn any_running(&self, names: &[String]) -> bool;
}

/// Probe backed by a full scan of the OS process table.
pub struct SystemProcessProbe;

impl ProcessProbe for SystemProcessProbe {
    fn any_running(&self, names: &[String]) -> bool {
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::All, true);

        // Substring match on lowercased names so platform suffixes
        // (VotV.exe, VotV-Win64-Shipping.exe) still match "votv". Processes
        // that vanish mid-scan simply aren't in the snapshot.
        for process in sys.processes().values() {
            let process_name = process.name().to_string_lossy().to_lowercase();
            for name in names {
                if process_name.contains(&name.to_lowercase()) {
                    return true;
                }
            }
        }
        false
    }
}

#[derive(Debug, PartialEq)]
pub enum TerminationWait {
    /// No matching process remained when we stopped polling
    Confirmed,
    /// Something still matched when the timeout elapsed
    TimedOut,
}

/// Poll the probe until nothing matches or the timeout elapses.
///
/// The timeout exists so a hung, unkillable process can't wedge the backup
/// phase forever; the caller decides how to escalate on `TimedOut`.
pub fn wait_for_exit(
    probe: &dyn ProcessProbe,
    names: &[String],
    interval: Duration,
    timeout: Duration,
) -> TerminationWait {
    let deadline = Instant::now() + timeout;

    while probe.any_running(names) {
        if Instant::now() >= deadline {
            return TerminationWait::TimedOut;
        }
        std::thread::sleep(interval);
    }

    TerminationWait::Confirmed
}
