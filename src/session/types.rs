use crate::save_sync::MigrationOutcome;

/// Where the controller currently is in the launch sequence.
///
/// Exactly one session is ever active; the shell stays hidden from `Running`
/// until the backup completes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionState {
    Idle,
    Restoring,
    Running,
    BackingUp,
}

/// Notifications the shell subscribes to instead of being called back
/// directly. `Started` is the cue to hide, `Completed`/`Failed` the cue to
/// show again.
#[derive(Debug)]
pub enum SessionEvent {
    Restoring,
    Started { pid: u32 },
    BackingUp,
    Completed(MigrationOutcome),
    Failed(String),
}
