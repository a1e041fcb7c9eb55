//! Session lifecycle: restore saves, spawn the game, drain its output, wait
//! for real termination, back the saves up again.
//!
//! ## Module Structure
//! - `types.rs`: session states and the event stream the shell subscribes to
//! - `pipelines.rs`: the controller and launch sequence

pub mod pipelines;
pub mod types;

pub use pipelines::SessionController;
pub use types::{SessionEvent, SessionState};
