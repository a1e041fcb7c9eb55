//! Installed-build library
//!
//! A build is just a folder under the game destination directory; the library
//! is whatever a directory scan finds there. Nothing is persisted beyond the
//! folders themselves.

pub mod operations;
pub mod pure;
pub mod types;

pub use operations::{find_game_executable, scan_library};
pub use pure::sanitize_name;
pub use types::Build;
