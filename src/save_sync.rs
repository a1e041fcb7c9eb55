//! Save-data migration around a play session.
//!
//! The game writes all progress to one shared live save folder, so every
//! installed build would clobber every other build's progress without help.
//! Before launch the selected build's snapshot is *moved* into the live
//! folder (moved, not copied - the snapshot is consumed and re-created by the
//! next backup, so stale state never accumulates). After the game provably
//! exits, the live folder is *copied* back into the snapshot (copied, not
//! moved - the game must stay relaunchable without another restore).
//!
//! ## Module Structure
//! - `types.rs`: migration outcome accounting
//! - `operations.rs`: directory move/copy primitives
//! - `pipelines.rs`: the restore/backup orchestration

pub mod operations;
pub mod pipelines;
pub mod types;

pub use operations::{copy_tree_recursive, move_tree};
pub use pipelines::SaveMigrator;
pub use types::MigrationOutcome;
