//! Release catalog: version names, changelog descriptions, download links.
//!
//! The actual scraping of the release page is somebody else's job (anything
//! implementing [`CatalogSource`] can feed us); this module owns the release
//! types, the persisted snapshot, and link extraction from description text.
//!
//! ## Module Structure
//! - `types.rs`: release types and the source trait
//! - `pure.rs`: link extraction
//! - `cache.rs`: the persisted snapshot, invalidated by an explicit refetch

pub mod cache;
pub mod pure;
pub mod types;

pub use cache::{clear_cache, load_cache, save_cache};
pub use pure::find_first_link;
pub use types::{CatalogSource, JsonFileSource, Release};
