//! Document library module
//!
//! Loading, filtering, sorting and selection over an in-memory collection of
//! processed-document records. Everything here is independent of the
//! terminal front-end so it can be exercised directly from tests.

pub mod errors;
pub mod loader;
pub mod filter;
pub mod sort;
pub mod state;
pub mod detail;

pub use errors::LoadError;
pub use loader::{load, parse_collection, source_from_config, DocumentSource, FileSource, HttpSource};
pub use filter::filter;
pub use sort::sort;
pub use state::{ExploreState, LoadStatus, LoadTicket};
pub use detail::{project, DetailSection, DocumentDetail};
