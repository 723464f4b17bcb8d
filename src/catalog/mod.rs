//! The catalog (list) view: loading a page of entries and filtering it.

pub mod filter;
pub mod loader;
pub mod state;

pub use filter::{filter_entries, normalize_search, CatalogFilter, TypeFilter};
pub use loader::{load_catalog, BatchPolicy, CatalogBatch, CatalogOptions, EntryFailure};
pub use state::{CatalogEvent, CatalogPhase, CatalogState};
