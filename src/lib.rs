//! Pokédex Client
//!
//! Catalog and detail views over the public Pokémon database API: a bounded,
//! cancellable catalog loader with type and text filtering, and a detail
//! loader that resolves evolution chains. View state is immutable and only
//! changes through reducer events.

// --- MODULE DECLARATIONS ---
pub mod api;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod diagnostics;
pub mod display;
pub mod entry;
pub mod errors;
pub mod evolution;
pub mod fetch;
pub mod logging;
pub mod mcp_interface;
pub mod reference;
pub mod species;

#[cfg(test)]
mod tests;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
// Wire records and the type vocabulary.
pub use schema::{
    ChainLink, EvolutionChainRecord, NamedResource, PokemonRecord, PokemonType, ResourceIndex,
    SpeciesRecord,
};

// --- From this crate's modules (`src/`) ---

// API access.
pub use api::{HttpApi, PokeApi};

// View loaders and states.
pub use catalog::{
    filter_entries, load_catalog, BatchPolicy, CatalogEvent, CatalogFilter, CatalogState,
    TypeFilter,
};
pub use detail::{load_detail, DetailEvent, DetailOutcome, DetailPage, DetailState};
pub use evolution::{resolve_evolution_chain, EvolutionStage, EvolutionTree};
pub use fetch::{fetch_all, StopOn};
pub use reference::extract_id;

// Core data types.
pub use diagnostics::{Diagnostic, DiagnosticLog, DiagnosticScope};
pub use entry::{Entry, EntryId};
pub use mcp_interface::PokedexSession;

// Configuration and crate-specific error and result types.
pub use config::ClientConfig;
pub use errors::{ApiError, ApiResult, ConfigError, ConfigResult, ReferenceError, ReferenceResult};
