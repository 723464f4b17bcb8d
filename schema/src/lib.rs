// Pokedex Schema - Shared type definitions
// This crate contains the wire records returned by the creature database API
// and the fixed type vocabulary, shared between the client library and its
// binaries.

// Re-export the main types
pub use evolution_data::*;
pub use pokemon_types::*;
pub use resources::*;
pub use species_data::*;

pub mod evolution_data;
pub mod pokemon_types;
pub mod resources;
pub mod species_data;
