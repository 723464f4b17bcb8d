//! Access to the remote creature database.
//!
//! Loaders only ever talk to the [`PokeApi`] trait, so the HTTP client can be
//! swapped for an in-memory one in tests.

pub mod http;

use crate::entry::EntryId;
use crate::errors::ApiResult;
use async_trait::async_trait;
use schema::{EvolutionChainRecord, NamedResource, PokemonRecord, SpeciesRecord};

pub use http::HttpApi;

/// Read-only operations the views need from the API.
#[async_trait]
pub trait PokeApi: Send + Sync {
    /// `GET /<kind>?limit=<limit>&offset=<offset>`: names and self references.
    async fn fetch_index(&self, limit: usize, offset: usize) -> ApiResult<Vec<NamedResource>>;

    /// `GET /<kind>/<id>`: full entry detail.
    async fn fetch_entry(&self, id: EntryId) -> ApiResult<PokemonRecord>;

    /// `GET <species-url>`: flavor texts and the evolution chain reference.
    async fn fetch_species(&self, url: &str) -> ApiResult<SpeciesRecord>;

    /// `GET <evolution-chain-url>`: the nested evolution graph.
    async fn fetch_evolution_chain(&self, url: &str) -> ApiResult<EvolutionChainRecord>;
}
