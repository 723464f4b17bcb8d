//! Evolution chain resolution.
//!
//! The API describes an evolution family as a nested tree of species
//! references. The detail view shows it as a flat, ordered line of stages,
//! each enriched with display data fetched from the entry endpoint.
//!
//! Branching families (one stage evolving into several species) are walked
//! along the first child only by [`resolve_evolution_chain`]. Callers that
//! want another branch build an [`EvolutionTree`], pick one of its
//! [`paths`](EvolutionTree::paths) and hand it to [`resolve_evolution_path`].

use crate::api::PokeApi;
use crate::diagnostics::{DiagnosticLog, DiagnosticScope};
use crate::entry::{Entry, EntryId};
use crate::errors::ApiError;
use crate::reference::extract_id;
use schema::{ChainLink, NamedResource, PokemonType};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One resolved stage of an evolution line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionStage {
    pub id: EntryId,
    pub name: String,
    pub image: Option<String>,
    pub types: Vec<PokemonType>,
}

impl From<&Entry> for EvolutionStage {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            name: entry.name.clone(),
            image: entry.images.artwork.clone(),
            types: entry.types.clone(),
        }
    }
}

/// Stages resolved along one path, plus what had to be skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainResolution {
    pub stages: Vec<EvolutionStage>,
    pub diagnostics: DiagnosticLog,
    /// The walk stopped early because its view was torn down.
    pub cancelled: bool,
}

/// The full branching shape of an evolution family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionTree {
    pub species: NamedResource,
    pub children: Vec<EvolutionTree>,
}

impl EvolutionTree {
    pub fn from_link(link: &ChainLink) -> Self {
        Self {
            species: link.species.clone(),
            children: link.evolves_to.iter().map(EvolutionTree::from_link).collect(),
        }
    }

    /// Species along the first child at every stage.
    pub fn first_path(&self) -> Vec<&NamedResource> {
        let mut path = vec![&self.species];
        let mut current = self;
        while let Some(next) = current.children.first() {
            path.push(&next.species);
            current = next;
        }
        path
    }

    /// Every root-to-leaf path, in child order. The first one is [`first_path`](Self::first_path).
    pub fn paths(&self) -> Vec<Vec<&NamedResource>> {
        if self.children.is_empty() {
            return vec![vec![&self.species]];
        }
        self.children
            .iter()
            .flat_map(|child| child.paths())
            .map(|tail| {
                let mut path = Vec::with_capacity(tail.len() + 1);
                path.push(&self.species);
                path.extend(tail);
                path
            })
            .collect()
    }

    /// Whether any stage evolves into more than one species.
    pub fn is_branching(&self) -> bool {
        self.children.len() > 1 || self.children.iter().any(EvolutionTree::is_branching)
    }
}

/// Resolve the chain rooted at `root`, following only the first child at each
/// stage, into ordered stages from earliest to latest.
///
/// A stage whose reference cannot be parsed or whose entry cannot be fetched is
/// skipped and recorded in the returned diagnostics; the walk carries on with
/// the next stage.
pub async fn resolve_evolution_chain<A>(
    api: &A,
    root: &ChainLink,
    cancel: &CancellationToken,
) -> ChainResolution
where
    A: PokeApi + ?Sized,
{
    let mut path = vec![&root.species];
    let mut link = root;
    while let Some(next) = link.first_child() {
        path.push(&next.species);
        link = next;
    }
    resolve_evolution_path(api, &path, cancel).await
}

/// Resolve an explicit species path, e.g. one of [`EvolutionTree::paths`].
pub async fn resolve_evolution_path<A>(
    api: &A,
    path: &[&NamedResource],
    cancel: &CancellationToken,
) -> ChainResolution
where
    A: PokeApi + ?Sized,
{
    let mut resolution = ChainResolution::default();

    for species in path {
        if cancel.is_cancelled() {
            resolution.cancelled = true;
            break;
        }

        let scope = || DiagnosticScope::EvolutionStage(species.name.clone());
        let id = match extract_id(&species.url) {
            Ok(id) => id,
            Err(err) => {
                resolution.diagnostics.record(scope(), err.to_string());
                continue;
            }
        };

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            record = api.fetch_entry(id) => record,
        };

        match fetched.and_then(Entry::try_from) {
            Ok(entry) => {
                debug!(id = %entry.id, name = %entry.name, "resolved evolution stage");
                resolution.stages.push(EvolutionStage::from(&entry));
            }
            Err(ApiError::Cancelled) => {
                resolution.cancelled = true;
                break;
            }
            Err(err) => resolution.diagnostics.record(scope(), err.to_string()),
        }
    }

    resolution
}
