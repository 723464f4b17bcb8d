use crate::api::PokeApi;
use crate::diagnostics::{DiagnosticLog, DiagnosticScope};
use crate::entry::{Entry, EntryId};
use crate::errors::{ApiError, ApiResult};
use crate::evolution::{resolve_evolution_path, EvolutionStage, EvolutionTree};
use crate::species::SpeciesInfo;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Everything the detail page renders.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPage {
    pub entry: Entry,
    /// Localized flavor text, if the species loaded and had one.
    pub description: Option<String>,
    /// Resolved first-child evolution line; empty when it could not be loaded.
    pub evolution: Vec<EvolutionStage>,
    /// Paths of the family not shown because only the first child is followed.
    pub hidden_branches: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    Found {
        page: DetailPage,
        diagnostics: DiagnosticLog,
    },
    /// The root entry could not be fetched.
    NotFound { id: EntryId, error: ApiError },
    Cancelled,
}

/// Fetch entry, species, evolution chain, then resolve the chain, in that order.
///
/// Only a failure of the first fetch makes the page unavailable. Later
/// failures leave the corresponding section empty and are recorded in the
/// outcome's diagnostics.
pub async fn load_detail<A>(
    api: &A,
    id: EntryId,
    languages: &[String],
    cancel: &CancellationToken,
) -> DetailOutcome
where
    A: PokeApi + ?Sized,
{
    info!(%id, "loading entry detail");
    let mut diagnostics = DiagnosticLog::new();

    let entry = match cancellable(cancel, api.fetch_entry(id))
        .await
        .and_then(Entry::try_from)
    {
        Ok(entry) => entry,
        Err(ApiError::Cancelled) => return DetailOutcome::Cancelled,
        Err(error) => {
            diagnostics.record(DiagnosticScope::Entry(id), error.to_string());
            return DetailOutcome::NotFound { id, error };
        }
    };

    let species = cancellable(cancel, api.fetch_species(&entry.species_url)).await;
    let mut page = DetailPage {
        entry,
        description: None,
        evolution: Vec::new(),
        hidden_branches: 0,
    };

    let species = match species {
        Ok(record) => SpeciesInfo::from(record),
        Err(ApiError::Cancelled) => return DetailOutcome::Cancelled,
        Err(error) => {
            diagnostics.record(DiagnosticScope::Species(id), error.to_string());
            return DetailOutcome::Found { page, diagnostics };
        }
    };
    page.description = species.description(languages);

    let Some(chain_url) = species.evolution_chain_url.as_deref() else {
        return DetailOutcome::Found { page, diagnostics };
    };

    let chain = match cancellable(cancel, api.fetch_evolution_chain(chain_url)).await {
        Ok(record) => record.chain,
        Err(ApiError::Cancelled) => return DetailOutcome::Cancelled,
        Err(error) => {
            diagnostics.record(DiagnosticScope::EvolutionChain(id), error.to_string());
            return DetailOutcome::Found { page, diagnostics };
        }
    };

    let tree = EvolutionTree::from_link(&chain);
    let resolution = resolve_evolution_path(api, &tree.first_path(), cancel).await;
    if resolution.cancelled {
        return DetailOutcome::Cancelled;
    }

    page.hidden_branches = tree.paths().len().saturating_sub(1);
    page.evolution = resolution.stages;
    diagnostics.extend(resolution.diagnostics);

    info!(
        %id,
        stages = page.evolution.len(),
        skipped = diagnostics.len(),
        "entry detail ready"
    );
    DetailOutcome::Found { page, diagnostics }
}

async fn cancellable<T>(
    cancel: &CancellationToken,
    request: impl Future<Output = ApiResult<T>>,
) -> ApiResult<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ApiError::Cancelled),
        result = request => result,
    }
}
