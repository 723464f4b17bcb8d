use super::filter::{filter_entries, CatalogFilter, TypeFilter};
use super::loader::{BatchPolicy, CatalogBatch};
use crate::diagnostics::{Diagnostic, DiagnosticLog, DiagnosticScope};
use crate::entry::Entry;
use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogPhase {
    /// Nothing requested yet, or the last load was cancelled.
    Idle,
    /// Waiting for the whole batch.
    Loading,
    Ready,
}

/// Everything that can happen to the catalog view.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    /// A new load was issued. Bumps the generation.
    LoadStarted { policy: BatchPolicy },
    /// The batch of the load tagged `generation` has been joined.
    BatchLoaded {
        generation: u64,
        batch: CatalogBatch,
    },
    /// The index request of the load tagged `generation` failed.
    IndexFailed { generation: u64, error: ApiError },
    TypeSelected(TypeFilter),
    /// Raw search box value; normalized on the way in.
    SearchChanged(String),
    SearchCleared,
    /// Back to all types and no search term.
    FiltersReset,
}

/// Immutable snapshot of the catalog view.
///
/// Transitions go through [`CatalogState::reduce`]; the entries are only ever
/// replaced wholesale by a joined batch, filtering derives views over them.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    generation: u64,
    phase: CatalogPhase,
    policy: BatchPolicy,
    entries: Vec<Entry>,
    filter: CatalogFilter,
    diagnostics: DiagnosticLog,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            generation: 0,
            phase: CatalogPhase::Idle,
            policy: BatchPolicy::default(),
            entries: Vec::new(),
            filter: CatalogFilter::default(),
            diagnostics: DiagnosticLog::new(),
        }
    }
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduce(self, event: CatalogEvent) -> Self {
        match event {
            CatalogEvent::LoadStarted { policy } => Self {
                generation: self.generation + 1,
                phase: CatalogPhase::Loading,
                policy,
                entries: Vec::new(),
                diagnostics: DiagnosticLog::new(),
                ..self
            },
            CatalogEvent::BatchLoaded { generation, batch } => {
                if !self.is_current(generation) {
                    return self;
                }
                if batch.was_cancelled() {
                    return Self {
                        phase: CatalogPhase::Idle,
                        ..self
                    };
                }
                let (entries, diagnostics) = batch.settle(self.policy);
                Self {
                    phase: CatalogPhase::Ready,
                    entries,
                    diagnostics,
                    ..self
                }
            }
            CatalogEvent::IndexFailed { generation, error } => {
                if !self.is_current(generation) {
                    return self;
                }
                if error.is_cancelled() {
                    return Self {
                        phase: CatalogPhase::Idle,
                        ..self
                    };
                }
                let mut diagnostics = DiagnosticLog::new();
                diagnostics.push(Diagnostic {
                    scope: DiagnosticScope::Index,
                    message: error.to_string(),
                });
                Self {
                    phase: CatalogPhase::Ready,
                    entries: Vec::new(),
                    diagnostics,
                    ..self
                }
            }
            CatalogEvent::TypeSelected(kind) => Self {
                filter: self.filter.with_kind(kind),
                ..self
            },
            CatalogEvent::SearchChanged(raw) => Self {
                filter: self.filter.with_search(&raw),
                ..self
            },
            CatalogEvent::SearchCleared => Self {
                filter: self.filter.with_search(""),
                ..self
            },
            CatalogEvent::FiltersReset => Self {
                filter: CatalogFilter::default(),
                ..self
            },
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.phase == CatalogPhase::Loading && generation == self.generation
    }

    /// Generation of the most recent load; tag its completion events with it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> CatalogPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == CatalogPhase::Loading
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    /// Entries passing the current filter, in catalog order.
    pub fn visible(&self) -> Vec<&Entry> {
        filter_entries(&self.entries, &self.filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::loader::EntryFailure;
    use crate::tests::common::RecordBuilder;
    use pretty_assertions::assert_eq;
    use schema::PokemonType;

    fn batch(ids: &[(u32, &str, PokemonType)]) -> CatalogBatch {
        CatalogBatch {
            entries: ids
                .iter()
                .map(|(id, name, kind)| RecordBuilder::new(*id, name).with_types(&[*kind]).entry())
                .collect(),
            failures: Vec::new(),
        }
    }

    fn loading(policy: BatchPolicy) -> CatalogState {
        CatalogState::new().reduce(CatalogEvent::LoadStarted { policy })
    }

    #[test]
    fn test_load_lifecycle() {
        let state = loading(BatchPolicy::FailFast);
        assert!(state.is_loading());
        assert_eq!(state.generation(), 1);

        let generation = state.generation();
        let state = state.reduce(CatalogEvent::BatchLoaded {
            generation,
            batch: batch(&[(1, "bulbasaur", PokemonType::Grass), (4, "charmander", PokemonType::Fire)]),
        });

        assert_eq!(state.phase(), CatalogPhase::Ready);
        assert_eq!(state.entries().len(), 2);
        assert!(state.diagnostics().is_empty());
    }

    #[test]
    fn test_stale_batch_is_discarded() {
        let first = loading(BatchPolicy::FailFast);
        let stale_generation = first.generation();
        let second = first.reduce(CatalogEvent::LoadStarted {
            policy: BatchPolicy::FailFast,
        });

        let after = second.clone().reduce(CatalogEvent::BatchLoaded {
            generation: stale_generation,
            batch: batch(&[(1, "bulbasaur", PokemonType::Grass)]),
        });

        assert_eq!(after, second);
    }

    #[test]
    fn test_filter_events_only_change_the_view() {
        let state = loading(BatchPolicy::FailFast);
        let generation = state.generation();
        let state = state.reduce(CatalogEvent::BatchLoaded {
            generation,
            batch: batch(&[
                (1, "bulbasaur", PokemonType::Grass),
                (4, "charmander", PokemonType::Fire),
                (5, "charmeleon", PokemonType::Fire),
            ]),
        });
        let all = state.entries().to_vec();

        let state = state
            .reduce(CatalogEvent::TypeSelected(TypeFilter::Only(PokemonType::Fire)))
            .reduce(CatalogEvent::SearchChanged("  MELEON".to_string()));

        assert_eq!(state.filter().search(), "meleon");
        assert_eq!(state.visible().len(), 1);
        assert_eq!(state.entries(), all.as_slice());

        let state = state.reduce(CatalogEvent::SearchCleared);
        assert_eq!(state.visible().len(), 2);
        assert_eq!(state.filter().kind(), TypeFilter::Only(PokemonType::Fire));

        let state = state.reduce(CatalogEvent::FiltersReset);
        assert!(state.filter().is_unfiltered());
        assert_eq!(state.visible().len(), 3);
    }

    #[test]
    fn test_partial_policy_keeps_loaded_entries() {
        let state = loading(BatchPolicy::Partial);
        let generation = state.generation();
        let mut page = batch(&[(1, "bulbasaur", PokemonType::Grass)]);
        page.failures.push(EntryFailure {
            position: 1,
            name: "ivysaur".to_string(),
            error: ApiError::Status {
                resource: "entry 2".to_string(),
                status: 500,
            },
        });

        let state = state.reduce(CatalogEvent::BatchLoaded {
            generation,
            batch: page,
        });

        assert_eq!(state.entries().len(), 1);
        assert_eq!(state.diagnostics().len(), 1);
    }

    #[test]
    fn test_index_failure_ends_loading_empty() {
        let state = loading(BatchPolicy::FailFast);
        let generation = state.generation();

        let state = state.reduce(CatalogEvent::IndexFailed {
            generation,
            error: ApiError::Transport {
                resource: "index".to_string(),
                message: "connection reset".to_string(),
            },
        });

        assert_eq!(state.phase(), CatalogPhase::Ready);
        assert!(state.entries().is_empty());
        assert_eq!(state.diagnostics().entries()[0].scope, DiagnosticScope::Index);
    }

    #[test]
    fn test_cancelled_load_returns_to_idle() {
        let state = loading(BatchPolicy::FailFast);
        let generation = state.generation();

        let state = state.reduce(CatalogEvent::IndexFailed {
            generation,
            error: ApiError::Cancelled,
        });

        assert_eq!(state.phase(), CatalogPhase::Idle);
        assert!(state.diagnostics().is_empty());
    }
}
