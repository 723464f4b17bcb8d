//! Session functions shared by the terminal front end and the MCP server.
//!
//! A [`PokedexSession`] owns the view states and drives them through their
//! reducers: it issues the load, tags it with the state's generation, and
//! feeds the outcome back as an event. Every operation returns the rendered
//! view text.

use crate::api::PokeApi;
use crate::catalog::{load_catalog, CatalogEvent, CatalogPhase, CatalogState, TypeFilter};
use crate::config::ClientConfig;
use crate::detail::{load_detail, DetailEvent, DetailState};
use crate::display::{format_catalog, format_detail};
use crate::entry::EntryId;
use std::mem;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct PokedexSession<A: PokeApi + 'static> {
    api: Arc<A>,
    config: ClientConfig,
    catalog: CatalogState,
    detail: DetailState,
    cancel: CancellationToken,
}

impl<A: PokeApi + 'static> PokedexSession<A> {
    /// `cancel` is shared by every load of the session; firing it tears the
    /// session's views down.
    pub fn new(api: Arc<A>, config: ClientConfig, cancel: CancellationToken) -> Self {
        Self {
            api,
            config,
            catalog: CatalogState::new(),
            detail: DetailState::new(),
            cancel,
        }
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn detail(&self) -> &DetailState {
        &self.detail
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn apply_catalog(&mut self, event: CatalogEvent) {
        self.catalog = mem::take(&mut self.catalog).reduce(event);
    }

    fn apply_detail(&mut self, event: DetailEvent) {
        self.detail = mem::take(&mut self.detail).reduce(event);
    }

    /// Load a fresh catalog page, replacing whatever was loaded before.
    /// `limit` overrides the configured page size for this load.
    pub async fn reload_catalog(&mut self, limit: Option<usize>) -> String {
        let mut options = self.config.catalog_options();
        if let Some(limit) = limit {
            options.page_size = limit.max(1);
        }

        self.apply_catalog(CatalogEvent::LoadStarted {
            policy: options.policy,
        });
        let generation = self.catalog.generation();
        let event = match load_catalog(Arc::clone(&self.api), &options, &self.cancel).await {
            Ok(batch) => CatalogEvent::BatchLoaded { generation, batch },
            Err(error) => CatalogEvent::IndexFailed { generation, error },
        };
        self.apply_catalog(event);
        format_catalog(&self.catalog)
    }

    /// Filter the loaded catalog, loading it first if nothing is loaded yet.
    pub async fn list_entries(&mut self, kind: TypeFilter, search: &str) -> String {
        if self.catalog.phase() == CatalogPhase::Idle {
            self.reload_catalog(None).await;
        }
        self.apply_catalog(CatalogEvent::TypeSelected(kind));
        if search.trim().is_empty() {
            self.apply_catalog(CatalogEvent::SearchCleared);
        } else {
            self.apply_catalog(CatalogEvent::SearchChanged(search.to_string()));
        }
        format_catalog(&self.catalog)
    }

    pub fn reset_filters(&mut self) -> String {
        self.apply_catalog(CatalogEvent::FiltersReset);
        format_catalog(&self.catalog)
    }

    /// Navigate the detail view to `id` and render it.
    pub async fn show_entry(&mut self, id: EntryId, shiny: bool) -> String {
        self.apply_detail(DetailEvent::ShinyToggled(shiny));
        self.apply_detail(DetailEvent::Requested(id));
        let generation = self.detail.generation();

        let outcome = load_detail(&*self.api, id, &self.config.languages, &self.cancel).await;
        self.apply_detail(DetailEvent::Loaded {
            generation,
            outcome,
        });
        format_detail(&self.detail)
    }
}
