use crate::api::PokeApi;
use crate::diagnostics::{Diagnostic, DiagnosticLog, DiagnosticScope};
use crate::entry::Entry;
use crate::errors::{ApiError, ApiResult};
use crate::fetch::{fetch_all, StopOn};
use crate::reference::extract_id;
use schema::NamedResource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What a catalog batch with failed items turns into.
///
/// Under `FailFast` the first failed item also stops the requests still in
/// flight, since the page will be empty anyway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchPolicy {
    /// Any failed item empties the whole page.
    #[default]
    FailFast,
    /// Show every entry that loaded; report the rest.
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOptions {
    pub page_size: usize,
    pub offset: usize,
    pub concurrency: usize,
    pub policy: BatchPolicy,
}

impl BatchPolicy {
    fn stop_on(self) -> StopOn {
        match self {
            BatchPolicy::FailFast => StopOn::FirstFailure,
            BatchPolicy::Partial => StopOn::Never,
        }
    }
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            page_size: 386,
            offset: 0,
            concurrency: 16,
            policy: BatchPolicy::FailFast,
        }
    }
}

/// An index item whose detail could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    /// Position in the index page.
    pub position: usize,
    pub name: String,
    pub error: ApiError,
}

/// Every index item of one page, joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogBatch {
    /// Loaded entries in index order.
    pub entries: Vec<Entry>,
    pub failures: Vec<EntryFailure>,
}

impl CatalogBatch {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn was_cancelled(&self) -> bool {
        self.failures.iter().any(|failure| failure.error.is_cancelled())
    }

    /// Apply `policy`: the entries to show and one diagnostic per failed item.
    pub fn settle(self, policy: BatchPolicy) -> (Vec<Entry>, DiagnosticLog) {
        let mut diagnostics = DiagnosticLog::new();
        for failure in &self.failures {
            diagnostics.push(Diagnostic {
                scope: DiagnosticScope::CatalogItem {
                    position: failure.position,
                    name: failure.name.clone(),
                },
                message: failure.error.to_string(),
            });
        }

        let entries = match policy {
            BatchPolicy::FailFast if !self.failures.is_empty() => Vec::new(),
            _ => self.entries,
        };
        (entries, diagnostics)
    }
}

/// Fetch one index page and the detail of every entry on it.
///
/// Detail requests go through the bounded worker pool. The batch is returned
/// once every item has an outcome or, under [`BatchPolicy::FailFast`], as soon
/// as one item fails; items stopped that way are not reported. An index
/// failure is returned as the error, item failures are kept in the batch.
pub async fn load_catalog<A>(
    api: Arc<A>,
    options: &CatalogOptions,
    cancel: &CancellationToken,
) -> ApiResult<CatalogBatch>
where
    A: PokeApi + 'static,
{
    info!(
        page_size = options.page_size,
        offset = options.offset,
        "loading catalog index"
    );
    let index = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ApiError::Cancelled),
        index = api.fetch_index(options.page_size, options.offset) => index,
    }?;

    let outcomes = fetch_all(
        index,
        options.concurrency,
        options.policy.stop_on(),
        cancel,
        |resource: NamedResource| {
            let api = Arc::clone(&api);
            async move {
                let id = extract_id(&resource.url)?;
                let record = api.fetch_entry(id).await?;
                Entry::try_from(record)
            }
        },
    )
    .await;

    let mut batch = CatalogBatch::default();
    let mut stopped = 0;
    for outcome in outcomes {
        match outcome.result {
            Ok(entry) => batch.entries.push(entry),
            Err(error) if error.is_cancelled() && !cancel.is_cancelled() => stopped += 1,
            Err(error) => {
                if !error.is_cancelled() {
                    warn!(
                        position = outcome.index + 1,
                        name = %outcome.key.name,
                        %error,
                        "catalog entry failed to load"
                    );
                }
                batch.failures.push(EntryFailure {
                    position: outcome.index,
                    name: outcome.key.name,
                    error,
                });
            }
        }
    }

    if stopped > 0 {
        debug!(stopped, "remaining items stopped after a failure");
    }
    info!(
        loaded = batch.entries.len(),
        failed = batch.failures.len(),
        "catalog batch joined"
    );
    Ok(batch)
}
