//! Pokédex MCP Server
//!
//! A Model Context Protocol server using the official Rust SDK (rmcp) that
//! exposes the catalog and detail views for LLM interaction. The loaded
//! catalog lives for the duration of the session only.

use std::borrow::Cow;
use std::future::Future;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use pokedex::config::{ClientConfig, ConnectionArgs};
use pokedex::logging::{init_logging, LoggingConfig};
use pokedex::{EntryId, HttpApi, PokedexSession, TypeFilter};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pokedex-mcp", version, about = "Pokédex MCP server over stdio")]
struct ServerArgs {
    #[command(flatten)]
    connection: ConnectionArgs,
}

#[derive(Clone)]
pub struct PokedexService {
    tool_router: ToolRouter<PokedexService>,
    session: Arc<Mutex<PokedexSession<HttpApi>>>,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoadCatalogRequest {
    #[schemars(description = "Number of entries to load; defaults to the configured page size")]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListEntriesRequest {
    #[schemars(description = "Type to show, e.g. 'fire', or 'all'")]
    pub kind: Option<String>,
    #[schemars(description = "Name or number fragment to search for")]
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ShowEntryRequest {
    #[schemars(description = "National dex number of the Pokémon")]
    pub id: u32,
    #[schemars(description = "Show the shiny artwork")]
    pub shiny: Option<bool>,
}

fn invalid_params(message: String) -> McpError {
    McpError {
        code: ErrorCode(-32602),
        message: Cow::from(message),
        data: None,
    }
}

#[tool_router]
impl PokedexService {
    pub fn new(session: PokedexSession<HttpApi>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            session: Arc::new(Mutex::new(session)),
        }
    }

    #[tool(description = "Load (or reload) the Pokémon catalog")]
    async fn load_catalog(
        &self,
        Parameters(request): Parameters<LoadCatalogRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.session.lock().await.reload_catalog(request.limit).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "List catalog entries filtered by type and search term")]
    async fn list_entries(
        &self,
        Parameters(request): Parameters<ListEntriesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let kind = match request.kind.as_deref() {
            Some(raw) => raw
                .parse::<TypeFilter>()
                .map_err(|_| {
                    invalid_params(format!(
                        "Unknown type '{}'. Expected one of: {}",
                        raw,
                        TypeFilter::choices().join(", ")
                    ))
                })?,
            None => TypeFilter::All,
        };
        let search = request.search.unwrap_or_default();
        let text = self.session.lock().await.list_entries(kind, &search).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Show one Pokémon with its description, stats and evolution line")]
    async fn show_entry(
        &self,
        Parameters(request): Parameters<ShowEntryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let id = EntryId::new(request.id)
            .ok_or_else(|| invalid_params("Pokémon numbers start at 1".to_string()))?;
        let shiny = request.shiny.unwrap_or(false);
        let text = self.session.lock().await.show_entry(id, shiny).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for PokedexService {}

/// Drive `work` until it finishes or `cancel` fires, whichever comes first.
async fn until_cancelled<F: Future>(work: F, cancel: &CancellationToken) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        output = work => Some(output),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = ServerArgs::parse();
    init_logging(&LoggingConfig::from_env())?;

    let config = ClientConfig::from_args(&args.connection).context("invalid configuration")?;
    let api = HttpApi::new(&config).context("failed to build HTTP client")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let service = PokedexService::new(PokedexSession::new(Arc::new(api), config, cancel.clone()));
    let transport = (stdin(), stdout());

    info!("starting MCP server on stdio");
    let server = service.serve(transport).await?;

    match until_cancelled(server.waiting(), &cancel).await {
        Some(quit_reason) => {
            let quit_reason = quit_reason?;
            info!(?quit_reason, "MCP server exiting");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            info!("interrupt received, shutting down");
            // The runtime would wait on the blocking stdin reader.
            std::process::exit(130)
        }
    }
}
