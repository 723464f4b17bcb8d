use super::PokeApi;
use crate::config::ClientConfig;
use crate::entry::EntryId;
use crate::errors::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use schema::{EvolutionChainRecord, NamedResource, PokemonRecord, ResourceIndex, SpeciesRecord};
use serde::de::DeserializeOwned;
use tracing::debug;

const USER_AGENT: &str = concat!("pokedex/", env!("CARGO_PKG_VERSION"));

/// `reqwest` backed client for the public API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    resource_kind: String,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| ApiError::Transport {
                resource: "http client".to_string(),
                message: err.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            resource_kind: config.resource_kind.clone(),
        })
    }

    pub fn index_url(&self, limit: usize, offset: usize) -> String {
        format!(
            "{}/{}?limit={}&offset={}",
            self.base_url, self.resource_kind, limit, offset
        )
    }

    pub fn entry_url(&self, id: EntryId) -> String {
        format!("{}/{}/{}", self.base_url, self.resource_kind, id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, resource: &str) -> ApiResult<T> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ApiError::Transport {
                resource: resource.to_string(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                resource: resource.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|err| ApiError::Decode {
            resource: resource.to_string(),
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl PokeApi for HttpApi {
    async fn fetch_index(&self, limit: usize, offset: usize) -> ApiResult<Vec<NamedResource>> {
        let url = self.index_url(limit, offset);
        let index: ResourceIndex = self.get_json(&url, "index").await?;
        Ok(index.results)
    }

    async fn fetch_entry(&self, id: EntryId) -> ApiResult<PokemonRecord> {
        let url = self.entry_url(id);
        self.get_json(&url, &format!("entry {}", id)).await
    }

    async fn fetch_species(&self, url: &str) -> ApiResult<SpeciesRecord> {
        self.get_json(url, "species").await
    }

    async fn fetch_evolution_chain(&self, url: &str) -> ApiResult<EvolutionChainRecord> {
        self.get_json(url, "evolution chain").await
    }
}
