use crate::catalog::{BatchPolicy, CatalogOptions, TypeFilter};
use crate::entry::EntryId;
use crate::errors::{ConfigError, ConfigResult};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
const DEFAULT_RESOURCE_KIND: &str = "pokemon";
const DEFAULT_PAGE_SIZE: usize = 386;
const DEFAULT_CONCURRENCY: usize = 16;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LANGUAGES: &[&str] = &["es", "en"];

/// Connection and batching flags shared by every binary.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// RON file with default settings
    #[arg(long, value_name = "FILE", env = "POKEDEX_CONFIG", global = true)]
    pub config: Option<PathBuf>,
    /// API root, e.g. https://pokeapi.co/api/v2
    #[arg(long, env = "POKEDEX_BASE_URL", global = true)]
    pub base_url: Option<String>,
    /// Number of catalog entries to load
    #[arg(long, env = "POKEDEX_LIMIT", global = true)]
    pub limit: Option<usize>,
    /// Index position of the first catalog entry
    #[arg(long, env = "POKEDEX_OFFSET", global = true)]
    pub offset: Option<usize>,
    /// Maximum detail requests in flight
    #[arg(long, env = "POKEDEX_CONCURRENCY", global = true)]
    pub concurrency: Option<usize>,
    /// Per-request timeout
    #[arg(long, env = "POKEDEX_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,
    /// Flavor text languages, comma separated
    #[arg(long = "lang", env = "POKEDEX_LANG", value_delimiter = ',', global = true)]
    pub languages: Option<Vec<String>>,
    /// Show the entries that loaded even when others failed
    #[arg(long, env = "POKEDEX_PARTIAL", global = true)]
    pub partial: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pokedex",
    version,
    about = "Browse the Pokémon database from the terminal"
)]
pub struct CliArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List catalog entries, optionally filtered
    List {
        /// A type name, or "all"
        #[arg(long = "type", default_value = "all")]
        kind: TypeFilter,
        /// Name or number fragment
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show one entry with its evolution line
    Show {
        id: EntryId,
        /// Show the shiny artwork
        #[arg(long)]
        shiny: bool,
    },
}

/// Settings that can come from the config file. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    pub base_url: Option<String>,
    pub resource_kind: Option<String>,
    pub page_size: Option<usize>,
    pub offset: Option<usize>,
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub languages: Option<Vec<String>>,
    pub policy: Option<BatchPolicy>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub resource_kind: String,
    pub page_size: usize,
    pub offset: usize,
    pub concurrency: usize,
    pub timeout: Duration,
    pub languages: Vec<String>,
    pub policy: BatchPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            resource_kind: DEFAULT_RESOURCE_KIND.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            offset: 0,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            policy: BatchPolicy::FailFast,
        }
    }
}

impl ClientConfig {
    /// Merge flags over the config file over defaults, then validate.
    pub fn from_args(args: &ConnectionArgs) -> ConfigResult<Self> {
        let file_config = match args.config.as_deref() {
            Some(path) => load_config_file(path)?,
            None => PartialConfig::default(),
        };
        let config = Self::merge(args, file_config);
        config.validate()?;
        Ok(config)
    }

    fn merge(args: &ConnectionArgs, file: PartialConfig) -> Self {
        let defaults = Self::default();
        Self {
            base_url: args
                .base_url
                .clone()
                .or(file.base_url)
                .unwrap_or(defaults.base_url),
            resource_kind: file.resource_kind.unwrap_or(defaults.resource_kind),
            page_size: args.limit.or(file.page_size).unwrap_or(defaults.page_size),
            offset: args.offset.or(file.offset).unwrap_or(defaults.offset),
            concurrency: args
                .concurrency
                .or(file.concurrency)
                .unwrap_or(defaults.concurrency),
            timeout: args
                .timeout_secs
                .or(file.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            languages: args
                .languages
                .clone()
                .or(file.languages)
                .map(|langs| {
                    langs
                        .into_iter()
                        .map(|lang| lang.trim().to_ascii_lowercase())
                        .filter(|lang| !lang.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.languages),
            policy: if args.partial {
                BatchPolicy::Partial
            } else {
                file.policy.unwrap_or(defaults.policy)
            },
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |field, reason: &str| ConfigError::InvalidValue {
            field,
            reason: reason.to_string(),
        };

        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|err| invalid("base_url", &err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("base_url", "scheme must be http or https"));
        }
        if self.resource_kind.trim().is_empty() || self.resource_kind.contains('/') {
            return Err(invalid("resource_kind", "must be a single path segment"));
        }
        if self.page_size == 0 {
            return Err(invalid("page_size", "must be at least 1"));
        }
        if self.concurrency == 0 {
            return Err(invalid("concurrency", "must be at least 1"));
        }
        if self.timeout.is_zero() {
            return Err(invalid("timeout_secs", "must be at least 1"));
        }
        if self.languages.is_empty() {
            return Err(invalid("languages", "at least one language is required"));
        }
        Ok(())
    }

    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            page_size: self.page_size,
            offset: self.offset,
            concurrency: self.concurrency,
            policy: self.policy,
        }
    }
}

fn load_config_file(path: &Path) -> ConfigResult<PartialConfig> {
    let contents = fs::read_to_string(path).map_err(|err| ConfigError::Read {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    parse_config(&contents).map_err(|message| ConfigError::Parse {
        path: path.display().to_string(),
        message,
    })
}

fn parse_config(contents: &str) -> Result<PartialConfig, String> {
    ron::from_str(contents).map_err(|err| err.to_string())
}
