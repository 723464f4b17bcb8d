use crate::api::PokeApi;
use crate::entry::{Entry, EntryId};
use crate::errors::{ApiError, ApiResult};
use async_trait::async_trait;
use schema::{
    AbilitySlot, ApiReference, Artwork, ChainLink, EvolutionChainRecord, FlavorTextEntry,
    NamedResource, OtherSprites, PokemonRecord, PokemonType, SpeciesRecord, SpriteSet, StatSlot,
    TypeSlot,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

pub const BASE: &str = "https://pokeapi.test/api/v2";

pub fn id(raw: u32) -> EntryId {
    EntryId::new(raw).unwrap()
}

pub fn entry_url(id: u32) -> String {
    format!("{BASE}/pokemon/{id}/")
}

pub fn species_url(id: u32) -> String {
    format!("{BASE}/pokemon-species/{id}/")
}

pub fn chain_url(id: u32) -> String {
    format!("{BASE}/evolution-chain/{id}/")
}

fn named(name: &str, url: String) -> NamedResource {
    NamedResource {
        name: name.to_string(),
        url,
    }
}

/// A builder for API entry records with plausible defaults.
///
/// # Example
/// ```
/// let entry = RecordBuilder::new(4, "charmander")
///     .with_types(&[PokemonType::Fire])
///     .entry();
/// ```
pub struct RecordBuilder {
    id: u32,
    name: String,
    types: Vec<PokemonType>,
    abilities: Vec<(String, bool)>,
    height: u32,
    weight: u32,
    stats: Vec<(String, u32)>,
}

impl RecordBuilder {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            types: vec![PokemonType::Normal],
            abilities: vec![("run-away".to_string(), false), ("keen-eye".to_string(), true)],
            height: 7,
            weight: 69,
            stats: [
                ("hp", 45),
                ("attack", 49),
                ("defense", 49),
                ("special-attack", 65),
                ("special-defense", 65),
                ("speed", 45),
            ]
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect(),
        }
    }

    pub fn with_types(mut self, types: &[PokemonType]) -> Self {
        self.types = types.to_vec();
        self
    }

    /// Height in decimetres, weight in hectograms.
    pub fn with_size(mut self, height: u32, weight: u32) -> Self {
        self.height = height;
        self.weight = weight;
        self
    }

    pub fn with_abilities(mut self, abilities: &[(&str, bool)]) -> Self {
        self.abilities = abilities
            .iter()
            .map(|(name, hidden)| (name.to_string(), *hidden))
            .collect();
        self
    }

    pub fn build(self) -> PokemonRecord {
        let id = self.id;
        let image = |kind: &str| Some(format!("https://img.test/{kind}/{id}.png"));

        PokemonRecord {
            id,
            name: self.name.clone(),
            height: self.height,
            weight: self.weight,
            base_experience: Some(64),
            types: self
                .types
                .iter()
                .enumerate()
                .map(|(i, kind)| TypeSlot {
                    slot: (i + 1) as u8,
                    kind: named(kind.as_ref(), format!("{BASE}/type/{kind}/")),
                })
                .collect(),
            abilities: self
                .abilities
                .iter()
                .enumerate()
                .map(|(i, (name, hidden))| AbilitySlot {
                    ability: named(name, format!("{BASE}/ability/{name}/")),
                    is_hidden: *hidden,
                    slot: (i + 1) as u8,
                })
                .collect(),
            stats: self
                .stats
                .iter()
                .map(|(name, value)| StatSlot {
                    base_stat: *value,
                    effort: 0,
                    stat: named(name, format!("{BASE}/stat/{name}/")),
                })
                .collect(),
            sprites: SpriteSet {
                front_default: image("sprite"),
                front_shiny: image("sprite-shiny"),
                other: OtherSprites {
                    home: Artwork {
                        front_default: image("home"),
                        front_shiny: None,
                    },
                    official_artwork: Artwork {
                        front_default: image("artwork"),
                        front_shiny: image("artwork-shiny"),
                    },
                },
            },
            species: named(&self.name, species_url(id)),
        }
    }

    pub fn entry(self) -> Entry {
        Entry::try_from(self.build()).unwrap()
    }
}

/// A species record with the given flavor texts, as `(language, text)` pairs.
pub fn species_record(chain_url: Option<&str>, texts: &[(&str, &str)]) -> SpeciesRecord {
    SpeciesRecord {
        id: 0,
        name: String::new(),
        flavor_text_entries: texts
            .iter()
            .map(|(lang, text)| FlavorTextEntry {
                flavor_text: text.to_string(),
                language: named(lang, format!("{BASE}/language/{lang}/")),
                version: None,
            })
            .collect(),
        evolution_chain: chain_url.map(|url| ApiReference {
            url: url.to_string(),
        }),
    }
}

/// One node of an evolution chain pointing at species `id`.
pub fn link(id: u32, name: &str, evolves_to: Vec<ChainLink>) -> ChainLink {
    ChainLink {
        species: named(name, species_url(id)),
        is_baby: false,
        evolves_to,
    }
}

/// In-memory [`PokeApi`] serving canned records.
///
/// Unknown entries, species and chains answer `NotFound`. Every request is
/// recorded so tests can assert on what was fetched.
#[derive(Default)]
pub struct FakeApi {
    index: Vec<NamedResource>,
    index_error: Option<ApiError>,
    entries: HashMap<u32, PokemonRecord>,
    failing: HashSet<u32>,
    hanging: HashSet<u32>,
    species: HashMap<String, SpeciesRecord>,
    chains: HashMap<String, EvolutionChainRecord>,
    delay: Option<Duration>,
    requests: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `record` and lists it in the index.
    pub fn with_record(mut self, record: PokemonRecord) -> Self {
        self.index.push(named(&record.name, entry_url(record.id)));
        self.entries.insert(record.id, record);
        self
    }

    /// Serves the record but keeps it out of the index.
    pub fn with_unlisted(mut self, record: PokemonRecord) -> Self {
        self.entries.insert(record.id, record);
        self
    }

    /// Lists the entry in the index; fetching it answers a server error.
    pub fn with_failing(mut self, id: u32, name: &str) -> Self {
        self.index.push(named(name, entry_url(id)));
        self.failing.insert(id);
        self
    }

    /// Lists the entry in the index; fetching it never completes.
    pub fn with_hanging(mut self, id: u32, name: &str) -> Self {
        self.index.push(named(name, entry_url(id)));
        self.hanging.insert(id);
        self
    }

    /// Adds a raw index item, e.g. one with a malformed reference.
    pub fn with_index_item(mut self, name: &str, url: &str) -> Self {
        self.index.push(named(name, url.to_string()));
        self
    }

    pub fn with_index_error(mut self, error: ApiError) -> Self {
        self.index_error = Some(error);
        self
    }

    pub fn with_species(mut self, id: u32, record: SpeciesRecord) -> Self {
        self.species.insert(species_url(id), record);
        self
    }

    pub fn with_chain(mut self, id: u32, chain: ChainLink) -> Self {
        self.chains
            .insert(chain_url(id), EvolutionChainRecord { id, chain });
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn entry_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.starts_with("entry "))
            .count()
    }

    async fn note(&self, request: String) {
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl PokeApi for FakeApi {
    async fn fetch_index(&self, limit: usize, offset: usize) -> ApiResult<Vec<NamedResource>> {
        self.note(format!("index {limit} {offset}")).await;
        if let Some(error) = &self.index_error {
            return Err(error.clone());
        }
        Ok(self.index.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn fetch_entry(&self, id: EntryId) -> ApiResult<PokemonRecord> {
        let raw = id.get();
        self.note(format!("entry {raw}")).await;
        if self.hanging.contains(&raw) {
            return std::future::pending().await;
        }
        if self.failing.contains(&raw) {
            return Err(ApiError::Status {
                resource: format!("entry {raw}"),
                status: 500,
            });
        }
        self.entries.get(&raw).cloned().ok_or(ApiError::NotFound {
            resource: format!("entry {raw}"),
        })
    }

    async fn fetch_species(&self, url: &str) -> ApiResult<SpeciesRecord> {
        self.note(format!("species {url}")).await;
        self.species.get(url).cloned().ok_or(ApiError::NotFound {
            resource: url.to_string(),
        })
    }

    async fn fetch_evolution_chain(&self, url: &str) -> ApiResult<EvolutionChainRecord> {
        self.note(format!("chain {url}")).await;
        self.chains.get(url).cloned().ok_or(ApiError::NotFound {
            resource: url.to_string(),
        })
    }
}
