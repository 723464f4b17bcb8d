use crate::errors::{ApiError, ApiResult, ReferenceError};
use schema::{PokemonRecord, PokemonType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Externally assigned, positive entry identifier (the national dex number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u32);

impl EntryId {
    /// Returns `None` for zero; identifiers start at 1.
    pub fn new(raw: u32) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-padded catalog number, e.g. `#025`.
    pub fn dex_number(self) -> String {
        format!("#{:03}", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| ReferenceError::Malformed {
            reference: s.to_string(),
            reason,
        };
        let raw: u32 = s
            .trim()
            .parse()
            .map_err(|_| malformed("identifier is not a number"))?;
        EntryId::new(raw).ok_or_else(|| malformed("identifier must be positive"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub hidden: bool,
    pub slot: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStat {
    pub name: String,
    pub value: u32,
}

/// Image references for an entry. Any of them may be missing upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Images {
    /// Home render used on catalog cards.
    pub card: Option<String>,
    /// Official artwork, default colouring.
    pub artwork: Option<String>,
    /// Official artwork, shiny colouring.
    pub artwork_shiny: Option<String>,
    /// Small shiny sprite, used when the shiny artwork is missing.
    pub sprite_shiny: Option<String>,
}

impl Images {
    /// The image shown on the detail page for the chosen colouring.
    pub fn portrait(&self, shiny: bool) -> Option<&str> {
        if shiny {
            self.artwork_shiny
                .as_deref()
                .or(self.sprite_shiny.as_deref())
        } else {
            self.artwork.as_deref()
        }
    }
}

/// A fully fetched catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub types: Vec<PokemonType>,
    pub abilities: Vec<Ability>,
    /// Decimetres.
    pub height: u32,
    /// Hectograms.
    pub weight: u32,
    pub base_experience: Option<u32>,
    pub stats: Vec<BaseStat>,
    pub images: Images,
    /// Reference to the species metadata resource.
    pub species_url: String,
}

impl Entry {
    pub fn has_type(&self, kind: PokemonType) -> bool {
        self.types.contains(&kind)
    }

    /// Name with the first letter upper-cased, as shown on cards.
    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }

    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }
}

impl TryFrom<PokemonRecord> for Entry {
    type Error = ApiError;

    fn try_from(record: PokemonRecord) -> ApiResult<Self> {
        let resource = format!("entry {}", record.id);
        let id = EntryId::new(record.id).ok_or_else(|| ApiError::MalformedData {
            resource: resource.clone(),
            details: "identifier must be positive".to_string(),
        })?;

        let mut slots = record.types;
        slots.sort_by_key(|slot| slot.slot);
        let types = slots
            .iter()
            .map(|slot| {
                slot.kind
                    .name
                    .parse::<PokemonType>()
                    .map_err(|_| ApiError::MalformedData {
                        resource: resource.clone(),
                        details: format!("unknown type {:?}", slot.kind.name),
                    })
            })
            .collect::<ApiResult<Vec<_>>>()?;

        let abilities = record
            .abilities
            .into_iter()
            .map(|slot| Ability {
                name: slot.ability.name,
                hidden: slot.is_hidden,
                slot: slot.slot,
            })
            .collect();

        let stats = record
            .stats
            .into_iter()
            .map(|slot| BaseStat {
                name: slot.stat.name,
                value: slot.base_stat,
            })
            .collect();

        let sprites = record.sprites;
        let images = Images {
            card: sprites.other.home.front_default,
            artwork: sprites.other.official_artwork.front_default,
            artwork_shiny: sprites.other.official_artwork.front_shiny,
            sprite_shiny: sprites.front_shiny,
        };

        Ok(Entry {
            id,
            name: record.name,
            types,
            abilities,
            height: record.height,
            weight: record.weight,
            base_experience: record.base_experience,
            stats,
            images,
            species_url: record.species.url,
        })
    }
}

pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
