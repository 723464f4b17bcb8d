use crate::entry::Entry;
use schema::PokemonType;
use std::fmt;
use std::str::FromStr;

/// Type selector of the catalog view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TypeFilter {
    #[default]
    All,
    Only(PokemonType),
}

impl TypeFilter {
    pub fn accepts(&self, entry: &Entry) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(kind) => entry.has_type(*kind),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => write!(f, "all"),
            TypeFilter::Only(kind) => write!(f, "{}", kind),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            Ok(TypeFilter::All)
        } else {
            s.parse::<PokemonType>().map(TypeFilter::Only)
        }
    }
}

impl TypeFilter {
    /// Every accepted name: `all` followed by each type.
    pub fn choices() -> Vec<String> {
        std::iter::once("all".to_string())
            .chain(PokemonType::all().iter().map(|kind| kind.to_string()))
            .collect()
    }
}

/// Lower-case and trim a raw search box value.
pub fn normalize_search(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Type selection plus search term. The term is always stored normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    kind: TypeFilter,
    search: String,
}

impl CatalogFilter {
    pub fn new(kind: TypeFilter, search: &str) -> Self {
        Self {
            kind,
            search: normalize_search(search),
        }
    }

    pub fn kind(&self) -> TypeFilter {
        self.kind
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn with_kind(self, kind: TypeFilter) -> Self {
        Self { kind, ..self }
    }

    pub fn with_search(self, search: &str) -> Self {
        Self {
            search: normalize_search(search),
            ..self
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.kind == TypeFilter::All && self.search.is_empty()
    }

    /// `(All or has type) and (name contains term or id contains term)`.
    pub fn matches(&self, entry: &Entry) -> bool {
        self.kind.accepts(entry) && self.matches_search(entry)
    }

    fn matches_search(&self, entry: &Entry) -> bool {
        if self.search.is_empty() {
            return true;
        }
        entry.name.to_lowercase().contains(&self.search)
            || entry.id.to_string().contains(&self.search)
    }
}

/// Derive the visible subset of `entries`, preserving their order.
pub fn filter_entries<'a>(entries: &'a [Entry], filter: &CatalogFilter) -> Vec<&'a Entry> {
    entries.iter().filter(|entry| filter.matches(entry)).collect()
}
