use schema::SpeciesRecord;
use serde::{Deserialize, Serialize};

/// Fallback shown when no flavor text matches the preferred languages.
pub const NO_DESCRIPTION: &str = "No description available";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorText {
    pub language: String,
    pub text: String,
}

/// Species metadata needed by the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesInfo {
    pub flavor_texts: Vec<FlavorText>,
    pub evolution_chain_url: Option<String>,
}

impl From<SpeciesRecord> for SpeciesInfo {
    fn from(record: SpeciesRecord) -> Self {
        Self {
            flavor_texts: record
                .flavor_text_entries
                .into_iter()
                .map(|entry| FlavorText {
                    language: entry.language.name,
                    text: entry.flavor_text,
                })
                .collect(),
            evolution_chain_url: record.evolution_chain.map(|chain| chain.url),
        }
    }
}

impl SpeciesInfo {
    /// First flavor text, in API order, whose language is any of `languages`.
    ///
    /// Form feeds and line breaks embedded by the games are turned into spaces.
    pub fn description(&self, languages: &[String]) -> Option<String> {
        self.flavor_texts
            .iter()
            .find(|entry| languages.iter().any(|lang| *lang == entry.language))
            .map(|entry| normalize_flavor_text(&entry.text))
    }
}

fn normalize_flavor_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{c}' | '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}
