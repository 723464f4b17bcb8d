use crate::NamedResource;
use serde::{Deserialize, Serialize};

/// Evolution chain resource (`GET <evolution-chain-url>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionChainRecord {
    #[serde(default)]
    pub id: u32,
    pub chain: ChainLink,
}

/// One node of an evolution chain: a species plus the species it can evolve into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub is_baby: bool,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

impl ChainLink {
    /// The stage followed when only one evolution is shown.
    pub fn first_child(&self) -> Option<&ChainLink> {
        self.evolves_to.first()
    }
}
