//! Canonical character records
//!
//! Every source adapter normalizes its raw items into [`Character`] values;
//! the aggregator merges them by name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Separator of the list-valued `species` field
pub const SPECIES_SEPARATOR: &str = ", ";

/// Species used when a source does not know one
pub const UNKNOWN_SPECIES: &str = "Unknown";

/// Franchise a character record was first discovered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    #[serde(rename = "Pokémon")]
    Pokemon,
    #[serde(rename = "Star Wars")]
    StarWars,
    #[serde(rename = "Rick and Morty")]
    RickAndMorty,
}

impl Origin {
    /// Human-readable label, as written to the output file
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pokemon => "Pokémon",
            Self::StarWars => "Star Wars",
            Self::RickAndMorty => "Rick and Morty",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A character record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Display name; also the merge key (exact match)
    pub name: String,

    /// Source the record came from (first one wins when merged)
    pub origin: Origin,

    /// ", "-separated species list
    pub species: String,

    /// Source-specific extras such as `birth_year` or `status`
    #[serde(default)]
    pub additional_attributes: Map<String, Value>,
}

impl Character {
    /// Creates a record with no additional attributes
    pub fn new(name: impl Into<String>, origin: Origin, species: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin,
            species: species.into(),
            additional_attributes: Map::new(),
        }
    }

    /// Adds one additional attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional_attributes.insert(key.into(), value.into());
        self
    }

    /// Iterates over the individual species entries
    pub fn species_list(&self) -> impl Iterator<Item = &str> {
        self.species.split(SPECIES_SEPARATOR)
    }
}

/// Joins species names, falling back to "Unknown" for an empty list
pub fn join_species<I, S>(species: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = species
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(SPECIES_SEPARATOR);

    if joined.is_empty() {
        UNKNOWN_SPECIES.to_string()
    } else {
        joined
    }
}
