//! Merging of same-named records

use crate::record::{Character, SPECIES_SEPARATOR};
use std::collections::HashMap;

/// Unions two species lists, keeping first-seen order and dropping repeats
pub fn merge_species(existing: &str, incoming: &str) -> String {
    let mut merged: Vec<&str> = Vec::new();
    for species in existing
        .split(SPECIES_SEPARATOR)
        .chain(incoming.split(SPECIES_SEPARATOR))
    {
        if !species.is_empty() && !merged.contains(&species) {
            merged.push(species);
        }
    }
    merged.join(SPECIES_SEPARATOR)
}

/// Merges `incoming` into `existing`
///
/// Name and origin of the existing record are kept. Incoming attributes
/// overwrite existing ones on key collision.
pub fn merge_into(existing: &mut Character, incoming: Character) {
    existing.species = merge_species(&existing.species, &incoming.species);
    existing.additional_attributes.extend(incoming.additional_attributes);
}

/// Name-keyed record set for one aggregation run
#[derive(Debug, Default)]
pub struct CharacterMap {
    records: HashMap<String, Character>,
}

impl CharacterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new name or merges into the record already holding it
    pub fn add(&mut self, character: Character) {
        match self.records.get_mut(&character.name) {
            Some(existing) => merge_into(existing, character),
            None => {
                self.records.insert(character.name.clone(), character);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the map, returning records sorted by case-folded name
    pub fn into_sorted(self) -> Vec<Character> {
        let mut characters: Vec<Character> = self.records.into_values().collect();
        characters.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        characters
    }
}

impl Extend<Character> for CharacterMap {
    fn extend<T: IntoIterator<Item = Character>>(&mut self, iter: T) {
        for character in iter {
            self.add(character);
        }
    }
}
