use crate::collector::{Collection, PaginatedCollector};
use crate::json::lookup_str;
use crate::record::{join_species, Character, Origin};
use crate::sources::{item_name, Listing, PageLayout, SeenNames, SourceAdapter};
use async_trait::async_trait;
use serde_json::Value;

/// Public PokéAPI listing, large pages to keep the chain short
pub const POKEAPI_URL: &str = "https://pokeapi.co/api/v2/pokemon?limit=1000";

const LAYOUT: PageLayout = PageLayout {
    items_path: "results",
    next_path: "next",
};

/// Pokémon from PokéAPI
///
/// Listing items only carry `name` and `url`; types and base experience come
/// from the resolved detail payload behind `url`.
#[derive(Debug, Clone)]
pub struct PokeApiSource {
    listing: Listing,
}

impl PokeApiSource {
    /// Creates the adapter; `url` overrides the public entry point
    pub fn new(url: Option<String>, collector: PaginatedCollector) -> Self {
        let url = url.unwrap_or_else(|| POKEAPI_URL.to_string());
        Self {
            listing: Listing::new("pokeapi", url, LAYOUT, collector),
        }
    }

    /// First page URL
    pub fn entry_point(&self) -> &str {
        self.listing.url()
    }
}

/// Upper-cases the first character and lower-cases the rest
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl SourceAdapter for PokeApiSource {
    fn name(&self) -> &str {
        self.listing.name()
    }

    fn origin(&self) -> Origin {
        Origin::Pokemon
    }

    async fn fetch_data(&self) -> crate::Result<Collection> {
        self.listing.fetch().await
    }

    fn normalize_data(&self, raw: &Collection) -> crate::Result<Vec<Character>> {
        let mut seen = SeenNames::default();
        let mut characters = Vec::with_capacity(raw.items.len());

        for item in &raw.items {
            let Some(name) = item_name(self.name(), item) else {
                continue;
            };
            let name = capitalize(name);
            if !seen.first_time(&name) {
                continue;
            }

            let detail = item
                .get("url")
                .and_then(Value::as_str)
                .and_then(|url| raw.details.get(url));

            let types = detail
                .and_then(|d| d.get("types"))
                .and_then(Value::as_array)
                .map(|types| {
                    types
                        .iter()
                        .map(|t| lookup_str(t, "type.name").unwrap_or("Unknown"))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();

            let base_experience = detail
                .and_then(|d| d.get("base_experience"))
                .filter(|v| !v.is_null())
                .or_else(|| item.get("base_experience").filter(|v| !v.is_null()))
                .cloned()
                .unwrap_or_else(|| Value::from(0));

            characters.push(
                Character::new(name, Origin::Pokemon, join_species(types))
                    .with_attribute("base_experience", base_experience),
            );
        }

        Ok(characters)
    }
}
