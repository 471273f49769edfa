use crate::collector::{Collection, PaginatedCollector};
use crate::record::{join_species, Character, Origin};
use crate::sources::{item_name, str_or, Listing, PageLayout, SeenNames, SourceAdapter};
use async_trait::async_trait;
use serde_json::Value;

/// Public Star Wars API people listing
pub const SWAPI_URL: &str = "https://swapi.dev/api/people/";

const LAYOUT: PageLayout = PageLayout {
    items_path: "results",
    next_path: "next",
};

/// Star Wars characters from SWAPI
///
/// Species arrive as URLs and are replaced by the `name` of the species
/// payload when it was resolved; unresolved URLs are kept as they are.
#[derive(Debug, Clone)]
pub struct SwapiSource {
    listing: Listing,
}

impl SwapiSource {
    /// Creates the adapter; `url` overrides the public entry point
    pub fn new(url: Option<String>, collector: PaginatedCollector) -> Self {
        let url = url.unwrap_or_else(|| SWAPI_URL.to_string());
        Self {
            listing: Listing::new("swapi", url, LAYOUT, collector),
        }
    }

    /// First page URL
    pub fn entry_point(&self) -> &str {
        self.listing.url()
    }
}

#[async_trait]
impl SourceAdapter for SwapiSource {
    fn name(&self) -> &str {
        self.listing.name()
    }

    fn origin(&self) -> Origin {
        Origin::StarWars
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
            if !seen.first_time(name) {
                continue;
            }

            let species = match item.get("species") {
                Some(Value::Array(refs)) => join_species(refs.iter().filter_map(|r| {
                    let reference = r.as_str()?;
                    Some(raw.details.field_str(reference, "name").unwrap_or(reference))
                })),
                Some(Value::String(single)) => join_species([single.as_str()]),
                _ => join_species(Vec::<&str>::new()),
            };

            characters.push(
                Character::new(name, Origin::StarWars, species)
                    .with_attribute("birth_year", str_or(item, "birth_year", "Unknown")),
            );
        }

        Ok(characters)
    }
}
