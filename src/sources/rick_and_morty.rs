use crate::collector::{Collection, PaginatedCollector};
use crate::record::{Character, Origin, UNKNOWN_SPECIES};
use crate::sources::{item_name, str_or, Listing, PageLayout, SeenNames, SourceAdapter};
use async_trait::async_trait;

/// Public Rick and Morty API character listing
pub const RICK_AND_MORTY_URL: &str = "https://rickandmortyapi.com/api/character";

const LAYOUT: PageLayout = PageLayout {
    items_path: "results",
    next_path: "info.next",
};

/// Characters from the Rick and Morty API
#[derive(Debug, Clone)]
pub struct RickAndMortySource {
    listing: Listing,
}

impl RickAndMortySource {
    /// Creates the adapter; `url` overrides the public entry point
    pub fn new(url: Option<String>, collector: PaginatedCollector) -> Self {
        let url = url.unwrap_or_else(|| RICK_AND_MORTY_URL.to_string());
        Self {
            listing: Listing::new("rick-and-morty", url, LAYOUT, collector),
        }
    }

    /// First page URL
    pub fn entry_point(&self) -> &str {
        self.listing.url()
    }
}

#[async_trait]
impl SourceAdapter for RickAndMortySource {
    fn name(&self) -> &str {
        self.listing.name()
    }

    fn origin(&self) -> Origin {
        Origin::RickAndMorty
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

            characters.push(
                Character::new(
                    name,
                    Origin::RickAndMorty,
                    str_or(item, "species", UNKNOWN_SPECIES),
                )
                .with_attribute("status", str_or(item, "status", "Unknown")),
            );
        }

        Ok(characters)
    }
}
