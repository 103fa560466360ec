use crate::logger;
use crate::models::card::CatalogCard;
use crate::utils::errors::CatalogError;
use std::collections::HashMap;
use std::path::Path;

pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.jpg";

/// The static card pool offered by the deck builder, in file order.
#[derive(Debug, Default, Clone)]
pub struct CardCatalog {
    cards: Vec<CatalogCard>,
    by_name: HashMap<String, usize>,
}

impl CardCatalog {
    pub fn new(cards: Vec<CatalogCard>) -> Self {
        let mut by_name = HashMap::with_capacity(cards.len());
        for (index, card) in cards.iter().enumerate() {
            // first entry wins on duplicate names
            by_name.entry(card.name.clone()).or_insert(index);
        }

        Self { cards, by_name }
    }

    pub fn from_json(source: &str) -> Result<Self, CatalogError> {
        let cards: Vec<CatalogCard> = serde_json::from_str(source)?;
        Ok(Self::new(cards))
    }

    pub async fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let source = tokio::fs::read_to_string(path).await?;
        let catalog = Self::from_json(&source)?;
        logger!(
            INFO,
            "[DECK] Loaded {} cards from `{}`",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&CatalogCard> {
        self.by_name.get(name).map(|index| &self.cards[*index])
    }

    pub fn cards(&self) -> &[CatalogCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// First local image of the card, or the shared placeholder.
    pub fn image_for(&self, name: &str) -> &str {
        self.get(name)
            .and_then(|card| card.local_images.first())
            .map(String::as_str)
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Cards whose name contains `term`, ignoring case. An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&CatalogCard> {
        let term = term.trim().to_lowercase();
        self.cards
            .iter()
            .filter(|card| card.name.to_lowercase().contains(&term))
            .collect()
    }
}
