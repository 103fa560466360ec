use serde::{Deserialize, Serialize};

/// A card record from the static catalog used by the deck builder.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CatalogCard {
    pub name: String,
    #[serde(rename = "type", default)]
    pub card_type: String,
    #[serde(default)]
    pub local_images: Vec<String>,
}

impl CatalogCard {
    pub fn is_fusion(&self) -> bool {
        self.card_type.contains("Fusion")
    }
}
