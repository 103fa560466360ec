use serde::{Deserialize, Serialize};

/// A deck as card names, split into its three sections.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct DeckList {
    #[serde(default)]
    pub main: Vec<String>,
    #[serde(default)]
    pub extra: Vec<String>,
    #[serde(default)]
    pub side: Vec<String>,
}

impl DeckList {
    pub fn len(&self) -> usize {
        self.main.len() + self.extra.len() + self.side.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SaveDeckRequest {
    pub main: Vec<String>,
    pub extra: Vec<String>,
    pub side: Vec<String>,
    pub deck_name: String,
}
