use super::deck::DeckList;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JoinRequest {
    pub game_id: String,
    pub name: String,
    pub deck: DeckList,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayCardRequest {
    pub game_id: String,
    pub card_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EndTurnRequest {
    pub game_id: String,
}

/// Non-fatal error pushed by the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorMessage {
    pub error: String,
}
