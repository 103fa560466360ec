use crate::board::descriptor::{PlayerSide, ZoneName};
use crate::board::placement::PlacedCard;
use crate::models::settings::CommonAssets;
use crate::utils::errors::ProtocolError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_LP: i32 = 8000;

fn default_lp() -> i32 {
    DEFAULT_LP
}

/// A card image given either as one URL or as a list of URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Single(String),
    Many(Vec<String>),
}

impl ImageRef {
    pub fn first(&self) -> Option<&str> {
        let url = match self {
            ImageRef::Single(url) => Some(url.as_str()),
            ImageRef::Many(urls) => urls.first().map(String::as_str),
        };
        url.filter(|url| !url.is_empty())
    }
}

/// Card ids and names arrive as text or as bare numbers (passcodes, stats).
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Integer(number) => number.to_string(),
            TextOrNumber::Float(number) => number.to_string(),
        }
    }
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(String::from))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSnapshot {
    #[serde(default, alias = "card_id", deserialize_with = "optional_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(default, alias = "atk")]
    pub attack: Option<i32>,
    #[serde(default, alias = "def")]
    pub defense: Option<i32>,
    #[serde(default, rename = "type", alias = "card_type")]
    pub card_type: Option<String>,
    #[serde(default, alias = "local_images")]
    pub image: Option<ImageRef>,
}

impl CardSnapshot {
    /// Stable key for the card: its id, or its name when the server sent none.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image.as_ref().and_then(ImageRef::first)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PileSections {
    #[serde(default)]
    pub main: Vec<CardSnapshot>,
    #[serde(default)]
    pub extra: Vec<CardSnapshot>,
}

/// A face-down or stacked pile, reported as a count, a card list, or split
/// into main and extra sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pile {
    Count(u32),
    Cards(Vec<CardSnapshot>),
    Sections(PileSections),
}

impl Default for Pile {
    fn default() -> Self {
        Pile::Count(0)
    }
}

impl Pile {
    pub fn count(&self) -> usize {
        match self {
            Pile::Count(count) => *count as usize,
            Pile::Cards(cards) => cards.len(),
            Pile::Sections(sections) => sections.main.len() + sections.extra.len(),
        }
    }

    /// The last card of a listed pile, which is the one shown face up.
    pub fn top(&self) -> Option<&CardSnapshot> {
        match self {
            Pile::Cards(cards) => cards.last(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_lp")]
    pub lp: i32,
    #[serde(default)]
    pub hand: Vec<CardSnapshot>,
    #[serde(default)]
    pub field: Vec<Option<CardSnapshot>>,
    #[serde(default)]
    pub spell: Vec<Option<CardSnapshot>>,
    #[serde(default)]
    pub deck: Pile,
    #[serde(default)]
    pub extra: Pile,
    #[serde(default)]
    pub grave: Pile,
    #[serde(default, rename = "fieldSpell", alias = "field_spell")]
    pub field_spell: Option<CardSnapshot>,
}

/// Full game state pushed by the server.
///
/// Always replaces the previous snapshot whole. Construct through
/// [`GameStateSnapshot::from_payload`] or [`GameStateSnapshot::validated`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub turn: Option<String>,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub players: BTreeMap<String, PlayerSnapshot>,
}

/// The two halves of the table as seen by the local player.
#[derive(Debug, Clone, Copy)]
pub struct Sides<'a> {
    pub own_id: &'a str,
    pub own: &'a PlayerSnapshot,
    pub opponent: Option<(&'a str, &'a PlayerSnapshot)>,
}

impl<'a> Sides<'a> {
    pub fn player(&self, side: PlayerSide) -> Option<&'a PlayerSnapshot> {
        match side {
            PlayerSide::Own => Some(self.own),
            PlayerSide::Opponent => self.opponent.map(|(_, player)| player),
        }
    }
}

impl GameStateSnapshot {
    /// Decodes and validates a CBOR `game_state` payload.
    pub fn from_payload(payload: &[u8]) -> Result<Self, ProtocolError> {
        let snapshot: GameStateSnapshot = serde_cbor::from_slice(payload)
            .map_err(|e| ProtocolError::InvalidPayload("GAME_STATE".to_string(), e.to_string()))?;
        snapshot.validated()
    }

    /// Rejects snapshots without a game id and normalizes the turn.
    ///
    /// `turn` may name a player either by key or by display name; anything
    /// else is dropped to `None`.
    pub fn validated(mut self) -> Result<Self, ProtocolError> {
        if self.id.trim().is_empty() {
            return Err(ProtocolError::InvalidGameState(
                "snapshot has no game id".to_string(),
            ));
        }

        self.turn = self.turn.take().and_then(|turn| {
            if self.players.contains_key(&turn) {
                return Some(turn);
            }

            self.players
                .iter()
                .find(|(_, player)| player.name == turn)
                .map(|(key, _)| key.clone())
        });

        Ok(self)
    }

    pub fn turn_player(&self) -> Option<&PlayerSnapshot> {
        self.turn.as_ref().and_then(|turn| self.players.get(turn))
    }

    /// Splits the players into the local one and the opponent.
    ///
    /// The local player is the one named `username`, else the first listed.
    /// The opponent is the first other player; a lone player has none.
    pub fn sides(&self, username: &str) -> Option<Sides<'_>> {
        let (own_id, own) = self
            .players
            .iter()
            .find(|(_, player)| player.name == username)
            .or_else(|| self.players.iter().next())?;

        let opponent = self
            .players
            .iter()
            .find(|(key, _)| *key != own_id)
            .map(|(key, player)| (key.as_str(), player));

        Some(Sides {
            own_id: own_id.as_str(),
            own,
            opponent,
        })
    }

    pub fn is_turn_of(&self, username: &str) -> bool {
        match (self.started, self.turn.as_deref(), self.sides(username)) {
            (true, Some(turn), Some(sides)) => turn == sides.own_id,
            _ => false,
        }
    }

    /// Maps every card on the table to the zone it occupies.
    ///
    /// Monsters go to `M1..`, spells and traps to `S1..` in list order, the
    /// field spell to `Field` and the top of the graveyard to `GY`. Non-empty
    /// deck and extra piles show a card back. Overflowing slots produce zone
    /// names outside the board and end up hidden at placement.
    pub fn placed_cards(&self, username: &str, assets: &CommonAssets) -> Vec<PlacedCard> {
        let Some(sides) = self.sides(username) else {
            return Vec::new();
        };

        let mut placed = Vec::new();
        for side in [PlayerSide::Own, PlayerSide::Opponent] {
            if let Some(player) = sides.player(side) {
                place_player(&mut placed, player, side, assets);
            }
        }

        placed
    }
}

fn place_player(
    placed: &mut Vec<PlacedCard>,
    player: &PlayerSnapshot,
    side: PlayerSide,
    assets: &CommonAssets,
) {
    let face_up = |card: &CardSnapshot| {
        card.image_url()
            .unwrap_or(assets.default_card.as_str())
            .to_string()
    };

    let rows = [("M", &player.field), ("S", &player.spell)];
    for (prefix, row) in rows {
        for (i, card) in row.iter().enumerate() {
            if let Some(card) = card {
                let zone = format!("{prefix}{}", i + 1);
                placed.push(PlacedCard::new(card.key(), side, &zone, &face_up(card)));
            }
        }
    }

    if let Some(card) = &player.field_spell {
        placed.push(PlacedCard::new(
            card.key(),
            side,
            ZoneName::Field.as_str(),
            &face_up(card),
        ));
    }

    if let Some(card) = player.grave.top() {
        placed.push(PlacedCard::new(
            card.key(),
            side,
            ZoneName::GY.as_str(),
            &face_up(card),
        ));
    }

    for (zone, pile) in [(ZoneName::Deck, &player.deck), (ZoneName::Extra, &player.extra)] {
        if pile.count() > 0 {
            let id = format!("{}-{}", zone.as_str().to_lowercase(), side_tag(side));
            placed.push(PlacedCard::new(&id, side, zone.as_str(), &assets.card_back));
        }
    }
}

fn side_tag(side: PlayerSide) -> &'static str {
    match side {
        PlayerSide::Own => "self",
        PlayerSide::Opponent => "opponent",
    }
}
