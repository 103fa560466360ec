use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Which half of the board a zone belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerSide {
    #[serde(rename = "self")]
    Own,
    Opponent,
}

impl FromStr for PlayerSide {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "self" | "own" => Ok(PlayerSide::Own),
            "opponent" => Ok(PlayerSide::Opponent),
            _ => Err(()),
        }
    }
}

/// The fixed zone vocabulary of a duel board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ZoneName {
    Field,
    M1,
    M2,
    M3,
    M4,
    M5,
    GY,
    Banished,
    Extra,
    S1,
    S2,
    S3,
    S4,
    S5,
    Deck,
}

impl ZoneName {
    pub const MONSTERS: [ZoneName; 5] = [
        ZoneName::M1,
        ZoneName::M2,
        ZoneName::M3,
        ZoneName::M4,
        ZoneName::M5,
    ];

    pub const SPELLS: [ZoneName; 5] = [
        ZoneName::S1,
        ZoneName::S2,
        ZoneName::S3,
        ZoneName::S4,
        ZoneName::S5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneName::Field => "Field",
            ZoneName::M1 => "M1",
            ZoneName::M2 => "M2",
            ZoneName::M3 => "M3",
            ZoneName::M4 => "M4",
            ZoneName::M5 => "M5",
            ZoneName::GY => "GY",
            ZoneName::Banished => "Banished",
            ZoneName::Extra => "Extra",
            ZoneName::S1 => "S1",
            ZoneName::S2 => "S2",
            ZoneName::S3 => "S3",
            ZoneName::S4 => "S4",
            ZoneName::S5 => "S5",
            ZoneName::Deck => "Deck",
        }
    }
}

impl Display for ZoneName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ZoneName {
    type Err = ();

    /// Parses a zone name, ignoring case. Names outside the vocabulary are rejected.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "FIELD" => Ok(ZoneName::Field),
            "M1" => Ok(ZoneName::M1),
            "M2" => Ok(ZoneName::M2),
            "M3" => Ok(ZoneName::M3),
            "M4" => Ok(ZoneName::M4),
            "M5" => Ok(ZoneName::M5),
            "GY" => Ok(ZoneName::GY),
            "BANISHED" => Ok(ZoneName::Banished),
            "EXTRA" => Ok(ZoneName::Extra),
            "S1" => Ok(ZoneName::S1),
            "S2" => Ok(ZoneName::S2),
            "S3" => Ok(ZoneName::S3),
            "S4" => Ok(ZoneName::S4),
            "S5" => Ok(ZoneName::S5),
            "DECK" => Ok(ZoneName::Deck),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ZoneId {
    pub side: PlayerSide,
    pub name: ZoneName,
}

impl ZoneId {
    pub fn new(side: PlayerSide, name: ZoneName) -> Self {
        Self { side, name }
    }
}

pub const COLUMNS: usize = 8;
pub const ROWS_PER_SIDE: usize = 2;

/// The abstract arrangement of zones for one side of the board.
///
/// Row 0 is the row nearest the center line. Slots are listed in the
/// own side's left-to-right order; the opponent side is mirrored at layout time.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardDescriptor {
    pub rows: [[Option<ZoneName>; COLUMNS]; ROWS_PER_SIDE],
}

impl BoardDescriptor {
    pub fn standard() -> Self {
        Self {
            rows: [
                [
                    Some(ZoneName::Field),
                    Some(ZoneName::M1),
                    Some(ZoneName::M2),
                    Some(ZoneName::M3),
                    Some(ZoneName::M4),
                    Some(ZoneName::M5),
                    Some(ZoneName::GY),
                    Some(ZoneName::Banished),
                ],
                [
                    Some(ZoneName::Extra),
                    Some(ZoneName::S1),
                    Some(ZoneName::S2),
                    Some(ZoneName::S3),
                    Some(ZoneName::S4),
                    Some(ZoneName::S5),
                    Some(ZoneName::Deck),
                    None,
                ],
            ],
        }
    }

    /// Iterates `(row, column, name)` over every non-empty slot.
    pub fn named_slots(&self) -> impl Iterator<Item = (usize, usize, ZoneName)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, slots)| {
            slots
                .iter()
                .enumerate()
                .filter_map(move |(column, slot)| slot.map(|name| (row, column, name)))
        })
    }
}

impl Default for BoardDescriptor {
    fn default() -> Self {
        BoardDescriptor::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_names_parse_case_insensitively() {
        assert_eq!("gy".parse::<ZoneName>(), Ok(ZoneName::GY));
        assert_eq!("Banished".parse::<ZoneName>(), Ok(ZoneName::Banished));
        assert_eq!("S9".parse::<ZoneName>(), Err(()));
        assert_eq!("".parse::<ZoneName>(), Err(()));
    }

    #[test]
    fn test_standard_descriptor_has_fifteen_named_slots() {
        let descriptor = BoardDescriptor::standard();
        assert_eq!(descriptor.named_slots().count(), 15);
        assert_eq!(descriptor.rows[1][7], None);
    }

    #[test]
    fn test_player_side_accepts_self() {
        assert_eq!("self".parse::<PlayerSide>(), Ok(PlayerSide::Own));
        assert_eq!("Opponent".parse::<PlayerSide>(), Ok(PlayerSide::Opponent));
    }
}
