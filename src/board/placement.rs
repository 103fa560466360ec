use super::descriptor::{PlayerSide, ZoneId, ZoneName};
use super::geometry::Rect;
use super::layout::{BoardLayout, LayoutConfig};
use crate::logger;
use serde::Serialize;

/// A card the latest game state puts in a zone.
///
/// The zone is kept as the raw name reported by the server so that an
/// unknown name can still be carried (and hidden) instead of rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedCard {
    pub id: String,
    pub side: PlayerSide,
    pub zone: String,
    pub image: String,
}

impl PlacedCard {
    pub fn new(id: &str, side: PlayerSide, zone: &str, image: &str) -> Self {
        Self {
            id: id.to_string(),
            side,
            zone: zone.to_string(),
            image: image.to_string(),
        }
    }

    pub fn zone_id(&self) -> Option<ZoneId> {
        let name = self.zone.parse::<ZoneName>().ok()?;
        Some(ZoneId::new(self.side, name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Placement {
    Visible(Rect),
    Hidden,
}

impl Placement {
    pub fn is_visible(&self) -> bool {
        matches!(self, Placement::Visible(_))
    }
}

/// Positions a card inside its zone, or hides it when the zone is not laid out.
///
/// A missing layout, an unknown zone name, or a zone absent from the layout all
/// yield `Placement::Hidden`; the card may reappear on a later pass.
pub fn place_card(card: &PlacedCard, layout: Option<&BoardLayout>, config: &LayoutConfig) -> Placement {
    let rect = match (card.zone_id(), layout) {
        (Some(zone), Some(layout)) => layout.get(&zone),
        _ => None,
    };

    let Some(rect) = rect else {
        logger!(
            DEBUG,
            "[LAYOUT] Card `{}` hidden, zone `{}` is not laid out",
            card.id,
            card.zone
        );
        return Placement::Hidden;
    };

    let inset = config.card_inset.max(0.0);
    Placement::Visible(Rect::new(
        rect.x + inset,
        rect.y + inset,
        (rect.width - 2.0 * inset).max(config.min_card_width.max(0.0)),
        (rect.height - 2.0 * inset).max(config.min_card_height.max(0.0)),
    ))
}

/// Places every card against the same layout. Always a full pass, never incremental.
pub fn place_all<'a>(
    cards: &'a [PlacedCard],
    layout: Option<&BoardLayout>,
    config: &LayoutConfig,
) -> Vec<(&'a PlacedCard, Placement)> {
    cards
        .iter()
        .map(|card| (card, place_card(card, layout, config)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::descriptor::BoardDescriptor;
    use crate::board::geometry::Viewport;
    use crate::board::layout::compute_layout;

    fn board() -> BoardLayout {
        compute_layout(
            Viewport::new(1200, 800),
            &BoardDescriptor::standard(),
            &LayoutConfig::default(),
        )
    }

    #[test]
    fn test_card_is_inset_inside_its_zone() {
        let board = board();
        let card = PlacedCard::new("c1", PlayerSide::Own, "M1", "/img/c1.png");
        let zone = board.get(&ZoneId::new(PlayerSide::Own, ZoneName::M1)).unwrap();

        let placement = place_card(&card, Some(&board), &LayoutConfig::default());
        assert_eq!(
            placement,
            Placement::Visible(Rect::new(zone.x + 5.0, zone.y + 5.0, zone.width - 10.0, zone.height - 10.0))
        );
    }

    #[test]
    fn test_unknown_zone_is_hidden() {
        let board = board();
        let card = PlacedCard::new("c1", PlayerSide::Own, "S9", "/img/c1.png");
        assert_eq!(
            place_card(&card, Some(&board), &LayoutConfig::default()),
            Placement::Hidden
        );
    }

    #[test]
    fn test_missing_layout_hides_then_shows_again() {
        let card = PlacedCard::new("c1", PlayerSide::Opponent, "gy", "/img/c1.png");
        assert!(!place_card(&card, None, &LayoutConfig::default()).is_visible());

        let board = board();
        assert!(place_card(&card, Some(&board), &LayoutConfig::default()).is_visible());
    }

    #[test]
    fn test_large_inset_never_produces_negative_sizes() {
        let board = board();
        let config = LayoutConfig {
            card_inset: 500.0,
            ..LayoutConfig::default()
        };
        let card = PlacedCard::new("c1", PlayerSide::Own, "Deck", "/img/c1.png");

        match place_card(&card, Some(&board), &config) {
            Placement::Visible(rect) => {
                assert_eq!(rect.width, 6.0);
                assert_eq!(rect.height, 8.0);
            }
            Placement::Hidden => panic!("deck zone should be laid out"),
        }
    }

    #[test]
    fn test_place_all_keeps_card_order() {
        let board = board();
        let cards = vec![
            PlacedCard::new("a", PlayerSide::Own, "M2", "/a.png"),
            PlacedCard::new("b", PlayerSide::Own, "nowhere", "/b.png"),
        ];
        let placed = place_all(&cards, Some(&board), &LayoutConfig::default());
        assert_eq!(placed[0].0.id, "a");
        assert!(placed[0].1.is_visible());
        assert_eq!(placed[1].1, Placement::Hidden);
    }
}
