use super::descriptor::PlayerSide;
use super::geometry::{Rect, Viewport};

const REFERENCE_WIDTH: f64 = 1200.0;
const REFERENCE_HEIGHT: f64 = 800.0;
const REFERENCE_CARD_WIDTH: f64 = 60.0;
const REFERENCE_CARD_HEIGHT: f64 = 85.0;
const SPACING_RATIO: f64 = 0.15;
const BOTTOM_MARGIN: f64 = 10.0;

/// Lays out a row of `count` hand cards for one side.
///
/// Cards scale with the viewport against a 1200x800 reference. The own hand sits
/// just above the bottom edge; the opponent hand is mirrored horizontally and
/// peeks in from the top edge.
pub fn hand_layout(viewport: Viewport, count: usize, side: PlayerSide) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }

    let width = viewport.width as f64;
    let height = viewport.height as f64;
    let card_width = (REFERENCE_CARD_WIDTH / REFERENCE_WIDTH * width).floor().max(1.0);
    let card_height = (REFERENCE_CARD_HEIGHT / REFERENCE_HEIGHT * height).floor().max(1.0);
    let spacing = (card_width * SPACING_RATIO).floor();

    let total = count as f64 * card_width + (count as f64 - 1.0) * spacing;
    let start_x = ((width - total) / 2.0).floor();
    let y = match side {
        PlayerSide::Own => height - card_height - BOTTOM_MARGIN,
        PlayerSide::Opponent => -(card_height / 2.0).floor(),
    };

    (0..count)
        .map(|index| {
            let x = start_x + index as f64 * (card_width + spacing);
            let x = match side {
                PlayerSide::Own => x,
                PlayerSide::Opponent => width - (x + card_width),
            };
            Rect::new(x, y, card_width, card_height)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_hand_has_no_slots() {
        assert!(hand_layout(Viewport::new(1200, 800), 0, PlayerSide::Own).is_empty());
    }

    #[test]
    fn test_own_hand_uses_reference_size_at_reference_viewport() {
        let cards = hand_layout(Viewport::new(1200, 800), 5, PlayerSide::Own);
        assert_eq!(cards.len(), 5);
        assert_eq!(cards[0].width, 60.0);
        assert_eq!(cards[0].height, 85.0);
        assert_eq!(cards[0].y, 705.0);
        assert_eq!(cards[1].x - cards[0].right(), 9.0);
    }

    #[test]
    fn test_opponent_hand_mirrors_own_hand() {
        let viewport = Viewport::new(1000, 700);
        let own = hand_layout(viewport, 4, PlayerSide::Own);
        let opponent = hand_layout(viewport, 4, PlayerSide::Opponent);

        for (mine, theirs) in own.iter().zip(opponent.iter()) {
            assert_eq!(theirs.x, 1000.0 - mine.right());
        }
        assert!(opponent[0].y < 0.0);
    }
}
