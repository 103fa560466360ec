use super::descriptor::{BoardDescriptor, PlayerSide, ZoneId, COLUMNS, ROWS_PER_SIDE};
use super::geometry::{Rect, Viewport};
use crate::logger;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Tunable constants for the zone layout and card placement.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Gap between columns, between the two rows of a side, and between the two sides.
    pub gap: f64,
    /// Outer padding around the board.
    pub padding: f64,
    pub min_zone_width: f64,
    pub min_zone_height: f64,
    /// Zone height divided by zone width.
    pub aspect: f64,
    /// Margin between a zone's edge and the card drawn inside it.
    pub card_inset: f64,
    pub min_card_width: f64,
    pub min_card_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap: 12.0,
            padding: 24.0,
            min_zone_width: 32.0,
            min_zone_height: 44.0,
            aspect: 7.0 / 5.0,
            card_inset: 5.0,
            min_card_width: 6.0,
            min_card_height: 8.0,
        }
    }
}

/// Result of one layout pass: a rectangle for every named zone on both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    pub viewport: Viewport,
    pub zone_width: f64,
    pub zone_height: f64,
    pub scale: f64,
    zones: BTreeMap<ZoneId, Rect>,
}

impl BoardLayout {
    pub fn get(&self, zone: &ZoneId) -> Option<&Rect> {
        self.zones.get(zone)
    }

    pub fn zones(&self) -> impl Iterator<Item = (&ZoneId, &Rect)> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Maps the board descriptor onto pixel rectangles for the given viewport.
///
/// Zones are sized from the available width at the configured aspect ratio,
/// shrunk uniformly when the board is taller than the viewport (never grown),
/// and clamped to a minimum readable size. Clamping may make the board overflow
/// the viewport; that is accepted rather than reported.
///
/// The opponent side occupies the top band and is mirrored both ways, so row 0
/// of each side faces the center line and each side's first column sits on
/// opposite edges.
pub fn compute_layout(
    viewport: Viewport,
    descriptor: &BoardDescriptor,
    config: &LayoutConfig,
) -> BoardLayout {
    let columns = COLUMNS as f64;
    let rows = ROWS_PER_SIDE as f64;
    let width = viewport.width.max(1) as f64;
    let height = viewport.height.max(1) as f64;
    let gap = config.gap;
    let padding = config.padding;

    let base_width = ((width - 2.0 * padding - gap * (columns - 1.0)) / columns)
        .floor()
        .max(0.0);
    let base_height = (base_width * config.aspect).floor();

    let required_height = 2.0 * (rows * base_height + gap) + gap;
    let mut scale = 1.0;
    if required_height + 2.0 * padding > height {
        scale = ((height - 2.0 * padding) / required_height).clamp(0.0, 1.0);
    }

    let zone_width = (base_width * scale).floor().max(config.min_zone_width);
    let zone_height = (base_height * scale).floor().max(config.min_zone_height);

    let row_width = columns * zone_width + (columns - 1.0) * gap;
    let start_x = ((width - row_width) / 2.0).floor();
    let side_height = rows * zone_height + (rows - 1.0) * gap;
    let opponent_top = padding;
    let own_top = height - padding - side_height;

    let mut zones = BTreeMap::new();
    for (row, column, name) in descriptor.named_slots() {
        let own = Rect::new(
            start_x + column as f64 * (zone_width + gap),
            own_top + row as f64 * (zone_height + gap),
            zone_width,
            zone_height,
        );
        zones.insert(ZoneId::new(PlayerSide::Own, name), own);

        let mirrored_column = COLUMNS - 1 - column;
        let mirrored_row = ROWS_PER_SIDE - 1 - row;
        let opponent = Rect::new(
            start_x + mirrored_column as f64 * (zone_width + gap),
            opponent_top + mirrored_row as f64 * (zone_height + gap),
            zone_width,
            zone_height,
        );
        zones.insert(ZoneId::new(PlayerSide::Opponent, name), opponent);
    }

    if opponent_top + side_height + gap > own_top {
        logger!(
            DEBUG,
            "[LAYOUT] Board overflows {}x{} viewport (zone {zone_width}x{zone_height})",
            viewport.width,
            viewport.height
        );
    }

    logger!(
        DEBUG,
        "[LAYOUT] Computed {} zones for {}x{} (zone {zone_width}x{zone_height}, scale {scale:.3})",
        zones.len(),
        viewport.width,
        viewport.height
    );

    BoardLayout {
        viewport,
        zone_width,
        zone_height,
        scale,
        zones,
    }
}
