use super::backend::{RenderBackend, TextStyle, ZoneStyle};
use crate::assets::cache::TextureHandle;
use crate::board::descriptor::{PlayerSide, ZoneName};
use crate::board::geometry::{Point, Rect, Viewport};
use crate::board::hand::hand_layout;
use crate::board::layout::{BoardLayout, LayoutConfig};
use crate::board::placement::{place_all, Placement};
use crate::game::state::{GameStateSnapshot, Sides};
use crate::models::settings::CommonAssets;
use std::collections::{BTreeSet, HashMap};

const WAITING_FONT: f64 = 28.0;
const STATUS_FONT: f64 = 18.0;
const MIN_LABEL_FONT: f64 = 12.0;
const LABEL_RATIO: f64 = 0.12;

/// Everything one frame of the board is drawn from.
pub struct BoardView<'a> {
    pub viewport: Viewport,
    pub layout: &'a BoardLayout,
    pub config: &'a LayoutConfig,
    pub state: Option<&'a GameStateSnapshot>,
    pub username: &'a str,
    pub assets: &'a CommonAssets,
    pub textures: &'a HashMap<String, TextureHandle>,
    pub notice: Option<&'a str>,
}

impl BoardView<'_> {
    /// Draws a whole frame, back to front: mat, zones, cards, hands, then text.
    ///
    /// Images missing from `textures` are skipped for this frame.
    pub fn draw<B: RenderBackend>(&self, backend: &mut B) {
        backend.begin_frame(self.viewport);

        self.draw_sprite(
            backend,
            &self.assets.mat,
            Rect::new(
                0.0,
                0.0,
                self.viewport.width as f64,
                self.viewport.height as f64,
            ),
        );

        let sides = self.state.and_then(|state| state.sides(self.username));
        self.draw_zones(backend, sides);

        if let (Some(state), Some(sides)) = (self.state, sides) {
            let placed = state.placed_cards(self.username, self.assets);
            for (card, placement) in place_all(&placed, Some(self.layout), self.config) {
                if let Placement::Visible(rect) = placement {
                    self.draw_sprite(backend, &card.image, rect);
                }
            }

            self.draw_hands(backend, sides);
        }

        self.draw_status(backend, sides);
        backend.end_frame();
    }

    fn draw_zones<B: RenderBackend>(&self, backend: &mut B, sides: Option<Sides<'_>>) {
        let style = ZoneStyle::default();
        for (zone, rect) in self.layout.zones() {
            backend.draw_rectangle(*rect, &style);

            let player = sides.and_then(|sides| sides.player(zone.side));
            let label = match (zone.name, player) {
                (ZoneName::Deck, Some(player)) => format!("Deck ({})", player.deck.count()),
                (ZoneName::GY, Some(player)) => format!("GY ({})", player.grave.count()),
                (ZoneName::Extra, Some(player)) => format!("Extra ({})", player.extra.count()),
                (ZoneName::Field, Some(player)) => match &player.field_spell {
                    Some(card) if !card.name.is_empty() => card.name.clone(),
                    _ => zone.name.to_string(),
                },
                (name, _) => name.to_string(),
            };

            let font_size = (rect.width * LABEL_RATIO).floor().max(MIN_LABEL_FONT);
            backend.draw_label(&label, rect.center(), &TextStyle::centered(font_size));
        }
    }

    fn draw_hands<B: RenderBackend>(&self, backend: &mut B, sides: Sides<'_>) {
        let own = &sides.own.hand;
        let rects = hand_layout(self.viewport, own.len(), PlayerSide::Own);
        for (card, rect) in own.iter().zip(rects) {
            let url = card.image_url().unwrap_or(self.assets.default_card.as_str());
            self.draw_sprite(backend, url, rect);
        }

        if let Some((_, opponent)) = sides.opponent {
            let rects = hand_layout(self.viewport, opponent.hand.len(), PlayerSide::Opponent);
            for rect in rects {
                self.draw_sprite(backend, &self.assets.card_back, rect);
            }
        }
    }

    fn draw_status<B: RenderBackend>(&self, backend: &mut B, sides: Option<Sides<'_>>) {
        let center = self.viewport.center();
        let padding = self.config.padding;

        match (self.state, sides) {
            (None, _) => {
                backend.draw_label(
                    "Waiting for players...",
                    center,
                    &TextStyle::centered(WAITING_FONT),
                );
            }
            (Some(state), _) if !state.started => {
                backend.draw_label(
                    "Waiting for another player...",
                    center,
                    &TextStyle::centered(WAITING_FONT),
                );
            }
            (Some(state), sides) => {
                if let Some(player) = state.turn_player() {
                    backend.draw_label(
                        &format!("Current Turn: {}", player.name),
                        Point {
                            x: padding,
                            y: center.y,
                        },
                        &TextStyle::left(STATUS_FONT),
                    );
                }

                if let Some(sides) = sides {
                    let bottom = self.viewport.height as f64 - padding / 2.0;
                    backend.draw_label(
                        &format!("{} LP: {}", sides.own.name, sides.own.lp),
                        Point { x: padding, y: bottom },
                        &TextStyle::left(STATUS_FONT),
                    );
                    if let Some((_, opponent)) = sides.opponent {
                        backend.draw_label(
                            &format!("{} LP: {}", opponent.name, opponent.lp),
                            Point {
                                x: padding,
                                y: padding / 2.0,
                            },
                            &TextStyle::left(STATUS_FONT),
                        );
                    }
                }
            }
        }

        if let Some(notice) = self.notice {
            backend.draw_label(
                notice,
                Point {
                    x: center.x,
                    y: center.y + WAITING_FONT,
                },
                &TextStyle::centered(STATUS_FONT),
            );
        }
    }

    fn draw_sprite<B: RenderBackend>(&self, backend: &mut B, url: &str, rect: Rect) {
        if let Some(texture) = self.textures.get(url) {
            backend.draw_sprite(texture, rect);
        }
    }
}

/// Every image URL a frame of `state` may draw, without duplicates.
pub fn needed_images(
    state: Option<&GameStateSnapshot>,
    username: &str,
    assets: &CommonAssets,
) -> Vec<String> {
    let mut urls = BTreeSet::new();
    urls.insert(assets.mat.clone());
    urls.insert(assets.card_back.clone());
    urls.insert(assets.default_card.clone());

    if let Some(state) = state {
        for card in state.placed_cards(username, assets) {
            urls.insert(card.image);
        }

        if let Some(sides) = state.sides(username) {
            for card in &sides.own.hand {
                if let Some(url) = card.image_url() {
                    urls.insert(url.to_string());
                }
            }
        }
    }

    urls.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::cache::Texture;
    use crate::assets::fetcher::ImageData;
    use crate::board::descriptor::BoardDescriptor;
    use crate::board::layout::compute_layout;
    use crate::game::state::tests::two_player_state;
    use crate::render::recorder::FrameRecorder;
    use std::sync::Arc;

    fn textures(urls: &[String]) -> HashMap<String, TextureHandle> {
        urls.iter()
            .map(|url| {
                let texture = if url.contains("pot") {
                    Texture::Placeholder { url: url.clone() }
                } else {
                    Texture::Image(ImageData {
                        url: url.clone(),
                        content_type: Some("image/png".to_string()),
                        bytes: vec![0],
                    })
                };
                (url.clone(), Arc::new(texture))
            })
            .collect()
    }

    fn record(state: Option<&GameStateSnapshot>, notice: Option<&str>) -> FrameRecorder {
        let viewport = Viewport::new(1200, 800);
        let config = LayoutConfig::default();
        let layout = compute_layout(viewport, &BoardDescriptor::standard(), &config);
        let assets = CommonAssets::default();
        let textures = textures(&needed_images(state, "yugi", &assets));

        let view = BoardView {
            viewport,
            layout: &layout,
            config: &config,
            state,
            username: "yugi",
            assets: &assets,
            textures: &textures,
            notice,
        };

        let mut recorder = FrameRecorder::new();
        view.draw(&mut recorder);
        recorder
    }

    #[test]
    fn test_empty_board_waits_for_players() {
        let recorder = record(None, None);
        let labels = recorder.labels();

        assert!(labels.contains(&"Waiting for players..."));
        assert!(labels.contains(&"Deck"));
        assert_eq!(recorder.frames, 1);

        let (first_url, first_rect) = recorder.sprites()[0];
        assert_eq!(first_url, CommonAssets::default().mat);
        assert_eq!(first_rect, Rect::new(0.0, 0.0, 1200.0, 800.0));
    }

    #[test]
    fn test_unstarted_game_waits_for_opponent() {
        let mut state = two_player_state();
        state.started = false;

        let recorder = record(Some(&state), None);
        assert!(recorder.labels().contains(&"Waiting for another player..."));
        assert!(!recorder.labels().iter().any(|label| label.starts_with("Current Turn")));
    }

    #[test]
    fn test_zone_labels_carry_counts() {
        let recorder = record(Some(&two_player_state()), Some("Game is full"));
        let labels = recorder.labels();

        assert!(labels.contains(&"Deck (35)"));
        assert!(labels.contains(&"GY (1)"));
        assert!(labels.contains(&"Extra (2)"));
        assert!(labels.contains(&"Yami"));
        assert!(labels.contains(&"Current Turn: yugi"));
        assert!(labels.contains(&"yugi LP: 7200"));
        assert!(labels.contains(&"kaiba LP: 8000"));
        assert!(labels.contains(&"Game is full"));
    }

    #[test]
    fn test_cards_and_hands_are_drawn() {
        let recorder = record(Some(&two_player_state()), None);
        let sprites = recorder.sprites();
        let assets = CommonAssets::default();

        // m1 sits inset inside own M1, which is the second column of the own band
        let dark_magician = sprites.iter().find(|(url, _)| *url == "/img/dm.jpg").unwrap();
        assert_eq!(dark_magician.1, Rect::new(46.0 + 140.0 + 5.0, 406.0 + 5.0, 118.0, 169.0));

        assert!(sprites.iter().any(|(url, _)| *url == "/img/sangan.jpg"));
        assert!(sprites.iter().any(|(url, rect)| *url == assets.card_back && rect.y < 0.0));

        // the graveyard top resolved to a placeholder and is still forwarded
        assert!(sprites.iter().any(|(url, _)| *url == "/img/pot.jpg"));
    }

    #[test]
    fn test_needed_images_are_deduplicated() {
        let state = two_player_state();
        let urls = needed_images(Some(&state), "yugi", &CommonAssets::default());

        let mut sorted = urls.clone();
        sorted.dedup();
        assert_eq!(sorted, urls);
        assert!(urls.contains(&"/img/sangan.jpg".to_string()));
        assert!(urls.contains(&CommonAssets::default().mat));
    }
}
