use crate::assets::cache::Texture;
use crate::board::geometry::{Point, Rect, Viewport};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 1.0);

    pub const fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self { r, g, b, alpha }
    }

    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.alpha)
    }
}

/// Fill and outline of a zone rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    pub corner_radius: f64,
}

impl Default for ZoneStyle {
    fn default() -> Self {
        Self {
            fill: Color::rgba(0, 0, 0, 0.28),
            stroke: Color::rgba(255, 255, 255, 0.12),
            stroke_width: 2.0,
            corner_radius: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Start,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub font_size: f64,
    pub color: Color,
    pub anchor: Anchor,
}

impl TextStyle {
    pub fn centered(font_size: f64) -> Self {
        Self {
            font_size,
            color: Color::WHITE,
            anchor: Anchor::Middle,
        }
    }

    pub fn left(font_size: f64) -> Self {
        Self {
            anchor: Anchor::Start,
            ..Self::centered(font_size)
        }
    }
}

/// Something that can paint one frame of the board.
///
/// Geometry is decided before any of these calls; a backend only turns
/// rectangles, labels and sprites into pixels (or markup). Calls between
/// `begin_frame` and `end_frame` are in back-to-front order.
pub trait RenderBackend {
    fn begin_frame(&mut self, viewport: Viewport);
    fn draw_rectangle(&mut self, rect: Rect, style: &ZoneStyle);
    fn draw_label(&mut self, text: &str, at: Point, style: &TextStyle);
    fn draw_sprite(&mut self, texture: &Texture, rect: Rect);
    fn end_frame(&mut self);
}
