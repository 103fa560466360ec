use super::backend::{RenderBackend, TextStyle, ZoneStyle};
use crate::assets::cache::Texture;
use crate::board::geometry::{Point, Rect, Viewport};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Rectangle { rect: Rect, style: ZoneStyle },
    Label { text: String, at: Point, style: TextStyle },
    Sprite { url: String, rect: Rect, placeholder: bool },
}

/// Backend that keeps the draw calls of the last frame instead of painting them.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    pub viewport: Option<Viewport>,
    pub commands: Vec<DrawCommand>,
    pub frames: usize,
    in_frame: bool,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn sprites(&self) -> Vec<(&str, Rect)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Sprite { url, rect, .. } => Some((url.as_str(), *rect)),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.commands)
    }
}

impl RenderBackend for FrameRecorder {
    fn begin_frame(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        self.commands.clear();
        self.in_frame = true;
    }

    fn draw_rectangle(&mut self, rect: Rect, style: &ZoneStyle) {
        self.commands.push(DrawCommand::Rectangle { rect, style: *style });
    }

    fn draw_label(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Label {
            text: text.to_string(),
            at,
            style: *style,
        });
    }

    fn draw_sprite(&mut self, texture: &Texture, rect: Rect) {
        self.commands.push(DrawCommand::Sprite {
            url: texture.url().to_string(),
            rect,
            placeholder: texture.is_placeholder(),
        });
    }

    fn end_frame(&mut self) {
        if self.in_frame {
            self.frames += 1;
            self.in_frame = false;
        }
    }
}
