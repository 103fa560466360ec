use super::backend::{Anchor, RenderBackend, TextStyle, ZoneStyle};
use crate::assets::cache::Texture;
use crate::board::geometry::{Point, Rect, Viewport};
use crate::logger;
use std::fmt::Write;
use std::path::Path;

/// Renders frames as standalone SVG documents with every image inlined.
#[derive(Debug, Default)]
pub struct SvgBackend {
    viewport: Viewport,
    body: String,
    document: Option<String>,
}

impl SvgBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last completed frame.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Writes the last frame to `path`. A failed write is logged and the
    /// previous file is left as it was.
    pub async fn save(&self, path: &Path) -> bool {
        let Some(document) = self.document() else {
            return false;
        };

        match tokio::fs::write(path, document).await {
            Ok(()) => {
                logger!(DEBUG, "[RENDER] Wrote `{}`", path.display());
                true
            }
            Err(error) => {
                logger!(ERROR, "[RENDER] Could not write `{}` ({error})", path.display());
                false
            }
        }
    }
}

impl RenderBackend for SvgBackend {
    fn begin_frame(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.body.clear();
    }

    fn draw_rectangle(&mut self, rect: Rect, style: &ZoneStyle) {
        let _ = writeln!(
            self.body,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            style.corner_radius,
            style.fill.css(),
            style.stroke.css(),
            style.stroke_width
        );
    }

    fn draw_label(&mut self, text: &str, at: Point, style: &TextStyle) {
        let anchor = match style.anchor {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
        };
        let _ = writeln!(
            self.body,
            r#"  <text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="{anchor}" dominant-baseline="middle">{}</text>"#,
            at.x,
            at.y,
            style.font_size,
            style.color.css(),
            escape(text)
        );
    }

    fn draw_sprite(&mut self, texture: &Texture, rect: Rect) {
        // 1x1 transparent stand-in, nothing to show
        let Texture::Image(image) = texture else {
            return;
        };

        let _ = writeln!(
            self.body,
            r#"  <image href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none"/>"#,
            image.data_uri(),
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );
    }

    fn end_frame(&mut self) {
        let Viewport { width, height } = self.viewport;
        self.document = Some(format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n{}</svg>\n",
            self.body
        ));
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
