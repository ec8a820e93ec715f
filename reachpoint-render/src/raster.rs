use std::fs;
use std::path::Path;

use ab_glyph::{point, Font, FontVec, Glyph, GlyphId, PxScale, ScaleFont};
use anyhow::{Context, Result};
use log::info;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Transform};

/// Software rasterizer for the task's three screens: black, a red
/// target circle, and centred instruction text. Callers draw into the
/// canvas and copy `data()` to the presentation surface.
#[derive(Debug)]
pub struct Rasterizer {
    canvas: Pixmap,
    font: FontVec,
    font_px: f32,
    stimulus_radius_px: f32,
    wrap_width_px: f32,
}

impl Rasterizer {
    pub fn new(
        width: u32,
        height: u32,
        font_path: &Path,
        font_px: f32,
        stimulus_radius_px: f32,
        wrap_width_px: u32,
    ) -> Result<Self> {
        let mut canvas = Pixmap::new(width, height).context("display surface has no pixels")?;
        canvas.fill(Color::BLACK);

        let bytes = fs::read(font_path)
            .with_context(|| format!("reading font {}", font_path.display()))?;
        let font = FontVec::try_from_vec(bytes)
            .with_context(|| format!("parsing font {}", font_path.display()))?;
        info!(
            "rasterizer ready: {}x{}, font {} at {:.0} px",
            width,
            height,
            font_path.display(),
            font_px
        );

        Ok(Self {
            canvas,
            font,
            font_px,
            stimulus_radius_px,
            wrap_width_px: wrap_width_px as f32,
        })
    }

    /// Raw premultiplied RGBA bytes of the canvas.
    pub fn data(&self) -> &[u8] {
        self.canvas.data()
    }

    pub fn clear(&mut self) {
        self.canvas.fill(Color::BLACK);
    }

    /// Draws the reach target centred at `at`, in pixels.
    pub fn draw_stimulus(&mut self, at: (f32, f32)) {
        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(255, 0, 0, 255));
        paint.anti_alias = true;

        let mut pb = PathBuilder::new();
        pb.push_circle(at.0, at.1, self.stimulus_radius_px);
        self.canvas.fill_path(
            &pb.finish().unwrap(),
            &paint,
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    /// Draws `text` centred on the canvas, wrapping each paragraph at
    /// the wrap width. Blank lines in the input are preserved.
    pub fn draw_text_block(&mut self, text: &str) {
        let scale = PxScale::from(self.font_px);
        let lines = wrap_lines(&self.font, scale, text, self.wrap_width_px);

        let sf = self.font.as_scaled(scale);
        let line_advance = sf.height() + sf.line_gap();
        let ascent = sf.ascent();
        let block_height = line_advance * lines.len() as f32;
        let top = (self.canvas.height() as f32 - block_height) / 2.0;
        let canvas_width = self.canvas.width() as f32;

        // Lay out every glyph of the block in canvas coordinates
        let mut glyphs = Vec::<Glyph>::new();
        for (index, line) in lines.iter().enumerate() {
            let baseline = top + line_advance * index as f32 + ascent;
            let mut pen_x = (canvas_width - line_width(&self.font, scale, line)) / 2.0;
            let mut prev: Option<GlyphId> = None;
            for ch in line.chars() {
                let id = self.font.glyph_id(ch);
                if let Some(prev) = prev {
                    pen_x += sf.kern(prev, id);
                }
                glyphs.push(Glyph {
                    id,
                    scale,
                    position: point(pen_x, baseline),
                });
                pen_x += sf.h_advance(id);
                prev = Some(id);
            }
        }

        let font = &self.font;
        let width = self.canvas.width() as i32;
        let height = self.canvas.height() as i32;
        let stride = width as usize;
        let dst = self.canvas.pixels_mut();

        for glyph in glyphs {
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|x, y, coverage| {
                    if coverage <= f32::EPSILON {
                        return;
                    }
                    let ix = (x as f32 + bounds.min.x).floor() as i32;
                    let iy = (y as f32 + bounds.min.y).floor() as i32;
                    if ix < 0 || iy < 0 || ix >= width || iy >= height {
                        return;
                    }
                    let index = iy as usize * stride + ix as usize;

                    // White premultiplied by coverage, over in
                    // premultiplied space: out = src + bg * (1 - a)
                    let value = (coverage.clamp(0.0, 1.0) * 255.0) as u8;
                    let bg = dst[index];
                    let inv = 1.0 - coverage.clamp(0.0, 1.0);
                    let r = value.saturating_add((bg.red() as f32 * inv) as u8);
                    let g = value.saturating_add((bg.green() as f32 * inv) as u8);
                    let b = value.saturating_add((bg.blue() as f32 * inv) as u8);
                    let a = value.saturating_add((bg.alpha() as f32 * inv) as u8);
                    if let Some(px) = PremultipliedColorU8::from_rgba(r, g, b, a) {
                        dst[index] = px;
                    }
                });
            }
        }
    }
}

/// Greedy word wrap. Paragraphs are split on newlines first, so an
/// empty input line stays an empty output line.
fn wrap_lines(font: &FontVec, scale: PxScale, text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if current.is_empty() || line_width(font, scale, &candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        lines.push(current);
    }
    lines
}

fn line_width(font: &FontVec, scale: PxScale, line: &str) -> f32 {
    let sf = font.as_scaled(scale);
    let mut width = 0.0;
    let mut prev: Option<GlyphId> = None;
    for ch in line.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = prev {
            width += sf.kern(prev, id);
        }
        width += sf.h_advance(id);
        prev = Some(id);
    }
    width
}
