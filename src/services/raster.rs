// src/services/raster.rs
//
// CPU rasterization of glyphs and label strips into RGBA pixel buffers.
// The buffers are uploaded as wgpu textures by the texture cache; nothing
// here touches the GPU, so all of the layout math is unit-testable.

use ab_glyph::{Font, FontArc, ScaleFont};
use nannou::image::{Rgba, RgbaImage};
use nannou::prelude::*;
use std::fs;
use std::path::Path;

/// Single-character textures are square.
const GLYPH_SIZE: u32 = 256;
const GLYPH_PX: f32 = 148.0;
/// The em middle sits slightly below the canvas center, matching the
/// original layout.
const GLYPH_Y_OFFSET: f32 = 4.0;

/// Label strips have a fixed height; width follows the measured text.
const LABEL_H: u32 = 512;
const LABEL_PX: f32 = 500.0;
const LABEL_PAD_X: f32 = 48.0;
const LABEL_Y_OFFSET: f32 = 45.0;
/// Negative tracking tightens the label so it tiles as a dense band.
const LETTER_SPACING: f32 = -12.0;

/// Dark panel color behind the glyph ink.
const BG: [u8; 4] = [15, 17, 21, 255];

/// Candidate font files used when the configured path is empty or unusable.
const FALLBACK_FONTS: [&str; 5] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

#[derive(Debug, Clone)]
pub struct LabelRaster {
    pub image: RgbaImage,
    pub aspect: f32,
}

pub struct LabelRasterizer {
    font: Option<FontArc>,
    pub font_name: String,
}

impl LabelRasterizer {
    /// Loads the configured font, falling back to common system fonts and
    /// finally to placeholder-box rendering. Never fails.
    pub fn new(font_path: &Path) -> Self {
        if let Some(r) = Self::try_load(font_path) {
            return r;
        }
        for candidate in FALLBACK_FONTS {
            if let Some(r) = Self::try_load(Path::new(candidate)) {
                return r;
            }
        }
        eprintln!("typovis: no usable font found, rendering placeholder boxes");
        Self::placeholder()
    }

    fn try_load(path: &Path) -> Option<Self> {
        if path.as_os_str().is_empty() {
            return None;
        }
        let bytes = fs::read(path).ok()?;
        let font = FontArc::try_from_vec(bytes).ok()?;
        let font_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "font".to_string());
        Some(Self {
            font: Some(font),
            font_name,
        })
    }

    /// A rasterizer with no font: glyphs render as filled boxes. Used as the
    /// last-resort fallback and by tests that need deterministic output.
    pub fn placeholder() -> Self {
        Self {
            font: None,
            font_name: "placeholder".to_string(),
        }
    }

    /// Renders one character onto a fixed square canvas.
    pub fn glyph(&self, ch: char, ink: Rgb<f32>) -> LabelRaster {
        let text: String = ch.to_uppercase().collect();
        let mut image = solid(GLYPH_SIZE, GLYPH_SIZE);
        let width = self.measure(&text, GLYPH_PX);
        let pen_x = (GLYPH_SIZE as f32 - width) / 2.0;
        let mid_y = GLYPH_SIZE as f32 / 2.0 + GLYPH_Y_OFFSET;
        self.draw_text(&mut image, &text, GLYPH_PX, pen_x, mid_y, ink);
        LabelRaster {
            image,
            aspect: 1.0,
        }
    }

    /// Renders a full label strip. Width follows the measured text plus
    /// horizontal padding; an empty string renders as a single space.
    pub fn label(&self, text: &str, ink: Rgb<f32>) -> LabelRaster {
        let display = if text.is_empty() {
            " ".to_string()
        } else {
            text.to_uppercase()
        };
        let width = self.measure(&display, LABEL_PX);
        let w = (width.ceil() + LABEL_PAD_X * 2.0).max(1.0) as u32;

        let mut image = solid(w, LABEL_H);
        let pen_x = (w as f32 - width) / 2.0;
        let mid_y = LABEL_H as f32 / 2.0 + LABEL_Y_OFFSET;
        self.draw_text(&mut image, &display, LABEL_PX, pen_x, mid_y, ink);
        LabelRaster {
            aspect: w as f32 / LABEL_H as f32,
            image,
        }
    }

    /// Advance width of `text` at `px`, including kerning and tracking.
    fn measure(&self, text: &str, px: f32) -> f32 {
        match &self.font {
            Some(font) => {
                let scaled = font.as_scaled(px);
                let mut width = 0.0;
                let mut prev = None;
                for ch in text.chars() {
                    let id = scaled.glyph_id(ch);
                    if let Some(p) = prev {
                        width += scaled.kern(p, id) + LETTER_SPACING;
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width.max(0.0)
            }
            None => placeholder_width(text, px),
        }
    }

    fn draw_text(
        &self,
        image: &mut RgbaImage,
        text: &str,
        px: f32,
        pen_x: f32,
        mid_y: f32,
        ink: Rgb<f32>,
    ) {
        let ink = [
            (ink.red.clamp(0.0, 1.0) * 255.0) as u8,
            (ink.green.clamp(0.0, 1.0) * 255.0) as u8,
            (ink.blue.clamp(0.0, 1.0) * 255.0) as u8,
        ];
        match &self.font {
            Some(font) => {
                let scaled = font.as_scaled(px);
                // Baseline sits below the em middle by half the em extent.
                let baseline = mid_y + (scaled.ascent() + scaled.descent()) / 2.0;
                let mut x = pen_x;
                let mut prev = None;
                for ch in text.chars() {
                    let id = scaled.glyph_id(ch);
                    if let Some(p) = prev {
                        x += scaled.kern(p, id) + LETTER_SPACING;
                    }
                    let glyph = id.with_scale_and_position(px, ab_glyph::point(x, baseline));
                    if let Some(outlined) = font.outline_glyph(glyph) {
                        let bounds = outlined.px_bounds();
                        outlined.draw(|gx, gy, coverage| {
                            let px_x = bounds.min.x as i32 + gx as i32;
                            let px_y = bounds.min.y as i32 + gy as i32;
                            blend(image, px_x, px_y, ink, coverage);
                        });
                    }
                    x += scaled.h_advance(id);
                    prev = Some(id);
                }
            }
            None => {
                let advance = placeholder_advance(px);
                let box_h = px * 0.72;
                let mut x = pen_x;
                for ch in text.chars() {
                    if !ch.is_whitespace() {
                        fill_rect(
                            image,
                            x + advance * 0.1,
                            mid_y - box_h / 2.0,
                            advance * 0.8,
                            box_h,
                            ink,
                        );
                    }
                    x += advance;
                }
            }
        }
    }
}

fn solid(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(BG))
}

fn blend(image: &mut RgbaImage, x: i32, y: i32, ink: [u8; 3], coverage: f32) {
    if x < 0 || y < 0 || x >= image.width() as i32 || y >= image.height() as i32 {
        return;
    }
    let c = coverage.clamp(0.0, 1.0);
    let px = image.get_pixel_mut(x as u32, y as u32);
    for i in 0..3 {
        let bg = px.0[i] as f32;
        px.0[i] = (bg + (ink[i] as f32 - bg) * c) as u8;
    }
}

fn fill_rect(image: &mut RgbaImage, x: f32, y: f32, w: f32, h: f32, ink: [u8; 3]) {
    let x0 = x.max(0.0) as u32;
    let y0 = y.max(0.0) as u32;
    let x1 = ((x + w).max(0.0) as u32).min(image.width());
    let y1 = ((y + h).max(0.0) as u32).min(image.height());
    for py in y0..y1 {
        for px in x0..x1 {
            let p = image.get_pixel_mut(px, py);
            p.0 = [ink[0], ink[1], ink[2], 255];
        }
    }
}

fn placeholder_advance(px: f32) -> f32 {
    px * 0.6
}

fn placeholder_width(text: &str, px: f32) -> f32 {
    text.chars().count() as f32 * placeholder_advance(px)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_canvas_is_fixed_square() {
        let r = LabelRasterizer::placeholder();
        let raster = r.glyph('a', rgb(1.0, 1.0, 1.0));
        assert_eq!(raster.image.width(), GLYPH_SIZE);
        assert_eq!(raster.image.height(), GLYPH_SIZE);
        assert!((raster.aspect - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_label_substitutes_a_space() {
        let r = LabelRasterizer::placeholder();
        let raster = r.label("", rgb(1.0, 1.0, 1.0));
        assert_eq!(raster.image.height(), LABEL_H);
        // One space advance plus padding, never a zero-width buffer.
        assert!(raster.image.width() > 0);
        assert!(raster.aspect > 0.0);
    }

    #[test]
    fn label_aspect_matches_buffer_dimensions() {
        let r = LabelRasterizer::placeholder();
        let raster = r.label("hello", rgb(1.0, 1.0, 1.0));
        let expected = raster.image.width() as f32 / raster.image.height() as f32;
        assert!((raster.aspect - expected).abs() < 1e-6);
    }

    #[test]
    fn longer_text_renders_wider_labels() {
        let r = LabelRasterizer::placeholder();
        let short = r.label("AB", rgb(1.0, 1.0, 1.0));
        let long = r.label("ABCDEFG", rgb(1.0, 1.0, 1.0));
        assert!(long.image.width() > short.image.width());
    }

    #[test]
    fn placeholder_glyph_marks_pixels() {
        let r = LabelRasterizer::placeholder();
        let raster = r.glyph('X', rgb(1.0, 1.0, 1.0));
        let lit = raster
            .image
            .pixels()
            .filter(|p| p.0[0] > BG[0])
            .count();
        assert!(lit > 0);

        // Whitespace renders, but stays blank.
        let blank = r.glyph(' ', rgb(1.0, 1.0, 1.0));
        let lit = blank.image.pixels().filter(|p| p.0[0] > BG[0]).count();
        assert_eq!(lit, 0);
    }
}
