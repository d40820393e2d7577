// src/views/background.rs
//
// The scene backdrop: a flat base color plus a dim 8x8 speckle texture
// generated once at startup. The speckle stands in for the environment map
// of the original scene. The texture is owned here and released when the
// app model is dropped at teardown.

use nannou::image::{DynamicImage, Rgba, RgbaImage};
use nannou::prelude::*;
use nannou::window::Window;
use rand::Rng;

const SPECKLE_SIZE: u32 = 128;
const SPECKLE_CELLS: u32 = 8;
/// Dimming is baked into the pixel alpha; nannou's texture primitive has no
/// draw-time tint.
const SPECKLE_ALPHA: u8 = 13;

pub struct Backdrop {
    color: Rgb<f32>,
    image: RgbaImage,
    texture: Option<wgpu::Texture>,
}

impl Backdrop {
    pub fn new(color: Rgb<f32>) -> Self {
        Self {
            color,
            image: speckle_image(),
            texture: None,
        }
    }

    /// Uploads the speckle texture on first use. Runs in the update pass.
    pub fn ensure_gpu(&mut self, window: &Window) {
        if self.texture.is_none() {
            let image = DynamicImage::ImageRgba8(self.image.clone());
            self.texture = Some(wgpu::Texture::from_image(window, &image));
        }
    }

    pub fn draw(&self, draw: &Draw, rect: Rect) {
        draw.background().color(self.color);

        if let Some(texture) = &self.texture {
            // Far behind the blocks, barely above the base color.
            draw.texture(texture).w_h(rect.w(), rect.h()).z(-900.0);
        }
    }
}

fn speckle_image() -> RgbaImage {
    let mut rng = rand::thread_rng();
    let mut image = RgbaImage::from_pixel(
        SPECKLE_SIZE,
        SPECKLE_SIZE,
        Rgba([10, 11, 14, SPECKLE_ALPHA]),
    );
    let cell = SPECKLE_SIZE / SPECKLE_CELLS;
    for i in 0..SPECKLE_CELLS {
        for j in 0..SPECKLE_CELLS {
            let brightness: u8 = 35 + rng.gen_range(0..25);
            let color = Rgba([brightness, brightness + 2, brightness + 4, SPECKLE_ALPHA]);
            for y in (j * cell + 1)..(j * cell + cell - 1) {
                for x in (i * cell + 1)..(i * cell + cell - 1) {
                    image.put_pixel(x, y, color);
                }
            }
        }
    }
    image
}
