// src/services/texture_cache.rs
//
// Content-addressed memoization of rasterized label/glyph textures.
// Keys combine content, font and resolved color; entries live until the
// next structural parameter change flushes the whole cache. There is no
// eviction policy on purpose: within one configuration the key space is
// bounded by the text itself.

use nannou::image::DynamicImage;
use nannou::prelude::*;
use nannou::window::Window;
use std::collections::HashMap;

use crate::services::raster::LabelRaster;

pub fn label_key(text: &str, font: &str, color_hex: &str) -> String {
    format!("label-{}-{}-{}", text, font, color_hex)
}

pub fn char_key(ch: char, font: &str, color_hex: &str) -> String {
    let upper: String = ch.to_uppercase().collect();
    format!("char-{}-{}-{}", upper, font, color_hex)
}

pub struct CacheEntry {
    pub raster: LabelRaster,
    gpu: Option<wgpu::Texture>,
}

#[derive(Default)]
pub struct TextureCache {
    entries: HashMap<String, CacheEntry>,
    hits: usize,
    misses: usize,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached raster for `key`, rasterizing via `build` on the
    /// first request.
    pub fn get_or_create(
        &mut self,
        key: &str,
        build: impl FnOnce() -> LabelRaster,
    ) -> &LabelRaster {
        if self.entries.contains_key(key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            let raster = build();
            self.entries.insert(
                key.to_string(),
                CacheEntry { raster, gpu: None },
            );
        }
        &self.entries[key].raster
    }

    /// Inserts a pre-rasterized entry (used by the parallel rebuild batch).
    /// Existing entries are kept so their GPU upload survives.
    pub fn insert(&mut self, key: String, raster: LabelRaster) {
        self.entries
            .entry(key)
            .or_insert(CacheEntry { raster, gpu: None });
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Uploads the raster for `key` on first use. Runs in the update pass so
    /// the view pass can borrow textures immutably.
    pub fn ensure_gpu(&mut self, key: &str, window: &Window) {
        if let Some(entry) = self.entries.get_mut(key) {
            if entry.gpu.is_none() {
                let image = DynamicImage::ImageRgba8(entry.raster.image.clone());
                entry.gpu = Some(wgpu::Texture::from_image(window, &image));
            }
        }
    }

    /// The already-uploaded GPU texture for `key`, if any.
    pub fn gpu(&self, key: &str) -> Option<&wgpu::Texture> {
        self.entries.get(key).and_then(|e| e.gpu.as_ref())
    }

    /// Disposes every cached texture and empties the map. Must run before
    /// regenerating textures under new structural parameters.
    pub fn clear_all(&mut self) {
        // Dropping the entries releases both the pixel buffers and the GPU
        // texture handles.
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
