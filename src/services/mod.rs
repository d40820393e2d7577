// src/services/mod.rs

pub mod raster;
pub mod texture_cache;

pub use raster::{LabelRaster, LabelRasterizer};
pub use texture_cache::{char_key, label_key, TextureCache};
