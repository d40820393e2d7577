// src/views/mod.rs

pub mod background;
pub mod scene;

pub use background::Backdrop;
pub use scene::{Block, BlockKind, SceneInstance};
