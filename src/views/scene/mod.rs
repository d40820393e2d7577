// src/views/scene/mod.rs

pub mod block;
pub mod layout;
pub mod scene_instance;

pub use block::{Block, BlockKind};
pub use scene_instance::SceneInstance;
