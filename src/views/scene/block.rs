// src/views/scene/block.rs
//
// One rendered primitive of the scene. Blocks are owned exclusively by the
// SceneInstance collection and recreated wholesale on every structural
// rebuild; dropping a block releases its mesh, and the shared textures stay
// with the cache.

use nannou::prelude::*;

use crate::models::MeshData;

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// One grid cell carrying a single character.
    Cell {
        row: u32,
        col: u32,
        index: u32,
        base: Vec2,
        /// Distance of the cell center from the grid center, used by the
        /// radial wave.
        dist: f32,
    },
    /// One annular band, index starting at 1 for the innermost ring.
    Ring { index: u32 },
    /// The single helical ribbon of spiral-wrap mode.
    Spiral,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    pub mesh: MeshData,
    pub texture_key: String,
}

impl Block {
    pub fn new(kind: BlockKind, mesh: MeshData, texture_key: String) -> Self {
        Self {
            kind,
            mesh,
            texture_key,
        }
    }
}
