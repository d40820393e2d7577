// src/models/mod.rs

pub mod mesh;
pub mod params;

pub use mesh::MeshData;
pub use params::{ParamSnapshot, SceneMode, StructuralKey, POSTERIZE_STEPS};
