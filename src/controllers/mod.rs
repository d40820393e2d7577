// src/controllers/mod.rs

pub mod camera;
pub mod osc;

pub use camera::{DragMode, OrbitCamera};
pub use osc::{OscController, ParamCommand};
