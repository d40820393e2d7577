// src/animation/mod.rs

pub mod frame_animator;
pub mod noise;

pub use frame_animator::{emissive_intensity, pose, quantize_time, wander_light, BlockPose, WanderLight};
pub use noise::hash_noise;
