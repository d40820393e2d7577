// src/animation/noise.rs
//
// Deterministic hash noise for the fractal mode. The constants and the
// operation order are load-bearing: fractal layouts must reproduce the same
// field for the same (cell, time, seed) inputs across runs.

pub fn hash_noise(x: f32, y: f32, z: f32, seed: f32) -> f32 {
    let p = x * 12.9898 + y * 78.233 + z * 43.123 + seed * 91.432;
    let q = z * 13.1313 + x * 93.939 + y * 17.171;
    ((p + q).sin() * 43758.5453) % 1.0
}
