// src/config/config_types.rs
//
// Config types for the app

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

/// Startup values for the scene parameter set. Everything here can also be
/// changed at runtime over OSC or from the keyboard.
#[derive(Debug, Deserialize)]
pub struct SceneConfig {
    pub text: String,
    pub mode: String,
    pub seed: f32,
    pub raw_speed: f32,
    pub phase: f32,
    pub depth: f32,
    pub rot_speed: f32,
    pub posterize: f32,
    pub accent_color: [f32; 3],
    pub color_enabled: bool,
    pub speed_enabled: bool,
    pub rotation_enabled: bool,
    pub wander_enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct StyleConfig {
    pub font_path: String,
    pub background_color: [f32; 3],
}

#[derive(Debug, Deserialize)]
pub struct OscConfig {
    pub rx_port: u16,
}
