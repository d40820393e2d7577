// src/models/params.rs
//
// The scene parameter set. One ParamSnapshot is held by the app and
// replaced wholesale on every change, so the animator always reads an
// internally consistent set of values. A subset of the fields is
// "structural": changing any of them invalidates the texture cache and
// forces a scene rebuild. Everything else is live and only read per frame.

use nannou::prelude::*;

/// Discrete steps-per-second choices for temporal posterization.
/// 60 and above means smooth (raw elapsed time).
pub const POSTERIZE_STEPS: [f32; 10] = [1.0, 2.0, 4.0, 6.0, 8.0, 12.0, 18.0, 24.0, 30.0, 60.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneMode {
    Dials,
    ZRipple,
    Pulsing,
    SpiralWrap,
    Radial,
    Horizontal,
    Ticker,
    Matrix,
    Fractal,
    Snake,
}

impl SceneMode {
    pub const ALL: [SceneMode; 10] = [
        SceneMode::Dials,
        SceneMode::ZRipple,
        SceneMode::Pulsing,
        SceneMode::SpiralWrap,
        SceneMode::Radial,
        SceneMode::Horizontal,
        SceneMode::Ticker,
        SceneMode::Matrix,
        SceneMode::Fractal,
        SceneMode::Snake,
    ];

    pub fn from_name(name: &str) -> Option<SceneMode> {
        match name {
            "dials" => Some(SceneMode::Dials),
            "z-ripple" => Some(SceneMode::ZRipple),
            "pulsing" => Some(SceneMode::Pulsing),
            "spiral-wrap" => Some(SceneMode::SpiralWrap),
            "radial" => Some(SceneMode::Radial),
            "horizontal" => Some(SceneMode::Horizontal),
            "ticker" => Some(SceneMode::Ticker),
            "matrix" => Some(SceneMode::Matrix),
            "fractal" => Some(SceneMode::Fractal),
            "snake" => Some(SceneMode::Snake),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SceneMode::Dials => "dials",
            SceneMode::ZRipple => "z-ripple",
            SceneMode::Pulsing => "pulsing",
            SceneMode::SpiralWrap => "spiral-wrap",
            SceneMode::Radial => "radial",
            SceneMode::Horizontal => "horizontal",
            SceneMode::Ticker => "ticker",
            SceneMode::Matrix => "matrix",
            SceneMode::Fractal => "fractal",
            SceneMode::Snake => "snake",
        }
    }

    pub fn next(&self) -> SceneMode {
        let i = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Ring modes lay out concentric annular bands sharing one label texture.
    pub fn is_ring(&self) -> bool {
        matches!(
            self,
            SceneMode::Dials | SceneMode::ZRipple | SceneMode::Pulsing
        )
    }

    pub fn is_spiral(&self) -> bool {
        matches!(self, SceneMode::SpiralWrap)
    }

    /// Grid modes lay out rows x cols of per-character cells.
    pub fn is_grid(&self) -> bool {
        !self.is_ring() && !self.is_spiral()
    }
}

#[derive(Debug, Clone)]
pub struct ParamSnapshot {
    pub text: String,
    pub mode: SceneMode,
    pub seed: f32,
    pub speed: f32,
    pub phase: f32,
    pub depth: f32,
    pub rot_speed: f32,
    pub posterize: f32,
    pub accent_color: Rgb<f32>,
    pub color_enabled: bool,
    pub speed_enabled: bool,
    pub rotation_enabled: bool,
    pub wander_enabled: bool,
    pub font_family: String,
}

impl ParamSnapshot {
    /// Maps a raw slider value to the engine speed. Squaring gives extreme
    /// slow-motion control at the bottom of the range.
    pub fn map_speed(raw: f32) -> f32 {
        raw * raw * 0.25
    }

    /// The color glyph textures and glow overlays resolve to. White when
    /// accent coloring is disabled.
    pub fn resolved_color(&self) -> Rgb<f32> {
        if self.color_enabled {
            self.accent_color
        } else {
            rgb(1.0, 1.0, 1.0)
        }
    }

    pub fn resolved_color_hex(&self) -> String {
        let c = self.resolved_color();
        format!(
            "{:02x}{:02x}{:02x}",
            (c.red.clamp(0.0, 1.0) * 255.0) as u8,
            (c.green.clamp(0.0, 1.0) * 255.0) as u8,
            (c.blue.clamp(0.0, 1.0) * 255.0) as u8,
        )
    }

    pub fn structural_key(&self) -> StructuralKey {
        StructuralKey {
            text: self.text.clone(),
            mode: self.mode,
            font_family: self.font_family.clone(),
            accent_hex: self.resolved_color_hex(),
            color_enabled: self.color_enabled,
        }
    }
}

/// The subset of parameters whose change forces a texture-cache flush and a
/// full scene rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralKey {
    pub text: String,
    pub mode: SceneMode,
    pub font_family: String,
    pub accent_hex: String,
    pub color_enabled: bool,
}
