// src/animation/frame_animator.rs
//
// The per-frame animation update. Given the quantized display time and the
// live parameter snapshot, each block gets a pose (translation, rotation,
// scale, texture scroll) and a glow scalar. All of it is pure math over the
// block's kind-specific indices, so every mode is testable without a GPU.

use nannou::prelude::*;

use crate::animation::noise::hash_noise;
use crate::models::{ParamSnapshot, SceneMode};
use crate::views::scene::{Block, BlockKind};

/// Temporal posterization: 60 steps and above is smooth, anything below
/// rounds elapsed time down to the nearest 1/steps for a strobe effect.
pub fn quantize_time(elapsed: f32, steps: f32) -> f32 {
    if steps >= 60.0 {
        elapsed
    } else {
        (elapsed * steps).floor() / steps
    }
}

#[derive(Debug, Clone)]
pub struct BlockPose {
    pub translation: Vec3,
    /// Euler XYZ rotation in radians.
    pub rotation: Vec3,
    pub scale: Vec3,
    /// Horizontal texture offset (spiral ribbon scroll).
    pub uv_scroll: f32,
    /// Raw oscillator output, roughly [-1, 1]. Squared and scaled into an
    /// emissive intensity by `emissive_intensity`.
    pub glow: f32,
}

impl BlockPose {
    fn at(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            uv_scroll: 0.0,
            glow: 0.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.translation.is_finite()
            && self.rotation.is_finite()
            && self.scale.is_finite()
            && self.uv_scroll.is_finite()
            && self.glow.is_finite()
    }
}

/// Glow only shows when both the speed drive and accent color are on. The
/// squared response keeps low-amplitude oscillation dark so only the peaks
/// brighten.
pub fn emissive_intensity(glow: f32, p: &ParamSnapshot) -> f32 {
    if p.speed_enabled && p.color_enabled {
        glow.max(0.0).powi(2) * 0.25
    } else {
        0.0
    }
}

pub fn pose(block: &Block, p: &ParamSnapshot, st: f32) -> BlockPose {
    match &block.kind {
        BlockKind::Ring { index } => ring_pose(*index, p, st),
        BlockKind::Spiral => spiral_pose(p, st),
        BlockKind::Cell {
            row,
            col,
            index,
            base,
            dist,
        } => cell_pose(*row, *col, *index, *base, *dist, p, st),
    }
}

fn ring_pose(ring: u32, p: &ParamSnapshot, st: f32) -> BlockPose {
    let r = ring as f32;
    // Stacking offset keeps the bands from z-fighting.
    let stack_z = r * -0.01;
    let direction = if ring % 2 == 0 { 1.0 } else { -1.0 };
    let mut pose = BlockPose::at(vec3(0.0, 0.0, stack_z));

    match p.mode {
        SceneMode::Pulsing => {
            let osc = (st * p.speed + r * p.phase * 4.0).sin();
            if p.rotation_enabled {
                pose.rotation.z = osc * p.rot_speed * 2.0 * direction;
            }
            pose.translation.z = stack_z + osc * 0.2;
            pose.glow = osc.max(0.0);
        }
        SceneMode::ZRipple => {
            let ring_speed_factor = 1.0 / (1.0 + r * 0.35);
            if p.rotation_enabled {
                pose.rotation.z = st * p.rot_speed * direction * ring_speed_factor;
            }
            let wave = (st * p.speed + r * p.phase * 6.0).sin();
            pose.translation.z = stack_z + wave * 0.4;
            pose.glow = wave;
        }
        // Dials, and the ring fallback for any other mode.
        _ => {
            let ring_speed_factor = 1.0 / (1.0 + r * 0.35);
            if p.rotation_enabled {
                pose.rotation.z = st * p.rot_speed * direction * ring_speed_factor;
            }
            let wave = (st * p.speed + r * p.phase * 5.0).sin();
            pose.translation.z = stack_z + wave * 0.12;
            pose.glow = wave;
        }
    }
    pose
}

fn spiral_pose(p: &ParamSnapshot, st: f32) -> BlockPose {
    let mut pose = BlockPose::at(Vec3::ZERO);
    if p.rotation_enabled {
        pose.rotation.z = st * p.rot_speed;
    }
    if p.speed_enabled {
        pose.uv_scroll = -(st * p.speed * 0.5);
    }
    pose.glow = 0.5 + 0.5 * (st * p.speed).sin();
    pose
}

fn cell_pose(row: u32, col: u32, index: u32, base: Vec2, dist: f32, p: &ParamSnapshot, st: f32) -> BlockPose {
    let (rowf, colf, indexf) = (row as f32, col as f32, index as f32);
    let mut pose = BlockPose::at(vec3(base.x, base.y, 0.0));

    match p.mode {
        SceneMode::Fractal => {
            let n = hash_noise(rowf, colf, (st * p.speed).floor(), p.seed);
            pose.translation.z = n * p.depth * 4.0;
            if p.rotation_enabled {
                pose.rotation.x = st * p.rot_speed + n;
            }
            pose.glow = n;
        }
        SceneMode::Ticker => {
            let row_dir = if row % 2 == 0 { 1.0 } else { -1.0 };
            let x_shift = (st * p.speed + colf * p.phase) * row_dir;
            pose.translation.x = base.x + x_shift % 0.5;
            pose.glow = (st * p.speed + colf).sin();
        }
        SceneMode::Matrix => {
            let drop = ((st * p.speed * 2.0 + colf * 10.0).floor() % 20.0) * 0.1;
            pose.translation.y = base.y - drop;
            pose.glow = 1.0 - drop;
        }
        SceneMode::Horizontal => {
            pose.translation.z = (st * p.speed + indexf * p.phase).sin() * 0.15;
            if p.rotation_enabled {
                pose.rotation.y = st * p.rot_speed + indexf * 0.1;
            }
        }
        SceneMode::Snake => {
            let sn = (st * p.speed + indexf * p.phase).sin();
            pose.translation.z = sn * 0.35;
            if p.rotation_enabled {
                pose.rotation.x = st * p.rot_speed + indexf * p.phase;
            }
            pose.glow = sn;
        }
        SceneMode::Radial => {
            // Cylinders face the camera.
            pose.rotation.x = std::f32::consts::FRAC_PI_2;
            let rd = (st * p.speed * 2.0 - dist * p.phase * 10.0).sin();
            pose.translation.z = rd * 0.25;
            pose.glow = rd;
        }
        _ => {}
    }

    // Extrusion: cells stretch along their depth axis, except radial (kept
    // uniform) and horizontal (rests just below unit depth).
    pose.scale = match p.mode {
        SceneMode::Radial => Vec3::ONE,
        SceneMode::Horizontal => vec3(1.0, 1.0, 0.98 + p.depth * 8.0),
        _ => vec3(1.0, 1.0, 1.0 + p.depth * 8.0),
    };
    pose
}

/// The wandering point light of the original scene. nannou has no lighting
/// pipeline, so the light is folded into each block's glow overlay as a
/// distance-falloff brightness term.
#[derive(Debug, Clone)]
pub struct WanderLight {
    pub position: Vec3,
    pub color: Rgb<f32>,
    pub intensity: f32,
}

pub fn wander_light(p: &ParamSnapshot, st: f32) -> WanderLight {
    if p.wander_enabled && p.color_enabled {
        let w = st * 0.06;
        WanderLight {
            position: vec3(w.sin() * 18.0, (w * 0.5).cos() * 15.0, 8.0),
            color: p.accent_color,
            intensity: 0.6 + (st * 0.1).sin() * 0.2,
        }
    } else if p.wander_enabled {
        WanderLight {
            position: vec3(0.0, 0.0, 8.0),
            color: rgb(1.0, 1.0, 1.0),
            intensity: 0.3,
        }
    } else {
        WanderLight {
            position: Vec3::ZERO,
            color: rgb(1.0, 1.0, 1.0),
            intensity: 0.0,
        }
    }
}

impl WanderLight {
    /// Brightness contribution at a block position, [0, intensity].
    pub fn contribution(&self, at: Vec3) -> f32 {
        if self.intensity <= 0.0 {
            return 0.0;
        }
        let falloff = (1.0 - at.distance(self.position) / 80.0).clamp(0.0, 1.0);
        self.intensity * falloff
    }
}
