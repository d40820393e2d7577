// src/views/scene/scene_instance.rs
//
// The scene builder and its object collection. Rebuilding tears down the
// whole block arena and repopulates it from the structural parameters;
// per-frame drawing projects each block under the camera and the animator
// pose. Rebuild must never interleave with a draw pass, which the
// single-threaded update loop guarantees.

use nannou::prelude::*;
use nannou::window::Window;
use rayon::prelude::*;
use std::collections::HashSet;

use crate::animation::{emissive_intensity, pose, quantize_time, wander_light};
use crate::controllers::OrbitCamera;
use crate::models::{mesh, ParamSnapshot};
use crate::services::{char_key, label_key, LabelRasterizer, TextureCache};
use crate::views::scene::{layout, Block, BlockKind};

/// Near-plane guard for triangles reaching behind the camera.
const MIN_CLIP_W: f32 = 0.1;

#[derive(Default)]
pub struct SceneInstance {
    pub blocks: Vec<Block>,
    pub aspect: f32,
}

impl SceneInstance {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            aspect: 1.0,
        }
    }

    /// Tears down the previous block collection and repopulates it for the
    /// current structural parameters and viewport aspect. The texture cache
    /// is reused across rebuilds; callers flush it first when a structural
    /// parameter changed.
    pub fn rebuild(
        &mut self,
        p: &ParamSnapshot,
        cache: &mut TextureCache,
        rasterizer: &LabelRasterizer,
        aspect: f32,
    ) {
        // Dropping the old blocks releases their geometry.
        self.blocks.clear();
        self.aspect = aspect;

        let ink = rgb(1.0, 1.0, 1.0);
        let color_hex = p.resolved_color_hex();

        if p.mode.is_spiral() || p.mode.is_ring() {
            let key = label_key(&p.text, &p.font_family, &color_hex);
            let label_aspect = cache
                .get_or_create(&key, || rasterizer.label(&p.text, ink))
                .aspect;

            if p.mode.is_spiral() {
                self.blocks.push(Block::new(
                    BlockKind::Spiral,
                    layout::spiral_ribbon(label_aspect),
                    key,
                ));
            } else {
                for index in 1..=layout::ring_count(aspect) {
                    self.blocks.push(Block::new(
                        BlockKind::Ring { index },
                        layout::ring_band(index, label_aspect),
                        key.clone(),
                    ));
                }
            }
            return;
        }

        // Grid modes: one cell per character, cycling through the text.
        let (cols, rows) = layout::grid_dims(aspect);
        let chars: Vec<char> = if p.text.is_empty() {
            vec![' ']
        } else {
            p.text.chars().collect()
        };

        // Rasterize glyphs the cache does not hold yet, in parallel, then
        // insert serially. Cache mutation stays on this thread.
        let mut missing: Vec<(String, char)> = Vec::new();
        let mut seen = HashSet::new();
        for &ch in &chars {
            let key = char_key(ch, &p.font_family, &color_hex);
            if !cache.contains(&key) && seen.insert(key.clone()) {
                missing.push((key, ch));
            }
        }
        let rendered: Vec<_> = missing
            .into_par_iter()
            .map(|(key, ch)| (key, rasterizer.glyph(ch, ink)))
            .collect();
        for (key, raster) in rendered {
            cache.insert(key, raster);
        }

        let cell_mesh = if p.mode == crate::models::SceneMode::Radial {
            mesh::cylinder(0.25, 0.5, 32)
        } else {
            mesh::unit_box(0.5)
        };

        for row in 0..rows {
            for col in 0..cols {
                let index = row * cols + col;
                let ch = chars[index as usize % chars.len()];
                let base = layout::cell_position(row, col, cols, rows);
                self.blocks.push(Block::new(
                    BlockKind::Cell {
                        row,
                        col,
                        index,
                        base,
                        dist: base.length(),
                    },
                    cell_mesh.clone(),
                    char_key(ch, &p.font_family, &color_hex),
                ));
            }
        }
    }

    /// Uploads any still-CPU-only textures the blocks reference. Runs in
    /// the update pass, before the view pass borrows the cache immutably.
    pub fn ensure_gpu(&self, cache: &mut TextureCache, window: &Window) {
        for block in &self.blocks {
            cache.ensure_gpu(&block.texture_key, window);
        }
    }

    /// Draws every block for one frame: animator pose, camera projection,
    /// textured mesh, then the glow overlay.
    pub fn draw(
        &self,
        draw: &Draw,
        cache: &TextureCache,
        p: &ParamSnapshot,
        camera: &OrbitCamera,
        elapsed: f32,
        half_size: Vec2,
    ) {
        let st = quantize_time(elapsed, p.posterize);
        let light = wander_light(p, st);
        let view_proj = camera.view_proj(half_size.x / half_size.y);
        let overlay_color = p.resolved_color();

        let sampler = wgpu::SamplerBuilder::new()
            .address_mode(wgpu::AddressMode::Repeat)
            .into_descriptor();

        for block in &self.blocks {
            let pose = pose(block, p, st);
            let model = Mat4::from_scale_rotation_translation(
                pose.scale,
                Quat::from_euler(
                    nannou::glam::EulerRot::XYZ,
                    pose.rotation.x,
                    pose.rotation.y,
                    pose.rotation.z,
                ),
                pose.translation,
            );
            let mvp = view_proj * model;

            let mut points: Vec<(Vec3, Vec2)> = Vec::with_capacity(block.mesh.verts.len());
            'tris: for tri in block.mesh.verts.chunks(3) {
                let mut projected = [(Vec3::ZERO, Vec2::ZERO); 3];
                for (slot, (pos, uv)) in projected.iter_mut().zip(tri) {
                    match project(mvp, half_size, *pos) {
                        Some(screen) => {
                            *slot = (screen, vec2(uv.x + pose.uv_scroll, uv.y));
                        }
                        None => continue 'tris,
                    }
                }
                points.extend_from_slice(&projected);
            }
            if points.is_empty() {
                continue;
            }

            if let Some(texture) = cache.gpu(&block.texture_key) {
                draw.sampler(sampler.clone())
                    .mesh()
                    .points_textured(texture, points.iter().cloned());
            }

            let alpha =
                emissive_intensity(pose.glow, p) + light.contribution(pose.translation) * 0.15;
            if alpha > 0.005 {
                let glow = rgba(
                    overlay_color.red,
                    overlay_color.green,
                    overlay_color.blue,
                    alpha.min(1.0),
                );
                draw.mesh().points_colored(
                    points
                        .iter()
                        .map(|(pt, _)| (*pt + vec3(0.0, 0.0, 0.01), glow)),
                );
            }
        }
    }
}

/// Full perspective projection to nannou's pixel-space draw coordinates.
/// Returns None for vertices on the wrong side of the near-plane guard.
fn project(mvp: Mat4, half_size: Vec2, p: Vec3) -> Option<Vec3> {
    let clip = mvp * p.extend(1.0);
    if clip.w < MIN_CLIP_W {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(vec3(
        ndc.x * half_size.x,
        ndc.y * half_size.y,
        (1.0 - ndc.z) * 10.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::BlockPose;
    use crate::models::SceneMode;

    fn params(mode: SceneMode, text: &str) -> ParamSnapshot {
        ParamSnapshot {
            text: text.to_string(),
            mode,
            seed: 123.0,
            speed: 0.49,
            phase: 0.12,
            depth: 0.2,
            rot_speed: 0.0,
            posterize: 60.0,
            accent_color: rgb(0.0, 1.0, 1.0),
            color_enabled: true,
            speed_enabled: true,
            rotation_enabled: true,
            wander_enabled: true,
            font_family: "default".to_string(),
        }
    }

    fn rebuild(p: &ParamSnapshot, aspect: f32) -> (SceneInstance, TextureCache) {
        let mut scene = SceneInstance::new();
        let mut cache = TextureCache::new();
        let rasterizer = LabelRasterizer::placeholder();
        scene.rebuild(p, &mut cache, &rasterizer, aspect);
        (scene, cache)
    }

    #[test]
    fn dials_builds_one_block_per_ring() {
        let p = params(SceneMode::Dials, "AB");
        let (wide, _) = rebuild(&p, 16.0 / 9.0);
        assert_eq!(wide.blocks.len(), 16);
        let (narrow, _) = rebuild(&p, 0.6);
        assert_eq!(narrow.blocks.len(), 10);

        // One shared label texture across all bands.
        let keys: HashSet<_> = wide.blocks.iter().map(|b| b.texture_key.clone()).collect();
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn dials_end_to_end_one_frame() {
        let p = params(SceneMode::Dials, "AB");
        let (scene, _) = rebuild(&p, 16.0 / 9.0);
        let st = quantize_time(0.016, p.posterize);
        for block in &scene.blocks {
            let pose: BlockPose = pose(block, &p, st);
            assert!(pose.is_finite());
            let e = emissive_intensity(pose.glow, &p);
            assert!((0.0..=0.25).contains(&e));
        }
    }

    #[test]
    fn spiral_builds_a_single_ribbon() {
        let p = params(SceneMode::SpiralWrap, "AB");
        let (scene, cache) = rebuild(&p, 16.0 / 9.0);
        assert_eq!(scene.blocks.len(), 1);
        assert_eq!(scene.blocks[0].kind, BlockKind::Spiral);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn grid_cells_cycle_through_the_text() {
        let p = params(SceneMode::Ticker, "AB");
        let (scene, cache) = rebuild(&p, 16.0 / 9.0);
        assert_eq!(scene.blocks.len(), 14 * 8);
        // Two distinct glyph textures, alternating along the cells.
        assert_eq!(cache.len(), 2);
        let a_key = char_key('A', "default", &p.resolved_color_hex());
        let b_key = char_key('B', "default", &p.resolved_color_hex());
        for block in &scene.blocks {
            if let BlockKind::Cell { index, .. } = block.kind {
                let expected = if index % 2 == 0 { &a_key } else { &b_key };
                assert_eq!(&block.texture_key, expected);
            } else {
                panic!("grid rebuild produced a non-cell block");
            }
        }
    }

    #[test]
    fn empty_text_falls_back_to_a_space_cell() {
        let p = params(SceneMode::Matrix, "");
        let (scene, cache) = rebuild(&p, 16.0 / 9.0);
        assert_eq!(scene.blocks.len(), 14 * 8);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn rebuild_with_unchanged_key_hits_the_cache() {
        let p = params(SceneMode::Dials, "AB");
        let mut scene = SceneInstance::new();
        let mut cache = TextureCache::new();
        let rasterizer = LabelRasterizer::placeholder();
        scene.rebuild(&p, &mut cache, &rasterizer, 1.6);
        assert_eq!(cache.misses(), 1);

        // Same structural key: no new texture allocation.
        scene.rebuild(&p, &mut cache, &rasterizer, 1.6);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);

        // Accent change while color is enabled: flush and regenerate.
        let mut recolored = p.clone();
        recolored.accent_color = rgb(1.0, 0.0, 0.0);
        assert_ne!(p.structural_key(), recolored.structural_key());
        cache.clear_all();
        scene.rebuild(&recolored, &mut cache, &rasterizer, 1.6);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn resize_across_the_aspect_threshold_relays_the_grid() {
        let p = params(SceneMode::Snake, "HELLO");
        let mut scene = SceneInstance::new();
        let mut cache = TextureCache::new();
        let rasterizer = LabelRasterizer::placeholder();
        scene.rebuild(&p, &mut cache, &rasterizer, 1.6);
        assert_eq!(scene.blocks.len(), 14 * 8);
        scene.rebuild(&p, &mut cache, &rasterizer, 0.6);
        assert_eq!(scene.blocks.len(), 6 * 10);
    }

    #[test]
    fn projection_rejects_points_behind_the_camera() {
        let camera = OrbitCamera::new();
        let vp = camera.view_proj(1.6);
        let half = vec2(640.0, 400.0);
        // Origin is in front of the default camera.
        let visible = project(vp, half, Vec3::ZERO).unwrap();
        assert!(visible.x.is_finite() && visible.y.is_finite());
        // A point far behind the camera must be culled.
        assert!(project(vp, half, vec3(0.0, 0.0, 50.0)).is_none());
    }
}
