// src/views/scene/layout.rs
//
// Procedural geometry for the three layout families. Ring bands and the
// spiral ribbon start life as flat strips and are bent into place vertex by
// vertex; the u coordinate is rescaled so the label texture tiles at
// constant apparent size no matter the radius. The spiral needs the true
// arc length for that, integrated numerically because its radius grows with
// every turn.

use nannou::prelude::*;
use std::f32::consts::PI;

use crate::models::MeshData;

pub const RING_SEGMENTS: usize = 128;
pub const RING_HEIGHT: f32 = 0.5;
pub const RING_GAP: f32 = 0.51;

pub const SPIRAL_TURNS: u32 = 10;
pub const SPIRAL_HEIGHT: f32 = 0.5;
pub const SPIRAL_HAIRLINE_GAP: f32 = 0.01;
pub const SPIRAL_BASE_RADIUS: f32 = 0.6;
pub const SPIRAL_SEGMENTS_PER_TURN: usize = 128;

pub const GRID_SPACING: f32 = 0.55;

/// Narrow viewports get fewer, larger rings.
pub fn ring_count(aspect: f32) -> u32 {
    if aspect < 1.0 {
        10
    } else {
        16
    }
}

/// (cols, rows). Narrow viewports get fewer columns and more rows.
pub fn grid_dims(aspect: f32) -> (u32, u32) {
    if aspect < 1.0 {
        (6, 10)
    } else {
        (14, 8)
    }
}

pub fn ring_radius(ring_index: u32) -> f32 {
    ring_index as f32 * RING_GAP
}

/// How many times the label tiles around a ring of the given radius:
/// circumference / (strip height x label aspect).
pub fn ring_u_repeat(radius: f32, label_aspect: f32) -> f32 {
    2.0 * PI * radius / (RING_HEIGHT * label_aspect)
}

/// One annular band: a 2pi x RING_HEIGHT strip bent into a circle. For a
/// flat vertex (x, y): theta = x, local radius = ring radius + y.
pub fn ring_band(ring_index: u32, label_aspect: f32) -> MeshData {
    let radius = ring_radius(ring_index);
    let u_repeat = ring_u_repeat(radius, label_aspect);
    let mut mesh = MeshData::with_capacity(RING_SEGMENTS * 2);

    let bend = |x_flat: f32, y_flat: f32| -> (Vec3, Vec2) {
        let theta = x_flat;
        let rad = radius + y_flat;
        let pos = vec3(rad * theta.cos(), rad * theta.sin(), 0.0);
        let u = ((x_flat + PI) / (2.0 * PI)) * u_repeat;
        let v = (y_flat + RING_HEIGHT / 2.0) / RING_HEIGHT;
        (pos, vec2(u, v))
    };

    let h = RING_HEIGHT / 2.0;
    for i in 0..RING_SEGMENTS {
        let x0 = -PI + 2.0 * PI * i as f32 / RING_SEGMENTS as f32;
        let x1 = -PI + 2.0 * PI * (i + 1) as f32 / RING_SEGMENTS as f32;
        mesh.push_quad(bend(x0, -h), bend(x1, -h), bend(x1, h), bend(x0, h));
    }
    mesh
}

pub fn spiral_pitch() -> f32 {
    SPIRAL_HEIGHT + SPIRAL_HAIRLINE_GAP
}

/// Radius growth per radian of an Archimedean spiral with the configured
/// pitch.
pub fn spiral_k() -> f32 {
    spiral_pitch() / (2.0 * PI)
}

/// True arc length of the spiral centerline, as a Riemann sum of
/// sqrt(r^2 + k^2) * dtheta sampled inclusively over all segment
/// boundaries. The sampling scheme is part of the visual contract: the u
/// scale derived from it decides how the label tiles along the ribbon.
pub fn spiral_arc_length(turns: u32, k: f32, base_radius: f32, segments: usize) -> f32 {
    let total_theta = turns as f32 * 2.0 * PI;
    let delta_theta = total_theta / segments as f32;
    let mut length = 0.0;
    for i in 0..=segments {
        let theta = (i as f32 / segments as f32) * total_theta;
        let r = k * theta + base_radius;
        length += (r * r + k * k).sqrt() * delta_theta;
    }
    length
}

pub fn spiral_u_repeat(label_aspect: f32) -> f32 {
    let segments = SPIRAL_TURNS as usize * SPIRAL_SEGMENTS_PER_TURN;
    let arc = spiral_arc_length(SPIRAL_TURNS, spiral_k(), SPIRAL_BASE_RADIUS, segments);
    arc / (SPIRAL_HEIGHT * label_aspect)
}

/// The single helical ribbon: flattened coordinate runs 0..turns*2pi, and
/// the radius picks up k per radian plus the cross-strip offset.
pub fn spiral_ribbon(label_aspect: f32) -> MeshData {
    let k = spiral_k();
    let segments = SPIRAL_TURNS as usize * SPIRAL_SEGMENTS_PER_TURN;
    let total_theta = SPIRAL_TURNS as f32 * 2.0 * PI;
    let u_repeat = spiral_u_repeat(label_aspect);
    let mut mesh = MeshData::with_capacity(segments * 2);

    let bend = |x_flat: f32, y_flat: f32| -> (Vec3, Vec2) {
        let theta = x_flat;
        let rad = k * theta + SPIRAL_BASE_RADIUS + y_flat;
        let pos = vec3(rad * theta.cos(), rad * theta.sin(), 0.0);
        let u = (x_flat / total_theta) * u_repeat;
        let v = (y_flat + SPIRAL_HEIGHT / 2.0) / SPIRAL_HEIGHT;
        (pos, vec2(u, v))
    };

    let h = SPIRAL_HEIGHT / 2.0;
    for i in 0..segments {
        let x0 = total_theta * i as f32 / segments as f32;
        let x1 = total_theta * (i + 1) as f32 / segments as f32;
        mesh.push_quad(bend(x0, -h), bend(x1, -h), bend(x1, h), bend(x0, h));
    }
    mesh
}

/// Grid cell center, row 0 at the top.
pub fn cell_position(row: u32, col: u32, cols: u32, rows: u32) -> Vec2 {
    let x = (col as f32 - cols as f32 / 2.0 + 0.5) * GRID_SPACING;
    let y = (rows as f32 / 2.0 - row as f32 - 0.5) * GRID_SPACING;
    vec2(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_u_repeat_closed_form() {
        for r in 1..=16 {
            for aspect in [1.0_f32, 2.5, 7.3] {
                let radius = ring_radius(r);
                let expected = 2.0 * PI * r as f32 * RING_GAP / (RING_HEIGHT * aspect);
                assert!((ring_u_repeat(radius, aspect) - expected).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn ring_band_vertices_stay_in_the_annulus() {
        let radius = ring_radius(3);
        let mesh = ring_band(3, 4.0);
        assert_eq!(mesh.tri_count(), RING_SEGMENTS * 2);
        for (p, uv) in &mesh.verts {
            let r = (p.x * p.x + p.y * p.y).sqrt();
            assert!(r >= radius - RING_HEIGHT / 2.0 - 1e-4);
            assert!(r <= radius + RING_HEIGHT / 2.0 + 1e-4);
            assert!((0.0..=1.0 + 1e-6).contains(&uv.y));
        }
    }

    #[test]
    fn ring_u_spans_zero_to_u_repeat() {
        let mesh = ring_band(2, 4.0);
        let u_repeat = ring_u_repeat(ring_radius(2), 4.0);
        let max_u = mesh.verts.iter().map(|(_, uv)| uv.x).fold(0.0, f32::max);
        let min_u = mesh.verts.iter().map(|(_, uv)| uv.x).fold(f32::MAX, f32::min);
        assert!(min_u.abs() < 1e-3);
        assert!((max_u - u_repeat).abs() < 1e-3 * u_repeat);
    }

    /// Closed form for the Archimedean arc length, used as the reference
    /// for the Riemann integration.
    fn analytic_arc_length(turns: u32, k: f32, base_radius: f32) -> f32 {
        let anti = |r: f64, k: f64| -> f64 {
            (r / 2.0) * (r * r + k * k).sqrt()
                + (k * k / 2.0) * (r + (r * r + k * k).sqrt()).ln()
        };
        let k64 = k as f64;
        let r0 = base_radius as f64;
        let r1 = k64 * turns as f64 * 2.0 * std::f64::consts::PI + r0;
        ((anti(r1, k64) - anti(r0, k64)) / k64) as f32
    }

    #[test]
    fn spiral_arc_length_converges_to_analytic() {
        let k = spiral_k();
        // The inclusive sum over-counts one endpoint sample, so convergence
        // shows at finer sampling than the production 128 per turn.
        for turns in [1_u32, 5, 10] {
            let segments = turns as usize * 2048;
            let numeric = spiral_arc_length(turns, k, SPIRAL_BASE_RADIUS, segments);
            let analytic = analytic_arc_length(turns, k, SPIRAL_BASE_RADIUS);
            let rel = (numeric - analytic).abs() / analytic;
            assert!(rel < 1e-3, "turns {}: relative error {}", turns, rel);
        }
    }

    #[test]
    fn spiral_arc_length_endpoint_bias_stays_small_at_production_sampling() {
        let k = spiral_k();
        for turns in [1_u32, 5, 10] {
            let segments = turns as usize * SPIRAL_SEGMENTS_PER_TURN;
            let numeric = spiral_arc_length(turns, k, SPIRAL_BASE_RADIUS, segments);
            let analytic = analytic_arc_length(turns, k, SPIRAL_BASE_RADIUS);
            let rel = (numeric - analytic).abs() / analytic;
            // The extra endpoint sample biases the sum high by roughly one
            // part in `segments`.
            assert!(numeric > analytic, "turns {}: bias must be positive", turns);
            assert!(rel < 1e-2, "turns {}: relative error {}", turns, rel);
        }
    }

    #[test]
    fn spiral_arc_length_monotonic_in_turns() {
        let k = spiral_k();
        let mut last = 0.0;
        for turns in 1..=15_u32 {
            let segments = turns as usize * SPIRAL_SEGMENTS_PER_TURN;
            let length = spiral_arc_length(turns, k, SPIRAL_BASE_RADIUS, segments);
            assert!(length > last);
            last = length;
        }
    }

    #[test]
    fn spiral_radius_grows_with_theta() {
        let mesh = spiral_ribbon(4.0);
        // Radius at the strip centerline near the start vs near the end.
        let first = mesh.verts.first().unwrap().0;
        let last = mesh.verts.last().unwrap().0;
        let r0 = (first.x * first.x + first.y * first.y).sqrt();
        let r1 = (last.x * last.x + last.y * last.y).sqrt();
        assert!(r1 > r0 + spiral_pitch() * (SPIRAL_TURNS - 1) as f32 * 0.9);
    }

    #[test]
    fn spiral_u_is_monotonic_along_the_ribbon() {
        let mesh = spiral_ribbon(4.0);
        // Bottom-left corner of each quad appears every 6 vertices.
        let mut last_u = -1.0;
        for quad in mesh.verts.chunks(6) {
            let u = quad[0].1.x;
            assert!(u >= last_u);
            last_u = u;
        }
        let u_repeat = spiral_u_repeat(4.0);
        let max_u = mesh.verts.iter().map(|(_, uv)| uv.x).fold(0.0, f32::max);
        assert!((max_u - u_repeat).abs() < 1e-3 * u_repeat);
    }

    #[test]
    fn viewport_aspect_picks_layout_density() {
        assert_eq!(ring_count(16.0 / 9.0), 16);
        assert_eq!(ring_count(0.6), 10);
        assert_eq!(grid_dims(16.0 / 9.0), (14, 8));
        assert_eq!(grid_dims(0.6), (6, 10));
    }

    #[test]
    fn grid_is_centered() {
        let (cols, rows) = grid_dims(1.5);
        let mut sum = Vec2::ZERO;
        for r in 0..rows {
            for c in 0..cols {
                sum += cell_position(r, c, cols, rows);
            }
        }
        assert!(sum.length() < 1e-4);
    }
}
