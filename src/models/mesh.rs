// src/models/mesh.rs
//
// CPU-side triangle meshes for the scene primitives. Everything is a flat
// triangle list of (position, uv) pairs so the draw path can project the
// vertices and hand them straight to nannou's textured mesh API.

use nannou::prelude::*;
use std::f32::consts::PI;

#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub verts: Vec<(Vec3, Vec2)>,
}

impl MeshData {
    pub fn with_capacity(tris: usize) -> Self {
        Self {
            verts: Vec::with_capacity(tris * 3),
        }
    }

    pub fn push_tri(&mut self, a: (Vec3, Vec2), b: (Vec3, Vec2), c: (Vec3, Vec2)) {
        self.verts.push(a);
        self.verts.push(b);
        self.verts.push(c);
    }

    pub fn push_quad(
        &mut self,
        a: (Vec3, Vec2),
        b: (Vec3, Vec2),
        c: (Vec3, Vec2),
        d: (Vec3, Vec2),
    ) {
        self.push_tri(a, b, c);
        self.push_tri(a, c, d);
    }

    pub fn tri_count(&self) -> usize {
        self.verts.len() / 3
    }
}

/// An axis-aligned cuboid centered at the origin. Every face maps the full
/// texture so a glyph shows on all six sides.
pub fn unit_box(size: f32) -> MeshData {
    let h = size / 2.0;
    let mut mesh = MeshData::with_capacity(12);

    let uv = [
        vec2(0.0, 0.0),
        vec2(1.0, 0.0),
        vec2(1.0, 1.0),
        vec2(0.0, 1.0),
    ];

    // (corner order: bottom-left, bottom-right, top-right, top-left as seen
    // looking at the face from outside)
    let faces: [[Vec3; 4]; 6] = [
        // +z
        [
            vec3(-h, -h, h),
            vec3(h, -h, h),
            vec3(h, h, h),
            vec3(-h, h, h),
        ],
        // -z
        [
            vec3(h, -h, -h),
            vec3(-h, -h, -h),
            vec3(-h, h, -h),
            vec3(h, h, -h),
        ],
        // +x
        [
            vec3(h, -h, h),
            vec3(h, -h, -h),
            vec3(h, h, -h),
            vec3(h, h, h),
        ],
        // -x
        [
            vec3(-h, -h, -h),
            vec3(-h, -h, h),
            vec3(-h, h, h),
            vec3(-h, h, -h),
        ],
        // +y
        [
            vec3(-h, h, h),
            vec3(h, h, h),
            vec3(h, h, -h),
            vec3(-h, h, -h),
        ],
        // -y
        [
            vec3(-h, -h, -h),
            vec3(h, -h, -h),
            vec3(h, -h, h),
            vec3(-h, -h, h),
        ],
    ];

    for face in &faces {
        mesh.push_quad(
            (face[0], uv[0]),
            (face[1], uv[1]),
            (face[2], uv[2]),
            (face[3], uv[3]),
        );
    }
    mesh
}

/// A closed cylinder along the y axis, centered at the origin. The side
/// wraps the texture once around; the caps map it as an inscribed disc.
pub fn cylinder(radius: f32, height: f32, segments: usize) -> MeshData {
    let h = height / 2.0;
    let mut mesh = MeshData::with_capacity(segments * 4);

    for i in 0..segments {
        let t0 = i as f32 / segments as f32;
        let t1 = (i + 1) as f32 / segments as f32;
        let a0 = t0 * 2.0 * PI;
        let a1 = t1 * 2.0 * PI;
        let (x0, z0) = (radius * a0.cos(), radius * a0.sin());
        let (x1, z1) = (radius * a1.cos(), radius * a1.sin());

        // side
        mesh.push_quad(
            (vec3(x0, -h, z0), vec2(t0, 0.0)),
            (vec3(x1, -h, z1), vec2(t1, 0.0)),
            (vec3(x1, h, z1), vec2(t1, 1.0)),
            (vec3(x0, h, z0), vec2(t0, 1.0)),
        );

        // caps, fanned from the center with disc uvs
        let uv_center = vec2(0.5, 0.5);
        let uv0 = vec2(0.5 + 0.5 * a0.cos(), 0.5 + 0.5 * a0.sin());
        let uv1 = vec2(0.5 + 0.5 * a1.cos(), 0.5 + 0.5 * a1.sin());
        mesh.push_tri(
            (vec3(0.0, h, 0.0), uv_center),
            (vec3(x0, h, z0), uv0),
            (vec3(x1, h, z1), uv1),
        );
        mesh.push_tri(
            (vec3(0.0, -h, 0.0), uv_center),
            (vec3(x1, -h, z1), uv1),
            (vec3(x0, -h, z0), uv0),
        );
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_twelve_triangles() {
        let mesh = unit_box(0.5);
        assert_eq!(mesh.tri_count(), 12);
        for (p, uv) in &mesh.verts {
            assert!(p.x.abs() <= 0.25 + 1e-6);
            assert!(p.y.abs() <= 0.25 + 1e-6);
            assert!(p.z.abs() <= 0.25 + 1e-6);
            assert!((0.0..=1.0).contains(&uv.x));
            assert!((0.0..=1.0).contains(&uv.y));
        }
    }

    #[test]
    fn cylinder_stays_inside_bounds() {
        let mesh = cylinder(0.25, 0.5, 32);
        assert_eq!(mesh.tri_count(), 32 * 4);
        for (p, _) in &mesh.verts {
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            assert!(radial <= 0.25 + 1e-5);
            assert!(p.y.abs() <= 0.25 + 1e-6);
        }
    }
}
