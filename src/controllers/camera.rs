// src/controllers/camera.rs
//
// Orbiting camera over a spherical parameterization. Pointer drags feed
// yaw/pitch or pan deltas depending on the drag mode; pitch and radius are
// clamped so the view can neither flip over the poles nor zoom into
// degenerate range.

use nannou::prelude::*;

const ORBIT_RATE: f32 = 0.005;
const PAN_RATE: f32 = 0.0018;
const PITCH_LIMIT: f32 = 1.35;
const RADIUS_MIN: f32 = 4.0;
const RADIUS_MAX: f32 = 24.0;
const DEFAULT_RADIUS: f32 = 10.0;

const FOV_Y: f32 = 40.0 * std::f32::consts::PI / 180.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    None,
    Rotate,
    Pan,
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
    pub target: Vec3,
    pub drag: DragMode,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            radius: DEFAULT_RADIUS,
            target: Vec3::ZERO,
            drag: DragMode::None,
        }
    }

    pub fn begin_rotate(&mut self) {
        self.drag = DragMode::Rotate;
    }

    pub fn begin_pan(&mut self) {
        self.drag = DragMode::Pan;
    }

    pub fn end_drag(&mut self) {
        self.drag = DragMode::None;
    }

    /// Applies a pointer movement in pixels according to the drag mode.
    pub fn pointer_delta(&mut self, dx: f32, dy: f32) {
        match self.drag {
            DragMode::Rotate => {
                self.yaw += dx * ORBIT_RATE;
                self.pitch = (self.pitch + dy * ORBIT_RATE).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            }
            DragMode::Pan => {
                let forward = (self.target - self.eye()).normalize();
                let right = forward.cross(Vec3::Y).normalize();
                let up = right.cross(forward);
                self.target += (-dx * right + dy * up) * self.radius * PAN_RATE;
            }
            DragMode::None => {}
        }
    }

    pub fn zoom(&mut self, delta: f32) {
        self.radius = (self.radius - delta).clamp(RADIUS_MIN, RADIUS_MAX);
    }

    pub fn reset(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.radius = DEFAULT_RADIUS;
        self.target = Vec3::ZERO;
    }

    /// Camera world position on the orbit sphere, always looking at target.
    pub fn eye(&self) -> Vec3 {
        self.target
            + self.radius
                * vec3(
                    self.yaw.sin() * self.pitch.cos(),
                    self.pitch.sin(),
                    self.yaw.cos() * self.pitch.cos(),
                )
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y, aspect, Z_NEAR, Z_FAR)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.proj(aspect) * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_clamps_under_cumulative_drag() {
        let mut cam = OrbitCamera::new();
        cam.begin_rotate();
        for _ in 0..10_000 {
            cam.pointer_delta(3.0, 40.0);
        }
        assert!(cam.pitch <= PITCH_LIMIT);
        for _ in 0..10_000 {
            cam.pointer_delta(0.0, -40.0);
        }
        assert!(cam.pitch >= -PITCH_LIMIT);
    }

    #[test]
    fn radius_clamps_under_cumulative_scroll() {
        let mut cam = OrbitCamera::new();
        for _ in 0..1_000 {
            cam.zoom(5.0);
        }
        assert_eq!(cam.radius, RADIUS_MIN);
        for _ in 0..1_000 {
            cam.zoom(-5.0);
        }
        assert_eq!(cam.radius, RADIUS_MAX);
    }

    #[test]
    fn drag_state_machine_transitions() {
        let mut cam = OrbitCamera::new();
        assert_eq!(cam.drag, DragMode::None);
        // Motion without a held button does nothing.
        cam.pointer_delta(100.0, 100.0);
        assert_eq!(cam.yaw, 0.0);

        cam.begin_rotate();
        cam.pointer_delta(10.0, 0.0);
        assert!((cam.yaw - 10.0 * ORBIT_RATE).abs() < 1e-6);

        cam.end_drag();
        cam.begin_pan();
        cam.pointer_delta(10.0, 0.0);
        assert!(cam.target.length() > 0.0);
        cam.end_drag();
        assert_eq!(cam.drag, DragMode::None);
    }

    #[test]
    fn reset_restores_the_default_view() {
        let mut cam = OrbitCamera::new();
        cam.begin_rotate();
        cam.pointer_delta(300.0, 150.0);
        cam.zoom(4.0);
        cam.end_drag();
        cam.begin_pan();
        cam.pointer_delta(40.0, -25.0);
        cam.reset();
        assert_eq!(cam.yaw, 0.0);
        assert_eq!(cam.pitch, 0.0);
        assert_eq!(cam.radius, DEFAULT_RADIUS);
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn eye_sits_on_the_orbit_sphere() {
        let mut cam = OrbitCamera::new();
        assert!((cam.eye() - vec3(0.0, 0.0, DEFAULT_RADIUS)).length() < 1e-5);

        cam.begin_rotate();
        cam.pointer_delta(123.0, -57.0);
        let dist = (cam.eye() - cam.target).length();
        assert!((dist - cam.radius).abs() < 1e-4);
    }

    #[test]
    fn view_matrix_centers_the_target() {
        let mut cam = OrbitCamera::new();
        cam.begin_rotate();
        cam.pointer_delta(200.0, 80.0);
        let centered = cam.view().transform_point3(cam.target);
        assert!(centered.x.abs() < 1e-4);
        assert!(centered.y.abs() < 1e-4);
        assert!((centered.z + cam.radius).abs() < 1e-3);
    }
}
