//! The interactive cube: auto-rotation, bobbing and drag rotation.

use crate::config::CubeConfig;
use crate::texture::Texture;
use glam::{EulerRot, Quat, Vec3};
use std::f32::consts::TAU;

/// Number of faces on the cube.
pub const FACE_COUNT: usize = 6;

/// Outward normals in object space, in face index order.
pub const FACE_NORMALS: [Vec3; FACE_COUNT] = [
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::Z,
    Vec3::NEG_Z,
];

/// Material applied to one face.
#[derive(Clone, Debug)]
pub struct FaceMaterial {
    /// Texture file name
    pub name: String,
    pub texture: Texture,
}

/// Pointer drag state owned by the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    pub dragging: bool,
    /// Last pointer coordinate seen by a move
    pub last: (f32, f32),
}

/// Cube transform and materials.
pub struct InteractiveObject {
    /// Euler angles (XYZ order) in radians
    pub rotation: Vec3,
    pub position: Vec3,
    /// Edge length
    pub size: f32,
    pub materials: Vec<FaceMaterial>,
    pub drag: DragState,
    rotation_step: f32,
    bob_base: f32,
    bob_amplitude: f32,
    bob_speed: f64,
    drag_sensitivity: f32,
}

impl InteractiveObject {
    pub fn new(config: &CubeConfig, materials: Vec<FaceMaterial>) -> Self {
        Self {
            rotation: Vec3::ZERO,
            position: Vec3::new(0.0, config.bob_base, 0.0),
            size: config.size,
            materials,
            drag: DragState::default(),
            rotation_step: config.rotation_step,
            bob_base: config.bob_base,
            bob_amplitude: config.bob_amplitude,
            bob_speed: config.bob_speed,
            drag_sensitivity: config.drag_sensitivity,
        }
    }

    pub fn bob_amplitude(&self) -> f32 {
        self.bob_amplitude
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        let (x, y, z) = orientation.normalize().to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }

    /// Adds the fixed step to every Euler component, keeping each angle in
    /// `[0, TAU)` so the step stays representable however long the scene runs.
    pub fn auto_rotate(&mut self) {
        let r = self.rotation + Vec3::splat(self.rotation_step);
        self.rotation = Vec3::new(
            r.x.rem_euclid(TAU),
            r.y.rem_euclid(TAU),
            r.z.rem_euclid(TAU),
        );
    }

    /// Records the pointer position without rotating, e.g. while input is
    /// otherwise ignored.
    pub fn track_pointer(&mut self, x: f32, y: f32) {
        self.drag.last = (x, y);
    }

    /// Sets the height from wall-clock time and returns the displacement from
    /// the base height.
    pub fn bob(&mut self, now_ms: f64) -> f32 {
        let displacement = ((now_ms * self.bob_speed).sin() as f32) * self.bob_amplitude;
        self.position.y = self.bob_base + displacement;
        displacement
    }

    pub fn begin_drag(&mut self) {
        self.drag.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.drag.dragging = false;
    }

    /// Handles a pointer move: while dragging, the pointer delta becomes a
    /// rotation applied before the current orientation. The last pointer
    /// position is updated either way.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let dx = x - self.drag.last.0;
        let dy = y - self.drag.last.1;
        if self.drag.dragging && (dx != 0.0 || dy != 0.0) {
            let delta = Quat::from_euler(
                EulerRot::XYZ,
                (dy * self.drag_sensitivity).to_radians(),
                (dx * self.drag_sensitivity).to_radians(),
                0.0,
            );
            self.set_orientation(delta * self.orientation());
        }
        self.drag.last = (x, y);
    }

    /// World-space corners, indexed by bit pattern (bit 0 = +x, 1 = +y, 2 = +z).
    pub fn corners(&self) -> [Vec3; 8] {
        let orientation = self.orientation();
        let half = self.size * 0.5;
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let local = Vec3::new(
                if i & 1 != 0 { half } else { -half },
                if i & 2 != 0 { half } else { -half },
                if i & 4 != 0 { half } else { -half },
            );
            *corner = self.position + orientation * local;
        }
        corners
    }

    /// Restores the initial orientation.
    pub fn reset(&mut self) {
        self.rotation = Vec3::ZERO;
        self.drag = DragState::default();
    }
}

/// Corner indices of each face as seen from outside: bottom-left,
/// bottom-right, top-right, top-left.
pub const FACE_CORNERS: [[usize; 4]; FACE_COUNT] = [
    [5, 1, 3, 7],
    [0, 4, 6, 2],
    [6, 7, 3, 2],
    [0, 1, 5, 4],
    [4, 5, 7, 6],
    [1, 0, 2, 3],
];

/// Texture coordinates matching the corner order of `FACE_CORNERS`.
pub const FACE_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> InteractiveObject {
        InteractiveObject::new(&CubeConfig::default(), Vec::new())
    }

    #[test]
    fn test_auto_rotation_is_monotonic() {
        let mut cube = cube();
        let mut previous = cube.rotation;
        for _ in 0..100 {
            cube.auto_rotate();
            let step = cube.rotation - previous;
            assert!((step - Vec3::splat(0.001)).abs().max_element() < 1e-6);
            previous = cube.rotation;
        }
    }

    #[test]
    fn test_auto_rotation_keeps_step_at_large_angles() {
        let mut cube = cube();
        cube.rotation = Vec3::splat(40_000.0);
        let before = cube.orientation();
        cube.auto_rotate();
        assert!(cube.rotation.max_element() < TAU && cube.rotation.min_element() >= 0.0);
        // Wrapping does not change the orientation beyond the step itself.
        assert!(cube.orientation().angle_between(before) < 0.01);
        for _ in 0..10 {
            let previous = cube.rotation;
            cube.auto_rotate();
            let step = cube.rotation - previous;
            assert!((step - Vec3::splat(0.001)).abs().max_element() < 1e-5);
        }
    }

    #[test]
    fn test_bob_is_pure_function_of_time() {
        let mut cube = cube();
        let a = cube.bob(1234.0);
        let y = cube.position.y;
        cube.bob(99999.0);
        let b = cube.bob(1234.0);
        assert_eq!(a, b);
        assert_eq!(cube.position.y, y);
        assert!((cube.position.y - (0.8 + a)).abs() < 1e-6);
    }

    #[test]
    fn test_zero_drag_delta_keeps_orientation() {
        let mut cube = cube();
        cube.rotation = Vec3::new(0.3, -0.2, 0.1);
        cube.pointer_moved(40.0, 20.0);
        cube.begin_drag();
        let before = cube.rotation;
        cube.pointer_moved(40.0, 20.0);
        assert_eq!(cube.rotation, before);
    }

    #[test]
    fn test_drag_premultiplies() {
        let mut cube = cube();
        cube.rotation = Vec3::new(0.0, 0.0, 0.4);
        cube.begin_drag();
        cube.pointer_moved(60.0, 0.0);
        let expected =
            Quat::from_rotation_y(30f32.to_radians()) * Quat::from_rotation_z(0.4);
        assert!(cube.orientation().angle_between(expected) < 1e-4);
    }

    #[test]
    fn test_hover_without_drag_only_tracks_pointer() {
        let mut cube = cube();
        cube.pointer_moved(10.0, 10.0);
        assert_eq!(cube.rotation, Vec3::ZERO);
        assert_eq!(cube.drag.last, (10.0, 10.0));
        cube.end_drag();
        assert!(!cube.drag.dragging);
    }

    #[test]
    fn test_first_drag_move_measures_from_origin() {
        let mut cube = cube();
        cube.begin_drag();
        cube.pointer_moved(20.0, 0.0);
        let expected = Quat::from_rotation_y(10f32.to_radians());
        assert!(cube.orientation().angle_between(expected) < 1e-4);
    }

    #[test]
    fn test_track_pointer_never_rotates() {
        let mut cube = cube();
        cube.begin_drag();
        cube.track_pointer(300.0, 200.0);
        assert_eq!(cube.rotation, Vec3::ZERO);
        cube.pointer_moved(302.0, 200.0);
        let expected = Quat::from_rotation_y(1f32.to_radians());
        assert!(cube.orientation().angle_between(expected) < 1e-4);
    }

    #[test]
    fn test_corners_span_size() {
        let cube = cube();
        let corners = cube.corners();
        assert!(corners[0].abs_diff_eq(Vec3::new(-5.0, -4.2, -5.0), 1e-5));
        assert!(corners[7].abs_diff_eq(Vec3::new(5.0, 5.8, 5.0), 1e-5));
    }
}
