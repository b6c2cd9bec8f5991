use crate::config::CameraConfig;
use glam::{Mat4, Vec2, Vec3};

/// A half-line from `origin` along unit `direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Perspective camera looking down -Z.
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    view_projection: Mat4,
    inverse_view_projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            position: Vec3::from_array(config.position),
            fov: config.fov_degrees.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
            view_projection: Mat4::IDENTITY,
            inverse_view_projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Recomputes cached matrices; call after changing any parameter.
    pub fn update_projection_matrix(&mut self) {
        self.view_projection = self.projection_matrix() * self.view_matrix();
        self.inverse_view_projection = self.view_projection.inverse();
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
            self.update_projection_matrix();
        }
    }

    /// World position to normalized device coordinates and view depth.
    ///
    /// Returns `None` for points behind the camera.
    pub fn project(&self, point: Vec3) -> Option<(Vec2, f32)> {
        let clip = self.view_projection * point.extend(1.0);
        if clip.w <= self.near {
            return None;
        }
        Some((Vec2::new(clip.x / clip.w, clip.y / clip.w), clip.w))
    }

    /// Pick ray through normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let near = self
            .inverse_view_projection
            .project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = self
            .inverse_view_projection
            .project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray {
            origin: self.position,
            direction: (far - near).normalize_or_zero(),
        }
    }
}

/// Maps a pointer position in a `width` x `height` viewport to normalized
/// device coordinates, y up.
pub fn pointer_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

/// Maps normalized device coordinates to a `width` x `height` pixel grid.
pub fn ndc_to_screen(ndc: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height)
}
