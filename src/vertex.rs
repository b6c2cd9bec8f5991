use glam::Vec3;

/// Projected vertex with world position, screen position, view depth and
/// texture coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub screen_position: [f32; 2],
    pub depth: f32,
    pub uv: [f32; 2],
}
