use crate::color::Rgb;
use glam::Vec3;

/// Edge function used in rasterization
pub fn edge_function(a: &[f32; 2], b: &[f32; 2], c: &[f32; 2]) -> f32 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Calculates the light intensity based on the normal vector and light position
pub fn calculate_light_intensity(normal: Vec3, position: Vec3, light_pos: Vec3) -> f32 {
    let light_dir = (light_pos - position).normalize_or_zero();
    normal.dot(light_dir).max(0.1) // Ensure a minimum ambient light
}

/// Applies lighting to a color
pub fn apply_lighting(color: Rgb, intensity: f32) -> Rgb {
    color.scale(intensity)
}
