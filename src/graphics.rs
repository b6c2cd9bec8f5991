use crate::color::Rgb;
use crate::math::{apply_lighting, calculate_light_intensity, edge_function};
use crate::texture::Texture;
use crate::vertex::Vertex;
use glam::Vec3;

/// Colour and depth buffers
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub color: Vec<Rgb>,
    pub depth: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            color: vec![Rgb::BLACK; width * height],
            depth: vec![f32::INFINITY; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.color.resize(width * height, Rgb::BLACK);
        self.depth.resize(width * height, f32::INFINITY);
    }

    pub fn clear(&mut self, color: Rgb) {
        self.color.fill(color);
        self.depth.fill(f32::INFINITY);
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.color[y * self.width + x]
    }

    /// Writes an opaque pixel if it is nearer than what is stored.
    pub fn plot(&mut self, x: usize, y: usize, depth: f32, color: Rgb) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let offset = y * self.width + x;
        if depth < self.depth[offset] {
            self.depth[offset] = depth;
            self.color[offset] = color;
            true
        } else {
            false
        }
    }

    /// Blends a translucent point over the pixel without writing depth.
    pub fn blend(&mut self, x: f32, y: f32, depth: f32, color: Rgb, opacity: f32) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = y * self.width + x;
        if depth < self.depth[offset] {
            self.color[offset] = self.color[offset].lerp(color, opacity);
        }
    }
}

/// How a triangle is lit
#[derive(Clone, Copy, Debug)]
pub enum Shading {
    /// Texture colour as is
    Unlit,
    /// Diffuse lighting from a point light
    Lit { normal: Vec3, light_pos: Vec3 },
}

/// Draws a textured triangle with a depth test
pub fn draw_triangle(
    v0: &Vertex,
    v1: &Vertex,
    v2: &Vertex,
    frame: &mut FrameBuffer,
    texture: &Texture,
    shading: Shading,
) {
    if frame.width == 0 || frame.height == 0 {
        return;
    }

    // Compute bounding box of the triangle
    let min_x = v0.screen_position[0]
        .min(v1.screen_position[0])
        .min(v2.screen_position[0])
        .floor()
        .max(0.0) as usize;
    let max_x = v0.screen_position[0]
        .max(v1.screen_position[0])
        .max(v2.screen_position[0])
        .ceil()
        .min(frame.width as f32 - 1.0);
    let min_y = v0.screen_position[1]
        .min(v1.screen_position[1])
        .min(v2.screen_position[1])
        .floor()
        .max(0.0) as usize;
    let max_y = v0.screen_position[1]
        .max(v1.screen_position[1])
        .max(v2.screen_position[1])
        .ceil()
        .min(frame.height as f32 - 1.0);
    if max_x < 0.0 || max_y < 0.0 {
        return;
    }
    let (max_x, max_y) = (max_x as usize, max_y as usize);

    // Precompute area of the triangle; either winding is accepted
    let area = edge_function(&v0.screen_position, &v1.screen_position, &v2.screen_position);
    if area.abs() < f32::EPSILON {
        return;
    }

    let inv_depth = [1.0 / v0.depth, 1.0 / v1.depth, 1.0 / v2.depth];

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = [x as f32 + 0.5, y as f32 + 0.5];

            // Normalize barycentric coordinates
            let w0 = edge_function(&v1.screen_position, &v2.screen_position, &p) / area;
            let w1 = edge_function(&v2.screen_position, &v0.screen_position, &p) / area;
            let w2 = edge_function(&v0.screen_position, &v1.screen_position, &p) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            // Perspective-correct weights
            let q0 = w0 * inv_depth[0];
            let q1 = w1 * inv_depth[1];
            let q2 = w2 * inv_depth[2];
            let q = q0 + q1 + q2;
            let depth = 1.0 / q;
            let (q0, q1, q2) = (q0 / q, q1 / q, q2 / q);

            let offset = y * frame.width + x;
            if depth >= frame.depth[offset] {
                continue;
            }

            let u = v0.uv[0] * q0 + v1.uv[0] * q1 + v2.uv[0] * q2;
            let v = v0.uv[1] * q0 + v1.uv[1] * q1 + v2.uv[1] * q2;
            let base_color = texture.sample(u, v);

            let color = match shading {
                Shading::Unlit => base_color,
                Shading::Lit { normal, light_pos } => {
                    let position = v0.position * q0 + v1.position * q1 + v2.position * q2;
                    let intensity = calculate_light_intensity(normal, position, light_pos);
                    apply_lighting(base_color, intensity)
                }
            };

            frame.depth[offset] = depth;
            frame.color[offset] = color;
        }
    }
}

/// Draws a line between two points in the pixel buffer using Bresenham's algorithm
pub fn draw_line(x0: f32, y0: f32, x1: f32, y1: f32, frame: &mut FrameBuffer, color: Rgb) {
    let (mut x0, mut y0, x1, y1) = (
        x0.round() as isize,
        y0.round() as isize,
        x1.round() as isize,
        y1.round() as isize,
    );
    let width = frame.width as isize;
    let height = frame.height as isize;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    // Endpoints projected far off screen are not worth walking
    let steps = (dx - dy) as usize + 1;
    for _ in 0..steps.min(1 << 16) {
        if x0 >= 0 && x0 < width && y0 >= 0 && y0 < height {
            let offset = y0 as usize * frame.width + x0 as usize;
            frame.color[offset] = color;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
