//! Animated water plane.
//!
//! The surface is a horizontal plane at `level` whose normals are perturbed
//! by four scrolling samples of a normal map, driven by a time uniform. When
//! no normal map is available a sum of travelling sine waves stands in.

use crate::color::Rgb;
use crate::config::WaterConfig;
use crate::texture::Texture;
use glam::{Vec2, Vec3};
use std::f64::consts::TAU;

/// Colour reflected by the surface where the mirror image would be.
pub const SKY_COLOR: Rgb = Rgb::new(6, 10, 28);

/// Fresnel reflectance at normal incidence.
const RF0: f32 = 0.3;
const SHININESS: f32 = 100.0;
const SPECULAR: f32 = 2.0;
const DIFFUSE: f32 = 0.5;

/// Procedural wave: direction, wavelength, amplitude, speed.
const WAVES: [(Vec2, f32, f32, f32); 3] = [
    (Vec2::new(1.0, 0.0), 9.0, 0.35, 1.3),
    (Vec2::new(0.6, 0.8), 5.0, 0.2, 1.9),
    (Vec2::new(-0.4, 0.9), 2.5, 0.08, 2.7),
];

pub struct WaterSurface {
    /// Time uniform. Kept in f64 so the step survives long sessions; phases
    /// are reduced before narrowing.
    pub time: f64,
    pub time_step: f32,
    pub level: f32,
    pub size: f32,
    pub sun_direction: Vec3,
    pub sun_color: Rgb,
    pub water_color: Rgb,
    pub distortion_scale: f32,
    normals: Option<Texture>,
}

impl WaterSurface {
    pub fn new(config: &WaterConfig, sun_position: Vec3, normals: Option<Texture>) -> Self {
        Self {
            time: 0.0,
            time_step: config.time_step,
            level: config.level,
            size: config.size,
            sun_direction: sun_position.normalize_or_zero(),
            sun_color: Rgb::from_hex(config.sun_color),
            water_color: Rgb::from_hex(config.water_color),
            distortion_scale: config.distortion_scale,
            normals: normals.filter(|t| !t.is_solid()),
        }
    }

    /// Advances the time uniform by one tick.
    pub fn advance(&mut self) {
        self.time += self.time_step as f64;
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let half = self.size * 0.5;
        point.x.abs() <= half && point.z.abs() <= half
    }

    /// Surface normal at world `(x, z)`.
    pub fn normal_at(&self, x: f32, z: f32) -> Vec3 {
        let noise = match &self.normals {
            Some(texture) => self.texture_noise(texture, Vec2::new(x, z)),
            None => self.wave_noise(Vec2::new(x, z)),
        };
        (Vec3::new(noise.x, noise.z, noise.y) * Vec3::new(1.5, 1.0, 1.5)).normalize_or_zero()
    }

    fn texture_noise(&self, texture: &Texture, uv: Vec2) -> Vec3 {
        let scroll = |a: f64, b: f64| Vec2::new(self.scroll(a), self.scroll(b));
        let samples = [
            uv / 103.0 + scroll(17.0, 29.0),
            uv / 107.0 - scroll(-19.0, 31.0),
            uv / Vec2::new(8907.0, 9803.0) + scroll(101.0, 97.0),
            uv / Vec2::new(1091.0, 1027.0) - scroll(109.0, -113.0),
        ];
        let sum = samples.iter().fold(Vec3::ZERO, |acc, s| {
            let c = texture.sample(s.x, s.y);
            acc + Vec3::new(c.r as f32, c.g as f32, c.b as f32) / 255.0
        });
        sum * 0.5 - Vec3::ONE
    }

    /// Texture offset `time / period`, reduced to one repeat.
    fn scroll(&self, period: f64) -> f32 {
        (self.time / period).rem_euclid(1.0) as f32
    }

    /// Same convention as the normal map: x/y tangent, z up.
    fn wave_noise(&self, p: Vec2) -> Vec3 {
        let mut slope = Vec2::ZERO;
        for (direction, wavelength, amplitude, speed) in WAVES {
            let k = std::f32::consts::TAU / wavelength;
            let drift = (speed as f64 * self.time).rem_euclid(TAU) as f32;
            let phase = k * direction.dot(p) - drift;
            slope += direction * (k * amplitude * phase.cos());
        }
        Vec3::new(-slope.x, -slope.y, 1.0)
    }

    /// Colour of the surface at `point` seen along `eye` (unit, pointing from
    /// the surface towards the viewer).
    pub fn shade(&self, point: Vec3, eye: Vec3) -> Rgb {
        let normal = self.normal_at(point.x, point.z);

        let reflection = reflect(-self.sun_direction, normal).normalize_or_zero();
        let direction = eye.dot(reflection).max(0.0);
        let specular = direction.powf(SHININESS) * SPECULAR;
        let diffuse = self.sun_direction.dot(normal).max(0.0) * DIFFUSE;

        let distortion = (normal.x + normal.z) * self.distortion_scale * 0.05;
        let theta = eye.dot(normal).max(0.0);
        let reflectance = RF0 + (1.0 - RF0) * (1.0 - theta).powi(5);
        let scatter = self.water_color.scale(normal.dot(eye).max(0.0));

        let body = self.sun_color.scale(diffuse * 0.3).add(scatter);
        let mirror = Rgb::new(25, 25, 25)
            .add(SKY_COLOR.scale(0.9 + distortion))
            .add(self.sun_color.scale(specular));
        body.lerp(mirror, reflectance)
    }
}

fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> WaterSurface {
        WaterSurface::new(&WaterConfig::default(), Vec3::new(5.0, 5.0, 5.0), None)
    }

    #[test]
    fn test_time_advances_by_step() {
        let mut water = water();
        for _ in 0..50 {
            water.advance();
        }
        assert!((water.time - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_time_step_survives_long_sessions() {
        let mut water = water();
        water.time = 1.0e6;
        water.advance();
        assert!((water.time - 1.0e6 - 0.02).abs() < 1e-6);

        let before = water.normal_at(3.0, 4.0);
        for _ in 0..5 {
            water.advance();
        }
        assert!(water.normal_at(3.0, 4.0) != before);
        assert!(water.normal_at(3.0, 4.0).y > 0.0);
    }

    #[test]
    fn test_normals_point_up() {
        let mut water = water();
        for i in 0..20 {
            water.advance();
            let n = water.normal_at(i as f32 * 3.7, -(i as f32) * 1.3);
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(n.y > 0.0);
        }
    }

    #[test]
    fn test_normal_map_used_when_present() {
        let flat = Texture::from_pixels(
            2,
            1,
            vec![Rgb::new(128, 128, 255), Rgb::new(128, 128, 255)],
        );
        let water = WaterSurface::new(&WaterConfig::default(), Vec3::Y, Some(flat));
        let n = water.normal_at(12.0, 40.0);
        assert!(n.y > 0.99, "flat normal map gives an upward normal, got {n}");
    }

    #[test]
    fn test_solid_normal_map_ignored() {
        let water = WaterSurface::new(
            &WaterConfig::default(),
            Vec3::Y,
            Some(Texture::solid(Rgb::BLACK)),
        );
        assert!(water.normal_at(0.0, 0.0).y > 0.0);
    }

    #[test]
    fn test_plane_extent() {
        let water = water();
        assert!(water.contains(Vec3::new(49_999.0, 1.0, -49_999.0)));
        assert!(!water.contains(Vec3::new(50_001.0, 1.0, 0.0)));
    }
}
