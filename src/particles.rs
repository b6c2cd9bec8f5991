//! Ambient particle field bouncing inside a cube.

use crate::config::ParticleConfig;
use glam::Vec3;
use rand::Rng;

/// A single floating particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticlePoint {
    pub position: Vec3,
    /// Displacement per tick
    pub velocity: Vec3,
}

impl ParticlePoint {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }
}

/// Fixed-size set of points reflected off the faces of `[-bound, bound]^3`.
pub struct ParticleField {
    pub points: Vec<ParticlePoint>,
    pub bound: f32,
}

impl ParticleField {
    /// Builds a field from explicit points.
    pub fn from_points(points: Vec<ParticlePoint>, bound: f32) -> Self {
        Self { points, bound }
    }

    /// Scatters `config.count` points uniformly through the bounding cube.
    ///
    /// A bound or speed that is not a positive finite number yields points at
    /// the origin or at rest respectively.
    pub fn random<R: Rng>(config: &ParticleConfig, rng: &mut R) -> Self {
        let bound = config.bound;
        let speed = config.max_speed;
        let points = (0..config.count)
            .map(|_| {
                let position = if bound.is_finite() && bound > 0.0 {
                    Vec3::new(
                        rng.gen_range(-bound..=bound),
                        rng.gen_range(-bound..=bound),
                        rng.gen_range(-bound..=bound),
                    )
                } else {
                    Vec3::ZERO
                };
                let velocity = if speed.is_finite() && speed > 0.0 {
                    Vec3::new(
                        rng.gen_range(-speed..speed),
                        rng.gen_range(-speed..speed),
                        rng.gen_range(-speed..speed),
                    )
                } else {
                    Vec3::ZERO
                };
                ParticlePoint::new(position, velocity)
            })
            .collect();
        Self { points, bound }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Advances every point by its velocity and bounces it off the walls.
    ///
    /// A coordinate that ends up outside the bound is left where it is; only
    /// the matching velocity component changes sign, so a point may sit up to
    /// one step past a wall for a single tick.
    pub fn update(&mut self) {
        let bound = self.bound;
        for point in self.points.iter_mut() {
            point.position += point.velocity;
            for axis in 0..3 {
                if point.position[axis] > bound || point.position[axis] < -bound {
                    point.velocity[axis] = -point.velocity[axis];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_field_starts_inside_bounds() {
        let config = ParticleConfig {
            count: 500,
            bound: 100.0,
            max_speed: 0.1,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let field = ParticleField::random(&config, &mut rng);
        assert_eq!(field.len(), 500);
        for p in &field.points {
            assert!(p.position.abs().max_element() <= 100.0);
            assert!(p.velocity.abs().max_element() <= 0.1);
        }
    }

    #[test]
    fn test_degenerate_config_does_not_panic() {
        let mut rng = StdRng::seed_from_u64(3);
        let cases = [
            (0.0, 0.1),
            (-5.0, 0.1),
            (f32::NAN, f32::NAN),
            (100.0, f32::INFINITY),
        ];
        for (bound, max_speed) in cases {
            let config = ParticleConfig {
                count: 4,
                bound,
                max_speed,
            };
            let field = ParticleField::random(&config, &mut rng);
            assert_eq!(field.len(), 4);
            for point in &field.points {
                assert!(point.position.is_finite() && point.velocity.is_finite());
            }
        }
    }

    #[test]
    fn test_bounce_flips_only_crossing_axis() {
        let mut field = ParticleField::from_points(
            vec![ParticlePoint::new(
                Vec3::new(99.95, 0.0, -99.95),
                Vec3::new(0.1, 0.1, 0.01),
            )],
            100.0,
        );
        field.update();
        let p = field.points[0];
        assert!(p.position.x > 100.0, "position is not re-clamped");
        assert_eq!(p.velocity, Vec3::new(-0.1, 0.1, 0.01));

        field.update();
        let p = field.points[0];
        assert!(p.position.x <= 100.0);
        assert_eq!(p.velocity.x, -0.1, "no second flip after coming back");
    }

    #[test]
    fn test_negative_wall_bounce() {
        let mut field = ParticleField::from_points(
            vec![ParticlePoint::new(
                Vec3::new(0.0, -99.98, 0.0),
                Vec3::new(0.0, -0.05, 0.0),
            )],
            100.0,
        );
        field.update();
        assert_eq!(field.points[0].velocity.y, 0.05);
    }

    #[test]
    fn test_stationary_particle_stays_put() {
        let mut field =
            ParticleField::from_points(vec![ParticlePoint::new(Vec3::ONE, Vec3::ZERO)], 100.0);
        for _ in 0..10 {
            field.update();
        }
        assert_eq!(field.points[0].position, Vec3::ONE);
    }
}
