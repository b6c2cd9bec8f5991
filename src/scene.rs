//! The animated scene and its per-tick update.

use crate::camera::PerspectiveCamera;
use crate::config::SceneConfig;
use crate::cube::{FaceMaterial, InteractiveObject};
use crate::particles::ParticleField;
use crate::splash::SplashEmitter;
use crate::texture::Texture;
use crate::water::WaterSurface;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// What happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Bob displacement from the base height
    pub displacement: f32,
    pub splashed: bool,
}

pub struct Scene {
    pub camera: PerspectiveCamera,
    pub cube: InteractiveObject,
    pub water: WaterSurface,
    pub splash: SplashEmitter,
    pub particles: ParticleField,
    pub light_position: Vec3,
    /// Ticks run so far
    pub ticks: u64,
    rng: StdRng,
}

impl Scene {
    pub fn new(
        config: &SceneConfig,
        materials: Vec<FaceMaterial>,
        water_normals: Option<Texture>,
        aspect: f32,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let light_position = Vec3::from_array(config.light_position);
        let particles = ParticleField::random(&config.particles, &mut rng);
        log::info!(
            "Scene ready: {} particles, {} splash points, seed {}",
            particles.len(),
            config.splash.count,
            seed
        );
        Self {
            camera: PerspectiveCamera::new(&config.camera, aspect),
            cube: InteractiveObject::new(&config.cube, materials),
            water: WaterSurface::new(&config.water, light_position, water_normals),
            splash: SplashEmitter::new(&config.splash),
            particles,
            light_position,
            ticks: 0,
            rng,
        }
    }

    /// Advances everything by one tick, in order: water time, cube rotation
    /// and bob, splash trigger, splash fall, particles.
    pub fn tick(&mut self, now_ms: f64) -> TickReport {
        self.water.advance();

        self.cube.auto_rotate();
        let displacement = self.cube.bob(now_ms);

        let splashed = self
            .splash
            .trigger
            .evaluate(displacement, self.cube.bob_amplitude());
        if splashed {
            log::trace!("Splash at tick {}", self.ticks);
            self.splash.trigger(self.cube.position, &mut self.rng);
        }
        self.splash.fall(self.cube.position.y);

        self.particles.update();

        self.ticks += 1;
        TickReport {
            displacement,
            splashed,
        }
    }

    /// Keeps the projection in step with the viewport.
    pub fn resize(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }
}
