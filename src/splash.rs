//! Splash effect: a small burst of points around the cube that rains down.

use crate::config::{SplashConfig, TriggerMode};
use glam::Vec3;
use rand::Rng;

/// Decides on each tick whether the splash should fire.
///
/// The window is `|displacement + amplitude| < tolerance`, i.e. the bottom of
/// the bob cycle.
#[derive(Debug, Clone)]
pub struct SplashTrigger {
    pub mode: TriggerMode,
    pub tolerance: f32,
    /// Edge mode only: set while the bob is inside the window
    latched: bool,
}

impl SplashTrigger {
    pub fn new(mode: TriggerMode, tolerance: f32) -> Self {
        Self {
            mode,
            tolerance,
            latched: false,
        }
    }

    /// Returns true when the splash should fire on this tick.
    pub fn evaluate(&mut self, displacement: f32, amplitude: f32) -> bool {
        let inside = (displacement + amplitude).abs() < self.tolerance;
        match self.mode {
            TriggerMode::Level => inside,
            TriggerMode::Edge => {
                let fire = inside && !self.latched;
                self.latched = inside;
                fire
            }
        }
    }
}

/// Fixed-size set of splash points.
pub struct SplashEmitter {
    pub points: Vec<Vec3>,
    pub spread_horizontal: f32,
    pub spread_vertical: f32,
    pub fall_step: f32,
    pub trigger: SplashTrigger,
}

impl SplashEmitter {
    /// All points start at the origin.
    pub fn new(config: &SplashConfig) -> Self {
        Self {
            points: vec![Vec3::ZERO; config.count],
            spread_horizontal: config.spread_horizontal,
            spread_vertical: config.spread_vertical,
            fall_step: config.fall_step,
            trigger: SplashTrigger::new(config.trigger, config.trigger_tolerance),
        }
    }

    /// Scatters every point around `reference`.
    pub fn trigger<R: Rng>(&mut self, reference: Vec3, rng: &mut R) {
        let h = self.spread_horizontal;
        let v = self.spread_vertical;
        for point in self.points.iter_mut() {
            *point = reference
                + Vec3::new(
                    (rng.gen::<f32>() - 0.5) * h,
                    (rng.gen::<f32>() - 0.5) * v,
                    (rng.gen::<f32>() - 0.5) * h,
                );
        }
    }

    /// Lowers every point; one that drops below zero is recycled at
    /// `reference_y`.
    pub fn fall(&mut self, reference_y: f32) {
        for point in self.points.iter_mut() {
            point.y -= self.fall_step;
            if point.y < 0.0 {
                point.y = reference_y;
            }
        }
    }
}
