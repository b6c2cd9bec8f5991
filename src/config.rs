//! Scene configuration.
//!
//! Every tunable of the scene lives here with the values the page shipped
//! with as defaults. A RON file may override any subset of fields; command
//! line flags are applied on top of that in `main`.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// How the splash trigger reacts to the bob window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Fire on every tick spent inside the window.
    Level,
    /// Fire once on entering the window, re-arm after leaving it.
    Edge,
}

/// Which pointer notification drives face picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PickTrigger {
    /// Pick on every pointer movement.
    Move,
    /// Pick only on pointer-down.
    Click,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    /// Half extent of the bounding cube
    pub bound: f32,
    /// Largest magnitude of a velocity component per tick
    pub max_speed: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 100_000,
            bound: 100.0,
            max_speed: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SplashConfig {
    pub count: usize,
    /// Full width of the x/z offset range
    pub spread_horizontal: f32,
    /// Full width of the y offset range
    pub spread_vertical: f32,
    pub fall_step: f32,
    /// Distance from the lowest bob displacement that counts as a hit
    pub trigger_tolerance: f32,
    pub trigger: TriggerMode,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            count: 100,
            spread_horizontal: 12.0,
            spread_vertical: 2.0,
            fall_step: 1.0,
            trigger_tolerance: 0.1,
            trigger: TriggerMode::Level,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    /// Edge length
    pub size: f32,
    /// Radians added to each Euler component per tick
    pub rotation_step: f32,
    pub bob_base: f32,
    pub bob_amplitude: f32,
    /// Phase advance per wall-clock millisecond
    pub bob_speed: f64,
    /// Degrees of rotation per pointer unit of drag
    pub drag_sensitivity: f32,
    /// Texture file per face, in face index order
    pub faces: [String; 6],
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            size: 10.0,
            rotation_step: 0.001,
            bob_base: 0.8,
            bob_amplitude: 2.0,
            bob_speed: 0.005,
            drag_sensitivity: 0.5,
            faces: [
                "Cplusplus.jpg".to_string(),
                "github.jpg".to_string(),
                "LinkdIn.jpg".to_string(),
                "UofL.jpg".to_string(),
                "blue-robotic-arm.jpg".to_string(),
                "aboutme.jpg".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// Increment of the time uniform per tick
    pub time_step: f32,
    pub level: f32,
    /// Edge length of the water plane
    pub size: f32,
    pub sun_color: u32,
    pub water_color: u32,
    pub distortion_scale: f32,
    pub normals: String,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            time_step: 0.02,
            level: 1.0,
            size: 100_000.0,
            sun_color: 0x175DFF,
            water_color: 0x00309F,
            distortion_scale: 1.0,
            normals: "waternormals.jpg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 10.0, 30.0],
        }
    }
}

/// A cube face that leads somewhere when picked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FaceLink {
    pub face: usize,
    pub page: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Prefix joined with a page to form the final location
    pub site_base: String,
    pub links: Vec<FaceLink>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            site_base: "/WebsiteV2".to_string(),
            links: vec![
                FaceLink {
                    face: 0,
                    page: "page1.html".to_string(),
                },
                FaceLink {
                    face: 1,
                    page: "page2.html".to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuItemConfig {
    pub label: String,
    #[serde(default)]
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Viewport width (columns) at which dropdowns are collapsed
    pub breakpoint: u16,
    pub items: Vec<MenuItemConfig>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        let item = |label: &str, links: &[&str]| MenuItemConfig {
            label: label.to_string(),
            links: links.iter().map(|l| l.to_string()).collect(),
        };
        Self {
            breakpoint: 112,
            items: vec![
                item("Home", &[]),
                item("About", &["Education", "Experience", "Skills"]),
                item("Projects", &["Robotics", "Software", "Research"]),
                item("Contact", &["GitHub", "LinkedIn"]),
            ],
        }
    }
}

/// Complete scene configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub fps: u32,
    /// Directory holding face and water textures
    pub assets: String,
    pub pick_on: PickTrigger,
    /// Pointer units covered by one terminal cell (width, height)
    pub cell_size: [f32; 2],
    pub light_position: [f32; 3],
    pub particles: ParticleConfig,
    pub splash: SplashConfig,
    pub cube: CubeConfig,
    pub water: WaterConfig,
    pub camera: CameraConfig,
    pub navigation: NavigationConfig,
    pub menu: MenuConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            assets: "img/".to_string(),
            pick_on: PickTrigger::Move,
            cell_size: [8.0, 16.0],
            light_position: [5.0, 5.0, 5.0],
            particles: ParticleConfig::default(),
            splash: SplashConfig::default(),
            cube: CubeConfig::default(),
            water: WaterConfig::default(),
            camera: CameraConfig::default(),
            navigation: NavigationConfig::default(),
            menu: MenuConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Parses a configuration from RON text. Missing fields keep defaults.
    pub fn from_ron(contents: &str) -> Result<Self> {
        let config: SceneConfig = ron::de::from_str(contents).context("invalid scene config")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_ron(&contents)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        log::info!("Loaded scene config from {}", path.display());
        Ok(config)
    }

    /// Rejects values the scene cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            bail!("fps must be positive");
        }
        if !(self.particles.bound > 0.0) {
            bail!("particle bound must be positive, got {}", self.particles.bound);
        }
        if !(self.cube.size > 0.0) {
            bail!("cube size must be positive, got {}", self.cube.size);
        }
        if self.cell_size.iter().any(|s| !(*s > 0.0)) {
            bail!("cell size must be positive, got {:?}", self.cell_size);
        }
        if let Some(link) = self.navigation.links.iter().find(|l| l.face >= 6) {
            bail!("face link refers to face {}, a cube has 6", link.face);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page() {
        let config = SceneConfig::default();
        assert_eq!(config.particles.count, 100_000);
        assert_eq!(config.splash.count, 100);
        assert_eq!(config.cube.faces[0], "Cplusplus.jpg");
        assert_eq!(config.splash.trigger, TriggerMode::Level);
        assert_eq!(config.navigation.links.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_keeps_other_defaults() {
        let config = SceneConfig::from_ron(
            "(fps: 30, splash: (trigger: edge), particles: (count: 10))",
        )
        .unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.splash.trigger, TriggerMode::Edge);
        assert_eq!(config.splash.count, 100);
        assert_eq!(config.particles.count, 10);
        assert_eq!(config.particles.bound, 100.0);
        assert_eq!(config.cube.bob_amplitude, 2.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(SceneConfig::from_ron("(fps: 0)").is_err());
        assert!(SceneConfig::from_ron("(particles: (bound: -1.0))").is_err());
        assert!(SceneConfig::from_ron(
            "(navigation: (links: [(face: 7, page: \"x.html\")]))"
        )
        .is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let path = Path::new("/nonexistent/splashcube/scene.ron");
        assert!(SceneConfig::load(Some(path)).is_err());
        assert!(SceneConfig::load(None).is_ok());
    }
}
