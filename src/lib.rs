//! Console rendition of an animated portfolio scene: a textured cube bobbing
//! and spinning above animated water, drifting particles, a splash effect,
//! drag rotation, face picking and a navigation menu.

pub mod camera;
pub mod color;
pub mod config;
pub mod cube;
pub mod graphics;
pub mod math;
pub mod menu;
pub mod particles;
pub mod picking;
pub mod scene;
pub mod scheduler;
pub mod splash;
pub mod state;
pub mod terminal;
pub mod texture;
pub mod vertex;
pub mod water;
pub mod widget;
