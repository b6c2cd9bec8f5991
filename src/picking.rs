//! Pointer interaction: drag rotation and face picking.
//!
//! A pointer move is delivered to two independent subscribers, the drag
//! rotator and the face picker. Neither depends on the other having run.

use crate::camera::{pointer_to_ndc, PerspectiveCamera, Ray};
use crate::config::{NavigationConfig, PickTrigger};
use crate::cube::{InteractiveObject, FACE_COUNT};
use glam::Vec3;

/// Pointer notifications, in viewport pointer units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
}

/// Result of a ray hitting the cube.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub distance: f32,
    pub point: Vec3,
    pub face_index: usize,
}

/// Intersects `ray` with the cube and reports the nearest face hit.
pub fn intersect_cube(ray: &Ray, cube: &InteractiveObject) -> Option<Intersection> {
    let inverse = cube.orientation().inverse();
    let origin = inverse * (ray.origin - cube.position);
    let direction = inverse * ray.direction;
    let half = cube.size * 0.5;

    // Slab test in object space.
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut near_axis = 0;
    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < 1e-12 {
            if o < -half || o > half {
                return None;
            }
            continue;
        }
        let mut t0 = (-half - o) / d;
        let mut t1 = (half - o) / d;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_near {
            t_near = t0;
            near_axis = axis;
        }
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }
    if t_far < 0.0 {
        return None;
    }
    // Origin inside the cube: report the exit face.
    let (distance, axis) = if t_near >= 0.0 {
        (t_near, near_axis)
    } else {
        let exit = origin + direction * t_far;
        let axis = (0..3)
            .max_by(|a, b| exit[*a].abs().total_cmp(&exit[*b].abs()))
            .unwrap_or(0);
        (t_far, axis)
    };
    let local = origin + direction * distance;
    let face_index = axis * 2 + usize::from(local[axis] < 0.0);
    Some(Intersection {
        distance,
        point: ray.at(distance),
        face_index,
    })
}

/// Fixed lookup from face index to page.
#[derive(Clone, Debug, Default)]
pub struct FaceLinks {
    pages: [Option<String>; FACE_COUNT],
    site_base: String,
}

impl FaceLinks {
    pub fn new(config: &NavigationConfig) -> Self {
        let mut pages: [Option<String>; FACE_COUNT] = Default::default();
        for link in &config.links {
            if let Some(slot) = pages.get_mut(link.face) {
                *slot = Some(link.page.clone());
            }
        }
        Self {
            pages,
            site_base: config.site_base.trim_end_matches('/').to_string(),
        }
    }

    /// Page for a face, if any.
    pub fn target(&self, face_index: usize) -> Option<&str> {
        self.pages.get(face_index)?.as_deref()
    }

    /// Full location for a page.
    pub fn location(&self, page: &str) -> String {
        if self.site_base.is_empty() {
            page.to_string()
        } else {
            format!("{}/{}", self.site_base, page)
        }
    }
}

/// Where the page should go after a face pick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub face_index: usize,
    pub location: String,
}

/// Translates pointer input into cube rotation and navigation.
pub struct PointerHandler {
    pub pick_on: PickTrigger,
    pub links: FaceLinks,
    /// Pointer units spanned by the viewport
    pub viewport: (f32, f32),
}

impl PointerHandler {
    pub fn new(pick_on: PickTrigger, links: FaceLinks, viewport: (f32, f32)) -> Self {
        Self {
            pick_on,
            links,
            viewport,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
    }

    /// Dispatches a pointer event. Returns a navigation when a linked face
    /// was picked.
    pub fn handle(
        &self,
        event: PointerEvent,
        cube: &mut InteractiveObject,
        camera: &PerspectiveCamera,
    ) -> Option<Navigation> {
        match event {
            PointerEvent::Down { x, y } => {
                cube.begin_drag();
                match self.pick_on {
                    PickTrigger::Click => self.pick(x, y, cube, camera),
                    PickTrigger::Move => None,
                }
            }
            PointerEvent::Move { x, y } => {
                cube.pointer_moved(x, y);
                match self.pick_on {
                    PickTrigger::Move => self.pick(x, y, cube, camera),
                    PickTrigger::Click => None,
                }
            }
            PointerEvent::Up { .. } => {
                cube.end_drag();
                None
            }
        }
    }

    /// Casts a ray through the pointer and resolves the face it lands on.
    pub fn pick(
        &self,
        x: f32,
        y: f32,
        cube: &InteractiveObject,
        camera: &PerspectiveCamera,
    ) -> Option<Navigation> {
        let (width, height) = self.viewport;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let ray = camera.ray_from_ndc(pointer_to_ndc(x, y, width, height));
        let hit = intersect_cube(&ray, cube)?;
        log::debug!("Pointer over face {}", hit.face_index);
        let page = self.links.target(hit.face_index)?;
        Some(Navigation {
            face_index: hit.face_index,
            location: self.links.location(page),
        })
    }
}
