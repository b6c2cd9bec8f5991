use crate::camera::{ndc_to_screen, pointer_to_ndc};
use crate::color::Rgb;
use crate::cube::{FACE_CORNERS, FACE_NORMALS, FACE_UVS};
use crate::graphics::{draw_line, draw_triangle, FrameBuffer, Shading};
use crate::menu::NavMenu;
use crate::picking::{Navigation, PointerEvent, PointerHandler};
use crate::scene::Scene;
use crate::state::ViewState;
use crate::terminal::{compose, Cell};
use crate::texture::{Texture, FALLBACK_FACE_COLORS};
use crate::vertex::Vertex;
use crate::water::SKY_COLOR;
use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use glam::Vec3;

const HORIZON_COLOR: Rgb = Rgb::new(20, 38, 84);
const PARTICLE_COLOR: Rgb = Rgb::from_hex(0xE5E5E5);
const PARTICLE_OPACITY: f32 = 0.3;
const SPLASH_COLOR: Rgb = Rgb::WHITE;
const SPLASH_OPACITY: f32 = 0.8;

/// What the host loop should do after an event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
    Navigate(Navigation),
}

/// Scene view: turns terminal events into scene input and paints frames
pub struct SceneWidget {
    pub pointer: PointerHandler,
    pub frame: FrameBuffer,
    cols: usize,
    rows: usize,
    /// Pointer units per cell
    cell_size: (f32, f32),
    /// World-space view ray per framebuffer pixel
    rays: Vec<Vec3>,
}

impl SceneWidget {
    pub fn new(pointer: PointerHandler, cell_size: (f32, f32)) -> Self {
        SceneWidget {
            pointer,
            frame: FrameBuffer::new(0, 0),
            cols: 0,
            rows: 0,
            cell_size,
            rays: Vec::new(),
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Adapts buffers, camera aspect, pointer viewport and menu to a new
    /// terminal size.
    pub fn resize(&mut self, cols: u16, rows: u16, scene: &mut Scene, menu: &mut NavMenu) {
        self.cols = cols as usize;
        self.rows = rows as usize;
        let (width, height) = (self.cols, self.rows * 2);
        self.frame.resize(width, height);
        if width > 0 && height > 0 {
            scene.resize(width as f32 / height as f32);
        }
        self.pointer.resize(
            self.cols as f32 * self.cell_size.0,
            self.rows as f32 * self.cell_size.1,
        );
        menu.on_resize(cols);

        self.rays.clear();
        for y in 0..height {
            for x in 0..width {
                let ndc = pointer_to_ndc(
                    x as f32 + 0.5,
                    y as f32 + 0.5,
                    width as f32,
                    height as f32,
                );
                self.rays.push(scene.camera.ray_from_ndc(ndc).direction);
            }
        }
        log::debug!("Viewport {}x{} cells, {}x{} pixels", cols, rows, width, height);
    }

    /// Handle events for the scene widget
    pub fn event(
        &mut self,
        event: &Event,
        scene: &mut Scene,
        state: &mut ViewState,
        menu: &mut NavMenu,
    ) -> Control {
        match event {
            Event::Key(key_event) => {
                if key_event.kind == KeyEventKind::Release {
                    return Control::Continue;
                }
                match key_event.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Control::Quit;
                    }
                    KeyCode::Char('d') | KeyCode::Char('D') => {
                        state.debug = !state.debug;
                    }
                    KeyCode::Char('p') | KeyCode::Char('P') => {
                        state.paused = !state.paused;
                        // Drop any drag that was in progress
                        scene.cube.end_drag();
                    }
                    KeyCode::Char('w') | KeyCode::Char('W') => {
                        if !state.paused {
                            state.wireframe = !state.wireframe;
                        }
                    }
                    KeyCode::Char('l') | KeyCode::Char('L') => {
                        if !state.paused {
                            state.shading = !state.shading;
                        }
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        if !state.paused {
                            scene.cube.reset();
                            state.reset();
                        }
                    }
                    KeyCode::Char('m') | KeyCode::Char('M') => menu.toggle_menu(),
                    KeyCode::Char(c @ '1'..='9') => {
                        if menu.shown {
                            menu.toggle_dropdown(c as usize - '1' as usize);
                        }
                    }
                    _ => {}
                }
            }
            Event::Mouse(mouse_event) => {
                if state.paused {
                    // Keep the drag origin current without rotating or picking
                    if let Some(PointerEvent::Move { x, y }) = self.pointer_event(mouse_event) {
                        scene.cube.track_pointer(x, y);
                    }
                    return Control::Continue;
                }
                if let Some(pointer_event) = self.pointer_event(mouse_event) {
                    if let Some(navigation) =
                        self.pointer
                            .handle(pointer_event, &mut scene.cube, &scene.camera)
                    {
                        log::info!(
                            "Face {} selected, navigating to {}",
                            navigation.face_index,
                            navigation.location
                        );
                        return Control::Navigate(navigation);
                    }
                }
            }
            Event::Resize(cols, rows) => self.resize(*cols, *rows, scene, menu),
            _ => {}
        }
        Control::Continue
    }

    /// Maps a terminal mouse event to pointer units at the cell centre.
    fn pointer_event(&self, mouse_event: &MouseEvent) -> Option<PointerEvent> {
        let x = (mouse_event.column as f32 + 0.5) * self.cell_size.0;
        let y = (mouse_event.row as f32 + 0.5) * self.cell_size.1;
        match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(PointerEvent::Down { x, y }),
            MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Up { x, y }),
            MouseEventKind::Drag(_) | MouseEventKind::Moved => Some(PointerEvent::Move { x, y }),
            _ => None,
        }
    }

    /// Paint the scene into the framebuffer and compose terminal cells
    pub fn paint(&mut self, scene: &Scene, state: &ViewState, menu: &NavMenu, fps: f64) -> Vec<Cell> {
        self.frame.clear(SKY_COLOR);
        self.paint_water(scene);

        if state.wireframe {
            self.paint_wireframe(scene);
        } else {
            self.paint_cube(scene, state.shading);
        }

        let (width, height) = (self.frame.width as f32, self.frame.height as f32);
        for point in &scene.splash.points {
            if let Some((ndc, depth)) = scene.camera.project(*point) {
                let p = ndc_to_screen(ndc, width, height);
                self.frame.blend(p.x, p.y, depth, SPLASH_COLOR, SPLASH_OPACITY);
            }
        }
        for particle in &scene.particles.points {
            if let Some((ndc, depth)) = scene.camera.project(particle.position) {
                let p = ndc_to_screen(ndc, width, height);
                self.frame
                    .blend(p.x, p.y, depth, PARTICLE_COLOR, PARTICLE_OPACITY);
            }
        }

        // Dim everything while paused
        if state.paused {
            for c in self.frame.color.iter_mut() {
                *c = c.scale(0.4);
            }
        }

        let overlay = self.overlay(scene, state, menu, fps);
        compose(&self.frame, self.cols, self.rows, &overlay)
    }

    fn paint_water(&mut self, scene: &Scene) {
        let water = &scene.water;
        let origin = scene.camera.position;
        let far = scene.camera.far;
        let width = self.frame.width;
        for (i, direction) in self.rays.iter().enumerate() {
            let (x, y) = (i % width, i / width);
            if direction.y >= 0.0 {
                // Above the horizon
                let t = direction.y.clamp(0.0, 1.0);
                self.frame.plot(x, y, f32::MAX, HORIZON_COLOR.lerp(SKY_COLOR, t * 4.0));
                continue;
            }
            let t = (water.level - origin.y) / direction.y;
            let hit = origin + *direction * t;
            if t <= 0.0 || !water.contains(hit) {
                continue;
            }
            let depth = t * -direction.z;
            if depth > far {
                self.frame.plot(x, y, far, HORIZON_COLOR);
                continue;
            }
            let color = water.shade(hit, -*direction);
            self.frame.plot(x, y, depth, color);
        }
    }

    /// Projects the cube corners; `None` if any lies behind the camera.
    fn project_corners(&self, scene: &Scene) -> Option<[(Vec3, [f32; 2], f32); 8]> {
        let (width, height) = (self.frame.width as f32, self.frame.height as f32);
        let corners = scene.cube.corners();
        let mut projected = [(Vec3::ZERO, [0.0; 2], 0.0); 8];
        for (slot, corner) in projected.iter_mut().zip(corners) {
            let (ndc, depth) = scene.camera.project(corner)?;
            let p = ndc_to_screen(ndc, width, height);
            *slot = (corner, [p.x, p.y], depth);
        }
        Some(projected)
    }

    fn paint_cube(&mut self, scene: &Scene, shading: bool) {
        let Some(projected) = self.project_corners(scene) else {
            return;
        };
        let orientation = scene.cube.orientation();

        for (face_index, corners) in FACE_CORNERS.iter().enumerate() {
            let vertices: Vec<Vertex> = corners
                .iter()
                .zip(FACE_UVS)
                .map(|(&c, uv)| Vertex {
                    position: projected[c].0,
                    screen_position: projected[c].1,
                    depth: projected[c].2,
                    uv,
                })
                .collect();

            let fallback;
            let texture = match scene.cube.materials.get(face_index) {
                Some(material) => &material.texture,
                None => {
                    fallback = Texture::solid(FALLBACK_FACE_COLORS[face_index]);
                    &fallback
                }
            };
            let shading = if shading {
                Shading::Lit {
                    normal: orientation * FACE_NORMALS[face_index],
                    light_pos: scene.light_position,
                }
            } else {
                Shading::Unlit
            };

            // Triangle 1: a, b, c
            draw_triangle(
                &vertices[0],
                &vertices[1],
                &vertices[2],
                &mut self.frame,
                texture,
                shading,
            );
            // Triangle 2: a, c, d
            draw_triangle(
                &vertices[0],
                &vertices[2],
                &vertices[3],
                &mut self.frame,
                texture,
                shading,
            );
        }
    }

    fn paint_wireframe(&mut self, scene: &Scene) {
        let Some(projected) = self.project_corners(scene) else {
            return;
        };
        // Edges join corners that differ in one coordinate
        for start in 0..8 {
            for bit in [1, 2, 4] {
                if start & bit == 0 {
                    let a = projected[start].1;
                    let b = projected[start | bit].1;
                    draw_line(a[0], a[1], b[0], b[1], &mut self.frame, Rgb::WHITE);
                }
            }
        }
    }

    fn overlay(&self, scene: &Scene, state: &ViewState, menu: &NavMenu, fps: f64) -> Vec<String> {
        let mut lines = menu.lines();

        if state.debug {
            let rotation = scene.cube.rotation;
            lines.push(format!(
                "{} {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ));
            lines.push(format!(
                "Rotation: ({:.3}, {:.3}, {:.3})",
                rotation.x, rotation.y, rotation.z
            ));
            lines.push(format!(
                "Cube Y: {:.2}  Dragging: {}",
                scene.cube.position.y, scene.cube.drag.dragging
            ));
            lines.push(format!(
                "Water time: {:.2}  Ticks: {}",
                scene.water.time, scene.ticks
            ));
            lines.push(format!(
                "Light: ({:.2}, {:.2}, {:.2})",
                scene.light_position.x, scene.light_position.y, scene.light_position.z
            ));
            lines.push(format!(
                "Particles: {}  Splash: {}",
                scene.particles.len(),
                scene.splash.points.len()
            ));
            lines.push(format!("FPS: {:.2}", fps));
        }

        if state.paused {
            lines.push("Paused".to_string());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PickTrigger, SceneConfig};
    use crate::picking::FaceLinks;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn setup() -> (SceneWidget, Scene, ViewState, NavMenu) {
        let mut config = SceneConfig::default();
        config.particles.count = 20;
        let mut scene = Scene::new(&config, Vec::new(), None, 1.0, 5);
        let pointer = PointerHandler::new(
            PickTrigger::Click,
            FaceLinks::new(&config.navigation),
            (0.0, 0.0),
        );
        let mut widget = SceneWidget::new(pointer, (8.0, 16.0));
        let mut menu = NavMenu::new(&config.menu);
        widget.resize(40, 20, &mut scene, &mut menu);
        (widget, scene, ViewState::new(false), menu)
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_keys_toggle_state() {
        let (mut widget, mut scene, mut state, mut menu) = setup();
        widget.event(&key('d'), &mut scene, &mut state, &mut menu);
        widget.event(&key('w'), &mut scene, &mut state, &mut menu);
        widget.event(&key('m'), &mut scene, &mut state, &mut menu);
        widget.event(&key('2'), &mut scene, &mut state, &mut menu);
        assert!(state.debug && state.wireframe && menu.shown);
        assert_eq!(menu.expanded(), Some(1));
        assert_eq!(
            widget.event(&key('q'), &mut scene, &mut state, &mut menu),
            Control::Quit
        );
    }

    #[test]
    fn test_pause_blocks_pointer() {
        let (mut widget, mut scene, mut state, mut menu) = setup();
        widget.event(&key('p'), &mut scene, &mut state, &mut menu);
        assert!(state.paused);
        widget.event(
            &mouse(MouseEventKind::Down(MouseButton::Left), 1, 1),
            &mut scene,
            &mut state,
            &mut menu,
        );
        assert!(!scene.cube.drag.dragging);
    }

    #[test]
    fn test_drag_rotates_cube() {
        let (mut widget, mut scene, mut state, mut menu) = setup();
        widget.event(
            &mouse(MouseEventKind::Moved, 1, 1),
            &mut scene,
            &mut state,
            &mut menu,
        );
        widget.event(
            &mouse(MouseEventKind::Down(MouseButton::Left), 1, 1),
            &mut scene,
            &mut state,
            &mut menu,
        );
        widget.event(
            &mouse(MouseEventKind::Drag(MouseButton::Left), 4, 1),
            &mut scene,
            &mut state,
            &mut menu,
        );
        assert!(scene.cube.rotation.y > 0.0);
        widget.event(
            &mouse(MouseEventKind::Up(MouseButton::Left), 4, 1),
            &mut scene,
            &mut state,
            &mut menu,
        );
        assert!(!scene.cube.drag.dragging);
    }

    #[test]
    fn test_pointer_tracked_while_paused() {
        let (mut widget, mut scene, mut state, mut menu) = setup();
        widget.event(&key('p'), &mut scene, &mut state, &mut menu);
        widget.event(
            &mouse(MouseEventKind::Moved, 10, 1),
            &mut scene,
            &mut state,
            &mut menu,
        );
        assert_eq!(scene.cube.rotation, Vec3::ZERO);
        widget.event(&key('p'), &mut scene, &mut state, &mut menu);

        widget.event(
            &mouse(MouseEventKind::Down(MouseButton::Left), 10, 1),
            &mut scene,
            &mut state,
            &mut menu,
        );
        widget.event(
            &mouse(MouseEventKind::Drag(MouseButton::Left), 11, 1),
            &mut scene,
            &mut state,
            &mut menu,
        );
        // One cell is 8 units: 4 degrees about Y, measured from the paused hover.
        assert!((scene.cube.rotation.y - 4f32.to_radians()).abs() < 1e-4);
        assert!(scene.cube.rotation.x.abs() < 1e-4);
    }

    #[test]
    fn test_resize_updates_buffers_and_aspect() {
        let (mut widget, mut scene, mut state, mut menu) = setup();
        widget.event(&Event::Resize(60, 15), &mut scene, &mut state, &mut menu);
        assert_eq!(widget.size(), (60, 15));
        assert_eq!(widget.frame.width, 60);
        assert_eq!(widget.frame.height, 30);
        assert!((scene.camera.aspect - 2.0).abs() < 1e-6);
        assert_eq!(widget.pointer.viewport, (480.0, 240.0));
    }

    #[test]
    fn test_paint_draws_cube_at_center() {
        let (mut widget, scene, state, menu) = setup();
        let cells = widget.paint(&scene, &state, &menu, 60.0);
        assert_eq!(cells.len(), 40 * 20);
        // Upper part of the front face, above the waterline.
        let front = widget.frame.get(20, 26);
        assert_eq!(front, FALLBACK_FACE_COLORS[4]);
    }

    #[test]
    fn test_debug_overlay_lines() {
        let (mut widget, scene, mut state, menu) = setup();
        state.debug = true;
        state.paused = true;
        let cells = widget.paint(&scene, &state, &menu, 60.0);
        let first: String = cells[..10].iter().map(|c| c.ch).collect();
        assert!(first.starts_with("splashcube"));
    }
}
