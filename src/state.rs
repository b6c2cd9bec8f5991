/// Viewer state
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    /// Enable debug mode
    pub debug: bool,
    /// Simulation paused
    pub paused: bool,
    /// Wireframe mode enabled
    pub wireframe: bool,
    /// Light the cube faces instead of drawing plain textures
    pub shading: bool,
}

impl ViewState {
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            paused: false,
            wireframe: false,
            shading: false,
        }
    }

    /// Back to default display modes; debug is left alone.
    pub fn reset(&mut self) {
        self.wireframe = false;
        self.shading = false;
    }
}
