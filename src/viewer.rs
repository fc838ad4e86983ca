use crate::core::{Direction, FlatShader, WindowCallbacks, WindowContext, WindowDimensions};
use crate::render_state::RenderState;
use crate::scene::Scene;
use crate::transform::TransformPipeline;

/// Key that advances to the next shape
pub const ADVANCE_KEY: char = ' ';

/// Owns the scene and its rendering context and answers the window callbacks
pub struct Viewer<S: FlatShader> {
    scene: Scene,
    transform: TransformPipeline,
    state: RenderState,
    shader: S,
}

impl<S: FlatShader> Viewer<S> {
    pub fn new(scene: Scene, shader: S) -> Self {
        Self {
            scene,
            transform: TransformPipeline::new(),
            state: RenderState::new(),
            shader,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn render_state(&self) -> &RenderState {
        &self.state
    }

    pub fn shader(&self) -> &S {
        &self.shader
    }

    pub fn shader_mut(&mut self) -> &mut S {
        &mut self.shader
    }
}

impl<S: FlatShader> WindowCallbacks for Viewer<S> {
    type Error = S::Error;

    fn reshape(&mut self, dimensions: WindowDimensions) {
        log::debug!("Reshape to {}x{}", dimensions.width, dimensions.height);
        self.transform.set_perspective(dimensions);
        self.shader.resize(dimensions);
    }

    fn display(&mut self) -> Result<(), Self::Error> {
        self.shader.begin_frame();
        self.scene
            .render(&mut self.transform, &mut self.state, &mut self.shader);
        self.shader.end_frame()
    }

    fn special_key(&mut self, direction: Direction, window: &dyn WindowContext) {
        self.scene.rotate(direction);
        window.request_redraw();
    }

    fn key_press(&mut self, key: char, window: &dyn WindowContext) {
        if key == ADVANCE_KEY {
            let kind = self.scene.advance();
            log::debug!("Switched to {}", kind.gl_name());
        }

        window.set_title(self.scene.selected().gl_name());
        window.request_redraw();
    }
}
