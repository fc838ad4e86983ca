use glam::Mat4;

use crate::core::WindowDimensions;

/// Vertical field of view of the perspective projection
pub const FIELD_OF_VIEW_DEGREES: f32 = 35.0;
pub const NEAR_PLANE: f32 = 1.0;
pub const FAR_PLANE: f32 = 500.0;

/// Matrix stack; the top is the working transform. Never empty.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    stack: Vec<Mat4>,
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Mat4::IDENTITY],
        }
    }

    pub fn top(&self) -> Mat4 {
        *self.stack.last().unwrap_or(&Mat4::IDENTITY)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        if self.stack.is_empty() {
            self.stack.push(Mat4::IDENTITY);
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    pub fn load_identity(&mut self) {
        *self.top_mut() = Mat4::IDENTITY;
    }

    pub fn load(&mut self, matrix: Mat4) {
        *self.top_mut() = matrix;
    }

    /// Post-multiply the top: `top = top * matrix`
    pub fn mult(&mut self, matrix: Mat4) {
        let top = self.top_mut();
        *top = *top * matrix;
    }

    /// Duplicate the top
    pub fn push(&mut self) {
        let top = self.top();
        self.stack.push(top);
    }

    /// Discard the top. Popping the base matrix is ignored.
    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        } else {
            log::warn!("Matrix stack underflow ignored");
        }
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Model-view stack plus projection, producing the combined MVP
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    pub model_view: MatrixStack,
    projection: Mat4,
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self {
            model_view: MatrixStack::new(),
            projection: Mat4::IDENTITY,
        }
    }

    /// Rebuild the perspective projection for a new viewport
    pub fn set_perspective(&mut self, dimensions: WindowDimensions) {
        self.projection = perspective(dimensions);
        self.model_view.load_identity();
    }

    pub fn model_view_projection(&self) -> Mat4 {
        self.projection * self.model_view.top()
    }
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Perspective projection for the given viewport (depth range 0..1)
pub fn perspective(dimensions: WindowDimensions) -> Mat4 {
    Mat4::perspective_rh(
        FIELD_OF_VIEW_DEGREES.to_radians(),
        dimensions.aspect_ratio(),
        NEAR_PLANE,
        FAR_PLANE,
    )
}
