// scene.rs - Scene state (frames, batches, selection) and the render step
use glam::{Mat4, Vec3};

use crate::batch::VertexBatch;
use crate::camera::{OrientationFrame, CAMERA_DISTANCE, ROTATION_STEP_DEGREES};
use crate::core::{Direction, FlatShader, BLACK, GREEN};
use crate::render_state::{DepthOffset, PolygonMode, RenderState};
use crate::shapes::{ShapeKind, ShapeSet};
use crate::transform::TransformPipeline;

pub const POINT_SIZE: f32 = 4.0;
pub const LINE_WIDTH: f32 = 2.0;
pub const OUTLINE_WIDTH: f32 = 2.5;
pub const OUTLINE_OFFSET: DepthOffset = DepthOffset {
    factor: -1.0,
    units: -1.0,
};

/// Observer frame, shape frame, the seven batches and the current selection
#[derive(Debug, Clone)]
pub struct Scene {
    camera: OrientationFrame,
    object: OrientationFrame,
    shapes: ShapeSet,
    selected: ShapeKind,
}

impl Scene {
    /// Scene showing points, observed from `CAMERA_DISTANCE` units back
    pub fn new(shapes: ShapeSet) -> Self {
        let mut camera = OrientationFrame::new();
        camera.move_forward(-CAMERA_DISTANCE);

        Self {
            camera,
            object: OrientationFrame::new(),
            shapes,
            selected: ShapeKind::default(),
        }
    }

    pub fn with_selection(mut self, kind: ShapeKind) -> Self {
        self.selected = kind;
        self
    }

    pub fn selected(&self) -> ShapeKind {
        self.selected
    }

    pub fn camera(&self) -> &OrientationFrame {
        &self.camera
    }

    pub fn object(&self) -> &OrientationFrame {
        &self.object
    }

    pub fn shapes(&self) -> &ShapeSet {
        &self.shapes
    }

    /// Batch for the current selection
    pub fn active_batch(&self) -> &VertexBatch {
        self.shapes.get(self.selected)
    }

    /// Select the next shape, wrapping after the last
    pub fn advance(&mut self) -> ShapeKind {
        self.selected = self.selected.next();
        self.selected
    }

    /// Rotate the shape 5° about world X (up/down) or world Y (left/right)
    pub fn rotate(&mut self, direction: Direction) {
        let step = ROTATION_STEP_DEGREES.to_radians();
        let (angle, axis) = match direction {
            Direction::Up => (-step, Vec3::X),
            Direction::Down => (step, Vec3::X),
            Direction::Left => (-step, Vec3::Y),
            Direction::Right => (step, Vec3::Y),
        };
        self.object.rotate_world(angle, axis);
    }

    /// Compose camera and object transforms and draw the selected batch
    pub fn render<S: FlatShader>(
        &self,
        transform: &mut TransformPipeline,
        state: &mut RenderState,
        shader: &mut S,
    ) {
        transform.model_view.push();
        transform.model_view.mult(self.camera.camera_matrix());
        transform.model_view.mult(self.object.object_matrix());

        let mvp = transform.model_view_projection();
        let kind = self.selected;
        let batch = self.active_batch();

        match kind {
            ShapeKind::Points => {
                let flags = state.scoped(|f| f.point_size = POINT_SIZE);
                shader.draw_flat(kind, batch, &mvp, BLACK, &flags);
            }
            ShapeKind::Lines | ShapeKind::LineStrip | ShapeKind::LineLoop => {
                let flags = state.scoped(|f| f.line_width = LINE_WIDTH);
                shader.draw_flat(kind, batch, &mvp, BLACK, &flags);
            }
            ShapeKind::Triangles | ShapeKind::TriangleFan | ShapeKind::TriangleStrip => {
                draw_wireframe(shader, state, kind, batch, &mvp);
            }
        }

        transform.model_view.pop();
    }
}

/// Filled pass in green, then a black outline pass pulled towards the viewer.
/// Every flag the outline pass changes is restored before returning.
pub fn draw_wireframe<S: FlatShader>(
    shader: &mut S,
    state: &mut RenderState,
    kind: ShapeKind,
    batch: &VertexBatch,
    mvp: &Mat4,
) {
    shader.draw_flat(kind, batch, mvp, GREEN, state.flags());

    let outline = state.scoped(|f| {
        f.line_offset = Some(OUTLINE_OFFSET);
        f.line_smooth = true;
        f.blend = true;
        f.polygon_mode = PolygonMode::Line;
        f.line_width = OUTLINE_WIDTH;
    });
    shader.draw_flat(kind, batch, mvp, BLACK, &outline);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;
    use crate::render_state::RenderFlags;
    use crate::shapes::ShapeParams;
    use std::convert::Infallible;

    #[derive(Default)]
    struct Recorder {
        draws: Vec<(ShapeKind, Color, RenderFlags)>,
    }

    impl FlatShader for Recorder {
        type Error = Infallible;

        fn draw_flat(
            &mut self,
            shape: ShapeKind,
            _batch: &VertexBatch,
            _mvp: &Mat4,
            color: Color,
            flags: &RenderFlags,
        ) {
            self.draws.push((shape, color, *flags));
        }

        fn end_frame(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    fn scene() -> Scene {
        Scene::new(ShapeSet::build(&ShapeParams::default()).unwrap())
    }

    #[test]
    fn test_initial_state() {
        let scene = scene();
        assert_eq!(scene.selected(), ShapeKind::Points);
        assert_eq!(scene.camera().origin(), Vec3::new(0.0, 0.0, 15.0));
        assert_eq!(*scene.object(), OrientationFrame::new());
    }

    #[test]
    fn test_advance_wraps_after_last() {
        let mut scene = scene().with_selection(ShapeKind::TriangleStrip);
        assert_eq!(scene.advance(), ShapeKind::Points);
    }

    #[test]
    fn test_rotate_up_then_down_cancels() {
        let mut scene = scene();
        let start = *scene.object();
        scene.rotate(Direction::Up);
        assert!(!scene.object().abs_diff_eq(&start, 1e-3));
        scene.rotate(Direction::Down);
        assert!(scene.object().abs_diff_eq(&start, 1e-5));
    }

    #[test]
    fn test_rotate_does_not_move_camera() {
        let mut scene = scene();
        let camera = *scene.camera();
        scene.rotate(Direction::Left);
        scene.rotate(Direction::Up);
        assert_eq!(*scene.camera(), camera);
    }

    #[test]
    fn test_points_draw_once_with_point_size() {
        let scene = scene();
        let mut recorder = Recorder::default();
        let mut state = RenderState::new();
        scene.render(&mut TransformPipeline::new(), &mut state, &mut recorder);

        assert_eq!(recorder.draws.len(), 1);
        let (kind, color, flags) = recorder.draws[0];
        assert_eq!(kind, ShapeKind::Points);
        assert_eq!(color, BLACK);
        assert_eq!(flags.point_size, POINT_SIZE);
        assert_eq!(*state.flags(), RenderFlags::default());
    }

    #[test]
    fn test_line_kinds_use_wider_lines() {
        for kind in [ShapeKind::Lines, ShapeKind::LineStrip, ShapeKind::LineLoop] {
            let scene = scene().with_selection(kind);
            let mut recorder = Recorder::default();
            let mut state = RenderState::new();
            scene.render(&mut TransformPipeline::new(), &mut state, &mut recorder);

            assert_eq!(recorder.draws.len(), 1);
            assert_eq!(recorder.draws[0].0, kind);
            assert_eq!(recorder.draws[0].2.line_width, LINE_WIDTH);
            assert_eq!(state.flags().line_width, 1.0);
        }
    }

    #[test]
    fn test_solid_kinds_draw_fill_then_outline() {
        for kind in [ShapeKind::Triangles, ShapeKind::TriangleFan, ShapeKind::TriangleStrip] {
            let scene = scene().with_selection(kind);
            let mut recorder = Recorder::default();
            let mut state = RenderState::new();
            scene.render(&mut TransformPipeline::new(), &mut state, &mut recorder);

            assert_eq!(recorder.draws.len(), 2);
            let (_, fill_color, fill) = recorder.draws[0];
            let (_, line_color, outline) = recorder.draws[1];

            assert_eq!(fill_color, GREEN);
            assert_eq!(fill.polygon_mode, PolygonMode::Fill);

            assert_eq!(line_color, BLACK);
            assert_eq!(outline.polygon_mode, PolygonMode::Line);
            assert_eq!(outline.line_width, OUTLINE_WIDTH);
            assert!(outline.blend);
            assert!(outline.line_smooth);
            assert_eq!(outline.line_offset, Some(OUTLINE_OFFSET));
        }
    }

    #[test]
    fn test_render_leaves_transform_stack_balanced() {
        let scene = scene().with_selection(ShapeKind::Triangles);
        let mut transform = TransformPipeline::new();
        let mut recorder = Recorder::default();
        scene.render(&mut transform, &mut RenderState::new(), &mut recorder);
        assert_eq!(transform.model_view.depth(), 1);
        assert_eq!(transform.model_view.top(), Mat4::IDENTITY);
    }
}
