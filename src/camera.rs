use glam::{Mat4, Quat, Vec3};

/// Degrees applied per arrow-key press
pub const ROTATION_STEP_DEGREES: f32 = 5.0;

/// Distance the observer starts behind the origin
pub const CAMERA_DISTANCE: f32 = 15.0;

/// Local coordinate frame: an origin plus forward and up axes (right-handed).
///
/// The same type drives both the observer (read as a view matrix) and the
/// displayed shape (read as a model matrix).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationFrame {
    origin: Vec3,
    forward: Vec3,
    up: Vec3,
}

impl Default for OrientationFrame {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }
}

impl OrientationFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Local x axis (`up × forward`)
    pub fn x_axis(&self) -> Vec3 {
        self.up.cross(self.forward)
    }

    /// Translate along the forward axis; negative values move backwards
    pub fn move_forward(&mut self, delta: f32) {
        self.origin += self.forward * delta;
    }

    /// Rotate the axes about a world-space axis. The origin stays put.
    pub fn rotate_world(&mut self, angle_radians: f32, axis: Vec3) {
        let rotation = Quat::from_axis_angle(axis.normalize(), angle_radians);
        self.forward = (rotation * self.forward).normalize();
        self.up = (rotation * self.up).normalize();
    }

    /// Model matrix: columns are x axis, up, forward, origin
    pub fn object_matrix(&self) -> Mat4 {
        Mat4::from_cols(
            self.x_axis().extend(0.0),
            self.up.extend(0.0),
            self.forward.extend(0.0),
            self.origin.extend(1.0),
        )
    }

    /// View matrix looking from the origin along forward
    pub fn camera_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.origin, self.forward, self.up)
    }

    /// Approximate equality of all three vectors
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.origin.abs_diff_eq(other.origin, max_abs_diff)
            && self.forward.abs_diff_eq(other.forward, max_abs_diff)
            && self.up.abs_diff_eq(other.up, max_abs_diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_frame() {
        let frame = OrientationFrame::new();
        assert_eq!(frame.origin(), Vec3::ZERO);
        assert_eq!(frame.forward(), Vec3::NEG_Z);
        assert_eq!(frame.up(), Vec3::Y);
        assert_eq!(frame.x_axis(), Vec3::NEG_X);
    }

    #[test]
    fn test_move_forward_backwards() {
        let mut frame = OrientationFrame::new();
        frame.move_forward(-CAMERA_DISTANCE);
        assert_eq!(frame.origin(), Vec3::new(0.0, 0.0, 15.0));
    }

    #[test]
    fn test_camera_matrix_moves_origin_into_view() {
        let mut frame = OrientationFrame::new();
        frame.move_forward(-CAMERA_DISTANCE);
        let view = frame.camera_matrix();
        // World origin ends up 15 units in front of the eye
        let p = view.transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -15.0), 1e-5));
    }

    #[test]
    fn test_object_matrix_is_rigid() {
        let mut frame = OrientationFrame::new();
        frame.rotate_world(0.7, Vec3::X);
        frame.rotate_world(-1.3, Vec3::Y);
        let m = frame.object_matrix();
        assert!((m.determinant() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_world_keeps_origin() {
        let mut frame = OrientationFrame::new();
        frame.move_forward(2.0);
        let before = frame.origin();
        frame.rotate_world(ROTATION_STEP_DEGREES.to_radians(), Vec3::Y);
        assert_eq!(frame.origin(), before);
    }

    #[test]
    fn test_quarter_turn_about_y() {
        let mut frame = OrientationFrame::new();
        frame.rotate_world(90f32.to_radians(), Vec3::Y);
        assert!(frame.forward().abs_diff_eq(Vec3::NEG_X, 1e-5));
        assert!(frame.up().abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn test_full_turn_in_five_degree_steps() {
        let start = OrientationFrame::new();
        let mut frame = start;
        for _ in 0..72 {
            frame.rotate_world(-ROTATION_STEP_DEGREES.to_radians(), Vec3::Y);
        }
        assert!(frame.abs_diff_eq(&start, 1e-4));
    }

    #[test]
    fn test_axes_stay_orthonormal() {
        let mut frame = OrientationFrame::new();
        for i in 0..200 {
            let axis = if i % 2 == 0 { Vec3::X } else { Vec3::Y };
            frame.rotate_world(ROTATION_STEP_DEGREES.to_radians(), axis);
        }
        assert!((frame.forward().length() - 1.0).abs() < 1e-5);
        assert!((frame.up().length() - 1.0).abs() < 1e-5);
        assert!(frame.forward().dot(frame.up()).abs() < 1e-4);
    }
}
