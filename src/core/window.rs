use super::input_adapter::Direction;

/// Window dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDimensions {
    pub width: u32,
    pub height: u32,
}

impl WindowDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; zero sides are treated as one pixel
    pub fn aspect_ratio(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for WindowDimensions {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

/// What the viewer needs from the window it draws into
pub trait WindowContext {
    /// Request the window to redraw
    fn request_redraw(&self);

    /// Replace the window title
    fn set_title(&self, title: &str);
}

impl WindowContext for winit::window::Window {
    fn request_redraw(&self) {
        winit::window::Window::request_redraw(self);
    }

    fn set_title(&self, title: &str) {
        winit::window::Window::set_title(self, title);
    }
}

/// The four callbacks the window layer drives
pub trait WindowCallbacks {
    type Error;

    /// Viewport changed size (also called once after creation)
    fn reshape(&mut self, dimensions: WindowDimensions);

    /// Draw one frame
    fn display(&mut self) -> Result<(), Self::Error>;

    /// Arrow key pressed
    fn special_key(&mut self, direction: Direction, window: &dyn WindowContext);

    /// Character key pressed
    fn key_press(&mut self, key: char, window: &dyn WindowContext);
}
