pub mod gpu_context;
pub mod input_adapter;
pub mod render_pipeline;
pub mod surface_renderer;
pub mod window;

pub use gpu_context::GpuContext;
pub use input_adapter::{Command, Direction};
pub use render_pipeline::{Color, FlatShader, BLACK, GREEN};
pub use surface_renderer::SurfaceRenderer;
pub use window::{WindowCallbacks, WindowContext, WindowDimensions};
