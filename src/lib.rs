pub mod batch;
pub mod camera;
pub mod cli;
pub mod core;
pub mod error;
pub mod render_state;
pub mod scene;
pub mod shapes;
pub mod transform;
pub mod viewer;

pub use batch::{Topology, Vertex, VertexBatch};
pub use error::ShapeError;
pub use scene::Scene;
pub use shapes::{ShapeKind, ShapeParams, ShapeSet};
pub use viewer::Viewer;
