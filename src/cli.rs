// cli.rs - Command-line interface configuration
use clap::Parser;

use crate::shapes::{ShapeKind, ShapeParams};

#[derive(Parser, Debug, Clone)]
#[command(name = "primitive-shapes")]
#[command(about = "Primitive topology viewer: space cycles shapes, arrows rotate", long_about = None)]
pub struct Cli {
    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Shape shown first
    #[arg(long, value_enum, default_value_t = ShapeKind::Points)]
    pub shape: ShapeKind,

    /// Angular step (radians) between triangle strip samples
    #[arg(long, default_value_t = 0.3)]
    pub strip_step: f32,
}

impl Cli {
    pub fn shape_params(&self) -> ShapeParams {
        ShapeParams {
            strip_step: self.strip_step,
            ..ShapeParams::default()
        }
    }
}
