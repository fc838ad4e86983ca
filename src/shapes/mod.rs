pub mod fan;
pub mod fixed;
pub mod strip;

use crate::batch::{Topology, VertexBatch};
use crate::error::ShapeError;

/// Which of the seven batches is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum ShapeKind {
    #[default]
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleFan,
    TriangleStrip,
}

impl ShapeKind {
    pub const COUNT: usize = 7;

    /// All kinds in cycling order
    pub const ALL: [ShapeKind; Self::COUNT] = [
        ShapeKind::Points,
        ShapeKind::Lines,
        ShapeKind::LineStrip,
        ShapeKind::LineLoop,
        ShapeKind::Triangles,
        ShapeKind::TriangleFan,
        ShapeKind::TriangleStrip,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Next kind in the cycle, wrapping from the last back to `Points`
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    pub const fn topology(self) -> Topology {
        match self {
            ShapeKind::Points => Topology::Points,
            ShapeKind::Lines => Topology::Lines,
            ShapeKind::LineStrip => Topology::LineStrip,
            ShapeKind::LineLoop => Topology::LineLoop,
            ShapeKind::Triangles => Topology::Triangles,
            ShapeKind::TriangleFan => Topology::TriangleFan,
            ShapeKind::TriangleStrip => Topology::TriangleStrip,
        }
    }

    /// Window title shown while this kind is selected
    pub const fn gl_name(self) -> &'static str {
        match self {
            ShapeKind::Points => "GL_POINTS",
            ShapeKind::Lines => "GL_LINES",
            ShapeKind::LineStrip => "GL_LINE_STRIP",
            ShapeKind::LineLoop => "GL_LINE_LOOP",
            ShapeKind::Triangles => "GL_TRIANGLES",
            ShapeKind::TriangleFan => "GL_TRIANGLE_FAN",
            ShapeKind::TriangleStrip => "GL_TRIANGLE_STRIP",
        }
    }

    pub const fn is_solid(self) -> bool {
        self.topology().is_solid()
    }
}

/// Generator parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeParams {
    pub hexagon_radius: f32,
    pub cylinder_radius: f32,
    pub strip_step: f32,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            hexagon_radius: 3.0,
            cylinder_radius: 3.0,
            strip_step: 0.3,
        }
    }
}

/// The seven pre-built batches, indexed by `ShapeKind`
#[derive(Debug, Clone)]
pub struct ShapeSet {
    batches: [VertexBatch; ShapeKind::COUNT],
}

impl ShapeSet {
    pub fn build(params: &ShapeParams) -> Result<Self, ShapeError> {
        let fan = fan::hexagon(params.hexagon_radius);
        let strip = strip::cylinder(params.cylinder_radius, params.strip_step)?;

        let batches = [
            VertexBatch::from_vertices(Topology::Points, &fixed::COAST)?,
            VertexBatch::from_vertices(Topology::Lines, &fixed::COAST)?,
            VertexBatch::from_vertices(Topology::LineStrip, &fixed::COAST)?,
            VertexBatch::from_vertices(Topology::LineLoop, &fixed::COAST)?,
            VertexBatch::from_vertices(Topology::Triangles, &fixed::PYRAMID)?,
            VertexBatch::build(Topology::TriangleFan, fan::VERTEX_COUNT, &fan.concat())?,
            VertexBatch::from_vertices(Topology::TriangleStrip, &strip)?,
        ];

        for (kind, batch) in ShapeKind::ALL.iter().zip(batches.iter()) {
            log::debug!("{} batch: {} vertices", kind.gl_name(), batch.vertex_count());
        }

        Ok(Self { batches })
    }

    pub fn get(&self, kind: ShapeKind) -> &VertexBatch {
        &self.batches[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeKind, &VertexBatch)> {
        ShapeKind::ALL.into_iter().zip(self.batches.iter())
    }
}
