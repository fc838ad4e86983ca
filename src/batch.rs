// batch.rs - Immutable vertex batches tagged with a draw topology
use std::collections::HashSet;

use crate::error::ShapeError;

/// How a sequence of vertices is assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl Topology {
    /// Native GPU topology used to issue this batch.
    /// Line loops and triangle fans have no native form and go through `VertexBatch::indices`.
    pub const fn gpu_topology(self) -> wgpu::PrimitiveTopology {
        match self {
            Topology::Points => wgpu::PrimitiveTopology::PointList,
            Topology::Lines => wgpu::PrimitiveTopology::LineList,
            Topology::LineStrip | Topology::LineLoop => wgpu::PrimitiveTopology::LineStrip,
            Topology::Triangles | Topology::TriangleFan => wgpu::PrimitiveTopology::TriangleList,
            Topology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }

    /// True for topologies that produce filled polygons
    pub const fn is_solid(self) -> bool {
        matches!(
            self,
            Topology::Triangles | Topology::TriangleStrip | Topology::TriangleFan
        )
    }
}

/// Vertex layout uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Immutable collection of vertex positions with a draw topology
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBatch {
    topology: Topology,
    vertices: Vec<Vertex>,
}

impl VertexBatch {
    /// Build a batch from flat xyz coordinates.
    ///
    /// `positions` must hold exactly `vertex_count * 3` floats and `vertex_count`
    /// must be non-zero. Nothing is truncated or padded.
    pub fn build(
        topology: Topology,
        vertex_count: usize,
        positions: &[f32],
    ) -> Result<Self, ShapeError> {
        if vertex_count == 0 {
            return Err(ShapeError::EmptyBatch { topology });
        }

        let expected = vertex_count
            .checked_mul(3)
            .ok_or(ShapeError::VertexCountOverflow {
                topology,
                vertex_count,
            })?;
        if positions.len() != expected {
            return Err(ShapeError::VertexCountMismatch {
                topology,
                expected,
                actual: positions.len(),
            });
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|p| Vertex {
                position: [p[0], p[1], p[2]],
            })
            .collect();

        Ok(Self { topology, vertices })
    }

    /// Build a batch from generator output
    pub fn from_vertices(topology: Topology, positions: &[[f32; 3]]) -> Result<Self, ShapeError> {
        let flat: Vec<f32> = positions.iter().flatten().copied().collect();
        Self::build(topology, positions.len(), &flat)
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn position(&self, index: usize) -> Option<[f32; 3]> {
        self.vertices.get(index).map(|v| v.position)
    }

    pub fn gpu_topology(&self) -> wgpu::PrimitiveTopology {
        self.topology.gpu_topology()
    }

    /// True when the batch is issued through `indices`
    pub fn is_indexed(&self) -> bool {
        matches!(self.topology, Topology::LineLoop | Topology::TriangleFan)
    }

    /// Index list for topologies the GPU cannot draw directly
    pub fn indices(&self) -> Option<Vec<u32>> {
        let n = self.vertices.len() as u32;
        match self.topology {
            Topology::LineLoop => Some((0..n).chain(std::iter::once(0)).collect()),
            Topology::TriangleFan => Some(self.triangles().into_iter().flatten().collect()),
            _ => None,
        }
    }

    /// Number of vertices (or indices, when `indices` is `Some`) to issue.
    /// Trailing vertices that cannot complete a primitive are dropped.
    pub fn draw_count(&self) -> u32 {
        let n = self.vertices.len() as u32;
        match self.topology {
            Topology::Lines => n - n % 2,
            Topology::Triangles => n - n % 3,
            Topology::LineLoop => n + 1,
            Topology::TriangleFan => n.saturating_sub(2) * 3,
            Topology::Points | Topology::LineStrip | Topology::TriangleStrip => n,
        }
    }

    /// Triangle decomposition; empty for point and line topologies
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        let n = self.vertices.len() as u32;
        match self.topology {
            Topology::Triangles => (0..n / 3).map(|t| [t * 3, t * 3 + 1, t * 3 + 2]).collect(),
            // Odd strip triangles swap their first two vertices to keep the winding
            Topology::TriangleStrip => (0..n.saturating_sub(2))
                .map(|i| if i % 2 == 0 { [i, i + 1, i + 2] } else { [i + 1, i, i + 2] })
                .collect(),
            Topology::TriangleFan => (1..n.saturating_sub(1)).map(|i| [0, i, i + 1]).collect(),
            _ => Vec::new(),
        }
    }

    /// Unique triangle edges as a line list, in first-seen order
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();

        for [a, b, c] in self.triangles() {
            for (from, to) in [(a, b), (b, c), (c, a)] {
                if seen.insert((from.min(to), from.max(to))) {
                    edges.push(from);
                    edges.push(to);
                }
            }
        }

        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COAST: [f32; 9] = [3.0, 3.0, 0.0, 0.0, 3.0, 0.0, 3.0, 0.0, 0.0];

    #[test]
    fn test_build_keeps_order() {
        let batch = VertexBatch::build(Topology::LineStrip, 3, &COAST).unwrap();
        assert_eq!(batch.vertex_count(), 3);
        assert_eq!(batch.position(0), Some([3.0, 3.0, 0.0]));
        assert_eq!(batch.position(2), Some([3.0, 0.0, 0.0]));
        assert_eq!(batch.position(3), None);
    }

    #[test]
    fn test_build_rejects_zero_vertices() {
        let err = VertexBatch::build(Topology::Points, 0, &[]).unwrap_err();
        assert_eq!(err, ShapeError::EmptyBatch { topology: Topology::Points });
    }

    #[test]
    fn test_build_rejects_short_data() {
        let err = VertexBatch::build(Topology::Triangles, 4, &COAST).unwrap_err();
        assert_eq!(
            err,
            ShapeError::VertexCountMismatch {
                topology: Topology::Triangles,
                expected: 12,
                actual: 9,
            }
        );
    }

    #[test]
    fn test_build_rejects_extra_data() {
        let err = VertexBatch::build(Topology::Points, 2, &COAST).unwrap_err();
        assert!(matches!(err, ShapeError::VertexCountMismatch { expected: 6, actual: 9, .. }));
    }

    #[test]
    fn test_build_rejects_overflowing_count() {
        let vertex_count = usize::MAX / 3 + 1;
        let err = VertexBatch::build(Topology::Points, vertex_count, &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            ShapeError::VertexCountOverflow {
                topology: Topology::Points,
                vertex_count,
            }
        );
    }

    #[test]
    fn test_from_vertices_rejects_empty() {
        assert!(VertexBatch::from_vertices(Topology::TriangleFan, &[]).is_err());
    }

    #[test]
    fn test_gpu_topology_mapping() {
        assert_eq!(Topology::Points.gpu_topology(), wgpu::PrimitiveTopology::PointList);
        assert_eq!(Topology::Lines.gpu_topology(), wgpu::PrimitiveTopology::LineList);
        assert_eq!(Topology::LineLoop.gpu_topology(), wgpu::PrimitiveTopology::LineStrip);
        assert_eq!(Topology::TriangleFan.gpu_topology(), wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(Topology::TriangleStrip.gpu_topology(), wgpu::PrimitiveTopology::TriangleStrip);
    }

    #[test]
    fn test_line_loop_closes_on_first_vertex() {
        let batch = VertexBatch::build(Topology::LineLoop, 3, &COAST).unwrap();
        assert!(batch.is_indexed());
        assert_eq!(batch.indices(), Some(vec![0, 1, 2, 0]));
        assert_eq!(batch.draw_count(), 4);
    }

    #[test]
    fn test_lines_drop_unpaired_vertex() {
        let batch = VertexBatch::build(Topology::Lines, 3, &COAST).unwrap();
        assert!(!batch.is_indexed());
        assert_eq!(batch.indices(), None);
        assert_eq!(batch.draw_count(), 2);
    }

    #[test]
    fn test_fan_expands_to_triangle_list() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0]];
        let batch = VertexBatch::from_vertices(Topology::TriangleFan, &positions).unwrap();
        assert_eq!(batch.indices(), Some(vec![0, 1, 2, 0, 2, 3]));
        assert_eq!(batch.draw_count(), 6);
    }

    #[test]
    fn test_strip_triangles_alternate_winding() {
        let positions = [[0.0; 3]; 5];
        let batch = VertexBatch::from_vertices(Topology::TriangleStrip, &positions).unwrap();
        assert_eq!(batch.triangles(), vec![[0, 1, 2], [2, 1, 3], [2, 3, 4]]);
        assert_eq!(batch.indices(), None);
        assert_eq!(batch.draw_count(), 5);
    }

    #[test]
    fn test_lines_have_no_triangles() {
        let batch = VertexBatch::build(Topology::LineStrip, 3, &COAST).unwrap();
        assert!(batch.triangles().is_empty());
        assert!(batch.edge_indices().is_empty());
    }

    #[test]
    fn test_edges_are_deduplicated() {
        // Two triangles sharing the 1-2 edge
        let positions = [[0.0; 3]; 4];
        let batch = VertexBatch::from_vertices(Topology::TriangleStrip, &positions).unwrap();
        let edges = batch.edge_indices();
        assert_eq!(edges.len(), 10, "5 unique edges expected");
        assert_eq!(&edges[..6], &[0, 1, 1, 2, 2, 0]);
    }

    #[test]
    fn test_vertex_layout_stride() {
        assert_eq!(Vertex::layout().array_stride, 12);
    }
}
