use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::window::Window;

use super::gpu_context::{GpuContext, DEPTH_FORMAT};
use super::render_pipeline::{Color, FlatShader};
use super::window::WindowDimensions;
use crate::batch::{Vertex, VertexBatch};
use crate::render_state::{PolygonMode, RenderFlags};
use crate::shapes::{ShapeKind, ShapeSet};

/// Background colour
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.7,
    g: 0.7,
    b: 0.7,
    a: 1.0,
};

/// Uniform slots allocated up front; grows on demand
const INITIAL_UNIFORM_SLOTS: usize = 4;

/// Clip-space depth shift per offset unit when depth bias is unavailable
pub const EDGE_DEPTH_NUDGE: f32 = 1.0e-4;

/// Per-draw uniform block for the flat shader
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FlatUniform {
    pub mvp: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// Added to NDC depth in the vertex shader
    pub depth_nudge: f32,
    _pad: [f32; 3],
}

impl FlatUniform {
    pub fn new(mvp: &Mat4, color: Color, depth_nudge: f32) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            color,
            depth_nudge,
            _pad: [0.0; 3],
        }
    }
}

/// Pipeline variant a draw needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub topology: wgpu::PrimitiveTopology,
    pub polygon_mode: wgpu::PolygonMode,
    /// Constant and slope (as raw bits) depth bias
    pub depth_bias: Option<(i32, u32)>,
    pub blend: bool,
}

/// Which buffer a draw reads its primitives from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawSource {
    Vertices,
    Indices,
    /// Triangle edges as a line list (outline without line polygon mode)
    Edges,
}

/// How a single draw is issued
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawPlan {
    pub key: PipelineKey,
    pub source: DrawSource,
    /// Depth offset applied in the shader (edge outlines only)
    pub depth_nudge: f32,
}

/// Choose the pipeline and primitive source for drawing `batch` under `flags`
pub fn plan_draw(batch: &VertexBatch, flags: &RenderFlags, line_polygon_mode: bool) -> DrawPlan {
    let outline = flags.polygon_mode == PolygonMode::Line && batch.topology().is_solid();

    if outline && !line_polygon_mode {
        // Depth bias is not applied to line primitives, shift depth in the shader instead
        let key = PipelineKey {
            topology: wgpu::PrimitiveTopology::LineList,
            polygon_mode: wgpu::PolygonMode::Fill,
            depth_bias: None,
            blend: flags.blend,
        };
        let depth_nudge = flags
            .line_offset
            .map_or(0.0, |offset| offset.units * EDGE_DEPTH_NUDGE);
        return DrawPlan {
            key,
            source: DrawSource::Edges,
            depth_nudge,
        };
    }

    let depth_bias = flags
        .line_offset
        .filter(|_| outline)
        .map(|offset| (offset.units as i32, offset.factor.to_bits()));

    let key = PipelineKey {
        topology: batch.gpu_topology(),
        polygon_mode: if outline {
            wgpu::PolygonMode::Line
        } else {
            wgpu::PolygonMode::Fill
        },
        depth_bias,
        blend: flags.blend,
    };

    let source = if batch.is_indexed() {
        DrawSource::Indices
    } else {
        DrawSource::Vertices
    };

    DrawPlan {
        key,
        source,
        depth_nudge: 0.0,
    }
}

/// GPU copies of one batch
struct GpuBatch {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    edge_buffer: Option<wgpu::Buffer>,
    draw_count: u32,
    edge_count: u32,
}

impl GpuBatch {
    fn upload(device: &wgpu::Device, kind: ShapeKind, batch: &VertexBatch) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(kind.gl_name()),
            contents: bytemuck::cast_slice(batch.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = batch.indices().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Batch Indices"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        let edges = batch.edge_indices();
        let edge_buffer = (!edges.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Batch Edges"),
                contents: bytemuck::cast_slice(&edges),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        Self {
            vertex_buffer,
            index_buffer,
            edge_buffer,
            draw_count: batch.draw_count(),
            edge_count: edges.len() as u32,
        }
    }
}

/// A draw queued between `begin_frame` and `end_frame`
#[derive(Debug, Clone, Copy)]
struct DrawCall {
    shape: ShapeKind,
    key: PipelineKey,
    source: DrawSource,
    uniform: FlatUniform,
}

/// Draws flat-coloured batches into the window surface
pub struct SurfaceRenderer {
    gpu: GpuContext,
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    bind_group_layout: wgpu::BindGroupLayout,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    batches: Vec<GpuBatch>,
    uniform_buffer: wgpu::Buffer,
    uniform_stride: u64,
    uniform_slots: usize,
    bind_group: wgpu::BindGroup,
    draws: Vec<DrawCall>,
    noted_fixed_width: bool,
}

impl SurfaceRenderer {
    /// Create the GPU context for `window` and upload every batch in `shapes`
    pub async fn new(window: Arc<Window>, shapes: &ShapeSet) -> Result<Self> {
        let gpu = GpuContext::new(window).await?;
        let device = gpu.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Flat Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("flat.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Flat Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(Self::uniform_size()),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Flat Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let uniform_stride = Self::uniform_size().div_ceil(alignment) * alignment;
        let (uniform_buffer, bind_group) =
            Self::create_uniforms(device, &bind_group_layout, uniform_stride, INITIAL_UNIFORM_SLOTS);

        let batches = shapes
            .iter()
            .map(|(kind, batch)| GpuBatch::upload(device, kind, batch))
            .collect();

        log::info!("Uploaded {} batches", ShapeKind::COUNT);

        Ok(Self {
            gpu,
            shader,
            pipeline_layout,
            bind_group_layout,
            pipelines: HashMap::new(),
            batches,
            uniform_buffer,
            uniform_stride,
            uniform_slots: INITIAL_UNIFORM_SLOTS,
            bind_group,
            draws: Vec::new(),
            noted_fixed_width: false,
        })
    }

    /// Reapply the surface configuration after it was lost or outdated
    pub fn reconfigure(&mut self) {
        self.gpu.reconfigure();
    }

    const fn uniform_size() -> u64 {
        std::mem::size_of::<FlatUniform>() as u64
    }

    fn create_uniforms(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        slots: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Flat Uniforms"),
            size: stride * slots as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Flat Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(Self::uniform_size()),
                }),
            }],
        });

        (buffer, bind_group)
    }

    fn ensure_uniform_slots(&mut self, needed: usize) {
        if needed <= self.uniform_slots {
            return;
        }

        let slots = needed.next_power_of_two();
        let (buffer, bind_group) = Self::create_uniforms(
            self.gpu.device(),
            &self.bind_group_layout,
            self.uniform_stride,
            slots,
        );
        self.uniform_buffer = buffer;
        self.bind_group = bind_group;
        self.uniform_slots = slots;
        log::debug!("Uniform buffer grown to {} slots", slots);
    }

    fn ensure_pipeline(&mut self, key: PipelineKey) {
        if self.pipelines.contains_key(&key) {
            return;
        }

        let pipeline = Self::create_pipeline(
            self.gpu.device(),
            &self.pipeline_layout,
            &self.shader,
            self.gpu.surface_format(),
            key,
        );
        log::debug!("Created pipeline {:?}", key);
        self.pipelines.insert(key, pipeline);
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        key: PipelineKey,
    ) -> wgpu::RenderPipeline {
        let bias = key
            .depth_bias
            .map(|(constant, slope)| wgpu::DepthBiasState {
                constant,
                slope_scale: f32::from_bits(slope),
                clamp: 0.0,
            })
            .unwrap_or_default();

        let blend = if key.blend {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Flat Pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: key.topology,
                strip_index_format: key.topology.is_strip().then_some(wgpu::IndexFormat::Uint32),
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: key.polygon_mode,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias,
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

impl FlatShader for SurfaceRenderer {
    type Error = wgpu::SurfaceError;

    fn resize(&mut self, dimensions: WindowDimensions) {
        self.gpu.resize(dimensions);
    }

    fn begin_frame(&mut self) {
        self.draws.clear();
    }

    fn draw_flat(
        &mut self,
        shape: ShapeKind,
        batch: &VertexBatch,
        mvp: &Mat4,
        color: Color,
        flags: &RenderFlags,
    ) {
        let wide = flags.point_size != 1.0 || flags.line_width != 1.0 || flags.line_smooth;
        if wide && !self.noted_fixed_width {
            log::info!("Point size, line width and line smoothing are fixed on this backend");
            self.noted_fixed_width = true;
        }

        let plan = plan_draw(batch, flags, self.gpu.supports_line_polygon_mode());
        self.draws.push(DrawCall {
            shape,
            key: plan.key,
            source: plan.source,
            uniform: FlatUniform::new(mvp, color, plan.depth_nudge),
        });
    }

    fn end_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let draws = std::mem::take(&mut self.draws);

        self.ensure_uniform_slots(draws.len());
        for draw in &draws {
            self.ensure_pipeline(draw.key);
        }

        for (slot, draw) in draws.iter().enumerate() {
            self.gpu.queue().write_buffer(
                &self.uniform_buffer,
                slot as u64 * self.uniform_stride,
                bytemuck::bytes_of(&draw.uniform),
            );
        }

        let output = self.gpu.surface().get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Shape Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shape Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.gpu.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for (slot, draw) in draws.iter().enumerate() {
                let Some(pipeline) = self.pipelines.get(&draw.key) else {
                    continue;
                };
                let batch = &self.batches[draw.shape.index()];
                let offset = (slot as u64 * self.uniform_stride) as u32;

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[offset]);
                render_pass.set_vertex_buffer(0, batch.vertex_buffer.slice(..));

                match draw.source {
                    DrawSource::Vertices => render_pass.draw(0..batch.draw_count, 0..1),
                    DrawSource::Indices => {
                        if let Some(indices) = &batch.index_buffer {
                            render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                            render_pass.draw_indexed(0..batch.draw_count, 0, 0..1);
                        }
                    }
                    DrawSource::Edges => {
                        if let Some(edges) = &batch.edge_buffer {
                            render_pass.set_index_buffer(edges.slice(..), wgpu::IndexFormat::Uint32);
                            render_pass.draw_indexed(0..batch.edge_count, 0, 0..1);
                        }
                    }
                }
            }
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
