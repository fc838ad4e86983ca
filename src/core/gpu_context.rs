use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use wgpu::{Adapter, Device, DeviceDescriptor, Features, Instance, Limits, Queue, Surface};
use winit::window::Window;

use super::window::WindowDimensions;

/// Depth buffer format
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Device, queue and window surface plus the depth buffer that matches it
pub struct GpuContext {
    device: Device,
    queue: Queue,
    surface: Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    line_polygon_mode: bool,
}

impl GpuContext {
    /// Create a GPU context rendering into `window`
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let dimensions = WindowDimensions::new(size.width.max(1), size.height.max(1));

        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("Failed to create window surface")?;
        let adapter = Self::request_adapter(&instance, &surface).await?;

        let info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?})", info.name, info.backend);

        let line_polygon_mode = adapter.features().contains(Features::POLYGON_MODE_LINE);
        if !line_polygon_mode {
            log::info!("Line polygon mode unavailable, outlines use edge lists");
        }

        let (device, queue) = Self::request_device(&adapter, line_polygon_mode).await?;

        let config = Self::create_surface_config(&surface, &adapter, dimensions)?;
        surface.configure(&device, &config);
        log::info!("Surface format: {:?}", config.format);

        let depth_view = Self::create_depth_view(&device, dimensions);

        Ok(Self {
            device,
            queue,
            surface,
            config,
            depth_view,
            line_polygon_mode,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn surface(&self) -> &Surface<'static> {
        &self.surface
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Whether triangles can be rasterised as outlines natively
    pub fn supports_line_polygon_mode(&self) -> bool {
        self.line_polygon_mode
    }

    pub fn dimensions(&self) -> WindowDimensions {
        WindowDimensions::new(self.config.width, self.config.height)
    }

    /// Resize surface and depth buffer; zero-sized requests are ignored
    pub fn resize(&mut self, dimensions: WindowDimensions) {
        if dimensions.width == 0 || dimensions.height == 0 || dimensions == self.dimensions() {
            return;
        }

        self.config.width = dimensions.width;
        self.config.height = dimensions.height;
        self.reconfigure();
        log::debug!("Surface resized to {}x{}", dimensions.width, dimensions.height);
    }

    /// Reapply the surface configuration (after a lost or outdated surface)
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_view = Self::create_depth_view(&self.device, self.dimensions());
    }

    /// Request adapter with surface compatibility
    async fn request_adapter(instance: &Instance, surface: &Surface<'_>) -> Result<Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("Failed to find appropriate adapter: {:?}", e))
    }

    /// Request device and queue
    async fn request_device(adapter: &Adapter, line_polygon_mode: bool) -> Result<(Device, Queue)> {
        let required_features = if line_polygon_mode {
            Features::POLYGON_MODE_LINE
        } else {
            Features::empty()
        };

        adapter
            .request_device(&DeviceDescriptor {
                label: Some("Shape Device"),
                required_features,
                required_limits: Limits::downlevel_defaults().using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("Failed to create device")
    }

    fn create_surface_config(
        surface: &Surface,
        adapter: &Adapter,
        dimensions: WindowDimensions,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let caps = surface.get_capabilities(adapter);

        // Colours are authored for a non-sRGB framebuffer
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;

        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: dimensions.width,
            height: dimensions.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_view(device: &Device, dimensions: WindowDimensions) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: dimensions.width,
                height: dimensions.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}
