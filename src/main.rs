use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use primitive_shapes::cli::Cli;
use primitive_shapes::core::{
    input_adapter, Command, SurfaceRenderer, WindowCallbacks, WindowDimensions,
};
use primitive_shapes::{Scene, ShapeSet, Viewer};

const INITIAL_TITLE: &str = "Shape";

struct App {
    cli: Cli,
    scene: Option<Scene>,
    window: Option<Arc<Window>>,
    viewer: Option<Viewer<SurfaceRenderer>>,
    failed: bool,
}

impl App {
    fn new(cli: Cli, scene: Scene) -> Self {
        Self {
            cli,
            scene: Some(scene),
            window: None,
            viewer: None,
            failed: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.failed = true;
        event_loop.exit();
    }

    /// Process status; failures were already logged by `fail`
    fn exit_code(&self) -> ExitCode {
        if self.failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(INITIAL_TITLE)
                    .with_inner_size(winit::dpi::LogicalSize::new(self.cli.width, self.cli.height)),
            )
            .context("Failed to create window")?;
        let window = Arc::new(window);

        let scene = self.scene.take().context("Scene already consumed")?;
        let renderer = pollster::block_on(SurfaceRenderer::new(window.clone(), scene.shapes()))
            .context("Failed to initialize renderer")?;

        let mut viewer = Viewer::new(scene, renderer);
        viewer.reshape(WindowDimensions::from(window.inner_size()));

        self.window = Some(window);
        self.viewer = Some(viewer);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(viewer) = &mut self.viewer else {
            return;
        };

        match viewer.display() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                viewer.shader_mut().reconfigure();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timeout, skipping frame"),
            Err(e @ wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow::Error::new(e).context("Render failed"));
            }
            Err(e) => log::warn!("Render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.reshape(WindowDimensions::from(size));
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let (Some(viewer), Some(window)) = (&mut self.viewer, &self.window) else {
                    return;
                };

                match input_adapter::translate(&event) {
                    Some(Command::Quit) => event_loop.exit(),
                    Some(Command::Character(key)) => viewer.key_press(key, &**window),
                    Some(Command::Special(direction)) => {
                        viewer.special_key(direction, &**window)
                    }
                    None => {}
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let shapes = ShapeSet::build(&cli.shape_params()).context("Failed to build shapes")?;
    let scene = Scene::new(shapes).with_selection(cli.shape);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(cli, scene);

    log::info!("Controls: Space cycles shapes, arrows rotate, Escape quits");
    event_loop.run_app(&mut app)?;

    Ok(app.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_shapes::ShapeParams;

    fn app() -> App {
        let cli = Cli::parse_from(["primitive-shapes"]);
        let shapes = ShapeSet::build(&ShapeParams::default()).unwrap();
        App::new(cli, Scene::new(shapes))
    }

    #[test]
    fn test_clean_run_exits_successfully() {
        let app = app();
        assert_eq!(format!("{:?}", app.exit_code()), format!("{:?}", ExitCode::SUCCESS));
    }

    #[test]
    fn test_failure_maps_to_failure_status() {
        let mut app = app();
        app.failed = true;
        assert_eq!(format!("{:?}", app.exit_code()), format!("{:?}", ExitCode::FAILURE));
    }
}
