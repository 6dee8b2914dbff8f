//! Native host: a winit window as the mount point.
//!
//! The window is the container the surface fills. Frame callbacks are redraw
//! requests; since winit cannot withdraw a redraw request, a cancelled
//! [`FrameRequest`] is simply forgotten and the redraw that still arrives is
//! dropped.

use std::collections::HashMap;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::BackdropConfig;
use crate::error::{GpuError, RunError};
use crate::gpu::GpuRenderer;
use crate::host::{EventKind, FrameRequest, Host, ListenerId, SurfaceAttributes};
use crate::lifecycle::Backdrop;
use crate::viewport::{HostMetrics, ViewportState};

/// [`Host`] backed by a winit window.
pub struct WindowHost {
    window: Arc<Window>,
    config: BackdropConfig,
    listeners: HashMap<ListenerId, EventKind>,
    next_listener: u64,
    pending_frame: Option<FrameRequest>,
    next_frame: u64,
}

impl WindowHost {
    pub fn new(window: Arc<Window>, config: BackdropConfig) -> Self {
        Self {
            window,
            config,
            listeners: HashMap::new(),
            next_listener: 0,
            pending_frame: None,
            next_frame: 0,
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Whether any listener for `kind` is registered.
    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.values().any(|&k| k == kind)
    }

    /// Take the frame request a `RedrawRequested` event fulfils, if it was
    /// not cancelled.
    pub fn take_due_frame(&mut self) -> Option<FrameRequest> {
        self.pending_frame.take()
    }

    /// Logical metrics for a physical window size.
    pub fn metrics_for(&self, size: PhysicalSize<u32>) -> HostMetrics {
        let scale = self.window.scale_factor();
        let logical: LogicalSize<f64> = size.to_logical(scale);
        HostMetrics::new(logical.width as f32, logical.height as f32, scale as f32)
    }

    /// Logical client coordinates for a physical cursor position.
    pub fn client_position(&self, position: PhysicalPosition<f64>) -> (f32, f32) {
        let logical = position.to_logical::<f64>(self.window.scale_factor());
        (logical.x as f32, logical.y as f32)
    }
}

impl Host for WindowHost {
    type Surface = GpuRenderer;

    fn metrics(&self) -> HostMetrics {
        self.metrics_for(self.window.inner_size())
    }

    fn is_compact(&self) -> bool {
        self.metrics().width < self.config.compact_breakpoint
    }

    fn create_surface(&mut self, viewport: &ViewportState) -> Result<GpuRenderer, GpuError> {
        pollster::block_on(GpuRenderer::new(self.window.clone(), viewport, &self.config))
    }

    fn attach(&mut self, _surface: &GpuRenderer, attributes: SurfaceAttributes) {
        // The surface always covers the whole client area, and winit exposes
        // no accessibility tree, so only visibility is ours to manage.
        // Hit-testing stays on: pointer moves are delivered through this window.
        log::debug!("Attaching surface with {:?}", attributes);
        self.window.set_visible(true);
    }

    fn detach(&mut self, _surface: &GpuRenderer) {
        self.window.set_visible(false);
    }

    fn listen(&mut self, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, kind);
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_frame);
        self.next_frame += 1;
        self.pending_frame = Some(request);
        self.window.request_redraw();
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending_frame == Some(request) {
            self.pending_frame = None;
        }
    }
}

/// winit application driving one backdrop in one window.
struct App {
    config: BackdropConfig,
    host: Option<WindowHost>,
    backdrop: Backdrop<GpuRenderer>,
    error: Option<RunError>,
}

impl App {
    fn new(config: BackdropConfig) -> Result<Self, RunError> {
        let backdrop = Backdrop::new(config.clone())?;
        Ok(Self {
            config,
            host: None,
            backdrop,
            error: None,
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_some() {
            return;
        }

        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(width, height))
            .with_visible(false)
            .with_transparent(self.config.transparent);

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        let host = self.host.insert(WindowHost::new(window, self.config.clone()));
        if self.backdrop.start(host).is_err() {
            // Fail closed: keep the window, show nothing.
            host.window().set_visible(true);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(host) = self.host.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                self.backdrop.stop(host);
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if host.is_listening(EventKind::Resize) {
                    let metrics = host.metrics_for(size);
                    self.backdrop.on_resize(metrics);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if host.is_listening(EventKind::PointerMove) {
                    let (x, y) = host.client_position(position);
                    self.backdrop.on_pointer_move(x, y);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(request) = host.take_due_frame() {
                    self.backdrop.frame(host, request);
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(host) = self.host.as_mut() {
            self.backdrop.stop(host);
        }
    }
}

/// Open a window and run the backdrop until it is closed.
pub fn run(config: BackdropConfig) -> Result<(), RunError> {
    let mut app = App::new(config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

