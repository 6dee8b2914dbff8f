//! Backdrop lifecycle: ordered acquisition at start, ordered release at stop.
//!
//! [`Backdrop`] is the single owner of everything a running background needs:
//! the render surface, the particle field, the listener handles and the
//! pending frame request. Nothing is shared, so teardown has exactly one
//! place to happen.
//!
//! # Start order
//!
//! 1. Measure the viewport and pin the density class
//! 2. Create the surface and attach it to the mount point
//! 3. Generate the field and upload it
//! 4. Register resize and pointer-move listeners
//! 5. Create the clock and request the first frame
//!
//! # Stop order
//!
//! 1. Cancel the pending frame
//! 2. Remove listeners
//! 3. Detach the surface from the mount point
//! 4. Release surface-side buffers, then drop the field and clock
//!
//! # Example
//!
//! ```ignore
//! let mut backdrop = Backdrop::new(BackdropConfig::default())?;
//! if let Err(e) = backdrop.start(&mut host) {
//!     // Page keeps working without the background
//! }
//! // host calls backdrop.frame(&mut host, request) for each granted frame
//! backdrop.stop(&mut host);
//! ```

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::BackdropConfig;
use crate::error::{ConfigError, GpuError};
use crate::field::{Palette, ParticleBuffer};
use crate::host::{EventKind, FrameRequest, Host, ListenerId, RenderSurface, SurfaceAttributes};
use crate::input::{InputState, PointerSampler};
use crate::render_loop::{Orientation, RenderLoop};
use crate::viewport::{DensityClass, HostMetrics, ViewportAdapter, ViewportState};

/// Resources held while running.
struct Active<S> {
    surface: S,
    field: ParticleBuffer,
    viewport: ViewportAdapter,
    pointer: PointerSampler,
    driver: RenderLoop,
    listeners: Vec<ListenerId>,
    pending: Option<FrameRequest>,
}

enum Phase<S> {
    Idle,
    Running(Box<Active<S>>),
}

/// The animated particle background.
pub struct Backdrop<S: RenderSurface> {
    config: BackdropConfig,
    palette: Palette,
    phase: Phase<S>,
    frames_drawn: u64,
}

impl<S: RenderSurface> Backdrop<S> {
    /// Create a stopped backdrop.
    pub fn new(config: BackdropConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let palette = config.palette()?;
        Ok(Self {
            config,
            palette,
            phase: Phase::Idle,
            frames_drawn: 0,
        })
    }

    /// Acquire everything and begin the frame loop.
    ///
    /// If the host cannot provide a surface, nothing is attached or
    /// registered and the error is returned; the backdrop stays stopped and
    /// no retry is made. Starting an already running backdrop does nothing.
    pub fn start<H: Host<Surface = S>>(&mut self, host: &mut H) -> Result<(), GpuError> {
        if self.is_running() {
            return Ok(());
        }

        let viewport = ViewportAdapter::new(host.metrics(), host.is_compact());

        let mut surface = match host.create_surface(viewport.state()) {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("Particle background disabled: {}", e);
                return Err(e);
            }
        };
        host.attach(&surface, SurfaceAttributes::DECORATIVE);

        let density = viewport.density();
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let field = ParticleBuffer::generate(density.particle_count(), &self.palette, &mut rng);
        surface.upload_field(&field);

        let listeners = vec![
            host.listen(EventKind::Resize),
            host.listen(EventKind::PointerMove),
        ];

        let driver = RenderLoop::new();
        let pending = Some(host.request_frame());

        let state = viewport.state();
        log::info!(
            "Backdrop started: {} particles ({:?}), {}x{} @{}x",
            field.len(),
            density,
            state.width,
            state.height,
            state.pixel_ratio
        );

        self.phase = Phase::Running(Box::new(Active {
            surface,
            field,
            viewport,
            pointer: PointerSampler::new(),
            driver,
            listeners,
            pending,
        }));
        Ok(())
    }

    /// Tear everything down. Safe to call any number of times, and before
    /// or after a failed start.
    pub fn stop<H: Host<Surface = S>>(&mut self, host: &mut H) {
        let Phase::Running(active) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return;
        };
        let Active {
            surface,
            field,
            listeners,
            pending,
            driver,
            ..
        } = *active;

        if let Some(request) = pending {
            host.cancel_frame(request);
        }
        for id in listeners {
            host.unlisten(id);
        }
        host.detach(&surface);
        surface.release();
        drop(field);

        log::info!(
            "Backdrop stopped after {} frames ({:.1} fps average)",
            driver.frames(),
            driver.clock().average_fps()
        );
    }

    /// Run one frame for a granted `request`.
    ///
    /// Requests that are not the currently pending one (cancelled or stale)
    /// and calls after stop are ignored without rescheduling.
    pub fn frame<H: Host<Surface = S>>(&mut self, host: &mut H, request: FrameRequest) {
        let Phase::Running(active) = &mut self.phase else {
            return;
        };
        if active.pending != Some(request) {
            log::trace!("Ignoring stale frame request {:?}", request);
            return;
        }
        active.pending = None;

        let input = active.pointer.state();
        let frame = active.driver.tick(input);
        active.surface.draw(&frame);
        self.frames_drawn += 1;

        active.pending = Some(host.request_frame());
    }

    /// Handle a host resize. Only the surface is resized; the field is kept.
    pub fn on_resize(&mut self, metrics: HostMetrics) {
        let Phase::Running(active) = &mut self.phase else {
            return;
        };
        if active.viewport.resize(metrics) {
            let state = *active.viewport.state();
            log::debug!(
                "Viewport resized to {}x{} @{}x (aspect {:.3})",
                state.width,
                state.height,
                state.pixel_ratio,
                state.aspect
            );
            active.surface.resize(&state);
        }
    }

    /// Handle a pointer move at logical client coordinates.
    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32) {
        if let Phase::Running(active) = &mut self.phase {
            let viewport = *active.viewport.state();
            active.pointer.sample(client_x, client_y, &viewport);
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    /// Frames drawn over the lifetime of this backdrop, across restarts.
    #[inline]
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    fn active(&self) -> Option<&Active<S>> {
        match &self.phase {
            Phase::Running(active) => Some(active),
            Phase::Idle => None,
        }
    }

    pub fn density(&self) -> Option<DensityClass> {
        self.active().map(|a| a.viewport.density())
    }

    pub fn viewport(&self) -> Option<ViewportState> {
        self.active().map(|a| *a.viewport.state())
    }

    pub fn input(&self) -> Option<InputState> {
        self.active().map(|a| a.pointer.state())
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.active().map(|a| a.driver.orientation())
    }

    pub fn field(&self) -> Option<&ParticleBuffer> {
        self.active().map(|a| &a.field)
    }

    pub fn surface(&self) -> Option<&S> {
        self.active().map(|a| &a.surface)
    }

    /// The frame request the host should deliver next, if any.
    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.active().and_then(|a| a.pending)
    }
}
