//! The boundary between the backdrop and whatever displays it.
//!
//! A [`Host`] provides the mount point, the event streams, frame scheduling
//! and the compact-viewport signal. A [`RenderSurface`] is what the host hands
//! back to draw into. [`WindowHost`](crate::window::WindowHost) and
//! [`GpuRenderer`](crate::gpu::GpuRenderer) implement these for a native
//! window; tests implement them with recording fakes.

use crate::error::GpuError;
use crate::field::ParticleBuffer;
use crate::render_loop::FrameParams;
use crate::viewport::{HostMetrics, ViewportState};

/// Event streams the backdrop subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Resize,
    PointerMove,
}

/// Handle for one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Handle for one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// How a surface is placed into its mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceAttributes {
    /// Stretch to 100% of the container in both dimensions.
    pub fill_container: bool,
    /// Whether the surface may receive pointer interaction.
    pub interactive: bool,
    /// Whether assistive technology may see the surface.
    pub accessible: bool,
}

impl SurfaceAttributes {
    /// Full-size, non-interactive and hidden from assistive technology.
    pub const DECORATIVE: SurfaceAttributes = SurfaceAttributes {
        fill_container: true,
        interactive: false,
        accessible: false,
    };
}

/// Something the field can be drawn into.
pub trait RenderSurface {
    /// Copy the particle field into surface-side buffers.
    fn upload_field(&mut self, field: &ParticleBuffer);

    /// Match the surface and camera to a new viewport. Must not touch the
    /// uploaded field.
    fn resize(&mut self, viewport: &ViewportState);

    /// Render one frame with exactly one draw call.
    fn draw(&mut self, frame: &FrameParams);

    /// Free every surface-side allocation, field buffers first.
    fn release(self);
}

/// The display environment a backdrop runs in.
pub trait Host {
    type Surface: RenderSurface;

    /// Current viewport measurements.
    fn metrics(&self) -> HostMetrics;

    /// Whether the viewport is currently classified as compact.
    fn is_compact(&self) -> bool;

    /// Acquire a surface sized for `viewport`.
    fn create_surface(&mut self, viewport: &ViewportState) -> Result<Self::Surface, GpuError>;

    /// Put the surface into the mount point.
    fn attach(&mut self, surface: &Self::Surface, attributes: SurfaceAttributes);

    /// Take the surface out of the mount point.
    fn detach(&mut self, surface: &Self::Surface);

    /// Start routing events of `kind` to the backdrop.
    fn listen(&mut self, kind: EventKind) -> ListenerId;

    fn unlisten(&mut self, id: ListenerId);

    /// Ask for one frame callback.
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraw a frame callback that has not run yet.
    fn cancel_frame(&mut self, request: FrameRequest);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorative_attributes() {
        let attrs = SurfaceAttributes::DECORATIVE;
        assert!(attrs.fill_container);
        assert!(!attrs.interactive);
        assert!(!attrs.accessible);
    }
}
