//! # Backdrop
//!
//! A decorative 3D particle field that drifts behind page content and leans
//! gently toward the pointer.
//!
//! The field is a fixed cloud of colored point sprites scattered through a
//! cube. Each frame the whole cloud spins slowly around Y and tilts toward
//! the pointer through exponential smoothing, then is drawn with a single
//! instanced draw call.
//!
//! ## Quick Start
//!
//! ```ignore
//! use backdrop::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     backdrop::window::run(BackdropConfig::default())
//! }
//! ```
//!
//! ## Embedding
//!
//! [`Backdrop`] is display-agnostic. Anything implementing [`Host`] can run
//! it: the host supplies viewport metrics, the compact-viewport signal, a
//! [`RenderSurface`], listener registration and frame scheduling.
//!
//! ```ignore
//! let mut backdrop = Backdrop::new(config)?;
//! backdrop.start(&mut host)?;           // acquire everything
//! backdrop.on_pointer_move(x, y);       // from the host's event stream
//! backdrop.frame(&mut host, request);   // for each granted frame
//! backdrop.stop(&mut host);             // release everything, idempotent
//! ```
//!
//! ## Density
//!
//! | Viewport | Particles |
//! |----------|-----------|
//! | Compact  | 1500      |
//! | Full     | 3000      |
//!
//! The tier is chosen once per start and kept until stop.

pub mod config;
pub mod error;
pub mod field;
pub mod gpu;
pub mod host;
pub mod input;
pub mod lifecycle;
pub mod render_loop;
pub mod time;
pub mod viewport;
pub mod window;

pub use config::BackdropConfig;
pub use error::{ConfigError, GpuError, RunError};
pub use field::{Palette, ParticleBuffer};
pub use glam::{Vec2, Vec3};
pub use host::{EventKind, FrameRequest, Host, ListenerId, RenderSurface, SurfaceAttributes};
pub use input::InputState;
pub use lifecycle::Backdrop;
pub use render_loop::{FrameParams, Orientation};
pub use viewport::{DensityClass, HostMetrics, ViewportState};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use backdrop::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::BackdropConfig;
    pub use crate::error::{ConfigError, GpuError, RunError};
    pub use crate::field::{Palette, ParticleBuffer};
    pub use crate::host::{EventKind, FrameRequest, Host, ListenerId, RenderSurface, SurfaceAttributes};
    pub use crate::input::InputState;
    pub use crate::lifecycle::Backdrop;
    pub use crate::render_loop::{FrameParams, Orientation};
    pub use crate::viewport::{DensityClass, HostMetrics, ViewportState};
    pub use crate::{Vec2, Vec3};
}
