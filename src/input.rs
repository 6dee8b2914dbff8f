//! Pointer sampling.
//!
//! Pointer positions are normalized to the viewport with the origin at the
//! center, X increasing to the right and Y increasing upward. Only the most
//! recent sample is kept.

use crate::viewport::ViewportState;

/// Latest normalized pointer position, each axis in `[-1, 1]` while the
/// pointer is inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    pub x: f32,
    pub y: f32,
}

impl InputState {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Sole writer of [`InputState`].
#[derive(Debug, Default)]
pub struct PointerSampler {
    state: InputState,
}

impl PointerSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer move at logical client coordinates, replacing the
    /// previous sample.
    pub fn sample(&mut self, client_x: f32, client_y: f32, viewport: &ViewportState) {
        self.state = InputState {
            x: (client_x / viewport.width) * 2.0 - 1.0,
            y: -(client_y / viewport.height) * 2.0 + 1.0,
        };
    }

    /// Latest sample, or the center before any pointer move.
    #[inline]
    pub fn state(&self) -> InputState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{HostMetrics, ViewportAdapter};

    fn viewport(w: f32, h: f32) -> ViewportState {
        *ViewportAdapter::new(HostMetrics::new(w, h, 1.0), false).state()
    }

    #[test]
    fn test_center_maps_to_origin() {
        let mut sampler = PointerSampler::new();
        sampler.sample(400.0, 300.0, &viewport(800.0, 600.0));

        assert!(sampler.state().x.abs() < 1e-6);
        assert!(sampler.state().y.abs() < 1e-6);
    }

    #[test]
    fn test_corners() {
        let vp = viewport(800.0, 600.0);
        let mut sampler = PointerSampler::new();

        // Top-left of the client area
        sampler.sample(0.0, 0.0, &vp);
        assert_eq!(sampler.state(), InputState::new(-1.0, 1.0));

        // Bottom-right
        sampler.sample(800.0, 600.0, &vp);
        assert_eq!(sampler.state(), InputState::new(1.0, -1.0));
    }

    #[test]
    fn test_latest_sample_wins() {
        let vp = viewport(1000.0, 1000.0);
        let mut sampler = PointerSampler::new();

        sampler.sample(100.0, 100.0, &vp);
        sampler.sample(750.0, 250.0, &vp);

        assert_eq!(sampler.state(), InputState::new(0.5, 0.5));
    }

    #[test]
    fn test_starts_centered() {
        assert_eq!(PointerSampler::new().state(), InputState::default());
    }
}
