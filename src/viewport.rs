//! Viewport sizing and particle density.

/// Upper bound on the device pixel ratio used for rendering.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Particle count tier, chosen once when the backdrop starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DensityClass {
    /// Narrow or mobile viewport.
    Compact,
    Full,
}

impl DensityClass {
    /// Resolve from the host's compact-viewport signal.
    pub fn from_compact(compact: bool) -> Self {
        if compact {
            DensityClass::Compact
        } else {
            DensityClass::Full
        }
    }

    /// Number of particles generated for this tier.
    pub fn particle_count(self) -> usize {
        match self {
            DensityClass::Compact => 1500,
            DensityClass::Full => 3000,
        }
    }
}

/// Raw viewport measurements reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostMetrics {
    /// Logical width in pixels.
    pub width: f32,
    /// Logical height in pixels.
    pub height: f32,
    /// Physical-to-logical pixel ratio as reported by the host, uncapped.
    pub device_pixel_ratio: f32,
}

impl HostMetrics {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }
}

/// Current render sizing, read once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub width: f32,
    pub height: f32,
    /// Host pixel ratio capped at [`MAX_PIXEL_RATIO`].
    pub pixel_ratio: f32,
    /// `width / height`.
    pub aspect: f32,
}

impl ViewportState {
    /// Physical surface size in pixels, never zero.
    pub fn backing_size(&self) -> (u32, u32) {
        let w = (self.width * self.pixel_ratio).round().max(1.0) as u32;
        let h = (self.height * self.pixel_ratio).round().max(1.0) as u32;
        (w, h)
    }
}

fn capped_ratio(reported: f32) -> f32 {
    if reported.is_finite() && reported > 0.0 {
        reported.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

/// Sole writer of [`ViewportState`]; also pins the [`DensityClass`].
#[derive(Debug, Clone)]
pub struct ViewportAdapter {
    state: ViewportState,
    density: DensityClass,
}

impl ViewportAdapter {
    /// Size from the host's metrics and fix the density for this instance's lifetime.
    ///
    /// A zero-area initial viewport is treated as 1×1 so the aspect stays finite.
    pub fn new(metrics: HostMetrics, compact: bool) -> Self {
        let width = metrics.width.max(1.0);
        let height = metrics.height.max(1.0);
        Self {
            state: ViewportState {
                width,
                height,
                pixel_ratio: capped_ratio(metrics.device_pixel_ratio),
                aspect: width / height,
            },
            density: DensityClass::from_compact(compact),
        }
    }

    /// Apply a host resize. Returns `false` and keeps the old state for a
    /// zero-area viewport (e.g. a minimised window).
    pub fn resize(&mut self, metrics: HostMetrics) -> bool {
        if !(metrics.width > 0.0 && metrics.height > 0.0) {
            return false;
        }
        self.state = ViewportState {
            width: metrics.width,
            height: metrics.height,
            pixel_ratio: capped_ratio(metrics.device_pixel_ratio),
            aspect: metrics.width / metrics.height,
        };
        true
    }

    #[inline]
    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    #[inline]
    pub fn density(&self) -> DensityClass {
        self.density
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_counts() {
        assert_eq!(DensityClass::from_compact(true).particle_count(), 1500);
        assert_eq!(DensityClass::from_compact(false).particle_count(), 3000);
    }

    #[test]
    fn test_resize_sets_exact_aspect() {
        let mut adapter = ViewportAdapter::new(HostMetrics::new(800.0, 600.0, 1.0), false);
        assert_eq!(adapter.state().aspect, 800.0 / 600.0);

        assert!(adapter.resize(HostMetrics::new(1920.0, 1080.0, 1.0)));
        assert_eq!(adapter.state().aspect, 1920.0 / 1080.0);
        assert_eq!(adapter.state().width, 1920.0);
        assert_eq!(adapter.state().height, 1080.0);
    }

    #[test]
    fn test_pixel_ratio_is_capped() {
        let mut adapter = ViewportAdapter::new(HostMetrics::new(800.0, 600.0, 3.0), false);
        assert_eq!(adapter.state().pixel_ratio, MAX_PIXEL_RATIO);

        for reported in [0.5, 1.0, 1.5, 2.0, 2.625, 4.0, 100.0] {
            adapter.resize(HostMetrics::new(800.0, 600.0, reported));
            assert!(adapter.state().pixel_ratio <= MAX_PIXEL_RATIO);
            assert_eq!(adapter.state().pixel_ratio, reported.min(MAX_PIXEL_RATIO));
        }
    }

    #[test]
    fn test_bogus_pixel_ratio_falls_back() {
        let adapter = ViewportAdapter::new(HostMetrics::new(800.0, 600.0, f32::NAN), false);
        assert_eq!(adapter.state().pixel_ratio, 1.0);
    }

    #[test]
    fn test_zero_area_resize_ignored() {
        let mut adapter = ViewportAdapter::new(HostMetrics::new(800.0, 600.0, 1.0), false);
        assert!(!adapter.resize(HostMetrics::new(0.0, 0.0, 1.0)));
        assert_eq!(adapter.state().aspect, 800.0 / 600.0);
    }

    #[test]
    fn test_density_survives_resize() {
        let mut adapter = ViewportAdapter::new(HostMetrics::new(400.0, 800.0, 2.0), true);
        adapter.resize(HostMetrics::new(1600.0, 900.0, 1.0));
        assert_eq!(adapter.density(), DensityClass::Compact);
    }

    #[test]
    fn test_backing_size() {
        let adapter = ViewportAdapter::new(HostMetrics::new(800.0, 600.0, 3.0), false);
        assert_eq!(adapter.state().backing_size(), (1600, 1200));
    }
}
