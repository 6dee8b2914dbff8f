//! Per-frame orientation update.
//!
//! The field tilts toward the pointer through exponential smoothing and spins
//! slowly around Y on its own. The smoothed tilt is kept separate from the
//! spin so that holding the pointer still settles the tilt exactly on its
//! target; the spin is added only when the frame's rotation is assembled.

use glam::Vec3;

use crate::input::InputState;
use crate::time::Time;

/// Fraction of the remaining distance to the target covered each frame.
pub const SMOOTHING: f64 = 0.02;

/// Radians of tilt per unit of normalized pointer offset.
pub const POINTER_GAIN: f64 = 0.5;

/// Autonomous spin around Y in radians per second.
pub const SPIN_RATE: f32 = 0.05;

/// Smoothed pointer-driven tilt, in radians.
///
/// Held in `f64`: in `f32` the per-frame step rounds to zero well before the
/// tilt reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    /// Rotation around the X axis.
    pub x: f64,
    /// Rotation around the Y axis, excluding the autonomous spin.
    pub y: f64,
}

impl Orientation {
    /// Tilt the pointer is pulling toward: pointer Y tilts around X and
    /// pointer X turns around Y.
    pub fn target(input: InputState) -> Self {
        Self {
            x: f64::from(input.y) * POINTER_GAIN,
            y: f64::from(input.x) * POINTER_GAIN,
        }
    }

    /// Move a fixed fraction of the way toward `target`.
    pub fn approach(&mut self, target: Orientation, factor: f64) {
        self.x += (target.x - self.x) * factor;
        self.y += (target.y - self.y) * factor;
    }
}

/// Everything a surface needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Scene rotation as XYZ Euler angles in radians.
    pub rotation: Vec3,
    /// Seconds since the loop started.
    pub elapsed: f32,
    /// Zero-based frame number.
    pub index: u64,
}

/// The frame driver: owns the clock and the orientation for one run.
#[derive(Debug)]
pub struct RenderLoop {
    clock: Time,
    orientation: Orientation,
    frames: u64,
}

impl RenderLoop {
    /// Start a loop with a fresh clock and zero orientation.
    pub fn new() -> Self {
        Self {
            clock: Time::new(),
            orientation: Orientation::default(),
            frames: 0,
        }
    }

    /// Advance one frame using the instance clock.
    pub fn tick(&mut self, input: InputState) -> FrameParams {
        let elapsed = self.clock.update();
        self.step(elapsed, input)
    }

    /// Advance one frame at an explicit elapsed time.
    pub fn step(&mut self, elapsed: f32, input: InputState) -> FrameParams {
        self.orientation.approach(Orientation::target(input), SMOOTHING);

        let frame = FrameParams {
            rotation: Vec3::new(
                self.orientation.x as f32,
                self.orientation.y as f32 + elapsed * SPIN_RATE,
                0.0,
            ),
            elapsed,
            index: self.frames,
        };
        self.frames += 1;
        frame
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Frames produced so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn clock(&self) -> &Time {
        &self.clock
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_rest() {
        let driver = RenderLoop::new();
        assert_eq!(driver.orientation(), Orientation::default());
        assert_eq!(driver.frames(), 0);
    }

    #[test]
    fn test_first_step_moves_two_percent() {
        let mut driver = RenderLoop::new();
        driver.step(0.0, InputState::new(1.0, 1.0));

        let o = driver.orientation();
        assert!((o.x - 0.5 * SMOOTHING).abs() < 1e-12);
        assert!((o.y - 0.5 * SMOOTHING).abs() < 1e-12);
    }

    #[test]
    fn test_converges_without_overshoot() {
        let mut driver = RenderLoop::new();
        let input = InputState::new(-0.6, 0.8);
        let target = Orientation::target(input);
        let mut prev = driver.orientation();

        for _ in 0..2000 {
            driver.step(0.0, input);
            let o = driver.orientation();
            // x rises toward +0.4, y falls toward -0.3
            assert!(o.x >= prev.x && o.x <= target.x);
            assert!(o.y <= prev.y && o.y >= target.y);
            prev = o;
        }

        assert!((prev.x - target.x).abs() < 1e-4);
        assert!((prev.y - target.y).abs() < 1e-4);
    }

    #[test]
    fn test_held_pointer_rises_every_frame() {
        let mut driver = RenderLoop::new();
        let input = InputState::new(1.0, 1.0);
        let mut prev = driver.orientation();

        for frame in 0..1000 {
            driver.step(0.0, input);
            let o = driver.orientation();
            assert!(o.x > prev.x && o.y > prev.y, "stalled at frame {}: {:?}", frame, o);
            assert!(o.x <= 0.5 && o.y <= 0.5);
            prev = o;
        }
    }

    #[test]
    fn test_spin_applies_to_y_only() {
        let mut driver = RenderLoop::new();
        let frame = driver.step(10.0, InputState::default());

        assert_eq!(frame.rotation.x, 0.0);
        assert!((frame.rotation.y - 10.0 * SPIN_RATE).abs() < 1e-6);
        assert_eq!(frame.rotation.z, 0.0);
        // Spin never leaks into the smoothed state
        assert_eq!(driver.orientation(), Orientation::default());
    }

    #[test]
    fn test_frame_indices_count_up() {
        let mut driver = RenderLoop::new();
        for expected in 0..5 {
            assert_eq!(driver.tick(InputState::default()).index, expected);
        }
        assert_eq!(driver.frames(), 5);
        assert_eq!(driver.clock().frame(), 5);
    }

    #[test]
    fn test_target_follows_new_input() {
        let mut driver = RenderLoop::new();
        for _ in 0..500 {
            driver.step(0.0, InputState::new(1.0, 0.0));
        }
        let before = driver.orientation().y;
        driver.step(0.0, InputState::new(-1.0, 0.0));
        assert!(driver.orientation().y < before);
    }
}
