//! Frame clock.
//!
//! Each running backdrop owns one [`Time`], created when it starts and dropped
//! when it stops. There is no process-wide clock.
//!
//! # Example
//!
//! ```ignore
//! use backdrop::time::Time;
//!
//! let mut time = Time::new();
//!
//! // Once per frame:
//! let elapsed = time.update();
//! ```

use std::time::Instant;

/// Elapsed time and frame counting for one backdrop instance.
#[derive(Debug)]
pub struct Time {
    /// When the clock was created.
    start: Instant,
    /// Total elapsed time in seconds as of the last update.
    elapsed_secs: f32,
    /// Total updates since start.
    frame_count: u64,
}

impl Time {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed_secs: 0.0,
            frame_count: 0,
        }
    }

    /// Update timing values. Call once per frame.
    ///
    /// Returns the elapsed time in seconds.
    pub fn update(&mut self) -> f32 {
        self.elapsed_secs = self.start.elapsed().as_secs_f32();
        self.frame_count += 1;
        self.elapsed_secs
    }

    /// Total elapsed time in seconds as of the last update.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Updates since creation.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second over the clock's lifetime.
    pub fn average_fps(&self) -> f32 {
        if self.elapsed_secs > 0.0 {
            self.frame_count as f32 / self.elapsed_secs
        } else {
            0.0
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.elapsed(), 0.0);
        assert_eq!(time.average_fps(), 0.0);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let elapsed = time.update();

        assert!(elapsed >= 0.01);
        assert_eq!(time.elapsed(), elapsed);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_elapsed_is_monotonic() {
        let mut time = Time::new();
        let mut last = 0.0;
        for _ in 0..5 {
            thread::sleep(Duration::from_millis(1));
            let elapsed = time.update();
            assert!(elapsed >= last);
            last = elapsed;
        }
        assert_eq!(time.frame(), 5);
    }

    #[test]
    fn test_average_fps() {
        let mut time = Time::new();
        for _ in 0..4 {
            thread::sleep(Duration::from_millis(5));
            time.update();
        }
        // 4 frames over at least 20ms
        let fps = time.average_fps();
        assert!(fps > 0.0 && fps <= 200.0);
        assert!((fps - 4.0 / time.elapsed()).abs() < 1e-3);
    }
}
