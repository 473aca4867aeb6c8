//! Frame clock supplying per-tick delta time.
//!
//! The simulation only needs a stream of `dt` values; [`FrameClock`] produces
//! them from wall time, optionally capping the frame rate by sleeping.
//!
//! # Example
//!
//! ```ignore
//! use snowfield::time::FrameClock;
//!
//! let mut clock = FrameClock::new(Some(240));
//!
//! loop {
//!     let dt = clock.tick();
//!     simulation.tick(dt)?;
//!     println!("Frame {} at {:.1} FPS", clock.frame(), clock.fps());
//! }
//! ```

use std::thread;
use std::time::{Duration, Instant};

/// How often the FPS estimate is refreshed.
const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Wall-clock frame timer with an optional frame-rate cap.
#[derive(Debug)]
pub struct FrameClock {
    /// When the last frame ended.
    last_frame: Instant,
    /// Minimum frame duration when capped.
    frame_budget: Option<Duration>,
    /// Last delta handed out, in seconds.
    delta_secs: f32,
    /// Seconds handed out so far.
    elapsed_secs: f64,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
}

impl FrameClock {
    /// Create a clock. `target_fps` caps the frame rate; `None` runs
    /// uncapped.
    pub fn new(target_fps: Option<u32>) -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            frame_budget: target_fps
                .filter(|&fps| fps > 0)
                .map(|fps| Duration::from_secs_f64(1.0 / fps as f64)),
            delta_secs: 0.0,
            elapsed_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
        }
    }

    /// End the current frame and return its length in seconds.
    ///
    /// With a frame-rate cap, sleeps until the frame budget is spent.
    pub fn tick(&mut self) -> f32 {
        if let Some(budget) = self.frame_budget {
            let spent = self.last_frame.elapsed();
            if spent < budget {
                thread::sleep(budget - spent);
            }
        }

        let now = Instant::now();
        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.elapsed_secs += f64::from(self.delta_secs);
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= FPS_WINDOW {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Last delta returned by [`Self::tick`].
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Sum of all deltas returned so far.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(None)
    }
}
