//! # Frame Clock
//!
//! Converts variable frame times into a whole number of fixed simulation ticks, and
//! counts frames for the once-per-second FPS report.

use web_time::Duration;

/// Length of one simulation tick.
pub const TICK: Duration = Duration::from_nanos(1_000_000_000 / 60);
/// Most ticks simulated for a single frame. Time beyond this is dropped.
pub const MAX_TICKS_PER_FRAME: u32 = 5;

const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Fixed-step accumulator and FPS counter.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: Duration,
    frames: u32,
    fps_elapsed: Duration,
    fps: Option<u32>,
}

impl FrameClock {
    /// Creates a clock with nothing accumulated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a frame's duration and returns how many ticks to simulate for it.
    ///
    /// At most [`MAX_TICKS_PER_FRAME`] are returned; a longer stall is not caught up.
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= TICK && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= TICK;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = self.accumulator.min(TICK);
        }

        self.frames += 1;
        self.fps_elapsed += frame_time;
        if self.fps_elapsed >= FPS_WINDOW {
            let seconds = self.fps_elapsed.as_secs_f64();
            self.fps = Some((self.frames as f64 / seconds).round() as u32);
            self.frames = 0;
            self.fps_elapsed = Duration::ZERO;
        }

        ticks
    }

    /// Frames per second over the last full window, once one has elapsed.
    pub fn fps(&self) -> Option<u32> {
        self.fps
    }

    /// Whether the last [`advance`](Self::advance) completed an FPS window.
    pub fn fps_updated(&self) -> bool {
        self.fps.is_some() && self.fps_elapsed == Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_frames_accumulate_into_ticks() {
        let mut clock = FrameClock::new();
        let half_tick = TICK / 2;
        assert_eq!(clock.advance(half_tick), 0);
        assert_eq!(clock.advance(half_tick), 1);
        assert_eq!(clock.advance(TICK * 2), 2);
    }

    #[test]
    fn long_stalls_are_capped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(Duration::from_secs(2)), MAX_TICKS_PER_FRAME);
        // At most one tick of backlog survives the stall.
        assert!(clock.advance(Duration::ZERO) <= 1);
    }

    #[test]
    fn fps_is_reported_once_per_second() {
        let mut clock = FrameClock::new();
        for _ in 0..59 {
            clock.advance(Duration::from_millis(10));
            assert_eq!(clock.fps(), None);
        }
        for _ in 0..41 {
            clock.advance(Duration::from_millis(10));
        }
        assert_eq!(clock.fps(), Some(100));
        assert!(clock.fps_updated());
        clock.advance(Duration::from_millis(10));
        assert!(!clock.fps_updated());
    }
}
