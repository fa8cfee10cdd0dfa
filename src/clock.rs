//! Time sources
//!
//! The director reads one timestamp per frame and derives the tick delta
//! from it. Interaction debouncing compares the same timestamps.

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::MAX_FRAME_DELTA;

/// Millisecond timestamp source (`performance.now()` in the browser)
pub trait Clock {
    fn now_ms(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

/// Hand-driven clock for tests and headless runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Converts successive timestamps into per-frame deltas (seconds)
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Seconds since the previous call. The first call yields 0; gaps are
    /// clamped so a backgrounded tab does not teleport every animation.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt.min(MAX_FRAME_DELTA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_first_delta_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1000.0), 0.0);
        assert!((clock.delta(1016.0) - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_frame_clock_clamps_large_gaps() {
        let mut clock = FrameClock::new();
        clock.delta(0.0);
        assert_eq!(clock.delta(5000.0), MAX_FRAME_DELTA);
        // Time going backwards never yields a negative delta
        assert_eq!(clock.delta(4000.0), 0.0);
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = Rc::new(ManualClock::new(10.0));
        let shared: Rc<dyn Clock> = clock.clone();
        clock.advance(5.0);
        assert_eq!(shared.now_ms(), 15.0);
    }
}
