//! Fixed-timestep loop.
//!
//! The simulation advances in fixed 60 Hz steps drained from an accumulator;
//! rendering runs once per frame at whatever rate the display allows.

use std::time::Instant;
use tracing::warn;

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame time fed into the accumulator. Longer frames are clamped
/// and the simulation slows down instead of running dozens of catch-up steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

pub struct GameLoop {
    previous_time: Instant,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Measure the wall-clock time since the last call and [`advance`](Self::advance) by it.
    pub fn tick(&mut self, update_fn: impl FnMut(f64, f64), render_fn: impl FnMut(f64)) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;

        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
        }
        self.advance(frame_time, update_fn, render_fn);
    }

    /// Run one frame of `frame_time` seconds.
    ///
    /// - `update_fn(fixed_dt, total_sim_time)` runs zero or more times.
    /// - `render_fn(alpha)` runs exactly once with `alpha` in `[0.0, 1.0)`.
    pub fn advance(
        &mut self,
        frame_time: f64,
        mut update_fn: impl FnMut(f64, f64),
        mut render_fn: impl FnMut(f64),
    ) {
        self.accumulator += frame_time.clamp(0.0, MAX_FRAME_TIME);

        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT, self.total_sim_time);
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
        }

        render_fn(self.alpha());
        self.frame_count += 1;
    }

    /// Reset the wall-clock reference so a long pause (window drag, hidden
    /// window) is not seen as one huge frame.
    pub fn reset_clock(&mut self) {
        self.previous_time = Instant::now();
    }

    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / FIXED_DT
        } else {
            0.0
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Simulated seconds.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_dt_value() {
        assert!(
            (FIXED_DT - 1.0 / 60.0).abs() < f64::EPSILON * 10.0,
            "FIXED_DT should equal 1/60"
        );
    }

    #[test]
    fn test_accumulator_single_step() {
        let mut loop_ = GameLoop::new();
        let mut updates = 0u32;
        loop_.advance(FIXED_DT, |_, _| updates += 1, |_| {});
        assert_eq!(updates, 1);
        assert!(loop_.accumulator.abs() < 1e-12);
    }

    #[test]
    fn test_accumulator_multiple_steps() {
        let mut loop_ = GameLoop::new();
        let mut updates = 0u32;
        loop_.advance(3.0 * FIXED_DT + 1e-9, |_, _| updates += 1, |_| {});
        assert_eq!(updates, 3);
        assert!((loop_.total_sim_time() - 3.0 * FIXED_DT).abs() < 1e-12);
    }

    #[test]
    fn test_partial_frame_renders_without_update() {
        let mut loop_ = GameLoop::new();
        let mut updates = 0u32;
        let mut render_called = false;
        loop_.advance(
            0.5 * FIXED_DT,
            |_, _| updates += 1,
            |_| render_called = true,
        );
        assert_eq!(updates, 0);
        assert!(render_called);
        assert!((loop_.accumulator - 0.5 * FIXED_DT).abs() < 1e-12);
    }

    #[test]
    fn test_interpolation_alpha() {
        let mut loop_ = GameLoop::new();
        let mut alpha_received = 0.0;
        loop_.advance(0.25 * FIXED_DT, |_, _| {}, |a| alpha_received = a);
        assert!((alpha_received - 0.25).abs() < 1e-10, "got {alpha_received}");
        assert!((0.0..1.0).contains(&alpha_received));
    }

    #[test]
    fn test_max_frame_time_clamp() {
        let mut loop_ = GameLoop::new();
        let mut updates = 0u32;
        loop_.advance(1.0, |_, _| updates += 1, |_| {});
        let max_updates = (MAX_FRAME_TIME / FIXED_DT).ceil() as u32;
        assert!(updates <= max_updates, "expected at most {max_updates}, got {updates}");
        assert!(updates > 0);
    }

    #[test]
    fn test_negative_frame_time_ignored() {
        let mut loop_ = GameLoop::new();
        let mut updates = 0u32;
        loop_.advance(-1.0, |_, _| updates += 1, |_| {});
        assert_eq!(updates, 0);
        assert_eq!(loop_.alpha(), 0.0);
    }

    #[test]
    fn test_update_receives_fixed_dt_and_running_time() {
        let mut loop_ = GameLoop::new();
        let mut seen = Vec::new();
        loop_.advance(2.0 * FIXED_DT + 1e-9, |dt, t| seen.push((dt, t)), |_| {});
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (FIXED_DT, 0.0));
        assert_eq!(seen[1].0, FIXED_DT);
        assert!((seen[1].1 - FIXED_DT).abs() < 1e-12);
    }

    #[test]
    fn test_frame_count_increments() {
        let mut loop_ = GameLoop::new();
        for _ in 0..10 {
            loop_.advance(FIXED_DT, |_, _| {}, |_| {});
        }
        assert_eq!(loop_.frame_count(), 10);
    }

    #[test]
    fn test_deterministic_sequence() {
        let frame_times = [0.017, 0.015, 0.020, 0.016, 0.033, 0.008, 0.018];
        let mut a = GameLoop::new();
        let mut b = GameLoop::new();

        for &ft in &frame_times {
            let mut alpha_a = 0.0;
            let mut alpha_b = 0.0;
            a.advance(ft, |_, _| {}, |x| alpha_a = x);
            b.advance(ft, |_, _| {}, |x| alpha_b = x);
            assert_eq!(alpha_a, alpha_b);
        }
        assert_eq!(a.update_count(), b.update_count());
        assert_eq!(a.total_sim_time(), b.total_sim_time());
    }

    #[test]
    fn test_game_loop_default() {
        let loop_ = GameLoop::default();
        assert_eq!(loop_.frame_count(), 0);
        assert_eq!(loop_.update_count(), 0);
        assert_eq!(loop_.total_sim_time(), 0.0);
    }
}
