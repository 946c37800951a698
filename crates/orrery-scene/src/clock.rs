//! The single angular clock driving every body.

/// Degrees of sun rotation per simulated second.
pub const DEFAULT_BASE_RATE: f64 = 35.0;

/// Accumulated rotation in degrees.
///
/// Every orbital and spin angle in the scene is this value times a fixed
/// per-body multiplier. Angles are never wrapped; the matrix builders take
/// them modulo a full turn implicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneClock {
    value: f64,
    base_rate: f64,
}

impl SceneClock {
    pub fn new(base_rate: f64) -> Self {
        Self {
            value: 0.0,
            base_rate,
        }
    }

    /// A clock already at `value` degrees.
    pub fn at(value: f64, base_rate: f64) -> Self {
        Self { value, base_rate }
    }

    /// Advance by `dt` seconds unless `frozen`.
    pub fn advance(&mut self, dt: f64, frozen: bool) {
        if !frozen {
            self.value += dt * self.base_rate;
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn base_rate(&self) -> f64 {
        self.base_rate
    }

    /// Angle in degrees for a body turning `multiplier` times as fast as the sun.
    pub fn angle(&self, multiplier: f32) -> f32 {
        (self.value * f64::from(multiplier)) as f32
    }
}

impl Default for SceneClock {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_second_at_base_rate() {
        let mut clock = SceneClock::default();
        clock.advance(1.0, false);
        assert_eq!(clock.value(), 35.0);
        assert_eq!(clock.angle(0.5), 17.5);
        assert_eq!(clock.angle(-2.0), -70.0);
    }

    #[test]
    fn test_angle_is_exact_product() {
        let clock = SceneClock::at(100.0, DEFAULT_BASE_RATE);
        assert_eq!(clock.angle(3.5), 350.0);
        assert_eq!(clock.angle(1.0), 100.0);
        assert_eq!(clock.angle(0.0), 0.0);
    }

    #[test]
    fn test_frozen_clock_ignores_dt() {
        let mut clock = SceneClock::at(42.0, DEFAULT_BASE_RATE);
        for dt in [0.0, 1.0 / 60.0, 0.25, 10.0, 1e6] {
            clock.advance(dt, true);
            assert_eq!(clock.value(), 42.0);
        }
        clock.advance(1.0, false);
        assert_eq!(clock.value(), 77.0);
    }

    #[test]
    fn test_angles_not_normalized() {
        let clock = SceneClock::at(400.0, DEFAULT_BASE_RATE);
        assert_eq!(clock.angle(1.0), 400.0);
        assert_eq!(clock.angle(-1.0), -400.0);
    }
}
