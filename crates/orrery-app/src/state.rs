//! Simulation state advanced by the fixed-step loop and walked once per frame.

use orrery_config::Config;
use orrery_input::Controls;
use orrery_scene::{
    CameraFrame, CameraRates, FramePlan, Projection, SceneClock, SolarSystem, TransformStack,
    walk_with,
};

/// Everything that changes between frames, plus the static body table.
pub struct SceneState {
    pub system: SolarSystem,
    pub clock: SceneClock,
    pub camera: CameraFrame,
    pub rates: CameraRates,
    pub projection: Projection,
    /// Multiplier applied to the fixed step before it reaches the clock.
    pub time_scale: f64,
    show_orbits: bool,
    stack: TransformStack,
    plan: FramePlan,
}

impl SceneState {
    pub fn new(system: SolarSystem, clock: SceneClock) -> Self {
        Self {
            system,
            clock,
            camera: CameraFrame::default(),
            rates: CameraRates::default(),
            projection: Projection::default(),
            time_scale: 1.0,
            show_orbits: false,
            stack: TransformStack::default(),
            plan: FramePlan::default(),
        }
    }

    /// State for `system` with clock, camera and projection settings from `config`.
    pub fn from_config(system: SolarSystem, config: &Config) -> Self {
        let mut state = Self::new(
            system,
            SceneClock::new(f64::from(config.simulation.base_rate_deg)),
        );
        state.rates = CameraRates {
            forward_speed: config.camera.forward_speed,
            boost_factor: config.camera.boost_factor,
            pitch_rate: config.camera.pitch_rate_deg.to_radians(),
            roll_rate: config.camera.roll_rate_deg.to_radians(),
        };
        state.projection = Projection::new(
            config.render.fov_y_deg,
            config.render.near,
            config.render.far,
        );
        state.projection.resize(config.window.width, config.window.height);
        state.time_scale = f64::from(config.simulation.time_scale);
        state.show_orbits = config.debug.always_show_orbits;
        state
    }

    /// One fixed step: advance the clock unless frozen, then move the camera.
    pub fn update(&mut self, dt: f64, controls: &Controls) {
        self.clock
            .advance(dt * self.time_scale, controls.toggles.time_frozen);
        self.camera
            .step(dt as f32, controls.camera, &controls.toggles, &self.rates);
        self.show_orbits = controls.toggles.show_orbits;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    /// Walk the scene for the current clock and camera.
    pub fn plan(&mut self) -> &FramePlan {
        walk_with(
            &mut self.stack,
            &mut self.plan,
            &self.system,
            &self.clock,
            self.camera.view_matrix(),
            self.show_orbits,
        );
        &self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use orrery_scene::{SceneToggles, Shading};

    fn state() -> SceneState {
        SceneState::from_config(SolarSystem::default(), &Config::default())
    }

    fn controls(toggles: SceneToggles) -> Controls {
        Controls {
            toggles,
            ..Controls::default()
        }
    }

    #[test]
    fn test_one_second_advances_clock_by_base_rate() {
        let mut state = state();
        state.update(1.0, &Controls::default());
        assert!((state.clock.value() - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_scale_multiplies_step() {
        let mut state = state();
        state.time_scale = 2.0;
        state.update(0.5, &Controls::default());
        assert!((state.clock.value() - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_stop_freezes_clock() {
        let mut state = state();
        let frozen = controls(SceneToggles {
            time_frozen: true,
            ..SceneToggles::default()
        });
        for dt in [0.0, 1.0 / 60.0, 1.0, 1000.0] {
            state.update(dt, &frozen);
        }
        assert_eq!(state.clock.value(), 0.0);
    }

    #[test]
    fn test_camera_drifts_unless_stopped() {
        let mut state = state();
        state.update(1.0, &Controls::default());
        assert!((state.camera.position - Vec3::new(0.0, 0.0, -0.6)).length() < 1e-5);

        let stopped = controls(SceneToggles {
            camera_stopped: true,
            ..SceneToggles::default()
        });
        let before = state.camera.position;
        state.update(1.0, &stopped);
        assert_eq!(state.camera.position, before);
    }

    #[test]
    fn test_config_rates_reach_camera() {
        let mut config = Config::default();
        config.camera.forward_speed = 2.0;
        config.camera.pitch_rate_deg = 90.0;
        let state = SceneState::from_config(SolarSystem::default(), &config);
        assert_eq!(state.rates.forward_speed, 2.0);
        assert!((state.rates.pitch_rate - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((state.projection.aspect - 1024.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_orbit_paths_follow_toggle() {
        let mut state = state();
        let lines = |plan: &FramePlan| {
            plan.draws
                .iter()
                .filter(|d| d.shading == Shading::Line)
                .count()
        };
        assert_eq!(lines(state.plan()), 0);

        state.update(
            0.0,
            &controls(SceneToggles {
                show_orbits: true,
                ..SceneToggles::default()
            }),
        );
        assert!(lines(state.plan()) > 0);
    }

    #[test]
    fn test_always_show_orbits_from_config() {
        let mut config = Config::default();
        config.debug.always_show_orbits = true;
        let mut state = SceneState::from_config(SolarSystem::default(), &config);
        assert!(state.plan().draws.iter().any(|d| d.shading == Shading::Line));
    }

    #[test]
    fn test_plan_is_repeatable() {
        let mut state = state();
        state.update(0.75, &Controls::default());
        let first = state.plan().clone();
        let second = state.plan().clone();
        assert_eq!(first, second);
    }
}
