//! Per-frame controls derived from the keyboard and the action map.

use orrery_scene::{CameraInput, SceneToggles};
use winit::keyboard::PhysicalKey;

use crate::action_map::{Action, InputMap};
use crate::keyboard::KeyboardState;

/// Resolved controls for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    /// Held switches.
    pub toggles: SceneToggles,
    /// Held camera rotation.
    pub camera: CameraInput,
    /// Fullscreen key went down this frame.
    pub toggle_fullscreen: bool,
    /// Exit key went down this frame.
    pub exit: bool,
}

impl Controls {
    /// Read the current keyboard snapshot through `map`.
    ///
    /// `always_show_orbits` forces orbit paths on regardless of the key.
    pub fn resolve(map: &InputMap, keyboard: &KeyboardState, always_show_orbits: bool) -> Self {
        let held = |action| {
            map.keys_for(action)
                .iter()
                .any(|&k| keyboard.is_pressed(PhysicalKey::Code(k)))
        };
        let pressed = |action| {
            map.keys_for(action)
                .iter()
                .any(|&k| keyboard.just_pressed(PhysicalKey::Code(k)))
        };
        let axis = |positive, negative| match (held(positive), held(negative)) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };

        Self {
            toggles: SceneToggles {
                time_frozen: held(Action::TimeStop),
                speed_boost: held(Action::SpeedBoost),
                camera_stopped: held(Action::CameraStop),
                show_orbits: always_show_orbits || held(Action::ShowOrbits),
            },
            camera: CameraInput {
                pitch: axis(Action::PitchUp, Action::PitchDown),
                roll: axis(Action::RollLeft, Action::RollRight),
            },
            toggle_fullscreen: pressed(Action::ToggleFullscreen),
            exit: pressed(Action::Exit),
        }
    }
}
