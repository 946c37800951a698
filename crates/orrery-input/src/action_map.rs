//! Actions and their key bindings.
//!
//! [`InputMap`] is stored as RON next to `config.ron` so users can rebind
//! keys by editing a file. Keys are written by their winit names, e.g.
//! `"ArrowUp"` or `"KeyT"`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};
use winit::keyboard::KeyCode;

/// File name of the action map inside the config directory.
pub const KEYBINDINGS_FILE: &str = "keybindings.ron";

/// Serde helper for [`KeyCode`], which has no serde support of its own.
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use tracing::warn;
    use winit::keyboard::KeyCode;

    pub fn serialize<S: Serializer>(codes: &[KeyCode], s: S) -> Result<S::Ok, S::Error> {
        codes
            .iter()
            .map(|code| format!("{code:?}"))
            .collect::<Vec<_>>()
            .serialize(s)
    }

    /// Unknown names are skipped with a warning so one typo does not discard
    /// the rest of the file.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<KeyCode>, D::Error> {
        Ok(Vec::<String>::deserialize(d)?
            .into_iter()
            .filter_map(|name| {
                let code = parse(&name);
                if code.is_none() {
                    warn!("Ignoring unknown key {name:?} in keybindings");
                }
                code
            })
            .collect())
    }

    pub(super) fn parse(s: &str) -> Option<KeyCode> {
        if let Some(letter) = s.strip_prefix("Key") {
            return letter_key(letter);
        }
        if let Some(digit) = s.strip_prefix("Digit") {
            return digit_key(digit);
        }
        if let Some(code) = s.strip_prefix('F').and_then(function_key) {
            return Some(code);
        }
        if let Some(code) = s.strip_prefix("Numpad").and_then(numpad_key) {
            return Some(code);
        }
        Some(match s {
            "Space" => KeyCode::Space,
            "Enter" => KeyCode::Enter,
            "Escape" => KeyCode::Escape,
            "Tab" => KeyCode::Tab,
            "Backspace" => KeyCode::Backspace,
            "CapsLock" => KeyCode::CapsLock,
            "ShiftLeft" => KeyCode::ShiftLeft,
            "ShiftRight" => KeyCode::ShiftRight,
            "ControlLeft" => KeyCode::ControlLeft,
            "ControlRight" => KeyCode::ControlRight,
            "AltLeft" => KeyCode::AltLeft,
            "AltRight" => KeyCode::AltRight,
            "SuperLeft" => KeyCode::SuperLeft,
            "SuperRight" => KeyCode::SuperRight,
            "ContextMenu" => KeyCode::ContextMenu,
            "ArrowUp" => KeyCode::ArrowUp,
            "ArrowDown" => KeyCode::ArrowDown,
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            "Insert" => KeyCode::Insert,
            "Delete" => KeyCode::Delete,
            "Home" => KeyCode::Home,
            "End" => KeyCode::End,
            "PageUp" => KeyCode::PageUp,
            "PageDown" => KeyCode::PageDown,
            "PrintScreen" => KeyCode::PrintScreen,
            "ScrollLock" => KeyCode::ScrollLock,
            "Pause" => KeyCode::Pause,
            "NumLock" => KeyCode::NumLock,
            "Backquote" => KeyCode::Backquote,
            "Minus" => KeyCode::Minus,
            "Equal" => KeyCode::Equal,
            "BracketLeft" => KeyCode::BracketLeft,
            "BracketRight" => KeyCode::BracketRight,
            "Backslash" => KeyCode::Backslash,
            "IntlBackslash" => KeyCode::IntlBackslash,
            "Semicolon" => KeyCode::Semicolon,
            "Quote" => KeyCode::Quote,
            "Comma" => KeyCode::Comma,
            "Period" => KeyCode::Period,
            "Slash" => KeyCode::Slash,
            _ => return None,
        })
    }

    /// `F1` to `F24`, given the text after the `F`.
    fn function_key(number: &str) -> Option<KeyCode> {
        const FUNCTION: [KeyCode; 24] = [
            KeyCode::F1,
            KeyCode::F2,
            KeyCode::F3,
            KeyCode::F4,
            KeyCode::F5,
            KeyCode::F6,
            KeyCode::F7,
            KeyCode::F8,
            KeyCode::F9,
            KeyCode::F10,
            KeyCode::F11,
            KeyCode::F12,
            KeyCode::F13,
            KeyCode::F14,
            KeyCode::F15,
            KeyCode::F16,
            KeyCode::F17,
            KeyCode::F18,
            KeyCode::F19,
            KeyCode::F20,
            KeyCode::F21,
            KeyCode::F22,
            KeyCode::F23,
            KeyCode::F24,
        ];
        if number.starts_with('0') {
            return None;
        }
        let n: usize = number.parse().ok()?;
        FUNCTION.get(n.checked_sub(1)?).copied()
    }

    /// Keypad keys, given the text after `Numpad`.
    fn numpad_key(rest: &str) -> Option<KeyCode> {
        Some(match rest {
            "0" => KeyCode::Numpad0,
            "1" => KeyCode::Numpad1,
            "2" => KeyCode::Numpad2,
            "3" => KeyCode::Numpad3,
            "4" => KeyCode::Numpad4,
            "5" => KeyCode::Numpad5,
            "6" => KeyCode::Numpad6,
            "7" => KeyCode::Numpad7,
            "8" => KeyCode::Numpad8,
            "9" => KeyCode::Numpad9,
            "Add" => KeyCode::NumpadAdd,
            "Subtract" => KeyCode::NumpadSubtract,
            "Multiply" => KeyCode::NumpadMultiply,
            "Divide" => KeyCode::NumpadDivide,
            "Decimal" => KeyCode::NumpadDecimal,
            "Enter" => KeyCode::NumpadEnter,
            "Equal" => KeyCode::NumpadEqual,
            _ => return None,
        })
    }

    fn letter_key(letter: &str) -> Option<KeyCode> {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA,
            KeyCode::KeyB,
            KeyCode::KeyC,
            KeyCode::KeyD,
            KeyCode::KeyE,
            KeyCode::KeyF,
            KeyCode::KeyG,
            KeyCode::KeyH,
            KeyCode::KeyI,
            KeyCode::KeyJ,
            KeyCode::KeyK,
            KeyCode::KeyL,
            KeyCode::KeyM,
            KeyCode::KeyN,
            KeyCode::KeyO,
            KeyCode::KeyP,
            KeyCode::KeyQ,
            KeyCode::KeyR,
            KeyCode::KeyS,
            KeyCode::KeyT,
            KeyCode::KeyU,
            KeyCode::KeyV,
            KeyCode::KeyW,
            KeyCode::KeyX,
            KeyCode::KeyY,
            KeyCode::KeyZ,
        ];
        match letter.as_bytes() {
            [c @ b'A'..=b'Z'] => Some(LETTERS[usize::from(c - b'A')]),
            _ => None,
        }
    }

    fn digit_key(digit: &str) -> Option<KeyCode> {
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0,
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
            KeyCode::Digit5,
            KeyCode::Digit6,
            KeyCode::Digit7,
            KeyCode::Digit8,
            KeyCode::Digit9,
        ];
        match digit.as_bytes() {
            [c @ b'0'..=b'9'] => Some(DIGITS[usize::from(c - b'0')]),
            _ => None,
        }
    }
}

/// Everything a key can do in the orrery.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    /// Switch between windowed and fullscreen (on press).
    ToggleFullscreen,
    /// Faster camera drift while held.
    SpeedBoost,
    /// No camera drift while held.
    CameraStop,
    /// Orbit paths visible while held.
    ShowOrbits,
    /// Clock frozen while held.
    TimeStop,
    /// Quit (on press).
    Exit,
    PitchUp,
    PitchDown,
    RollLeft,
    RollRight,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::ToggleFullscreen,
        Action::SpeedBoost,
        Action::CameraStop,
        Action::ShowOrbits,
        Action::TimeStop,
        Action::Exit,
        Action::PitchUp,
        Action::PitchDown,
        Action::RollLeft,
        Action::RollRight,
    ];
}

#[derive(Debug, thiserror::Error)]
pub enum KeybindingError {
    #[error("failed to write keybindings: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to serialize keybindings: {0}")]
    Serialize(#[source] ron::Error),
}

/// A key bound to more than one action.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub key: KeyCode,
    pub actions: Vec<Action>,
}

/// Key bindings per action. Any bound key activates its action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMap {
    bindings: HashMap<Action, Keys>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
struct Keys(#[serde(with = "keycode_serde")] Vec<KeyCode>);

impl Default for InputMap {
    fn default() -> Self {
        let mut map = Self::new();
        map.set_bindings(Action::ToggleFullscreen, vec![KeyCode::Space]);
        map.set_bindings(Action::SpeedBoost, vec![KeyCode::ShiftLeft, KeyCode::ShiftRight]);
        map.set_bindings(Action::CameraStop, vec![KeyCode::KeyC]);
        map.set_bindings(Action::ShowOrbits, vec![KeyCode::KeyO]);
        map.set_bindings(Action::TimeStop, vec![KeyCode::KeyT]);
        map.set_bindings(Action::Exit, vec![KeyCode::Escape]);
        map.set_bindings(Action::PitchUp, vec![KeyCode::ArrowUp]);
        map.set_bindings(Action::PitchDown, vec![KeyCode::ArrowDown]);
        map.set_bindings(Action::RollLeft, vec![KeyCode::ArrowLeft]);
        map.set_bindings(Action::RollRight, vec![KeyCode::ArrowRight]);
        map
    }
}

impl InputMap {
    /// A map with no bindings at all.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn set_bindings(&mut self, action: Action, keys: Vec<KeyCode>) {
        self.bindings.insert(action, Keys(keys));
    }

    #[must_use]
    pub fn keys_for(&self, action: Action) -> &[KeyCode] {
        self.bindings.get(&action).map_or(&[], |k| k.0.as_slice())
    }

    /// Keys bound to more than one action, sorted by key name.
    #[must_use]
    pub fn detect_conflicts(&self) -> Vec<Conflict> {
        let mut seen: HashMap<KeyCode, Vec<Action>> = HashMap::new();
        for (action, keys) in &self.bindings {
            for key in &keys.0 {
                let actions = seen.entry(*key).or_default();
                if !actions.contains(action) {
                    actions.push(*action);
                }
            }
        }

        let mut conflicts: Vec<Conflict> = seen
            .into_iter()
            .filter(|(_, actions)| actions.len() > 1)
            .map(|(key, mut actions)| {
                actions.sort();
                Conflict { key, actions }
            })
            .collect();
        conflicts.sort_by_key(|c| format!("{:?}", c.key));
        conflicts
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    pub fn save(&self, path: &Path) -> Result<(), KeybindingError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(KeybindingError::Write)?;
        }
        let ron_str = self.to_ron().map_err(KeybindingError::Serialize)?;
        std::fs::write(path, ron_str).map_err(KeybindingError::Write)
    }

    /// Load bindings from `path`.
    ///
    /// A missing file is created with the defaults. A malformed file is left
    /// alone and the defaults are used, with a warning. Unknown key names
    /// are dropped one by one. Conflicting bindings are reported but kept.
    #[must_use]
    pub fn load_or_create(path: &Path) -> Self {
        let map = match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_ron(&contents) {
                Ok(map) => {
                    info!("Loaded keybindings from {}", path.display());
                    map
                }
                Err(e) => {
                    warn!("Malformed keybinding file {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let map = Self::default();
                match map.save(path) {
                    Ok(()) => info!("Wrote default keybindings to {}", path.display()),
                    Err(e) => warn!("Could not write {}: {e}", path.display()),
                }
                map
            }
            Err(e) => {
                warn!("Could not read keybinding file {}: {e}; using defaults", path.display());
                Self::default()
            }
        };

        for conflict in map.detect_conflicts() {
            warn!("Key {:?} is bound to several actions: {:?}", conflict.key, conflict.actions);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_bind_every_action() {
        let map = InputMap::default();
        for action in Action::ALL {
            assert!(!map.keys_for(action).is_empty(), "{action:?} unbound");
        }
        assert!(map.detect_conflicts().is_empty());
        assert_eq!(map.keys_for(Action::TimeStop), &[KeyCode::KeyT]);
    }

    #[test]
    fn test_ron_uses_key_names() {
        let ron_str = InputMap::default().to_ron().unwrap();
        assert!(ron_str.contains("\"ArrowUp\""));
        assert!(ron_str.contains("ToggleFullscreen"));
        assert_eq!(InputMap::from_ron(&ron_str).unwrap(), InputMap::default());
    }

    #[test]
    fn test_hand_written_bindings() {
        let map = InputMap::from_ron(
            r#"(bindings: { TimeStop: ["KeyP", "Digit0"], Exit: ["KeyQ", "Escape"] })"#,
        )
        .unwrap();
        assert_eq!(map.keys_for(Action::TimeStop), &[KeyCode::KeyP, KeyCode::Digit0]);
        assert_eq!(map.keys_for(Action::Exit), &[KeyCode::KeyQ, KeyCode::Escape]);
        assert!(map.keys_for(Action::RollLeft).is_empty());
    }

    #[test]
    fn test_extended_key_names() {
        let map = InputMap::from_ron(
            r#"(bindings: { TimeStop: ["F6", "Numpad1"], Exit: ["F24", "NumpadEnter", "Slash"] })"#,
        )
        .unwrap();
        assert_eq!(map.keys_for(Action::TimeStop), &[KeyCode::F6, KeyCode::Numpad1]);
        assert_eq!(
            map.keys_for(Action::Exit),
            &[KeyCode::F24, KeyCode::NumpadEnter, KeyCode::Slash]
        );
    }

    #[test]
    fn test_names_match_debug_output() {
        for code in [
            KeyCode::F12,
            KeyCode::Numpad9,
            KeyCode::NumpadDecimal,
            KeyCode::BracketLeft,
            KeyCode::SuperRight,
            KeyCode::KeyZ,
        ] {
            assert_eq!(keycode_serde::parse(&format!("{code:?}")), Some(code));
        }
        for name in ["F0", "F25", "F01", "Fn", "Numpad", "Keyab", "Hyper"] {
            assert_eq!(keycode_serde::parse(name), None, "{name}");
        }
    }

    #[test]
    fn test_unknown_key_skipped() {
        let map = InputMap::from_ron(
            r#"(bindings: { Exit: ["Hyper", "KeyQ"], TimeStop: ["KeyT"] })"#,
        )
        .unwrap();
        assert_eq!(map.keys_for(Action::Exit), &[KeyCode::KeyQ]);
        assert_eq!(map.keys_for(Action::TimeStop), &[KeyCode::KeyT]);
    }

    #[test]
    fn test_unknown_key_keeps_rest_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(KEYBINDINGS_FILE);
        std::fs::write(&path, r#"(bindings: { Exit: ["NotAKey"], ShowOrbits: ["KeyL"] })"#)
            .unwrap();
        let map = InputMap::load_or_create(&path);
        assert_ne!(map, InputMap::default());
        assert!(map.keys_for(Action::Exit).is_empty());
        assert_eq!(map.keys_for(Action::ShowOrbits), &[KeyCode::KeyL]);
    }

    #[test]
    fn test_conflicts_reported() {
        let mut map = InputMap::default();
        map.set_bindings(Action::CameraStop, vec![KeyCode::KeyT]);
        let conflicts = map.detect_conflicts();
        assert_eq!(
            conflicts,
            vec![Conflict {
                key: KeyCode::KeyT,
                actions: vec![Action::CameraStop, Action::TimeStop],
            }]
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keybindings.ron");
        let mut map = InputMap::default();
        map.set_bindings(Action::ShowOrbits, vec![KeyCode::KeyL]);
        map.save(&path).unwrap();
        assert_eq!(InputMap::load_or_create(&path), map);
    }

    #[test]
    fn test_missing_file_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("keybindings.ron");
        assert_eq!(InputMap::load_or_create(&path), InputMap::default());
        assert!(path.exists());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keybindings.ron");
        std::fs::write(&path, "not valid ron {{{").unwrap();
        assert_eq!(InputMap::load_or_create(&path), InputMap::default());
        // The user's file is not overwritten.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not valid ron {{{");
    }
}
