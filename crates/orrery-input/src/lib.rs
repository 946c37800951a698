//! Keyboard handling for the orrery: frame-coherent key state, a
//! user-editable action map, and resolution of both into per-frame controls.

pub mod action_map;
pub mod controls;
pub mod keyboard;

pub use action_map::{Action, Conflict, InputMap, KEYBINDINGS_FILE, KeybindingError};
pub use controls::Controls;
pub use keyboard::{KeyboardState, RawKeyEvent};
