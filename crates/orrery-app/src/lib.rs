//! Orrery application: window, event handling and the frame loop.

pub mod app;
pub mod game_loop;
pub mod platform;
pub mod state;

pub use app::{OrreryApp, renderer_settings_from_config, run, window_attributes_from_config};
pub use game_loop::{FIXED_DT, GameLoop, MAX_FRAME_TIME};
pub use platform::{APP_NAME, PlatformDirs, PlatformError};
pub use state::SceneState;
