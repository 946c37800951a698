//! Configuration for the orrery.
//!
//! Settings persist to disk as RON and can be overridden from the command
//! line. Every section defaults field-by-field, so older config files keep
//! loading after new settings are added.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AssetsConfig, CameraConfig, Config, DebugConfig, RenderConfig, SimulationConfig,
    WindowConfig,
};
pub use error::ConfigError;
