//! The `orrery` binary.

use std::process::ExitCode;

use clap::Parser;
use orrery_app::{OrreryApp, PlatformDirs, SceneState, run};
use orrery_config::{CliArgs, Config};
use orrery_input::{InputMap, KEYBINDINGS_FILE};
use orrery_scene::SolarSystem;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match &args.config {
        Some(dir) => PlatformDirs::with_config_dir(dir.clone()),
        None => match PlatformDirs::resolve() {
            Ok(dirs) => dirs,
            Err(e) => {
                eprintln!("Failed to resolve platform directories: {e}");
                return ExitCode::FAILURE;
            }
        },
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create {}: {e}", dirs.config_dir.display());
        return ExitCode::FAILURE;
    }

    // Logging needs the config's level, so config problems are reported after init.
    let (mut config, config_error) = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    if let Some(e) = config_error {
        warn!("Using default config: {e}");
    }
    info!(config_dir = %dirs.config_dir.display(), "Starting orrery");

    let system = match &config.simulation.scene_file {
        Some(path) => match SolarSystem::load(path) {
            Ok(system) => system,
            Err(e) => {
                error!("Failed to load scene {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => SolarSystem::default(),
    };

    let input_map = InputMap::load_or_create(&dirs.config_dir.join(KEYBINDINGS_FILE));
    let state = SceneState::from_config(system, &config);
    let mut app = OrreryApp::new(config, state, input_map);

    if let Err(e) = run(&mut app) {
        error!("Event loop failed: {e}");
        return ExitCode::FAILURE;
    }
    if app.init_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
