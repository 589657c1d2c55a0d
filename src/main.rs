mod app_logic;
mod core;
mod platform_layer;

use crate::app_logic::EditorAppLogic;
use crate::core::{CoreSettingsManager, CoreStyleCodec};
use crate::platform_layer::{AppEvent, HeadlessShell, PlatformEventHandler};

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::sync::Arc;

fn initialize_logging() {
    let result = TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    if let Err(e) = result {
        eprintln!("Logger initialization failed: {e}");
    }
}

/*
 * Entry point. Wires the concrete codec and settings manager into the
 * application logic and drives it through the shell. Style file paths given
 * on the command line are fed in as if they had been dropped on the window.
 */
fn main() {
    initialize_logging();
    log::debug!("ReStyle starting.");

    let style_codec = Arc::new(CoreStyleCodec::new());
    let settings_manager = Arc::new(CoreSettingsManager::new());
    let mut logic = EditorAppLogic::new(style_codec, settings_manager);

    let mut shell = HeadlessShell::new();
    let window_id = shell.open_main_window();
    let startup_commands = logic.on_main_window_created(window_id);
    shell.run_commands(&mut logic, startup_commands);

    let dropped: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if !dropped.is_empty() {
        shell.dispatch(
            &mut logic,
            AppEvent::FilesDropped {
                window_id,
                paths: dropped,
            },
        );
    }

    logic.on_quit();
    log::debug!("ReStyle exiting.");
}
