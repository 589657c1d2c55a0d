/*
 * Manages the editor's own persisted settings: the most recently used style
 * file and the user's preferred save format. These are stored as a small JSON
 * document in the per-user configuration directory, entirely separate from
 * the style files the editor produces.
 *
 * It uses a trait-based approach (`SettingsManagerOperations`) to allow for
 * different storage backends or mock implementations for testing. The
 * concrete implementation (`CoreSettingsManager`) handles the file system
 * interaction via `path_utils`.
 */
use super::path_utils;
use super::persistence::StyleFormat;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

const SETTINGS_FILENAME: &str = "editor_settings.json";

#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoConfigDirectory,
}

impl From<io::Error> for SettingsError {
    fn from(err: io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Serde(err)
    }
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "Settings I/O error: {e}"),
            SettingsError::Serde(e) => write!(f, "Settings serialization error: {e}"),
            SettingsError::NoConfigDirectory => {
                write!(f, "Could not determine configuration directory for settings")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Style file offered for reload on the next start.
    pub last_style_path: Option<PathBuf>,
    /// Encoding preselected in the save dialog.
    pub preferred_format: Option<StyleFormat>,
}

pub trait SettingsManagerOperations: Send + Sync {
    fn load_settings(&self, app_name: &str) -> Result<EditorSettings>;
    fn save_settings(&self, app_name: &str, settings: &EditorSettings) -> Result<()>;
}

pub struct CoreSettingsManager {}

impl CoreSettingsManager {
    pub fn new() -> Self {
        CoreSettingsManager {}
    }
}

impl Default for CoreSettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsManagerOperations for CoreSettingsManager {
    /*
     * Loads the settings for a given application. A missing settings file is
     * not an error; it yields the defaults, as on first launch.
     */
    fn load_settings(&self, app_name: &str) -> Result<EditorSettings> {
        log::trace!("CoreSettingsManager: Loading settings for app '{app_name}'");
        let config_dir =
            path_utils::app_config_dir(app_name).ok_or(SettingsError::NoConfigDirectory)?;
        let file_path = config_dir.join(SETTINGS_FILENAME);

        if !file_path.exists() {
            log::debug!("CoreSettingsManager: No settings file at {file_path:?}, using defaults.");
            return Ok(EditorSettings::default());
        }

        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let settings: EditorSettings = serde_json::from_reader(reader)?;
        log::debug!("CoreSettingsManager: Loaded settings from {file_path:?}.");
        Ok(settings)
    }

    fn save_settings(&self, app_name: &str, settings: &EditorSettings) -> Result<()> {
        log::trace!("CoreSettingsManager: Saving settings for app '{app_name}'");
        let config_dir =
            path_utils::app_config_dir(app_name).ok_or(SettingsError::NoConfigDirectory)?;
        let file_path = config_dir.join(SETTINGS_FILENAME);

        let file = File::create(&file_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, settings)?;
        log::debug!("CoreSettingsManager: Saved settings to {file_path:?}.");
        Ok(())
    }
}
