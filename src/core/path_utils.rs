/*
 * Path helpers for the per-user directories the editor stores its own data
 * in, kept separate from the style files the user saves wherever they like.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/*
 * Resolves the editor's local configuration directory for `app_name`,
 * creating it when missing. Returns `None` when the platform offers no
 * suitable location or the directory cannot be created.
 */
pub fn app_config_dir(app_name: &str) -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", app_name)?;
    let config_path = project_dirs.config_local_dir();
    if !config_path.exists() {
        if let Err(e) = fs::create_dir_all(config_path) {
            log::error!("PathUtils: Failed to create config directory {config_path:?}: {e}");
            return None;
        }
        log::debug!("PathUtils: Created config directory {config_path:?}.");
    }
    Some(config_path.to_path_buf())
}
