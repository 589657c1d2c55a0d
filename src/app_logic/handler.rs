use crate::core::{
    ControlType, EditSession, EditorSettings, GenericProperty, PickerBinding, SelectionError,
    SettingsManagerOperations, StyleFormat, StylePersistenceOperations,
};
use crate::platform_layer::{
    AppEvent, MessageSeverity, PickerTarget, PlatformCommand, PlatformEventHandler, WindowId,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const ID_BUTTON_LOAD_STYLE_LOGIC: i32 = 1001;
pub const ID_BUTTON_SAVE_STYLE_LOGIC: i32 = 1002;
// Made pub(crate) for access from handler_tests.rs
pub(crate) const APP_NAME_FOR_SETTINGS: &str = "ReStyleApp";

const STYLE_FILE_FILTER_SPEC: &str =
    "Style Files (*.rgsb;*.rgst;*.png)\0*.rgsb;*.rgst;*.png\0All Files (*.*)\0*.*\0\0";

// Made pub(crate) for access from handler_tests.rs
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PendingAction {
    SavingStyle,
}

/*
 * Manages the editor state and UI logic in a platform-agnostic manner. It
 * processes UI events received from the native shell and generates commands
 * to update the UI. File-format and settings concerns are reached through the
 * `StylePersistenceOperations` and `SettingsManagerOperations` traits so this
 * layer is testable with mocks.
 */
pub struct EditorAppLogic {
    pub(crate) main_window_id: Option<WindowId>,
    pub(crate) session: EditSession,
    pub(crate) settings: EditorSettings,
    pub(crate) control_row: Option<usize>,
    pub(crate) property_row: Option<usize>,
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) style_codec: Arc<dyn StylePersistenceOperations>,
    pub(crate) settings_manager: Arc<dyn SettingsManagerOperations>,
}

impl EditorAppLogic {
    pub fn new(
        style_codec: Arc<dyn StylePersistenceOperations>,
        settings_manager: Arc<dyn SettingsManagerOperations>,
    ) -> Self {
        EditorAppLogic {
            main_window_id: None,
            session: EditSession::new(),
            settings: EditorSettings::default(),
            control_row: None,
            property_row: None,
            pending_action: None,
            style_codec,
            settings_manager,
        }
    }

    /*
     * Handles the notification that the main window exists. Loads the editor
     * settings, re-loads the most recently used style file when it is still
     * present, fills the control gallery, and shows the window.
     */
    pub fn on_main_window_created(&mut self, window_id: WindowId) -> Vec<PlatformCommand> {
        self.main_window_id = Some(window_id);
        let mut commands = Vec::new();

        match self.settings_manager.load_settings(APP_NAME_FOR_SETTINGS) {
            Ok(settings) => self.settings = settings,
            Err(e) => {
                log::error!("AppLogic: Failed to load editor settings: {e}. Using defaults.");
                self.settings = EditorSettings::default();
            }
        }

        commands.push(PlatformCommand::SetWindowTitle {
            window_id,
            title: "ReStyle - GUI style editor".to_string(),
        });
        commands.push(PlatformCommand::PopulateControlGallery {
            window_id,
            items: ControlType::ALL.iter().map(|c| c.name().to_string()).collect(),
        });

        let mut reloaded = false;
        if let Some(last_path) = self.settings.last_style_path.clone() {
            if last_path.exists() {
                log::debug!("AppLogic: Re-loading last used style {last_path:?}.");
                commands.extend(self.load_style_from_path(window_id, &last_path));
                reloaded = true;
            } else {
                log::debug!("AppLogic: Last used style {last_path:?} no longer exists.");
            }
        }

        if !reloaded {
            commands.push(Self::status(window_id, "Ready", MessageSeverity::Information));
        }
        commands.push(PlatformCommand::ShowWindow { window_id });
        commands
    }

    fn status(window_id: WindowId, text: &str, severity: MessageSeverity) -> PlatformCommand {
        PlatformCommand::UpdateStatusLabel {
            window_id,
            text: text.to_string(),
            severity,
        }
    }

    /*
     * Applies the stored gallery rows to the edit session and emits the UI
     * updates that follow from the new selection: the property list for the
     * selected control's group, a picker seed when a slot became bound, and
     * the selection readout in the status bar.
     */
    fn apply_selection(&mut self, window_id: WindowId) -> Vec<PlatformCommand> {
        let mut commands = Vec::new();

        let control = match self.control_row {
            Some(row) => match ControlType::from_index(row) {
                Ok(control) => Some(control),
                Err(e) => {
                    // The gallery is populated from the same control list, so
                    // this only fires on a shell-side defect.
                    log::error!("AppLogic: {e}");
                    self.control_row = None;
                    None
                }
            },
            None => None,
        };

        match self.session.set_selection(control, self.property_row) {
            Ok(()) => {}
            Err(e @ SelectionError::PropertyOutOfRange { .. }) => {
                // Stale property row from the previously selected control's
                // larger group; drop it and keep the control selection.
                log::error!("AppLogic: {e}. Clearing property selection.");
                self.property_row = None;
                if self.session.set_selection(control, None).is_err() {
                    log::error!("AppLogic: Selection could not be applied at all.");
                }
            }
            Err(e) => {
                log::error!("AppLogic: {e}");
            }
        }

        if let Some(control) = control {
            let group = control.property_group();
            commands.push(PlatformCommand::PopulatePropertyList {
                window_id,
                items: (0..group.slot_count())
                    .filter_map(|p| group.slot_name(p))
                    .map(str::to_string)
                    .collect(),
            });
        } else {
            commands.push(PlatformCommand::PopulatePropertyList {
                window_id,
                items: Vec::new(),
            });
        }

        if let PickerBinding::Slot { control, property } = self.session.binding() {
            commands.push(PlatformCommand::SetColorPickerValue {
                window_id,
                value: self.session.picker_value(),
            });
            if let Ok(name) = self.session.layout().slot_name(control, property) {
                commands.push(Self::status(
                    window_id,
                    &format!("CURRENT SELECTION: {name}"),
                    MessageSeverity::Information,
                ));
            }
        }

        commands
    }

    /*
     * Attempts to load a style file and apply it to the session. On any
     * failure the session's current table stays in place and the failure is
     * reported as a status message; nothing here is fatal.
     */
    pub(crate) fn load_style_from_path(
        &mut self,
        window_id: WindowId,
        path: &Path,
    ) -> Vec<PlatformCommand> {
        let Some(format) = StyleFormat::from_path(path) else {
            log::debug!("AppLogic: No style format recognized for {path:?}.");
            return vec![Self::status(
                window_id,
                &format!("Unrecognized style file extension: {}", path.display()),
                MessageSeverity::Warning,
            )];
        };

        match self
            .style_codec
            .load_style(self.session.layout(), path, format)
        {
            Ok(table) => {
                self.session.replace_table(table);
                self.settings.last_style_path = Some(path.to_path_buf());
                self.persist_settings();
                let mut commands = vec![Self::status(
                    window_id,
                    &format!("Loaded {format} style from {}", path.display()),
                    MessageSeverity::Information,
                )];
                if self.session.binding() != PickerBinding::Unbound {
                    commands.push(PlatformCommand::SetColorPickerValue {
                        window_id,
                        value: self.session.picker_value(),
                    });
                }
                commands
            }
            Err(e) => {
                log::error!("AppLogic: Failed to load style from {path:?}: {e}");
                vec![Self::status(
                    window_id,
                    &format!("Failed to load style: {e}"),
                    MessageSeverity::Error,
                )]
            }
        }
    }

    fn save_style_to_path(&mut self, window_id: WindowId, path: &Path) -> Vec<PlatformCommand> {
        let format = StyleFormat::from_path(path)
            .or(self.settings.preferred_format)
            .unwrap_or(StyleFormat::Binary);

        match self
            .style_codec
            .save_style(self.session.table(), self.session.layout(), path, format)
        {
            Ok(()) => {
                self.settings.last_style_path = Some(path.to_path_buf());
                self.settings.preferred_format = Some(format);
                self.persist_settings();
                vec![Self::status(
                    window_id,
                    &format!("Saved {format} style to {}", path.display()),
                    MessageSeverity::Information,
                )]
            }
            Err(e) => {
                log::error!("AppLogic: Failed to save style to {path:?}: {e}");
                vec![Self::status(
                    window_id,
                    &format!("Failed to save style: {e}"),
                    MessageSeverity::Error,
                )]
            }
        }
    }

    fn persist_settings(&self) {
        if let Err(e) = self
            .settings_manager
            .save_settings(APP_NAME_FOR_SETTINGS, &self.settings)
        {
            log::error!("AppLogic: Failed to save editor settings: {e}");
        }
    }

    fn default_save_filename(&self) -> String {
        let format = self.settings.preferred_format.unwrap_or(StyleFormat::Binary);
        format!("mystyle.{}", format.extension())
    }

    fn dialog_initial_dir(&self) -> Option<PathBuf> {
        self.settings
            .last_style_path
            .as_ref()
            .and_then(|p| p.parent().map(PathBuf::from))
    }
}

impl PlatformEventHandler for EditorAppLogic {
    fn handle_event(&mut self, event: AppEvent) -> Vec<PlatformCommand> {
        let mut commands = Vec::new();
        match event {
            AppEvent::WindowCloseRequestedByUser { window_id } => {
                if self.main_window_id == Some(window_id) {
                    log::debug!("AppLogic: Main window close requested.");
                    commands.push(PlatformCommand::CloseWindow { window_id });
                }
            }
            AppEvent::WindowDestroyed { window_id } => {
                if self.main_window_id == Some(window_id) {
                    log::debug!("AppLogic: Main window destroyed notification received.");
                    self.main_window_id = None;
                    self.control_row = None;
                    self.property_row = None;
                    self.pending_action = None;
                }
            }
            AppEvent::ControlRowSelected { window_id, row } => {
                if self.main_window_id == Some(window_id) {
                    self.control_row = row;
                    commands.extend(self.apply_selection(window_id));
                }
            }
            AppEvent::PropertyRowSelected { window_id, row } => {
                if self.main_window_id == Some(window_id) {
                    self.property_row = row;
                    commands.extend(self.apply_selection(window_id));
                }
            }
            AppEvent::ColorPickerChanged { window_id, value } => {
                if self.main_window_id == Some(window_id) {
                    if let Some(offset) = self.session.apply_picker_value(value) {
                        log::trace!(
                            "AppLogic: Picker wrote 0x{value:08X} into slot {offset}."
                        );
                    }
                }
            }
            AppEvent::PickerTargetChanged { window_id, target } => {
                if self.main_window_id == Some(window_id) {
                    let generic = match target {
                        PickerTarget::SelectedSlot => None,
                        PickerTarget::BackgroundColor => Some(GenericProperty::BackgroundColor),
                        PickerTarget::LinesColor => Some(GenericProperty::LinesColor),
                    };
                    self.session.set_generic_override(generic);
                    commands.push(PlatformCommand::SetColorPickerValue {
                        window_id,
                        value: self.session.picker_value(),
                    });
                }
            }
            AppEvent::ButtonClicked {
                window_id,
                control_id,
            } => {
                if self.main_window_id != Some(window_id) {
                    return commands;
                }
                if control_id == ID_BUTTON_SAVE_STYLE_LOGIC {
                    log::debug!("AppLogic: 'Save Style' button clicked.");
                    self.pending_action = Some(PendingAction::SavingStyle);
                    commands.push(PlatformCommand::ShowSaveFileDialog {
                        window_id,
                        title: "Save Style As".to_string(),
                        default_filename: self.default_save_filename(),
                        filter_spec: STYLE_FILE_FILTER_SPEC.to_string(),
                        initial_dir: self.dialog_initial_dir(),
                    });
                } else if control_id == ID_BUTTON_LOAD_STYLE_LOGIC {
                    log::debug!("AppLogic: 'Load Style' button clicked.");
                    commands.push(PlatformCommand::ShowOpenFileDialog {
                        window_id,
                        title: "Load Style".to_string(),
                        filter_spec: STYLE_FILE_FILTER_SPEC.to_string(),
                        initial_dir: self.dialog_initial_dir(),
                    });
                }
            }
            AppEvent::FilesDropped { window_id, paths } => {
                if self.main_window_id == Some(window_id) {
                    // Only the first dropped path is imported.
                    if let Some(first) = paths.first() {
                        if paths.len() > 1 {
                            log::debug!(
                                "AppLogic: Ignoring {} additional dropped paths.",
                                paths.len() - 1
                            );
                        }
                        let first = first.clone();
                        commands.extend(self.load_style_from_path(window_id, &first));
                    }
                }
            }
            AppEvent::FileOpenDialogCompleted { window_id, result } => {
                if self.main_window_id == Some(window_id) {
                    match result {
                        Some(path) => {
                            commands.extend(self.load_style_from_path(window_id, &path));
                        }
                        None => log::debug!("AppLogic: Load style dialog cancelled."),
                    }
                }
            }
            AppEvent::FileSaveDialogCompleted { window_id, result } => {
                if self.main_window_id == Some(window_id) {
                    match self.pending_action.take() {
                        Some(PendingAction::SavingStyle) => match result {
                            Some(path) => {
                                commands.extend(self.save_style_to_path(window_id, &path));
                            }
                            None => log::debug!("AppLogic: Save style dialog cancelled."),
                        },
                        None => {
                            log::error!(
                                "AppLogic: FileSaveDialogCompleted received but no pending action was set."
                            );
                        }
                    }
                }
            }
        }
        commands
    }

    fn on_quit(&mut self) {
        log::debug!("AppLogic: on_quit called by the shell.");
    }
}
