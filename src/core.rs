/*
 * This module consolidates the core, platform-agnostic logic of the editor.
 * It re-exports the style-table data model, the layout/indexing scheme, the
 * persistence abstractions (including `StylePersistenceOperations` and
 * `SettingsManagerOperations` for testing and dependency injection), and the
 * live edit session.
 */
pub mod layout;
pub mod path_utils;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod style_table;

// Re-export key structures and enums
pub use layout::{ControlType, GenericProperty, PropertyGroup, SelectionError, StyleLayout};
pub use style_table::StyleTable;

// Re-export persistence related items
pub use persistence::{
    CoreStyleCodec, StyleFileError, StyleFormat, StylePersistenceOperations,
};

// Re-export settings related items
pub use settings::{
    CoreSettingsManager, EditorSettings, SettingsError, SettingsManagerOperations,
};

// Re-export the edit session
pub use session::{EditSession, PickerBinding};
