/*
 * This module defines the data types used for communication between the
 * application logic and the native shell built on the immediate-mode GUI
 * toolkit. It includes the window identifier, platform-agnostic event types
 * (`AppEvent`), commands for the shell (`PlatformCommand`), severity levels
 * for status messages (`MessageSeverity`), and the `PlatformEventHandler`
 * trait that the application logic implements.
 *
 * The native shell itself (window creation, frame loop, drawing, input
 * polling, OS file dialogs) lives outside this repository; everything it
 * needs to exchange with the editor core is described here.
 */
use std::path::PathBuf;

// An opaque identifier for a native window, managed by the shell.
//
// The application logic layer uses this ID to refer to specific windows
// when sending commands or receiving events, without needing to know about
// native window handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub(crate) usize);

/*
 * What the color picker should write into. The shell reports this from the
 * generic-property toggle buttons; `SelectedSlot` is the default mode in
 * which the picker follows the gallery selection.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerTarget {
    SelectedSlot,
    BackgroundColor,
    LinesColor,
}

// Defines the severity of a message to be displayed in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageSeverity {
    Information,
    Warning,
    Error,
}

// --- Events from the shell to the app logic ---

/*
 * Platform-agnostic UI events generated by the native toolkit. The shell
 * translates native input into these and hands them to the application
 * logic layer, once per frame at most for each source.
 */
#[derive(Debug)]
pub enum AppEvent {
    WindowCloseRequestedByUser {
        window_id: WindowId,
    },
    // Signals that a window and its native resources have been destroyed.
    // The `WindowId` should be considered invalid after this event.
    WindowDestroyed {
        window_id: WindowId,
    },
    // A row was selected (or deselected) in the control gallery list.
    ControlRowSelected {
        window_id: WindowId,
        row: Option<usize>,
    },
    // A row was selected (or deselected) in the property list.
    PropertyRowSelected {
        window_id: WindowId,
        row: Option<usize>,
    },
    // The color picker's working value changed, packed as 0xRRGGBBAA.
    ColorPickerChanged {
        window_id: WindowId,
        value: u32,
    },
    // One of the generic-property toggles changed the picker target.
    PickerTargetChanged {
        window_id: WindowId,
        target: PickerTarget,
    },
    ButtonClicked {
        window_id: WindowId,
        control_id: i32,
    },
    // The OS delivered files dragged onto the window.
    FilesDropped {
        window_id: WindowId,
        paths: Vec<PathBuf>,
    },
    // Signals the result of an "Open File" dialog; `None` means cancelled.
    FileOpenDialogCompleted {
        window_id: WindowId,
        result: Option<PathBuf>,
    },
    // Signals the result of a "Save File" dialog; `None` means cancelled.
    FileSaveDialogCompleted {
        window_id: WindowId,
        result: Option<PathBuf>,
    },
}

// --- Commands from the app logic to the shell ---

// These commands instruct the shell to update native UI elements. The style
// preview itself needs no command: the immediate-mode toolkit redraws every
// frame from the edit session's style table.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCommand {
    SetWindowTitle {
        window_id: WindowId,
        title: String,
    },
    ShowWindow {
        window_id: WindowId,
    },
    CloseWindow {
        window_id: WindowId,
    },
    // Fills the control gallery list, one row per control type.
    PopulateControlGallery {
        window_id: WindowId,
        items: Vec<String>,
    },
    // Fills the property list for the selected control's group.
    PopulatePropertyList {
        window_id: WindowId,
        items: Vec<String>,
    },
    // Seeds the color picker's working value, packed as 0xRRGGBBAA.
    SetColorPickerValue {
        window_id: WindowId,
        value: u32,
    },
    UpdateStatusLabel {
        window_id: WindowId,
        text: String,
        severity: MessageSeverity,
    },
    ShowSaveFileDialog {
        window_id: WindowId,
        title: String,
        default_filename: String,
        filter_spec: String,
        initial_dir: Option<PathBuf>,
    },
    ShowOpenFileDialog {
        window_id: WindowId,
        title: String,
        filter_spec: String,
        initial_dir: Option<PathBuf>,
    },
    QuitApplication,
}

// --- Trait for the app logic to handle events ---

// Implemented by the application logic layer. The shell calls `handle_event`
// for each translated native event and executes the returned commands before
// drawing the next frame.
pub trait PlatformEventHandler: Send + Sync + 'static {
    fn handle_event(&mut self, event: AppEvent) -> Vec<PlatformCommand>;

    // Called when the shell is about to exit its frame loop.
    fn on_quit(&mut self) {}
}
