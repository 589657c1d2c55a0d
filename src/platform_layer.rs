pub mod shell;
pub mod types;

pub use shell::HeadlessShell;
pub use types::{
    AppEvent, MessageSeverity, PickerTarget, PlatformCommand, PlatformEventHandler, WindowId,
};
