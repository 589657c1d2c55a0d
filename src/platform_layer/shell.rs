/*
 * A headless stand-in for the native shell. The real shell is the
 * immediate-mode GUI toolkit binding that owns the window, the frame loop and
 * the OS file dialogs; this one executes the same `PlatformCommand`s by
 * logging them and answers every dialog with a cancellation. It keeps the
 * application logic fully exercisable without a display, both from `main`
 * (replaying dropped files from the command line) and from tests.
 */
use super::types::{AppEvent, PlatformCommand, PlatformEventHandler, WindowId};
use std::collections::VecDeque;

pub struct HeadlessShell {
    next_window_id: usize,
}

impl HeadlessShell {
    pub fn new() -> Self {
        HeadlessShell { next_window_id: 1 }
    }

    pub fn open_main_window(&mut self) -> WindowId {
        let window_id = WindowId(self.next_window_id);
        self.next_window_id += 1;
        log::debug!("HeadlessShell: Opened window {window_id:?}.");
        window_id
    }

    /*
     * Feeds one event to the handler and executes the resulting commands,
     * including any follow-up events those commands synthesize (dialog
     * cancellations), until the exchange settles.
     */
    pub fn dispatch(&mut self, handler: &mut dyn PlatformEventHandler, event: AppEvent) {
        let mut pending = VecDeque::from([event]);
        while let Some(next) = pending.pop_front() {
            for command in handler.handle_event(next) {
                if let Some(reply) = self.execute(command) {
                    pending.push_back(reply);
                }
            }
        }
    }

    /// Executes commands produced outside of an event exchange (startup).
    pub fn run_commands(
        &mut self,
        handler: &mut dyn PlatformEventHandler,
        commands: Vec<PlatformCommand>,
    ) {
        for command in commands {
            if let Some(reply) = self.execute(command) {
                self.dispatch(handler, reply);
            }
        }
    }

    fn execute(&mut self, command: PlatformCommand) -> Option<AppEvent> {
        match command {
            PlatformCommand::ShowSaveFileDialog {
                window_id, title, ..
            } => {
                log::info!("HeadlessShell: Cancelling save dialog '{title}' (no display).");
                Some(AppEvent::FileSaveDialogCompleted {
                    window_id,
                    result: None,
                })
            }
            PlatformCommand::ShowOpenFileDialog {
                window_id, title, ..
            } => {
                log::info!("HeadlessShell: Cancelling open dialog '{title}' (no display).");
                Some(AppEvent::FileOpenDialogCompleted {
                    window_id,
                    result: None,
                })
            }
            other => {
                log::info!("HeadlessShell: {other:?}");
                None
            }
        }
    }
}

impl Default for HeadlessShell {
    fn default() -> Self {
        Self::new()
    }
}
