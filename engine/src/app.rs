//! Screen state: the entry controller, the submit button and the status line.

use smscode_types::ui::UiOptions;
use smscode_types::{SlotIndex, VerificationCode};
use tracing::{info, warn};

use crate::controller::{CodeEntryController, CodeEntryObserver};
use crate::submit::{CodeSubmitter, SubmitError};

/// Observer owned by the screen's controller.
///
/// Tracks whether the submit button is enabled and queues codes the
/// controller hands off, to be sent once the current event has been applied.
#[derive(Debug, Default)]
pub struct ScreenEvents {
    complete: bool,
    changed: bool,
    pending: Vec<VerificationCode>,
}

impl ScreenEvents {
    #[must_use]
    pub fn submit_enabled(&self) -> bool {
        self.complete
    }
}

impl CodeEntryObserver for ScreenEvents {
    fn code_changed(&mut self, is_complete: bool) {
        self.complete = is_complete;
        self.changed = true;
    }

    fn submit(&mut self, code: &VerificationCode) {
        self.pending.push(*code);
    }
}

/// Last outcome shown under the submit button.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Prompt,
    Sent(VerificationCode),
    Failed(SubmitError),
}

pub struct App {
    entry: CodeEntryController<ScreenEvents>,
    submitter: Box<dyn CodeSubmitter>,
    options: UiOptions,
    status: Status,
    should_quit: bool,
}

impl App {
    /// The first slot is focused, as when the screen appears.
    pub fn new(options: UiOptions, submitter: Box<dyn CodeSubmitter>) -> Self {
        let mut entry = CodeEntryController::new(ScreenEvents::default());
        entry.focus(SlotIndex::FIRST);
        Self {
            entry,
            submitter,
            options,
            status: Status::Prompt,
            should_quit: false,
        }
    }

    /// Typed or pasted text, delivered to the focused slot.
    pub fn enter_text(&mut self, text: &str) {
        let Some(index) = self.entry.focused() else {
            return;
        };
        self.entry.insert_text(index, text);
        self.flush_entry_events();
    }

    /// Deletes the focused slot's digit, then moves focus back one slot.
    pub fn backspace(&mut self) {
        let Some(index) = self.entry.focused() else {
            return;
        };
        self.entry.clear_slot(index);
        self.entry.handle_deletion(index);
        self.flush_entry_events();
    }

    pub fn focus_next(&mut self) {
        let target = match self.entry.focused() {
            Some(index) => index.next(),
            None => Some(SlotIndex::FIRST),
        };
        if let Some(index) = target {
            self.entry.focus(index);
        }
    }

    pub fn focus_prev(&mut self) {
        let target = match self.entry.focused() {
            Some(index) => index.prev(),
            None => Some(SlotIndex::LAST),
        };
        if let Some(index) = target {
            self.entry.focus(index);
        }
    }

    pub fn focus_slot(&mut self, index: SlotIndex) {
        self.entry.focus(index);
    }

    /// The submit button. Does nothing until every slot is filled.
    pub fn press_submit(&mut self) {
        if !self.submit_enabled() {
            return;
        }
        if let Some(code) = self.entry.current_code() {
            self.send(code);
        }
    }

    #[must_use]
    pub fn submit_enabled(&self) -> bool {
        self.entry.observer().submit_enabled()
    }

    #[must_use]
    pub fn status(&self) -> &Status {
        &self.status
    }

    #[must_use]
    pub fn controller(&self) -> &CodeEntryController<ScreenEvents> {
        &self.entry
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.options
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn flush_entry_events(&mut self) {
        let events = self.entry.observer_mut();
        let changed = std::mem::take(&mut events.changed);
        let pending = std::mem::take(&mut events.pending);

        if changed && pending.is_empty() {
            self.status = Status::Prompt;
        }
        for code in pending {
            self.send(code);
        }
    }

    fn send(&mut self, code: VerificationCode) {
        self.status = match self.submitter.submit(&code) {
            Ok(()) => {
                info!("Verification code submitted");
                Status::Sent(code)
            }
            Err(err) => {
                warn!(error = %err, "Verification code submission failed");
                Status::Failed(err)
            }
        };
    }
}
