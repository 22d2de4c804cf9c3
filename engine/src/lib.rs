//! Core engine for SMS code entry - the entry controller and screen state.
//!
//! This crate contains the state machine without TUI dependencies.

mod app;
mod controller;
mod submit;

pub use app::{App, ScreenEvents, Status};
pub use controller::{CodeEntryController, CodeEntryObserver, FocusChange};
pub use submit::{CodeSubmitter, LoggingSubmitter, SubmitError};

pub use smscode_types::{
    CODE_LENGTH, CodeError, Digit, Slot, SlotIndex, VerificationCode, ui::UiOptions,
};
