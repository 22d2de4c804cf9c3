//! Core domain types for SMS code entry.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod code;
pub mod ui;

pub use code::{
    CODE_LENGTH, CodeError, Digit, Slot, SlotIndex, VerificationCode, extract_digits,
};
