//! Digits, slots and the completed verification code.
//!
//! The invariants of the entry screen live in these types: a slot can only
//! ever hold a single ASCII digit, a slot index is always in range, and a
//! `VerificationCode` always has exactly [`CODE_LENGTH`] digits.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of slots on the entry screen.
pub const CODE_LENGTH: usize = 6;

// ============================================================================
// Digit
// ============================================================================

/// A single decimal digit `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digit(u8);

impl Digit {
    /// Accepts ASCII digits only; full-width and other Unicode digits are rejected.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10)
            .filter(|_| c.is_ascii_digit())
            .map(|d| Self(d as u8))
    }

    #[must_use]
    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ASCII digits of `text`, in order. Everything else is dropped.
pub fn extract_digits(text: &str) -> impl Iterator<Item = Digit> + '_ {
    text.chars().filter_map(Digit::from_char)
}

// ============================================================================
// SlotIndex
// ============================================================================

/// Position of a slot; always `< CODE_LENGTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(usize);

impl SlotIndex {
    pub const FIRST: SlotIndex = SlotIndex(0);
    pub const LAST: SlotIndex = SlotIndex(CODE_LENGTH - 1);

    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        (index < CODE_LENGTH).then_some(Self(index))
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    #[must_use]
    pub fn prev(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Slot
// ============================================================================

/// One character position. The index is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    index: SlotIndex,
    value: Option<Digit>,
}

impl Slot {
    #[must_use]
    pub fn empty(index: SlotIndex) -> Self {
        Self { index, value: None }
    }

    /// A full row of empty slots, indexed `0..CODE_LENGTH`.
    #[must_use]
    pub fn empty_row() -> [Slot; CODE_LENGTH] {
        std::array::from_fn(|i| Slot::empty(SlotIndex(i)))
    }

    #[must_use]
    pub fn index(&self) -> SlotIndex {
        self.index
    }

    #[must_use]
    pub fn value(&self) -> Option<Digit> {
        self.value
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    pub fn set(&mut self, digit: Digit) {
        self.value = Some(digit);
    }

    /// Empties the slot, returning the digit it held.
    pub fn take(&mut self) -> Option<Digit> {
        self.value.take()
    }
}

// ============================================================================
// VerificationCode
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("verification code must have {expected} digits (got {actual})", expected = CODE_LENGTH)]
    WrongLength { actual: usize },
    #[error("verification code may only contain digits (found {0:?})")]
    NonDigit(char),
}

/// A complete code: exactly [`CODE_LENGTH`] digits.
///
/// `Display` prints the digits; `Debug` does not.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerificationCode([Digit; CODE_LENGTH]);

impl VerificationCode {
    #[must_use]
    pub fn digits(&self) -> &[Digit; CODE_LENGTH] {
        &self.0
    }

    /// Builds a code from the first [`CODE_LENGTH`] digits of `text`, ignoring
    /// any other characters. Returns `None` when `text` holds too few digits.
    #[must_use]
    pub fn first_in(text: &str) -> Option<Self> {
        let mut digits = extract_digits(text);
        let mut out = [Digit(0); CODE_LENGTH];
        for slot in &mut out {
            *slot = digits.next()?;
        }
        Some(Self(out))
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in &self.0 {
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerificationCode([REDACTED])")
    }
}

impl FromStr for VerificationCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = [Digit(0); CODE_LENGTH];
        let mut count = 0;
        for c in s.chars() {
            let digit = Digit::from_char(c).ok_or(CodeError::NonDigit(c))?;
            if let Some(slot) = out.get_mut(count) {
                *slot = digit;
            }
            count += 1;
        }
        if count != CODE_LENGTH {
            return Err(CodeError::WrongLength { actual: count });
        }
        Ok(Self(out))
    }
}
