//! Digit entry and focus management across the six code slots.
//!
//! The controller is authoritative over slot contents: the presentation layer
//! forwards raw insertion and deletion events, never inserts text itself, and
//! moves its input focus according to the returned [`FocusChange`].

use smscode_types::{CODE_LENGTH, Digit, Slot, SlotIndex, VerificationCode, extract_digits};
use tracing::{debug, trace};

/// Callbacks from the controller to the surrounding screen.
pub trait CodeEntryObserver {
    /// Invoked after every slot mutation with whether all slots are filled.
    fn code_changed(&mut self, is_complete: bool);

    /// Invoked when the code is handed off for submission.
    fn submit(&mut self, code: &VerificationCode);
}

/// Where the presentation layer should put input focus after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    Unchanged,
    MoveTo(SlotIndex),
    /// Editing ended; no slot accepts input.
    Cleared,
}

/// Owns the slots, the focus pointer and the observer.
///
/// Single-use: there is no reset path. A new screen gets a new controller.
#[derive(Debug)]
pub struct CodeEntryController<O> {
    slots: [Slot; CODE_LENGTH],
    focused: Option<SlotIndex>,
    observer: O,
}

impl<O: CodeEntryObserver> CodeEntryController<O> {
    /// All slots empty, nothing focused.
    pub fn new(observer: O) -> Self {
        Self {
            slots: Slot::empty_row(),
            focused: None,
            observer,
        }
    }

    /// Applies text from an insertion event on slot `index`.
    ///
    /// Default insertion must always be suppressed by the caller. A run of at
    /// least [`CODE_LENGTH`] digits fills every slot and submits, whichever
    /// slot received it. Otherwise the first digit goes into `index` and focus
    /// advances by one. Text without digits changes nothing.
    ///
    /// `submit` only ever receives a complete code: filling the last slot
    /// while earlier slots are empty ends editing without submitting.
    pub fn insert_text(&mut self, index: SlotIndex, text: &str) -> FocusChange {
        if text.is_empty() {
            return FocusChange::Unchanged;
        }

        if let Some(code) = VerificationCode::first_in(text) {
            for (slot, digit) in self.slots.iter_mut().zip(code.digits()) {
                slot.set(*digit);
            }
            debug!(slot = %index, "Full code pasted");
            self.focused = None;
            self.observer.submit(&code);
            self.notify_changed();
            return FocusChange::Cleared;
        }

        let Some(digit) = extract_digits(text).next() else {
            trace!(slot = %index, "Insertion without digits ignored");
            return FocusChange::Unchanged;
        };
        self.slot_mut(index).set(digit);

        let change = match index.next() {
            Some(next) => {
                self.focused = Some(next);
                FocusChange::MoveTo(next)
            }
            None => {
                self.focused = None;
                match self.current_code() {
                    Some(code) => self.observer.submit(&code),
                    None => debug!("Last slot filled while earlier slots are empty; not submitting"),
                }
                FocusChange::Cleared
            }
        };
        self.notify_changed();
        change
    }

    /// Backspace on slot `index`: focus chains to the previous slot.
    pub fn handle_deletion(&mut self, index: SlotIndex) -> FocusChange {
        match index.prev() {
            Some(prev) => {
                self.focused = Some(prev);
                FocusChange::MoveTo(prev)
            }
            None => FocusChange::Unchanged,
        }
    }

    /// Native deletion of the slot's own digit. Returns whether anything was removed.
    pub fn clear_slot(&mut self, index: SlotIndex) -> bool {
        if self.slot_mut(index).take().is_none() {
            return false;
        }
        self.notify_changed();
        true
    }

    pub fn focus(&mut self, index: SlotIndex) {
        self.focused = Some(index);
    }

    /// The code, if and only if every slot holds a digit.
    #[must_use]
    pub fn current_code(&self) -> Option<VerificationCode> {
        let code: String = self
            .slots
            .iter()
            .map(|slot| slot.value().map(Digit::as_char))
            .collect::<Option<_>>()?;
        code.parse().ok()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|slot| !slot.is_empty())
    }

    #[must_use]
    pub fn focused(&self) -> Option<SlotIndex> {
        self.focused
    }

    #[must_use]
    pub fn slots(&self) -> &[Slot; CODE_LENGTH] {
        &self.slots
    }

    #[must_use]
    pub fn slot(&self, index: SlotIndex) -> &Slot {
        &self.slots[index.get()]
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    fn slot_mut(&mut self, index: SlotIndex) -> &mut Slot {
        &mut self.slots[index.get()]
    }

    fn notify_changed(&mut self) {
        let complete = self.is_complete();
        self.observer.code_changed(complete);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Changed(bool),
        Submitted(String),
    }

    #[derive(Debug, Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl Recorder {
        fn submissions(&self) -> Vec<&str> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Submitted(code) => Some(code.as_str()),
                    Event::Changed(_) => None,
                })
                .collect()
        }
    }

    impl CodeEntryObserver for Recorder {
        fn code_changed(&mut self, is_complete: bool) {
            self.events.push(Event::Changed(is_complete));
        }

        fn submit(&mut self, code: &VerificationCode) {
            self.events.push(Event::Submitted(code.to_string()));
        }
    }

    fn controller() -> CodeEntryController<Recorder> {
        CodeEntryController::new(Recorder::default())
    }

    fn idx(i: usize) -> SlotIndex {
        SlotIndex::new(i).unwrap()
    }

    fn values(c: &CodeEntryController<Recorder>) -> Vec<String> {
        c.slots()
            .iter()
            .map(|s| s.value().map(|d| d.to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn single_digit_advances_focus_by_one() {
        for i in 0..CODE_LENGTH - 1 {
            let mut c = controller();
            c.focus(idx(i));
            let change = c.insert_text(idx(i), "5");
            assert_eq!(change, FocusChange::MoveTo(idx(i + 1)));
            assert_eq!(c.focused(), Some(idx(i + 1)));
            for (j, slot) in c.slots().iter().enumerate() {
                if j == i {
                    assert_eq!(slot.value().map(|d| d.as_char()), Some('5'));
                } else {
                    assert!(slot.is_empty(), "slot {j} should be untouched");
                }
            }
        }
    }

    #[test]
    fn first_digit_scenario() {
        let mut c = controller();
        c.insert_text(idx(0), "1");
        assert_eq!(c.focused(), Some(idx(1)));
        assert_eq!(values(&c), vec!["1", "", "", "", "", ""]);
        assert_eq!(c.observer().events, vec![Event::Changed(false)]);
    }

    #[test]
    fn sequential_entry_submits_once() {
        let mut c = controller();
        for (i, d) in ["1", "2", "3", "4", "5", "6"].iter().enumerate() {
            c.insert_text(idx(i), d);
        }
        assert_eq!(c.observer().submissions(), vec!["123456"]);
        assert_eq!(c.focused(), None);
        assert_eq!(
            c.observer().events.last(),
            Some(&Event::Changed(true)),
            "completion is reported after submit"
        );
        assert_eq!(c.current_code().map(|code| code.to_string()).as_deref(), Some("123456"));
    }

    #[test]
    fn last_slot_with_gaps_clears_focus_without_submitting() {
        let mut c = controller();
        c.insert_text(idx(0), "1");
        let change = c.insert_text(SlotIndex::LAST, "9");
        assert_eq!(change, FocusChange::Cleared);
        assert_eq!(c.focused(), None);
        assert!(c.observer().submissions().is_empty());
        assert_eq!(c.observer().events.last(), Some(&Event::Changed(false)));
        assert!(c.current_code().is_none());
    }

    #[test]
    fn paste_of_full_code_overwrites_from_any_slot() {
        for target in 0..CODE_LENGTH {
            let mut c = controller();
            c.insert_text(idx(0), "0");
            c.insert_text(idx(1), "0");
            let change = c.insert_text(idx(target), "987654321");
            assert_eq!(change, FocusChange::Cleared);
            assert_eq!(values(&c), vec!["9", "8", "7", "6", "5", "4"]);
            assert_eq!(c.focused(), None);
            assert_eq!(c.observer().submissions(), vec!["987654"]);
        }
    }

    #[test]
    fn paste_with_separators_uses_first_six_digits() {
        let mut c = controller();
        c.insert_text(idx(2), "Your code: 12-34-56. Expires in 10 min");
        assert_eq!(c.observer().submissions(), vec!["123456"]);
    }

    #[test]
    fn short_paste_takes_first_digit_only() {
        let mut c = controller();
        let change = c.insert_text(idx(2), "x42");
        assert_eq!(change, FocusChange::MoveTo(idx(3)));
        assert_eq!(values(&c), vec!["", "", "4", "", "", ""]);
        assert!(c.observer().submissions().is_empty());
    }

    #[test]
    fn non_digit_insertion_is_a_no_op() {
        let mut c = controller();
        c.focus(idx(2));
        assert_eq!(c.insert_text(idx(2), "a"), FocusChange::Unchanged);
        assert_eq!(c.focused(), Some(idx(2)));
        assert!(c.slots().iter().all(Slot::is_empty));
        assert!(c.observer().events.is_empty());
    }

    #[test]
    fn empty_insertion_is_a_no_op() {
        let mut c = controller();
        c.focus(idx(4));
        assert_eq!(c.insert_text(idx(4), ""), FocusChange::Unchanged);
        assert_eq!(c.focused(), Some(idx(4)));
        assert!(c.observer().events.is_empty());
    }

    #[test]
    fn insertion_overwrites_existing_digit() {
        let mut c = controller();
        c.insert_text(idx(1), "3");
        c.insert_text(idx(1), "8");
        assert_eq!(values(&c)[1], "8");
    }

    #[test]
    fn deletion_at_first_slot_keeps_focus() {
        let mut c = controller();
        c.focus(idx(0));
        assert_eq!(c.handle_deletion(idx(0)), FocusChange::Unchanged);
        assert_eq!(c.focused(), Some(idx(0)));
    }

    #[test]
    fn deletion_moves_focus_back() {
        for k in 1..CODE_LENGTH {
            let mut c = controller();
            c.focus(idx(k));
            assert_eq!(c.handle_deletion(idx(k)), FocusChange::MoveTo(idx(k - 1)));
            assert_eq!(c.focused(), Some(idx(k - 1)));
            assert!(c.observer().events.is_empty());
        }
    }

    #[test]
    fn clear_slot_reports_incomplete() {
        let mut c = controller();
        c.insert_text(idx(0), "123456");
        assert!(c.clear_slot(idx(3)));
        assert!(c.current_code().is_none());
        assert_eq!(c.observer().events.last(), Some(&Event::Changed(false)));

        let before = c.observer().events.len();
        assert!(!c.clear_slot(idx(3)));
        assert_eq!(c.observer().events.len(), before);
    }

    #[test]
    fn current_code_missing_iff_any_slot_empty() {
        let mut c = controller();
        assert!(c.current_code().is_none());
        for i in 0..CODE_LENGTH {
            assert!(c.current_code().is_none());
            c.insert_text(idx(i), "7");
        }
        assert!(c.is_complete());
        assert_eq!(c.current_code().map(|code| code.to_string()).as_deref(), Some("777777"));
    }
}
