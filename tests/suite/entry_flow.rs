//! Entry scenarios driven through the public controller API.

use smscode_engine::{
    CODE_LENGTH, CodeEntryController, CodeEntryObserver, FocusChange, SlotIndex, VerificationCode,
};

#[derive(Debug, Default)]
struct Log {
    changed: Vec<bool>,
    submitted: Vec<String>,
}

impl CodeEntryObserver for Log {
    fn code_changed(&mut self, is_complete: bool) {
        self.changed.push(is_complete);
    }

    fn submit(&mut self, code: &VerificationCode) {
        self.submitted.push(code.to_string());
    }
}

fn slot(i: usize) -> SlotIndex {
    SlotIndex::new(i).unwrap()
}

fn contents(c: &CodeEntryController<Log>) -> String {
    c.slots()
        .iter()
        .map(|s| s.value().map_or('_', |d| d.as_char()))
        .collect()
}

#[test]
fn fresh_controller_first_digit() {
    let mut c = CodeEntryController::new(Log::default());
    assert_eq!(c.insert_text(slot(0), "1"), FocusChange::MoveTo(slot(1)));
    assert_eq!(contents(&c), "1_____");
    assert_eq!(c.observer().changed, vec![false]);
    assert!(c.observer().submitted.is_empty());
}

#[test]
fn sequential_digits_submit_after_sixth() {
    let mut c = CodeEntryController::new(Log::default());
    for (i, d) in "123456".chars().enumerate() {
        assert!(c.observer().submitted.is_empty());
        c.insert_text(slot(i), &d.to_string());
    }
    assert_eq!(c.observer().submitted, vec!["123456"]);
    assert_eq!(c.focused(), None);
    assert_eq!(c.observer().changed, vec![false, false, false, false, false, true]);
}

#[test]
fn nine_digit_paste_at_slot_three() {
    let mut c = CodeEntryController::new(Log::default());
    assert_eq!(c.insert_text(slot(3), "987654321"), FocusChange::Cleared);
    assert_eq!(contents(&c), "987654");
    assert_eq!(c.observer().submitted, vec!["987654"]);
    assert_eq!(c.focused(), None);
}

#[test]
fn non_digit_at_slot_two_changes_nothing() {
    let mut c = CodeEntryController::new(Log::default());
    c.focus(slot(2));
    assert_eq!(c.insert_text(slot(2), "a"), FocusChange::Unchanged);
    assert_eq!(contents(&c), "______");
    assert_eq!(c.focused(), Some(slot(2)));
    assert!(c.observer().changed.is_empty());
    assert!(c.observer().submitted.is_empty());
}

#[test]
fn paste_overwrites_previous_entry() {
    let mut c = CodeEntryController::new(Log::default());
    c.insert_text(slot(0), "111111");
    c.insert_text(slot(5), "222222");
    assert_eq!(contents(&c), "222222");
    assert_eq!(c.observer().submitted, vec!["111111", "222222"]);
}

#[test]
fn backspace_chain_walks_to_first_slot() {
    let mut c = CodeEntryController::new(Log::default());
    let mut at = SlotIndex::LAST;
    c.focus(at);
    for _ in 1..CODE_LENGTH {
        match c.handle_deletion(at) {
            FocusChange::MoveTo(prev) => at = prev,
            other => panic!("expected focus move, got {other:?}"),
        }
    }
    assert_eq!(at, SlotIndex::FIRST);
    assert_eq!(c.handle_deletion(at), FocusChange::Unchanged);
    assert_eq!(c.focused(), Some(SlotIndex::FIRST));
}

#[test]
fn completion_tracks_every_slot() {
    let mut c = CodeEntryController::new(Log::default());
    c.insert_text(slot(0), "000000");
    for i in 0..CODE_LENGTH {
        c.clear_slot(slot(i));
        assert!(c.current_code().is_none(), "slot {i} empty");
        c.insert_text(slot(i), "0");
    }
    assert_eq!(c.current_code().map(|code| code.to_string()).as_deref(), Some("000000"));
}
