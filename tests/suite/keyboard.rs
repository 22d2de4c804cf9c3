//! Terminal events translated and applied to a live screen.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use smscode_engine::{App, CodeSubmitter, SlotIndex, Status, SubmitError, UiOptions, VerificationCode};
use smscode_tui::{Action, translate_events};

#[derive(Clone, Default)]
struct Sent(Rc<RefCell<Vec<String>>>);

impl CodeSubmitter for Sent {
    fn submit(&mut self, code: &VerificationCode) -> Result<(), SubmitError> {
        self.0.borrow_mut().push(code.to_string());
        Ok(())
    }
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn typed(s: &str) -> Vec<Event> {
    s.chars().map(|c| key(KeyCode::Char(c))).collect()
}

fn apply(app: &mut App, events: Vec<Event>) {
    for action in translate_events(events) {
        match action {
            Action::Text(text) => app.enter_text(&text),
            Action::Backspace => app.backspace(),
            Action::FocusNext => app.focus_next(),
            Action::FocusPrev => app.focus_prev(),
            Action::Submit => app.press_submit(),
            Action::Quit => app.request_quit(),
        }
    }
}

#[test]
fn typing_code_one_key_per_frame_sends_it() {
    let sent = Sent::default();
    let mut app = App::new(UiOptions::default(), Box::new(sent.clone()));
    for c in "314159".chars() {
        apply(&mut app, typed(&c.to_string()));
    }
    assert_eq!(*sent.0.borrow(), vec!["314159"]);
    assert_eq!(app.status(), &Status::Sent("314159".parse().unwrap()));
}

#[test]
fn correcting_a_digit_with_backspace() {
    let sent = Sent::default();
    let mut app = App::new(UiOptions::default(), Box::new(sent.clone()));
    apply(&mut app, typed("129"));
    apply(&mut app, vec![key(KeyCode::Backspace), key(KeyCode::Backspace)]);
    assert_eq!(app.controller().focused(), SlotIndex::new(1));
    apply(&mut app, typed("3"));
    apply(&mut app, typed("456"));
    assert!(sent.0.borrow().is_empty(), "slot 5 still empty");
    apply(&mut app, typed("7"));
    assert_eq!(*sent.0.borrow(), vec!["134567"]);
}

#[test]
fn bracketed_paste_mid_entry_replaces_everything() {
    let sent = Sent::default();
    let mut app = App::new(UiOptions::default(), Box::new(sent.clone()));
    apply(&mut app, typed("9"));
    apply(&mut app, typed("9"));
    apply(&mut app, vec![Event::Paste("Code: 246 810".into())]);
    assert_eq!(*sent.0.borrow(), vec!["246810"]);
    assert_eq!(app.controller().focused(), None);
}

#[test]
fn enter_resends_once_complete() {
    let sent = Sent::default();
    let mut app = App::new(UiOptions::default(), Box::new(sent.clone()));
    apply(&mut app, vec![key(KeyCode::Enter)]);
    assert!(sent.0.borrow().is_empty());
    apply(&mut app, typed("555555"));
    apply(&mut app, vec![key(KeyCode::Enter)]);
    assert_eq!(*sent.0.borrow(), vec!["555555", "555555"]);
}

#[test]
fn escape_quits() {
    let mut app = App::new(UiOptions::default(), Box::new(Sent::default()));
    apply(&mut app, vec![key(KeyCode::Esc)]);
    assert!(app.should_quit());
}
