//! Input handling for the code entry screen.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::debug;

use smscode_engine::{App, CODE_LENGTH};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// What a terminal event means for the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Text(String),
    Backspace,
    FocusNext,
    FocusPrev,
    Submit,
    Quit,
}

/// Reads terminal events on a blocking thread and queues them for the frame loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a reader blocked on a full channel wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    // Bounded queue: apply backpressure instead of dropping events.
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drains queued events into the app. Returns whether the app should quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut events = Vec::new();
    while events.len() < MAX_EVENTS_PER_FRAME {
        match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => events.push(ev),
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        }
    }

    for action in translate_events(events) {
        apply_action(app, action);
        if app.should_quit() {
            break;
        }
    }
    Ok(app.should_quit())
}

fn apply_action(app: &mut App, action: Action) {
    match action {
        Action::Text(text) => app.enter_text(&text),
        Action::Backspace => app.backspace(),
        Action::FocusNext => app.focus_next(),
        Action::FocusPrev => app.focus_prev(),
        Action::Submit => app.press_submit(),
        Action::Quit => app.request_quit(),
    }
}

/// Maps a frame's worth of terminal events to screen actions.
///
/// Terminals without bracketed paste deliver a paste as a burst of key
/// events. Consecutive character keys are collected; a run holding a full
/// code's worth of digits is applied as one paste, anything shorter is
/// applied key by key.
#[must_use]
pub fn translate_events(events: Vec<Event>) -> Vec<Action> {
    let mut actions = Vec::new();
    let mut burst = String::new();

    for ev in events {
        if let Some(c) = typed_char(&ev) {
            burst.push(c);
            continue;
        }
        flush_burst(&mut burst, &mut actions);

        match ev {
            Event::Key(key) => {
                if let Some(action) = key_action(key) {
                    actions.push(action);
                }
            }
            Event::Paste(text) => actions.push(Action::Text(text)),
            _ => {}
        }
    }
    flush_burst(&mut burst, &mut actions);
    actions
}

fn typed_char(ev: &Event) -> Option<char> {
    match ev {
        Event::Key(KeyEvent {
            code: KeyCode::Char(c),
            modifiers,
            kind: KeyEventKind::Press | KeyEventKind::Repeat,
            ..
        }) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => Some(*c),
        _ => None,
    }
}

fn flush_burst(burst: &mut String, actions: &mut Vec<Action>) {
    if burst.is_empty() {
        return;
    }
    let digits = burst.chars().filter(char::is_ascii_digit).count();
    if digits >= CODE_LENGTH {
        debug!(chars = burst.len(), "Key burst treated as paste");
        actions.push(Action::Text(std::mem::take(burst)));
    } else {
        actions.extend(burst.drain(..).map(|c| Action::Text(c.to_string())));
    }
}

fn key_action(key: KeyEvent) -> Option<Action> {
    if matches!(key.kind, KeyEventKind::Release) {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Right | KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::Left | KeyCode::BackTab => Some(Action::FocusPrev),
        KeyCode::Enter => Some(Action::Submit),
        _ => None,
    }
}
