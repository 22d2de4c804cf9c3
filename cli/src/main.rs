//! smscode - terminal screen for entering a six-digit SMS verification code.
//!
//! Wires [`smscode_engine::App`] to the terminal: logging and config first,
//! then a [`TerminalSession`] for the screen, then the frame loop.
//!
//! Each 16ms frame drains queued key and paste events through
//! [`smscode_tui::handle_events`], redraws, and exits once the user quits.

use anyhow::Result;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{TerminalOptions, Viewport, prelude::*};
use std::{
    fs::{self, OpenOptions},
    io::{self, Stdout, Write, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use smscode_config::{SmsCodeConfig, UiMode};
use smscode_engine::{App, LoggingSubmitter};
use smscode_tui::{INLINE_VIEWPORT_HEIGHT, InputPump, draw, handle_events};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // The screen owns stdout; without a log file, events are dropped.
    tracing_subscriber::registry().with(env_filter).init();
}

const LOG_FILE_NAME: &str = "smscode.log";

/// First writable log location, plus a note for each location that failed.
fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut failures = Vec::new();
    for path in log_file_candidates() {
        match open_append(&path) {
            Ok(file) => return (Some((path, file)), failures),
            Err(e) => failures.push(format!("Cannot log to {}: {e}", path.display())),
        }
    }
    (None, failures)
}

fn open_append(path: &Path) -> io::Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// `logs/` next to the config file, then under `./.smscode`.
fn log_file_candidates() -> Vec<PathBuf> {
    SmsCodeConfig::path()
        .and_then(|config| config.parent().map(Path::to_path_buf))
        .into_iter()
        .chain([PathBuf::from(".smscode")])
        .map(|dir| dir.join("logs").join(LOG_FILE_NAME))
        .collect()
}

/// Raw mode and bracketed paste for the lifetime of the screen.
///
/// Bracketed paste makes an SMS pasted from the clipboard arrive as one
/// event. Full mode also takes the alternate screen; inline mode draws the
/// screen below the shell prompt and wipes it on exit. Dropping the session
/// restores the terminal.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    mode: UiMode,
}

impl TerminalSession {
    fn new(mode: UiMode) -> Result<Self> {
        enable_raw_mode()?;
        match Self::enter(mode) {
            Ok(terminal) => Ok(Self { terminal, mode }),
            Err(err) => {
                restore_terminal(&mut stdout(), mode);
                Err(err)
            }
        }
    }

    fn enter(mode: UiMode) -> Result<Terminal<CrosstermBackend<Stdout>>> {
        let mut out = stdout();
        execute!(out, EnableBracketedPaste)?;
        let terminal = match mode {
            UiMode::Full => {
                execute!(out, EnterAlternateScreen)?;
                Terminal::new(CrosstermBackend::new(out))?
            }
            UiMode::Inline => Terminal::with_options(
                CrosstermBackend::new(out),
                TerminalOptions {
                    viewport: Viewport::Inline(INLINE_VIEWPORT_HEIGHT),
                },
            )?,
        };
        Ok(terminal)
    }
}

/// Best effort: undoes whatever `TerminalSession::enter` managed to set up.
fn restore_terminal(out: &mut impl Write, mode: UiMode) {
    let _ = disable_raw_mode();
    if matches!(mode, UiMode::Full) {
        let _ = execute!(out, LeaveAlternateScreen);
    }
    let _ = execute!(out, DisableBracketedPaste);
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if matches!(self.mode, UiMode::Inline) {
            let _ = self.terminal.clear();
        }
        restore_terminal(self.terminal.backend_mut(), self.mode);
        let _ = self.terminal.show_cursor();
    }
}

fn resolve_ui_mode(config: Option<&SmsCodeConfig>) -> UiMode {
    config
        .and_then(SmsCodeConfig::ui_mode)
        .or_else(UiMode::from_env)
        .unwrap_or(UiMode::Full)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = SmsCodeConfig::load().ok().flatten();
    let ui_mode = resolve_ui_mode(config.as_ref());
    let options = config
        .as_ref()
        .map(SmsCodeConfig::ui_options)
        .unwrap_or_default();
    tracing::debug!(?ui_mode, ?options, "Starting code entry screen");

    let mut app = App::new(options, Box::new(LoggingSubmitter::default()));

    let result = {
        let mut session = TerminalSession::new(ui_mode)?;
        run_app(&mut session.terminal, &mut app).await
    };

    if let Err(err) = result {
        tracing::error!(error = %err, "Code entry screen exited with an error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

const FRAME_DURATION: Duration = Duration::from_millis(16);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        match handle_events(app, &mut input) {
            Ok(true) => break Ok(()),
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
