//! TUI rendering for the SMS code entry screen using ratatui.
//!
//! ```text
//! SMS
//! Enter the code we sent you by SMS
//!
//! ╭───╮ ╭───╮ ╭───╮ ╭───╮ ╭───╮ ╭───╮
//! │ 1 │ │ 2 │ │ · │ │ · │ │ · │ │ · │
//! ╰───╯ ╰───╯ ╰───╯ ╰───╯ ╰───╯ ╰───╯
//!
//! ╭─────────────────────────────────╮
//! │              Send               │
//! ╰─────────────────────────────────╯
//! 0-9 digits  Left/Right move  Enter send  Esc quit
//! ```

mod input;
mod theme;

pub use input::{Action, InputPump, handle_events, translate_events};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use smscode_engine::{App, CODE_LENGTH, SlotIndex, Status};

pub const TITLE: &str = "SMS";
pub const PROMPT: &str = "Enter the code we sent you by SMS";
pub const BUTTON_LABEL: &str = "Send";

/// Outer width of one slot box, borders included.
pub const SLOT_WIDTH: u16 = 5;
pub const SLOT_GAP: u16 = 1;
/// Width of the slot row; the button matches it.
pub const ROW_WIDTH: u16 = SLOT_WIDTH * CODE_LENGTH as u16 + SLOT_GAP * (CODE_LENGTH as u16 - 1);

const BOX_HEIGHT: u16 = 3;
const MARGIN: u16 = 1;

/// Rows used by the screen including its margin; the inline viewport is sized to fit.
pub const SCREEN_HEIGHT: u16 = 1 + 1 + 1 + BOX_HEIGHT + 1 + BOX_HEIGHT + 1 + 2 * MARGIN;
pub const INLINE_VIEWPORT_HEIGHT: u16 = SCREEN_HEIGHT;

struct ScreenAreas {
    title: Rect,
    prompt: Rect,
    slots: Rect,
    button: Rect,
    status: Rect,
}

fn layout(area: Rect) -> ScreenAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(MARGIN)
        .constraints([
            Constraint::Length(1),          // Title
            Constraint::Length(1),          // Prompt
            Constraint::Length(1),          // Spacer
            Constraint::Length(BOX_HEIGHT), // Slots
            Constraint::Length(1),          // Spacer
            Constraint::Length(BOX_HEIGHT), // Button
            Constraint::Length(1),          // Status
            Constraint::Min(0),
        ])
        .split(area);

    ScreenAreas {
        title: chunks[0],
        prompt: chunks[1],
        slots: chunks[3],
        button: chunks[5],
        status: chunks[6],
    }
}

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);

    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let areas = layout(frame.area());

    frame.render_widget(
        Paragraph::new(TITLE).style(styles::title(&palette)),
        areas.title,
    );
    frame.render_widget(
        Paragraph::new(PROMPT).style(Style::default().fg(palette.text_primary)),
        areas.prompt,
    );
    frame.render_widget(
        Paragraph::new(slot_lines(app, &palette, &glyphs)),
        areas.slots,
    );
    frame.render_widget(
        Paragraph::new(button_lines(app.submit_enabled(), &palette, &glyphs)),
        areas.button,
    );
    frame.render_widget(
        Paragraph::new(status_line(app.status(), &palette, &glyphs)),
        areas.status,
    );

    if let Some(index) = app.controller().focused() {
        let cursor = slot_cursor(areas.slots, index);
        if areas.slots.contains(cursor) {
            frame.set_cursor_position(cursor);
        }
    }
}

/// Terminal cell at the center of slot `index` within the slot row.
#[must_use]
pub fn slot_cursor(slots: Rect, index: SlotIndex) -> Position {
    let offset = index.get() as u16 * (SLOT_WIDTH + SLOT_GAP);
    Position::new(slots.x + offset + SLOT_WIDTH / 2, slots.y + 1)
}

fn slot_lines(app: &App, palette: &Palette, glyphs: &Glyphs) -> Vec<Line<'static>> {
    let focused = app.controller().focused();
    let inner = glyphs.horizontal.repeat(usize::from(SLOT_WIDTH - 2));
    let gap = " ".repeat(usize::from(SLOT_GAP));

    let mut top = Vec::new();
    let mut middle = Vec::new();
    let mut bottom = Vec::new();

    for slot in app.controller().slots() {
        if slot.index() != SlotIndex::FIRST {
            top.push(Span::raw(gap.clone()));
            middle.push(Span::raw(gap.clone()));
            bottom.push(Span::raw(gap.clone()));
        }

        let border = styles::slot_border(palette, focused == Some(slot.index()));
        top.push(Span::styled(
            format!("{}{inner}{}", glyphs.top_left, glyphs.top_right),
            border,
        ));
        bottom.push(Span::styled(
            format!("{}{inner}{}", glyphs.bottom_left, glyphs.bottom_right),
            border,
        ));

        let content = match slot.value() {
            Some(digit) => Span::styled(
                format!(" {digit} "),
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(
                format!(" {} ", glyphs.empty_slot),
                Style::default().fg(palette.text_muted),
            ),
        };
        middle.push(Span::styled(glyphs.vertical, border));
        middle.push(content);
        middle.push(Span::styled(glyphs.vertical, border));
    }

    vec![Line::from(top), Line::from(middle), Line::from(bottom)]
}

fn button_lines(enabled: bool, palette: &Palette, glyphs: &Glyphs) -> Vec<Line<'static>> {
    let style = styles::button(palette, enabled);
    let inner_width = usize::from(ROW_WIDTH - 2);
    let label_width = BUTTON_LABEL.width();
    let left = inner_width.saturating_sub(label_width) / 2;
    let right = inner_width.saturating_sub(label_width + left);
    let edge = glyphs.horizontal.repeat(inner_width);

    vec![
        Line::styled(
            format!("{}{edge}{}", glyphs.top_left, glyphs.top_right),
            style,
        ),
        Line::styled(
            format!(
                "{}{}{BUTTON_LABEL}{}{}",
                glyphs.vertical,
                " ".repeat(left),
                " ".repeat(right),
                glyphs.vertical
            ),
            style,
        ),
        Line::styled(
            format!("{}{edge}{}", glyphs.bottom_left, glyphs.bottom_right),
            style,
        ),
    ]
}

fn status_line(status: &Status, palette: &Palette, glyphs: &Glyphs) -> Line<'static> {
    match status {
        Status::Prompt => {
            let hint = styles::key_hint(palette);
            let key = styles::key_highlight(palette);
            Line::from(vec![
                Span::styled("0-9", key),
                Span::styled(" digits  ", hint),
                Span::styled("Left/Right", key),
                Span::styled(" move  ", hint),
                Span::styled("Enter", key),
                Span::styled(" send  ", hint),
                Span::styled("Esc", key),
                Span::styled(" quit", hint),
            ])
        }
        Status::Sent(code) => Line::styled(
            format!("{} Sent: {code}", glyphs.sent),
            Style::default().fg(palette.success),
        ),
        Status::Failed(err) if err.is_retryable() => Line::from(vec![
            Span::styled(
                format!("{} {err}  ", glyphs.failed),
                Style::default().fg(palette.peach),
            ),
            Span::styled("Enter", styles::key_highlight(palette)),
            Span::styled(" retry", styles::key_hint(palette)),
        ]),
        Status::Failed(err) => Line::styled(
            format!("{} {err}", glyphs.failed),
            Style::default().fg(palette.error),
        ),
    }
}
