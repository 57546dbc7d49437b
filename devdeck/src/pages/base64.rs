//! `/base64`: decode and encode standard-alphabet base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;
use viewdeck::{Action, Cleanup, Component, Event, Store};

use crate::field::TextField;
use crate::pages::{persist, PageCx};
use crate::ui;

const KEY_ENCODED: &str = "/base64/base64input";
const KEY_PLAIN: &str = "/base64/textinput";

pub struct Base64Page {
    store: Store,
    focus: usize,
    encoded: TextField,
    plain: TextField,
    decoded_out: Option<String>,
    encoded_out: String,
}

pub fn mount(cx: &PageCx) -> (Box<dyn Component>, Option<Cleanup>) {
    let mut page = Base64Page {
        store: cx.store.clone(),
        focus: 0,
        encoded: TextField::textarea("Paste base64 string")
            .with_value(cx.store.get(KEY_ENCODED).unwrap_or_default()),
        plain: TextField::textarea("Type or paste text")
            .with_value(cx.store.get(KEY_PLAIN).unwrap_or_default()),
        decoded_out: None,
        encoded_out: String::new(),
    };
    page.recompute();
    (Box::new(page), None)
}

impl Base64Page {
    fn recompute(&mut self) {
        self.decoded_out = decode(self.encoded.value());
        self.encoded_out = STANDARD.encode(self.plain.value());
    }

    fn save(&self) {
        persist(&self.store, KEY_ENCODED, self.encoded.value());
        persist(&self.store, KEY_PLAIN, self.plain.value());
    }

    fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            0 => &mut self.encoded,
            _ => &mut self.plain,
        }
    }
}

/// Decode trimmed base64; valid input always renders, with any non-UTF-8
/// bytes replaced.
fn decode(input: &str) -> Option<String> {
    let bytes = STANDARD.decode(input.trim()).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

impl Component for Base64Page {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Min(0),
            ])
            .split(area);

        let body = ui::card_body(frame, "Base64 to Text", chunks[0]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(body);
        self.encoded.render(frame, rows[0], self.focus == 0);
        match &self.decoded_out {
            Some(text) => frame.render_widget(ui::kv_rows([("Text:", text.as_str())]), rows[1]),
            None => frame.render_widget(ui::muted("Invalid base64 string"), rows[1]),
        }

        let body = ui::card_body(frame, "Text to Base64", chunks[1]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(body);
        self.plain.render(frame, rows[0], self.focus == 1);
        frame.render_widget(
            ui::kv_rows([("Base64:", self.encoded_out.as_str())]),
            rows[1],
        );
    }

    fn handle_event(&mut self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) => match key.code {
                KeyCode::Tab | KeyCode::BackTab => {
                    self.focus = (self.focus + 1) % 2;
                    None
                }
                _ => {
                    if self.focused_field().handle_key(key) {
                        self.save();
                        self.recompute();
                    }
                    None
                }
            },
            Event::Paste(text) => {
                self.focused_field().insert_str(&text);
                self.save();
                self.recompute();
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_trimmed_base64() {
        assert_eq!(decode("  aGVsbG8=  ").as_deref(), Some("hello"));
        assert_eq!(decode("").as_deref(), Some(""));
    }

    #[test]
    fn rejects_invalid_base64() {
        assert_eq!(decode("%%%"), None);
        assert_eq!(decode("aGVsbG8"), None);
    }

    #[test]
    fn non_utf8_payloads_render_lossily() {
        // 0xff 0xfe is valid base64 but not valid UTF-8.
        let decoded = decode("//4=").unwrap();
        assert!(decoded.contains('\u{fffd}'));
    }
}
