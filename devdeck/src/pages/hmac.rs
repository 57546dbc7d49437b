//! `/hmac`: HMAC-SHA512 signatures over UTF-8 text, base64 encoded.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crossterm::event::KeyCode;
use hmac::{Hmac, Mac};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;
use sha2::Sha512;
use viewdeck::{Action, Cleanup, Component, Event, Store};

use crate::field::TextField;
use crate::pages::{persist, PageCx};
use crate::ui;

const KEY_TEXT: &str = "/hmac/text";
const KEY_SECRET: &str = "/hmac/secret";

pub struct HmacPage {
    store: Store,
    focus: usize,
    text: TextField,
    secret: TextField,
    signature: String,
}

pub fn mount(cx: &PageCx) -> (Box<dyn Component>, Option<Cleanup>) {
    let mut page = HmacPage {
        store: cx.store.clone(),
        focus: 0,
        text: TextField::textarea("Type or paste text")
            .with_value(cx.store.get(KEY_TEXT).unwrap_or_default()),
        secret: TextField::new("Enter secret key")
            .with_value(cx.store.get(KEY_SECRET).unwrap_or_default()),
        signature: String::new(),
    };
    page.recompute();
    (Box::new(page), None)
}

impl HmacPage {
    fn recompute(&mut self) {
        self.signature = sign(self.text.value(), self.secret.value());
    }

    fn save(&self) {
        persist(&self.store, KEY_TEXT, self.text.value());
        persist(&self.store, KEY_SECRET, self.secret.value());
    }

    fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            0 => &mut self.text,
            _ => &mut self.secret,
        }
    }
}

/// Blank until both inputs are present.
fn sign(text: &str, secret: &str) -> String {
    if text.is_empty() || secret.is_empty() {
        return String::new();
    }
    let mut mac =
        Hmac::<Sha512>::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(text.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

impl Component for HmacPage {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let body = ui::card_body(frame, "HMAC SHA512", area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(body);

        self.text.render(frame, rows[0], self.focus == 0);
        self.secret.render(frame, rows[1], self.focus == 1);
        frame.render_widget(
            ui::kv_rows([("Signature:", self.signature.as_str())]),
            rows[2],
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
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn signs_with_sha512_and_base64_output() {
        assert_eq!(
            sign("hello", "secret"),
            "2xWVroimL9FR7By6gbmMOd+C2q57TLmCD0RtW/AvHc/KZoPYjKs+Jz9ZY6uOxGmnRrWxkIY3Ejn2fR5fmaeUQA=="
        );
    }

    #[test]
    fn blank_without_both_inputs() {
        assert_eq!(sign("", "secret"), "");
        assert_eq!(sign("hello", ""), "");
    }
}
