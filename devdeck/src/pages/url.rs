//! `/url`: percent encoding and decoding.

use std::borrow::Cow;

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;
use viewdeck::{Action, Cleanup, Component, Event, Store};

use crate::field::TextField;
use crate::pages::{persist, PageCx};
use crate::ui;

const KEY_TEXT: &str = "/url/text";
const KEY_ENCODED: &str = "/url/encoded";

pub struct UrlPage {
    store: Store,
    focus: usize,
    plain: TextField,
    encoded: TextField,
    encoded_out: String,
    decoded_out: Option<String>,
}

pub fn mount(cx: &PageCx) -> (Box<dyn Component>, Option<Cleanup>) {
    let mut page = UrlPage {
        store: cx.store.clone(),
        focus: 0,
        plain: TextField::textarea("Type or paste text to encode")
            .with_value(cx.store.get(KEY_TEXT).unwrap_or_default()),
        encoded: TextField::textarea("Paste URL encoded text")
            .with_value(cx.store.get(KEY_ENCODED).unwrap_or_default()),
        encoded_out: String::new(),
        decoded_out: None,
    };
    page.recompute();
    (Box::new(page), None)
}

impl UrlPage {
    fn recompute(&mut self) {
        self.encoded_out = urlencoding::encode(self.plain.value()).into_owned();
        self.decoded_out = urlencoding::decode(self.encoded.value())
            .ok()
            .map(Cow::into_owned);
    }

    fn save(&self) {
        persist(&self.store, KEY_TEXT, self.plain.value());
        persist(&self.store, KEY_ENCODED, self.encoded.value());
    }

    fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            0 => &mut self.plain,
            _ => &mut self.encoded,
        }
    }
}

impl Component for UrlPage {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Min(0),
            ])
            .split(area);

        let body = ui::card_body(frame, "URL Encode", chunks[0]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(body);
        self.plain.render(frame, rows[0], self.focus == 0);
        frame.render_widget(
            ui::kv_rows([("Encoded:", self.encoded_out.as_str())]),
            rows[1],
        );

        let body = ui::card_body(frame, "URL Decode", chunks[1]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(body);
        self.encoded.render(frame, rows[0], self.focus == 1);
        match &self.decoded_out {
            Some(text) => {
                frame.render_widget(ui::kv_rows([("Decoded:", text.as_str())]), rows[1]);
            }
            None => frame.render_widget(ui::muted("Invalid URL encoded text"), rows[1]),
        }
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
    fn encodes_reserved_characters() {
        assert_eq!(
            urlencoding::encode("a b&c=d?e").into_owned(),
            "a%20b%26c%3Dd%3Fe"
        );
    }

    #[test]
    fn decodes_percent_sequences() {
        assert_eq!(
            urlencoding::decode("caf%C3%A9%20au%20lait").unwrap(),
            "café au lait"
        );
    }

    #[test]
    fn non_utf8_escapes_fail_to_decode() {
        assert!(urlencoding::decode("%FF").is_err());
        assert!(urlencoding::decode("%C3%28").is_err());
    }
}
