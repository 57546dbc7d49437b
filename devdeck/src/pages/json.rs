//! `/json`: pretty-printing and unescaping of JSON.

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use serde_json::Value;
use viewdeck::{Action, Cleanup, Component, Event, Store};

use crate::field::TextField;
use crate::pages::{persist, PageCx};
use crate::ui;

const KEY_JSON: &str = "/json/jsoninput";
const KEY_ESCAPED: &str = "/json/escapedinput";

pub struct JsonPage {
    store: Store,
    focus: usize,
    json: TextField,
    escaped: TextField,
    formatted: Option<String>,
    unescaped: Option<String>,
}

pub fn mount(cx: &PageCx) -> (Box<dyn Component>, Option<Cleanup>) {
    let mut page = JsonPage {
        store: cx.store.clone(),
        focus: 0,
        json: TextField::textarea("Paste JSON to format")
            .with_value(cx.store.get(KEY_JSON).unwrap_or_default()),
        escaped: TextField::textarea("Paste escaped JSON string (e.g. with \\\")")
            .with_value(cx.store.get(KEY_ESCAPED).unwrap_or_default()),
        formatted: None,
        unescaped: None,
    };
    page.recompute();
    (Box::new(page), None)
}

impl JsonPage {
    fn recompute(&mut self) {
        self.formatted = format(self.json.value());
        self.unescaped = unescape(self.escaped.value());
    }

    fn save(&self) {
        persist(&self.store, KEY_JSON, self.json.value());
        persist(&self.store, KEY_ESCAPED, self.escaped.value());
    }

    fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            0 => &mut self.json,
            _ => &mut self.escaped,
        }
    }
}

fn format(input: &str) -> Option<String> {
    let value: Value = serde_json::from_str(input.trim()).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

/// Unescape one level; if the input is a JSON string that itself contains
/// JSON, unwrap that too, otherwise keep the string.
fn unescape(input: &str) -> Option<String> {
    let value: Value = serde_json::from_str(input.trim()).ok()?;
    let value = match value {
        Value::String(inner) => {
            serde_json::from_str(&inner).unwrap_or(Value::String(inner))
        }
        other => other,
    };
    serde_json::to_string_pretty(&value).ok()
}

impl Component for JsonPage {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let body = ui::card_body(frame, "Format JSON", chunks[0]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(body);
        self.json.render(frame, rows[0], self.focus == 0);
        if let Some(text) = &self.formatted {
            frame.render_widget(Paragraph::new(text.as_str()), rows[1]);
        }

        let body = ui::card_body(frame, "Unescape JSON String", chunks[1]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(body);
        self.escaped.render(frame, rows[0], self.focus == 1);
        if let Some(text) = &self.unescaped {
            frame.render_widget(Paragraph::new(text.as_str()), rows[1]);
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
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn formats_with_two_space_indent() {
        assert_eq!(
            format(r#"{"a":[1,2]}"#).unwrap(),
            "{\n  \"a\": [\n    1,\n    2\n  ]\n}"
        );
    }

    #[test]
    fn malformed_json_formats_to_nothing() {
        assert_eq!(format("{nope"), None);
        assert_eq!(format(""), None);
    }

    #[test]
    fn unescapes_a_json_string_containing_json() {
        assert_eq!(
            unescape(r#""{\"a\":1}""#).unwrap(),
            "{\n  \"a\": 1\n}"
        );
    }

    #[test]
    fn plain_strings_stay_strings() {
        assert_eq!(unescape(r#""just text""#).unwrap(), "\"just text\"");
    }

    #[test]
    fn objects_pass_straight_through() {
        assert_eq!(unescape(r#"{"a":1}"#).unwrap(), "{\n  \"a\": 1\n}");
    }
}
