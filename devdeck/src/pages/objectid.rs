//! `/objectid`: MongoDB ObjectId and timestamp conversions. The first four
//! bytes of an ObjectId are big-endian seconds since the epoch.

use chrono::DateTime;
use crossterm::event::KeyCode;
use rand::Rng;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;
use viewdeck::{Action, Cleanup, Component, Event, Store};

use crate::field::TextField;
use crate::pages::{persist, PageCx, ISO_UTC};
use crate::ui;

const KEY_OBJECTID: &str = "/objectid/objectid";
const KEY_TIMESTAMP: &str = "/objectid/timestamp";

pub struct ObjectIdPage {
    store: Store,
    focus: usize,
    objectid: TextField,
    timestamp: TextField,
    timestamp_out: Option<(i64, String)>,
    objectid_out: Option<String>,
}

pub fn mount(cx: &PageCx) -> (Box<dyn Component>, Option<Cleanup>) {
    let mut page = ObjectIdPage {
        store: cx.store.clone(),
        focus: 0,
        objectid: TextField::new("Enter ObjectId")
            .with_value(cx.store.get(KEY_OBJECTID).unwrap_or_default()),
        timestamp: TextField::new("Enter unix timestamp (milliseconds)")
            .with_value(cx.store.get(KEY_TIMESTAMP).unwrap_or_default()),
        timestamp_out: None,
        objectid_out: None,
    };
    page.recompute();
    (Box::new(page), None)
}

impl ObjectIdPage {
    fn recompute(&mut self) {
        self.timestamp_out = objectid_to_timestamp(self.objectid.value());
        self.objectid_out = timestamp_to_objectid(self.timestamp.value());
    }

    fn save(&self) {
        persist(&self.store, KEY_OBJECTID, self.objectid.value());
        persist(&self.store, KEY_TIMESTAMP, self.timestamp.value());
    }

    fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            0 => &mut self.objectid,
            _ => &mut self.timestamp,
        }
    }
}

fn objectid_to_timestamp(input: &str) -> Option<(i64, String)> {
    let id = input.trim();
    if id.len() != 24 || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let seconds = u32::from_str_radix(&id[..8], 16).ok()?;
    let ms = i64::from(seconds) * 1000;
    let utc = DateTime::from_timestamp_millis(ms)?;
    Some((ms, utc.format(ISO_UTC).to_string()))
}

fn timestamp_to_objectid(input: &str) -> Option<String> {
    let ms: i64 = input.trim().parse().ok()?;
    if ms < 0 {
        return None;
    }
    let mut id = format!("{:08x}", ms / 1000);
    let mut rng = rand::thread_rng();
    for _ in 0..16 {
        id.push(char::from_digit(rng.gen_range(0..16), 16).expect("digit below 16"));
    }
    Some(id)
}

impl Component for ObjectIdPage {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Length(6),
                Constraint::Min(0),
            ])
            .split(area);

        let body = ui::card_body(frame, "ObjectId to Timestamp", chunks[0]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(body);
        self.objectid.render(frame, rows[0], self.focus == 0);
        match &self.timestamp_out {
            Some((ms, utc)) => {
                let unix = ms.to_string();
                frame.render_widget(
                    ui::kv_rows([("Unix:", unix.as_str()), ("UTC:", utc.as_str())]),
                    rows[1],
                );
            }
            None if !self.objectid.value().trim().is_empty() => {
                frame.render_widget(ui::muted("Invalid ObjectId"), rows[1]);
            }
            None => {}
        }

        let body = ui::card_body(frame, "Timestamp to ObjectId", chunks[1]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(body);
        self.timestamp.render(frame, rows[0], self.focus == 1);
        match &self.objectid_out {
            Some(id) => {
                frame.render_widget(ui::kv_rows([("ObjectId:", id.as_str())]), rows[1]);
            }
            None if !self.timestamp.value().trim().is_empty() => {
                frame.render_widget(ui::muted("Invalid timestamp"), rows[1]);
            }
            None => {}
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
    fn extracts_the_embedded_timestamp() {
        let (ms, utc) = objectid_to_timestamp("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(ms, 1_350_508_407_000);
        assert_eq!(utc, "2012-10-17T21:13:27.000Z");
    }

    #[test]
    fn rejects_malformed_object_ids() {
        assert_eq!(objectid_to_timestamp("507f1f77"), None);
        assert_eq!(objectid_to_timestamp("g07f1f77bcf86cd799439011"), None);
        assert_eq!(objectid_to_timestamp(""), None);
    }

    #[test]
    fn generated_ids_embed_the_seconds() {
        let id = timestamp_to_objectid("1350508407000").unwrap();
        assert_eq!(id.len(), 24);
        assert!(id.starts_with("507f1f77"));
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn negative_and_garbage_timestamps_are_rejected() {
        assert_eq!(timestamp_to_objectid("-1000"), None);
        assert_eq!(timestamp_to_objectid("soon"), None);
    }
}
