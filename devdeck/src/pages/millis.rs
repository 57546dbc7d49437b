//! `/millis`: unix timestamp and date conversions, with a live clock.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;
use viewdeck::{Action, Cleanup, Component, Entity, Event, Store, TaskTracker};

use crate::field::TextField;
use crate::pages::{persist, PageCx, ISO_UTC};
use crate::ui;

const KEY_TIMESTAMP: &str = "/millis/timestamp";
const KEY_DATETIME: &str = "/millis/datetime";

/// Local ISO-8601 with the zone offset spelled out, e.g. `+02:00`.
const ISO_LOCAL: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

#[derive(Clone, Default)]
struct Now {
    unix_ms: i64,
    utc: String,
    local: String,
}

impl Now {
    fn capture() -> Self {
        let utc = Utc::now();
        Self {
            unix_ms: utc.timestamp_millis(),
            utc: utc.format(ISO_UTC).to_string(),
            local: utc.with_timezone(&Local).format(ISO_LOCAL).to_string(),
        }
    }
}

pub struct MillisPage {
    store: Store,
    now: Entity<Now>,
    focus: usize,
    timestamp: TextField,
    datetime: TextField,
    timestamp_out: Option<(String, String)>,
    datetime_out: Option<i64>,
}

pub fn mount(cx: &PageCx) -> (Box<dyn Component>, Option<Cleanup>) {
    let now = Entity::new(Now::capture());

    // The clock ticks in the background; the cleanup below stops it when
    // the route changes.
    let mut tasks = TaskTracker::new();
    tasks.track(cx.app.watch(&now));
    let ticker = now.clone();
    tasks.track(cx.app.spawn_task(move |_app| async move {
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
            let _ = ticker.update(|state| *state = Now::capture());
        }
    }));

    let mut page = MillisPage {
        store: cx.store.clone(),
        now,
        focus: 0,
        timestamp: TextField::new("Enter unix timestamp (milliseconds)")
            .with_value(cx.store.get(KEY_TIMESTAMP).unwrap_or_default()),
        datetime: TextField::new("Enter local datetime, e.g. 2026-08-06T12:30:00")
            .with_value(cx.store.get(KEY_DATETIME).unwrap_or_default()),
        timestamp_out: None,
        datetime_out: None,
    };
    page.recompute();

    let cleanup: Cleanup = Box::new(move || tasks.abort_all());
    (Box::new(page), Some(cleanup))
}

impl MillisPage {
    fn recompute(&mut self) {
        self.timestamp_out = convert_timestamp(self.timestamp.value());
        self.datetime_out = convert_datetime(self.datetime.value());
    }

    fn save(&self) {
        persist(&self.store, KEY_TIMESTAMP, self.timestamp.value());
        persist(&self.store, KEY_DATETIME, self.datetime.value());
    }

    fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            0 => &mut self.timestamp,
            _ => &mut self.datetime,
        }
    }
}

fn convert_timestamp(input: &str) -> Option<(String, String)> {
    let ms: i64 = input.trim().parse().ok()?;
    let utc: DateTime<Utc> = DateTime::from_timestamp_millis(ms)?;
    Some((
        utc.format(ISO_UTC).to_string(),
        utc.with_timezone(&Local).format(ISO_LOCAL).to_string(),
    ))
}

fn convert_datetime(input: &str) -> Option<i64> {
    let input = input.trim();
    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())?;
    let local = Local.from_local_datetime(&naive).earliest()?;
    Some(local.timestamp_millis())
}

impl Component for MillisPage {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let now = self.now.read(Now::clone).unwrap_or_default();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(7),
                Constraint::Length(6),
                Constraint::Min(0),
            ])
            .split(area);

        let body = ui::card_body(frame, "Current Time", chunks[0]);
        let unix = now.unix_ms.to_string();
        frame.render_widget(
            ui::kv_rows([
                ("Unix:", unix.as_str()),
                ("UTC:", now.utc.as_str()),
                ("Local ISO:", now.local.as_str()),
            ]),
            body,
        );

        let body = ui::card_body(frame, "Timestamp to Date", chunks[1]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(body);
        self.timestamp.render(frame, rows[0], self.focus == 0);
        match &self.timestamp_out {
            Some((utc, local)) => frame.render_widget(
                ui::kv_rows([("UTC:", utc.as_str()), ("Local ISO:", local.as_str())]),
                rows[1],
            ),
            None if !self.timestamp.value().trim().is_empty() => {
                frame.render_widget(ui::muted("Invalid timestamp"), rows[1]);
            }
            None => {}
        }

        let body = ui::card_body(frame, "Date to Timestamp", chunks[2]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(body);
        self.datetime.render(frame, rows[0], self.focus == 1);
        match self.datetime_out {
            Some(ms) => {
                let unix = ms.to_string();
                frame.render_widget(ui::kv_rows([("Unix:", unix.as_str())]), rows[1]);
            }
            None if !self.datetime.value().trim().is_empty() => {
                frame.render_widget(ui::muted("Invalid date"), rows[1]);
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
    fn millisecond_timestamps_convert_to_utc() {
        let (utc, _local) = convert_timestamp("1700000000000").unwrap();
        assert_eq!(utc, "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn invalid_timestamps_are_rejected() {
        assert_eq!(convert_timestamp("not a number"), None);
        assert_eq!(convert_timestamp(""), None);
        // Far outside chrono's representable range.
        assert_eq!(convert_timestamp("99999999999999999"), None);
    }

    #[test]
    fn local_datetimes_roundtrip_through_millis() {
        let ms = convert_datetime("2024-05-05T12:30:15.250").unwrap();
        let back = DateTime::from_timestamp_millis(ms)
            .unwrap()
            .with_timezone(&Local);
        assert_eq!(back.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(), "2024-05-05T12:30:15.250");
    }

    #[test]
    fn datetime_without_seconds_parses() {
        assert!(convert_datetime("2024-05-05T12:30").is_some());
        assert_eq!(convert_datetime("yesterday"), None);
        assert_eq!(convert_datetime(""), None);
    }
}
