//! `/uuid`: a fresh v4 UUID per mount.

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;
use uuid::Uuid;
use viewdeck::{Action, Cleanup, Component, Event};

use crate::pages::PageCx;
use crate::ui;

pub struct UuidPage {
    value: String,
}

pub fn mount(_cx: &PageCx) -> (Box<dyn Component>, Option<Cleanup>) {
    let page = UuidPage {
        value: Uuid::new_v4().to_string(),
    };
    (Box::new(page), None)
}

impl Component for UuidPage {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let body = ui::card_body(frame, "Generate UUID v4", area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
            .split(body);
        frame.render_widget(ui::kv_rows([("UUID:", self.value.as_str())]), rows[0]);
        frame.render_widget(ui::muted("Enter generates a new one"), rows[1]);
    }

    fn handle_event(&mut self, event: Event) -> Option<Action> {
        if let Event::Key(key) = event {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char('g')) {
                // Regeneration is a plain remount through the router.
                return Some(Action::Navigate("/uuid".to_string()));
            }
        }
        None
    }
}
