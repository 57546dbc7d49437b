//! `/diff`: unified diff of two texts.

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use similar::TextDiff;
use viewdeck::{Action, Cleanup, Component, Event, Store};

use crate::field::TextField;
use crate::pages::{persist, PageCx};
use crate::ui;

const KEY_ORIGINAL: &str = "/diff/text1";
const KEY_MODIFIED: &str = "/diff/text2";

pub struct DiffPage {
    store: Store,
    focus: usize,
    original: TextField,
    modified: TextField,
    diff: String,
}

pub fn mount(cx: &PageCx) -> (Box<dyn Component>, Option<Cleanup>) {
    let mut page = DiffPage {
        store: cx.store.clone(),
        focus: 0,
        original: TextField::textarea("First text")
            .with_value(cx.store.get(KEY_ORIGINAL).unwrap_or_default()),
        modified: TextField::textarea("Second text")
            .with_value(cx.store.get(KEY_MODIFIED).unwrap_or_default()),
        diff: String::new(),
    };
    page.recompute();
    (Box::new(page), None)
}

impl DiffPage {
    fn recompute(&mut self) {
        self.diff = unified(self.original.value(), self.modified.value());
    }

    fn save(&self) {
        persist(&self.store, KEY_ORIGINAL, self.original.value());
        persist(&self.store, KEY_MODIFIED, self.modified.value());
    }

    fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            0 => &mut self.original,
            _ => &mut self.modified,
        }
    }
}

fn unified(original: &str, modified: &str) -> String {
    TextDiff::from_lines(original, modified)
        .unified_diff()
        .header("Original", "Modified")
        .to_string()
}

fn line_style(line: &str) -> Style {
    if line.starts_with('+') {
        Style::default().fg(Color::Green)
    } else if line.starts_with('-') {
        Style::default().fg(Color::Red)
    } else if line.starts_with('@') {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default()
    }
}

impl Component for DiffPage {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let body = ui::card_body(frame, "Text Diff", area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(0)])
            .split(body);

        let inputs = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);
        self.original.render(frame, inputs[0], self.focus == 0);
        self.modified.render(frame, inputs[1], self.focus == 1);

        let lines: Vec<Line<'_>> = self
            .diff
            .lines()
            .map(|line| Line::styled(line, line_style(line)))
            .collect();
        frame.render_widget(Paragraph::new(lines), rows[1]);
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
    fn changed_lines_are_marked() {
        let diff = unified("a\nb\nc\n", "a\nx\nc\n");
        assert!(diff.contains("--- Original"));
        assert!(diff.contains("+++ Modified"));
        assert!(diff.contains("-b"));
        assert!(diff.contains("+x"));
    }

    #[test]
    fn hunk_headers_carry_line_numbers() {
        let diff = unified("a\nb\n", "a\nc\n");
        assert!(diff.lines().any(|line| line.starts_with("@@")));
    }

    #[test]
    fn styling_distinguishes_additions_and_removals() {
        assert_eq!(line_style("+new"), Style::default().fg(Color::Green));
        assert_eq!(line_style("-old"), Style::default().fg(Color::Red));
        assert_eq!(line_style("@@ -1 +1 @@"), Style::default().fg(Color::Magenta));
        assert_eq!(line_style(" context"), Style::default());
    }
}
