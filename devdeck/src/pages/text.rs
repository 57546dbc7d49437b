//! `/text`: statistics over one block of text.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;
use viewdeck::{Action, Cleanup, Component, Event, Store};

use crate::field::TextField;
use crate::pages::{persist, PageCx};
use crate::ui;

const KEY_INPUT: &str = "/text/input";

#[derive(Debug, Default, PartialEq, Eq)]
struct Stats {
    bytes: usize,
    symbols: usize,
    words: usize,
    lines: usize,
}

pub struct TextPage {
    store: Store,
    input: TextField,
    stats: Stats,
}

pub fn mount(cx: &PageCx) -> (Box<dyn Component>, Option<Cleanup>) {
    let mut page = TextPage {
        store: cx.store.clone(),
        input: TextField::textarea("Type or paste text to analyze")
            .with_value(cx.store.get(KEY_INPUT).unwrap_or_default()),
        stats: Stats::default(),
    };
    page.recompute();
    (Box::new(page), None)
}

impl TextPage {
    fn recompute(&mut self) {
        self.stats = stats(self.input.value());
    }
}

fn stats(text: &str) -> Stats {
    let trimmed = text.trim();
    Stats {
        bytes: text.len(),
        symbols: text.chars().count(),
        words: if trimmed.is_empty() {
            0
        } else {
            trimmed.split_whitespace().count()
        },
        lines: if trimmed.is_empty() {
            0
        } else {
            trimmed.split('\n').count()
        },
    }
}

impl Component for TextPage {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let body = ui::card_body(frame, "Text Statistics", area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(0)])
            .split(body);

        self.input.render(frame, rows[0], true);

        let bytes = self.stats.bytes.to_string();
        let symbols = self.stats.symbols.to_string();
        let words = self.stats.words.to_string();
        let lines = self.stats.lines.to_string();
        frame.render_widget(
            ui::kv_rows([
                ("Bytes:", bytes.as_str()),
                ("Symbols:", symbols.as_str()),
                ("Words:", words.as_str()),
                ("Lines:", lines.as_str()),
            ]),
            rows[1],
        );
    }

    fn handle_event(&mut self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) => {
                if self.input.handle_key(key) {
                    persist(&self.store, KEY_INPUT, self.input.value());
                    self.recompute();
                }
                None
            }
            Event::Paste(text) => {
                self.input.insert_str(&text);
                persist(&self.store, KEY_INPUT, self.input.value());
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
    fn counts_bytes_symbols_words_and_lines() {
        assert_eq!(
            stats("héllo wörld\nsecond  line"),
            Stats {
                bytes: 26,
                symbols: 24,
                words: 4,
                lines: 2,
            }
        );
    }

    #[test]
    fn whitespace_only_has_no_words_or_lines() {
        let s = stats("   \n  ");
        assert_eq!(s.bytes, 6);
        assert_eq!(s.symbols, 6);
        assert_eq!(s.words, 0);
        assert_eq!(s.lines, 0);
    }
}
