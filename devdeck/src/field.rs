//! Editable text fields for the utility pages.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

/// A bordered input. Single-line by default; [`TextField::textarea`] accepts
/// newlines. The cursor is tracked as a char offset so editing stays correct
/// on multi-byte input.
pub struct TextField {
    value: String,
    cursor: usize,
    multiline: bool,
    placeholder: &'static str,
}

impl TextField {
    pub fn new(placeholder: &'static str) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            multiline: false,
            placeholder,
        }
    }

    pub fn textarea(placeholder: &'static str) -> Self {
        Self {
            multiline: true,
            ..Self::new(placeholder)
        }
    }

    pub fn with_value(mut self, value: String) -> Self {
        self.cursor = value.chars().count();
        self.value = value;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(index, _)| index)
            .unwrap_or(self.value.len())
    }

    /// Cursor position as (row, col) in char cells.
    fn position(&self) -> (usize, usize) {
        let mut row = 0;
        let mut col = 0;
        for c in self.value.chars().take(self.cursor) {
            if c == '\n' {
                row += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (row, col)
    }

    fn line_lengths(&self) -> Vec<usize> {
        self.value.split('\n').map(|l| l.chars().count()).collect()
    }

    fn index_at(&self, row: usize, col: usize) -> usize {
        let lengths = self.line_lengths();
        let row = row.min(lengths.len().saturating_sub(1));
        let before: usize = lengths[..row].iter().map(|l| l + 1).sum();
        before + col.min(lengths[row])
    }

    fn insert_char(&mut self, c: char) {
        let index = self.byte_index(self.cursor);
        self.value.insert(index, c);
        self.cursor += 1;
    }

    /// Insert pasted text at the cursor; single-line fields flatten
    /// newlines into spaces.
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '\r' => {}
                '\n' if !self.multiline => self.insert_char(' '),
                c => self.insert_char(c),
            }
        }
    }

    /// Apply one key press. Returns whether the content changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                self.insert_char(c);
                true
            }
            KeyCode::Enter if self.multiline => {
                self.insert_char('\n');
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let index = self.byte_index(self.cursor);
                    self.value.remove(index);
                    true
                } else {
                    false
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.char_len() {
                    let index = self.byte_index(self.cursor);
                    self.value.remove(index);
                    true
                } else {
                    false
                }
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                false
            }
            KeyCode::Home => {
                let (row, _) = self.position();
                self.cursor = self.index_at(row, 0);
                false
            }
            KeyCode::End => {
                let (row, _) = self.position();
                self.cursor = self.index_at(row, usize::MAX);
                false
            }
            KeyCode::Up if self.multiline => {
                let (row, col) = self.position();
                if row > 0 {
                    self.cursor = self.index_at(row - 1, col);
                }
                false
            }
            KeyCode::Down if self.multiline => {
                let (row, col) = self.position();
                self.cursor = self.index_at(row + 1, col);
                false
            }
            _ => false,
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, focused: bool) {
        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(area);

        let (row, col) = self.position();
        let height = inner.height.max(1) as usize;
        let width = inner.width.max(1) as usize;
        let scroll_y = row.saturating_sub(height - 1);
        let scroll_x = col.saturating_sub(width - 1);

        let contents = if self.value.is_empty() {
            Text::from(Line::styled(
                self.placeholder,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            Text::raw(self.value.as_str())
        };
        let paragraph = Paragraph::new(contents)
            .block(block)
            .scroll((scroll_y as u16, scroll_x as u16));
        frame.render_widget(paragraph, area);

        if focused {
            frame.set_cursor_position((
                inner.x + (col - scroll_x) as u16,
                inner.y + (row - scroll_y) as u16,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(field: &mut TextField, code: KeyCode) -> bool {
        field.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(field: &mut TextField, text: &str) {
        for c in text.chars() {
            press(field, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_and_editing() {
        let mut field = TextField::new("");
        type_str(&mut field, "hallo");
        press(&mut field, KeyCode::Left);
        press(&mut field, KeyCode::Left);
        press(&mut field, KeyCode::Left);
        assert!(press(&mut field, KeyCode::Backspace));
        press(&mut field, KeyCode::Char('e'));
        assert_eq!(field.value(), "hello");
    }

    #[test]
    fn multibyte_editing_stays_on_char_boundaries() {
        let mut field = TextField::new("").with_value("héllo".to_string());
        press(&mut field, KeyCode::Home);
        press(&mut field, KeyCode::Right);
        press(&mut field, KeyCode::Right);
        assert!(press(&mut field, KeyCode::Backspace));
        assert_eq!(field.value(), "hllo");
    }

    #[test]
    fn enter_only_breaks_lines_in_textareas() {
        let mut single = TextField::new("");
        type_str(&mut single, "ab");
        assert!(!press(&mut single, KeyCode::Enter));
        assert_eq!(single.value(), "ab");

        let mut multi = TextField::textarea("");
        type_str(&mut multi, "ab");
        press(&mut multi, KeyCode::Enter);
        type_str(&mut multi, "cd");
        assert_eq!(multi.value(), "ab\ncd");
    }

    #[test]
    fn vertical_movement_clamps_to_line_length() {
        let mut field = TextField::textarea("").with_value("long line\nab".to_string());
        // Cursor starts at the end of "ab"; moving up lands within line one.
        press(&mut field, KeyCode::Up);
        press(&mut field, KeyCode::End);
        press(&mut field, KeyCode::Down);
        press(&mut field, KeyCode::Char('!'));
        assert_eq!(field.value(), "long line\nab!");
    }

    #[test]
    fn paste_flattens_newlines_in_single_line_fields() {
        let mut field = TextField::new("");
        field.insert_str("a\r\nb");
        assert_eq!(field.value(), "a b");

        let mut area = TextField::textarea("");
        area.insert_str("a\r\nb");
        assert_eq!(area.value(), "a\nb");
    }
}
