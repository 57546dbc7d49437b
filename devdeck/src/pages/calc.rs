//! `/calc`: a small arithmetic evaluator over f64.
//!
//! Supports `+ - * / %`, exponentiation as `^` or `**` (right-associative),
//! unary minus and parentheses.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;
use viewdeck::{Action, Cleanup, Component, Event, Store};

use crate::field::TextField;
use crate::pages::{persist, PageCx};
use crate::ui;

const KEY_INPUT: &str = "/calc/input";

pub struct CalcPage {
    store: Store,
    input: TextField,
    result: Option<String>,
}

pub fn mount(cx: &PageCx) -> (Box<dyn Component>, Option<Cleanup>) {
    let mut page = CalcPage {
        store: cx.store.clone(),
        input: TextField::new("Enter an expression, e.g. (2 + 3) * 4 ^ 2")
            .with_value(cx.store.get(KEY_INPUT).unwrap_or_default()),
        result: None,
    };
    page.recompute();
    (Box::new(page), None)
}

impl CalcPage {
    fn recompute(&mut self) {
        self.result = eval(self.input.value().trim()).map(format_number);
    }
}

fn eval(input: &str) -> Option<f64> {
    let mut parser = Parser {
        src: input.as_bytes(),
        pos: 0,
    };
    let value = parser.expression()?;
    parser.skip_whitespace();
    parser.at_end().then_some(value)
}

/// Integral results print without a fraction, everything else with the
/// shortest round-trip representation.
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expression(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            if self.eat(b'+') {
                value += self.term()?;
            } else if self.eat(b'-') {
                value -= self.term()?;
            } else {
                return Some(value);
            }
        }
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.power()?;
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b'*') && self.src.get(self.pos + 1) != Some(&b'*') {
                self.pos += 1;
                value *= self.power()?;
            } else if self.eat(b'/') {
                value /= self.power()?;
            } else if self.eat(b'%') {
                value %= self.power()?;
            } else {
                return Some(value);
            }
        }
    }

    // Right-associative, so the exponent recurses into power() again.
    fn power(&mut self) -> Option<f64> {
        let base = self.unary()?;
        self.skip_whitespace();
        if self.eat(b'^') {
            return Some(base.powf(self.power()?));
        }
        if self.peek() == Some(b'*') && self.src.get(self.pos + 1) == Some(&b'*') {
            self.pos += 2;
            return Some(base.powf(self.power()?));
        }
        Some(base)
    }

    fn unary(&mut self) -> Option<f64> {
        self.skip_whitespace();
        if self.eat(b'-') {
            return Some(-self.unary()?);
        }
        if self.eat(b'+') {
            return self.unary();
        }
        self.atom()
    }

    fn atom(&mut self) -> Option<f64> {
        self.skip_whitespace();
        if self.eat(b'(') {
            let value = self.expression()?;
            self.skip_whitespace();
            return self.eat(b')').then_some(value);
        }
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9' | b'.')) {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        std::str::from_utf8(&self.src[start..self.pos])
            .ok()?
            .parse()
            .ok()
    }
}

impl Component for CalcPage {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let body = ui::card_body(frame, "Calculator", area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(body);

        self.input.render(frame, rows[0], true);
        match &self.result {
            Some(result) => {
                frame.render_widget(ui::kv_rows([("Result:", result.as_str())]), rows[1]);
            }
            None if !self.input.value().trim().is_empty() => {
                frame.render_widget(ui::muted("Invalid expression"), rows[1]);
            }
            None => {}
        }
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
    fn respects_precedence() {
        assert_eq!(eval("2+3*4"), Some(14.0));
        assert_eq!(eval("(2+3)*4"), Some(20.0));
        assert_eq!(eval("10 % 3 + 1"), Some(2.0));
    }

    #[test]
    fn exponentiation_is_right_associative() {
        assert_eq!(eval("2^3^2"), Some(512.0));
        assert_eq!(eval("2**10"), Some(1024.0));
        assert_eq!(eval("2 ^ 0.5"), Some(2f64.powf(0.5)));
    }

    #[test]
    fn unary_signs() {
        assert_eq!(eval("-3+5"), Some(2.0));
        assert_eq!(eval("2*-3"), Some(-6.0));
        assert_eq!(eval("+4"), Some(4.0));
    }

    #[test]
    fn division_by_zero_is_infinite() {
        assert!(eval("1/0").unwrap().is_infinite());
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(eval("2+"), None);
        assert_eq!(eval("abc"), None);
        assert_eq!(eval("(1+2"), None);
        assert_eq!(eval("1 2"), None);
        assert_eq!(eval("1..2"), None);
    }

    #[test]
    fn integral_results_drop_the_fraction() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }
}
