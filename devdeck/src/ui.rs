//! Small rendering helpers shared by the pages.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;

const LABEL_WIDTH: usize = 12;

/// Bordered card with a header, the basic building block of every page.
pub fn card(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
}

/// Render a card and hand back its body area.
pub fn card_body(frame: &mut Frame<'_>, title: &str, area: Rect) -> Rect {
    let block = card(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// Two-column label/value rows: labels muted, values bold.
pub fn kv_rows<'a>(rows: impl IntoIterator<Item = (&'a str, &'a str)>) -> Paragraph<'a> {
    let lines: Vec<Line<'a>> = rows
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{label:<width$}", width = LABEL_WIDTH),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
            ])
        })
        .collect();
    Paragraph::new(lines).wrap(Wrap { trim: false })
}

/// Muted single-line message for locally handled invalid input.
pub fn muted(message: &str) -> Paragraph<'_> {
    Paragraph::new(Line::styled(
        message,
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ))
}
