//! The view contract between the application shell and whatever it renders.

use ratatui::layout::Rect;
use ratatui::Frame;

/// Terminal event delivered to components.
#[derive(Debug, Clone)]
pub enum Event {
    Key(crossterm::event::KeyEvent),
    Resize(u16, u16),
    Paste(String),
}

/// Action a component can return after handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Navigate to the given fragment, e.g. `/json`.
    Navigate(String),
    Quit,
}

/// A renderable view. Mounting is synchronous: once the constructor returns,
/// the component must be ready to render.
pub trait Component: Send + Sync + 'static {
    /// Called once after the terminal is up, before the first render.
    fn on_init(&mut self) {}

    /// Called when the application is about to shut down.
    fn on_shutdown(&mut self) {}

    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect);

    /// Handle an event, returning an optional action.
    fn handle_event(&mut self, event: Event) -> Option<Action> {
        let _ = event;
        None
    }
}
