//! Root component: navigation bar, router and the shared view slot.

use std::sync::{Arc, Mutex};

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use viewdeck::{Action, AppContext, Cleanup, Component, Event, Route, Router, Store};

use crate::analytics::PageViews;
use crate::pages::{self, PageCx};

/// The shared container every route mounts its page into.
type Slot = Arc<Mutex<Option<Box<dyn Component>>>>;

type Mount = fn(&PageCx) -> (Box<dyn Component>, Option<Cleanup>);

/// Route table in declaration order; the first entry is the fallback.
const ROUTES: &[(&str, Mount)] = &[
    ("/base64", pages::base64::mount),
    ("/calc", pages::calc::mount),
    ("/diff", pages::diff::mount),
    ("/hmac", pages::hmac::mount),
    ("/json", pages::json::mount),
    ("/jwt", pages::jwt::mount),
    ("/millis", pages::millis::mount),
    ("/objectid", pages::objectid::mount),
    ("/text", pages::text::mount),
    ("/url", pages::url::mount),
    ("/uuid", pages::uuid::mount),
];

pub struct Root {
    router: Router,
    slot: Slot,
    store: Store,
    /// Location analog: the fragment of the last navigation event, kept only
    /// so reload can re-trigger it verbatim.
    fragment: Option<String>,
    initial: Option<String>,
    nav_focused: bool,
    nav_selected: usize,
}

impl Root {
    pub fn new(store: Store, initial: Option<String>, cx: &AppContext) -> anyhow::Result<Self> {
        let slot: Slot = Arc::new(Mutex::new(None));
        let page_cx = PageCx {
            store: store.clone(),
            app: cx.clone(),
        };

        let routes = ROUTES
            .iter()
            .map(|(path, mount)| {
                let slot = Arc::clone(&slot);
                let page_cx = page_cx.clone();
                let mount = *mount;
                Route::new(*path, move || {
                    let (page, cleanup) = mount(&page_cx);
                    *slot.lock().expect("view slot poisoned") = Some(page);
                    cleanup
                })
            })
            .collect();

        Ok(Self {
            router: Router::new(routes)?.with_analytics(PageViews),
            slot,
            store,
            fragment: None,
            initial,
            nav_focused: false,
            nav_selected: 0,
        })
    }

    /// Single entry point for both navigation event classes: the initial
    /// load and every later fragment change.
    fn handle_fragment(&mut self, fragment: Option<String>) {
        let resolved = self.router.handle_route(fragment.as_deref()).to_string();
        self.fragment = fragment;
        self.nav_selected = ROUTES
            .iter()
            .position(|(path, _)| *path == resolved)
            .unwrap_or(0);
    }

    fn navigate(&mut self, fragment: String) {
        self.handle_fragment(Some(fragment));
        self.nav_focused = false;
    }

    fn step_route(&mut self, delta: isize) {
        let len = ROUTES.len() as isize;
        let next = (self.nav_selected as isize + delta).rem_euclid(len) as usize;
        self.navigate(ROUTES[next].0.to_string());
    }

    fn reload(&mut self) {
        let fragment = self.fragment.clone();
        self.handle_fragment(fragment);
    }

    /// Drop every stored field of the active route, then remount it fresh.
    fn clear_page_state(&mut self) {
        let prefix = self
            .router
            .active_path()
            .unwrap_or(ROUTES[0].0)
            .to_string();
        if let Err(error) = self.store.clear_prefix(&prefix) {
            tracing::warn!(%error, prefix, "failed to clear stored fields");
        }
        self.reload();
    }

    fn render_nav(&self, frame: &mut Frame<'_>, area: Rect) {
        let active = self.router.active_path();
        let mut spans = vec![Span::raw(" ")];
        for (index, route) in self.router.routes().enumerate() {
            if index > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            }
            let mut style = Style::default().fg(Color::DarkGray);
            if Some(route.path()) == active {
                style = Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            if self.nav_focused && index == self.nav_selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(route.label().to_string(), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn forward(&mut self, event: Event) -> Option<Action> {
        // The slot lock must be released before any navigation it triggers,
        // since mounting writes the slot again.
        let action = {
            let mut slot = self.slot.lock().expect("view slot poisoned");
            slot.as_mut().and_then(|page| page.handle_event(event))
        };
        match action {
            Some(Action::Navigate(fragment)) => {
                self.navigate(fragment);
                None
            }
            other => other,
        }
    }
}

impl Component for Root {
    fn on_init(&mut self) {
        // Initial-load event, with the --open deep link as the fragment.
        let initial = self.initial.take();
        self.handle_fragment(initial);
    }

    fn on_shutdown(&mut self) {
        self.router.teardown();
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_nav(frame, chunks[0]);

        if let Some(page) = self.slot.lock().expect("view slot poisoned").as_mut() {
            page.render(frame, chunks[1]);
        }

        let footer = Paragraph::new(
            " Esc nav │ Tab field │ ^N/^P switch │ ^R reload │ ^X clear saved │ ^Q quit ",
        )
        .style(Style::default().fg(Color::Black).bg(if self.nav_focused {
            Color::Cyan
        } else {
            Color::DarkGray
        }));
        frame.render_widget(footer, chunks[2]);
    }

    fn handle_event(&mut self, event: Event) -> Option<Action> {
        let key = match &event {
            Event::Key(key) => *key,
            _ => return self.forward(event),
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('c') => return Some(Action::Quit),
                KeyCode::Char('n') => {
                    self.step_route(1);
                    return None;
                }
                KeyCode::Char('p') => {
                    self.step_route(-1);
                    return None;
                }
                KeyCode::Char('r') => {
                    self.reload();
                    return None;
                }
                KeyCode::Char('x') => {
                    self.clear_page_state();
                    return None;
                }
                _ => {}
            }
        }

        if key.code == KeyCode::Esc {
            self.nav_focused = !self.nav_focused;
            return None;
        }

        if self.nav_focused {
            let len = ROUTES.len();
            match key.code {
                KeyCode::Left | KeyCode::Char('h') => {
                    self.nav_selected = (self.nav_selected + len - 1) % len;
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.nav_selected = (self.nav_selected + 1) % len;
                }
                KeyCode::Enter => {
                    let target = ROUTES[self.nav_selected].0.to_string();
                    self.navigate(target);
                }
                _ => {}
            }
            return None;
        }

        self.forward(event)
    }
}
