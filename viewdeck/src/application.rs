//! Application shell: terminal bring-up, the render/event loop and
//! background task plumbing.

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event as CrosstermEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::component::{Action, Component, Event};
use crate::state::Entity;
use crate::task::TaskHandle;

/// Handle to global application services, cheap to clone into tasks.
#[derive(Clone)]
pub struct AppContext {
    re_render_tx: mpsc::UnboundedSender<()>,
}

impl AppContext {
    /// Request a redraw on the next loop turn.
    pub fn refresh(&self) {
        let _ = self.re_render_tx.send(());
    }

    /// Spawn a background task. Abort the returned handle to cancel it.
    pub fn spawn_task<F, Fut>(&self, f: F) -> TaskHandle
    where
        F: FnOnce(AppContext) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let cx = self.clone();
        let join = tokio::spawn(async move { f(cx).await });
        TaskHandle::new(join.abort_handle())
    }

    /// Redraw whenever `entity` changes. Abort the returned handle to stop
    /// watching.
    pub fn watch<T: Send + Sync + 'static>(&self, entity: &Entity<T>) -> TaskHandle {
        let mut rx = entity.subscribe();
        self.spawn_task(move |app| async move {
            while rx.changed().await.is_ok() {
                app.refresh();
            }
        })
    }
}

/// Main application handle.
pub struct Application;

impl Application {
    pub fn new() -> Self {
        Self
    }

    /// Bring up the terminal, build the root component with `setup`, then
    /// drive the event loop until the root returns [`Action::Quit`].
    ///
    /// All routing and view computation run synchronously inside event
    /// handling; background tasks only request redraws.
    pub fn run<C, F>(self, setup: F) -> anyhow::Result<()>
    where
        C: Component,
        F: FnOnce(&AppContext) -> anyhow::Result<C>,
    {
        let rt = Runtime::new()?;
        let (re_render_tx, re_render_rx) = mpsc::unbounded_channel();
        let cx = AppContext { re_render_tx };

        let guard = rt.enter();
        let root = setup(&cx)?;
        drop(guard);

        rt.block_on(run_loop(cx, root, re_render_rx))
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_loop<C: Component>(
    app: AppContext,
    mut root: C,
    re_render_rx: mpsc::UnboundedReceiver<()>,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    root.on_init();
    let result = event_loop(&app, &mut terminal, &mut root, re_render_rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop<C: Component>(
    app: &AppContext,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    root: &mut C,
    mut re_render_rx: mpsc::UnboundedReceiver<()>,
) -> anyhow::Result<()> {
    // Initial render.
    app.refresh();

    loop {
        tokio::select! {
            _ = re_render_rx.recv() => {
                terminal.draw(|frame| {
                    let area = frame.area();
                    root.render(frame, area);
                })?;
            }
            ready = async { event::poll(Duration::from_millis(100)) } => {
                if let Ok(true) = ready {
                    let Some(event) = translate(event::read()?) else { continue };
                    let action = root.handle_event(event);
                    app.refresh();

                    if let Some(Action::Quit) = action {
                        root.on_shutdown();
                        return Ok(());
                    }
                }
            }
        }
    }
}

fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        CrosstermEvent::Paste(text) => Some(Event::Paste(text)),
        _ => None,
    }
}
