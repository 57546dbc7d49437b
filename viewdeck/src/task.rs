//! Handles for background tasks that must not outlive their view.

use tokio::task::AbortHandle;

/// A handle to a spawned task that can be aborted.
#[derive(Debug)]
pub struct TaskHandle {
    abort_handle: AbortHandle,
}

impl TaskHandle {
    pub fn new(abort_handle: AbortHandle) -> Self {
        Self { abort_handle }
    }

    /// Abort the task. It is cancelled at its next await point.
    pub fn abort(&self) {
        self.abort_handle.abort();
    }

    /// Whether the task has finished, either completed or aborted.
    pub fn is_finished(&self) -> bool {
        self.abort_handle.is_finished()
    }
}

/// A collection of task handles cancelled together, typically from a view's
/// cleanup function.
#[derive(Debug, Default)]
pub struct TaskTracker {
    handles: Vec<TaskHandle>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a task handle for later cancellation.
    pub fn track(&mut self, handle: TaskHandle) {
        self.handles.push(handle);
    }

    /// Abort every tracked task.
    pub fn abort_all(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}
