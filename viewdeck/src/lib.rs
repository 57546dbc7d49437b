//! A small terminal view framework: an application shell with a render/event
//! loop, a fragment router enforcing a single-active-view lifecycle, shared
//! reactive state, abortable background tasks and a persistent key-value
//! store for view field state.

pub mod application;
pub mod component;
pub mod error;
pub mod router;
pub mod state;
pub mod store;
pub mod task;

pub use application::{AppContext, Application};
pub use component::{Action, Component, Event};
pub use error::{Error, Result};
pub use router::{Analytics, Cleanup, Route, Router};
pub use state::Entity;
pub use store::Store;
pub use task::{TaskHandle, TaskTracker};
