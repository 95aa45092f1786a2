//! CORTEX Explorer terminal user interface
//!
//! Renders the document table, search bar and detail pane over an
//! [`ExploreState`](crate::library::ExploreState) and feeds key presses back
//! into it.

pub mod app;
pub mod ui;
pub mod events;
pub mod traits;
pub mod components;

pub use app::{App, Focus};
pub use events::AppEvent;
