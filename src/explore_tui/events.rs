//! Event handling for the explorer TUI

use crossterm::event::KeyEvent;

use crate::library::{LoadError, LoadTicket};
use crate::models::DocumentRecord;

/// Events processed by the application loop
#[derive(Debug)]
pub enum AppEvent {
    /// Key pressed in the terminal
    Key(KeyEvent),
    /// A background load finished
    LoadFinished {
        ticket: LoadTicket,
        result: Result<Vec<DocumentRecord>, LoadError>,
    },
    /// Periodic refresh interval elapsed
    RefreshDue,
}
