//! Reusable UI components for the explorer TUI

pub mod document_table;
pub mod detail_panel;
pub mod search_bar;
pub mod status_display;

pub use document_table::{DocumentTable, DocumentTableConfig};
pub use detail_panel::DetailPanel;
pub use search_bar::SearchBar;
pub use status_display::{StatusDisplay, StatusMessage, StatusType};
