//! cortex-explore: terminal explorer for CORTEX processed documents
//!
//! The library holds the document model, the loader, the pure filter/sort
//! transitions and the view state; `explore_tui` renders them with ratatui.

pub mod config;
pub mod models;
pub mod library;
pub mod explore_tui;
