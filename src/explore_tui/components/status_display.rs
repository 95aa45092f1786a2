//! Status display component for showing messages and progress

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::explore_tui::ui::Styles;

/// Types of status messages
#[derive(Debug, Clone, PartialEq)]
pub enum StatusType {
    Info,
    Success,
    Warning,
    Error,
    Loading,
}

/// Status message with type and content
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub status_type: StatusType,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl StatusMessage {
    pub fn new(message: String, status_type: StatusType) -> Self {
        Self {
            message,
            status_type,
            timestamp: chrono::Local::now(),
        }
    }
}

/// Status bar with a short message history.
///
/// Messages other than `Loading` and `Error` are transient and clear after
/// the configured timeout.
pub struct StatusDisplay {
    pub current_message: Option<StatusMessage>,
    pub message_history: Vec<StatusMessage>,
    pub max_history: usize,
    pub auto_clear_timeout: Option<std::time::Duration>,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self {
            current_message: None,
            message_history: Vec::new(),
            max_history: 100,
            auto_clear_timeout: None,
        }
    }
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_clear(mut self, timeout: std::time::Duration) -> Self {
        self.auto_clear_timeout = Some(timeout);
        self
    }

    /// Set current status message
    pub fn set_message(&mut self, message: StatusMessage) {
        self.archive_current();
        self.current_message = Some(message);
    }

    pub fn set_info(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Info));
    }

    pub fn set_success(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Success));
    }

    pub fn set_warning(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Warning));
    }

    pub fn set_error(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Error));
    }

    pub fn set_loading(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Loading));
    }

    /// Clear current message
    pub fn clear(&mut self) {
        self.archive_current();
    }

    fn archive_current(&mut self) {
        if let Some(current) = self.current_message.take() {
            self.message_history.push(current);
            if self.message_history.len() > self.max_history {
                self.message_history.remove(0);
            }
        }
    }

    pub fn get_current(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn get_history(&self) -> &[StatusMessage] {
        &self.message_history
    }

    /// Check if we should auto-clear the current message
    pub fn should_auto_clear(&self) -> bool {
        match (self.auto_clear_timeout, &self.current_message) {
            (Some(timeout), Some(message)) => {
                if matches!(message.status_type, StatusType::Loading | StatusType::Error) {
                    return false;
                }
                let elapsed = chrono::Local::now().signed_duration_since(message.timestamp);
                elapsed.to_std().unwrap_or_default() > timeout
            }
            _ => false,
        }
    }

    /// Clear the current message once it has timed out
    pub fn tick(&mut self) {
        if self.should_auto_clear() {
            self.clear();
        }
    }

    /// Render the status display; `idle_text` is shown when there is no message
    pub fn render(&self, f: &mut Frame, area: Rect, idle_text: &str) {
        let (content, style) = match &self.current_message {
            Some(message) => {
                let style = match message.status_type {
                    StatusType::Info => Styles::info(),
                    StatusType::Success => Styles::success(),
                    StatusType::Warning => Styles::warning(),
                    StatusType::Error => Styles::error(),
                    StatusType::Loading => Styles::warning(),
                };
                (Self::format_message(message), style)
            }
            None => (idle_text.to_string(), Styles::inactive()),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        let paragraph = Paragraph::new(content).style(style).block(block);

        f.render_widget(paragraph, area);
    }

    /// Format message for display
    fn format_message(message: &StatusMessage) -> String {
        let prefix = match message.status_type {
            StatusType::Info => "ℹ",
            StatusType::Success => "✓",
            StatusType::Warning => "⚠",
            StatusType::Error => "✗",
            StatusType::Loading => "⟳",
        };

        format!(
            "{} [{}] {}",
            prefix,
            message.timestamp.format("%H:%M:%S"),
            message.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_history_is_bounded() {
        let mut status = StatusDisplay::new();
        status.max_history = 2;
        for i in 0..4 {
            status.set_info(format!("message {}", i));
        }
        assert_eq!(status.get_current().unwrap().message, "message 3");
        let history: Vec<&str> = status.get_history().iter().map(|m| m.message.as_str()).collect();
        assert_eq!(history, vec!["message 1", "message 2"]);
    }

    #[test]
    fn test_auto_clear_skips_errors_and_loading() {
        let mut status = StatusDisplay::new().with_auto_clear(Duration::from_millis(0));

        let mut stale = StatusMessage::new("done".to_string(), StatusType::Success);
        stale.timestamp = chrono::Local::now() - chrono::Duration::seconds(5);
        status.set_message(stale);
        status.tick();
        assert!(status.get_current().is_none());

        let mut error = StatusMessage::new("boom".to_string(), StatusType::Error);
        error.timestamp = chrono::Local::now() - chrono::Duration::seconds(5);
        status.set_message(error);
        status.tick();
        assert_eq!(status.get_current().unwrap().message, "boom");

        status.set_loading("Loading documents...".to_string());
        status.tick();
        assert_eq!(status.get_current().unwrap().status_type, StatusType::Loading);
    }
}
