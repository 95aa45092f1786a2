//! Search input shown above the document table

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::explore_tui::ui::Styles;

const PLACEHOLDER: &str = "Search by title, author, or tag...";

/// Single-line text input; the cursor is a char index
#[derive(Debug, Clone, Default)]
pub struct SearchBar {
    pub value: String,
    pub is_focused: bool,
    cursor_position: usize,
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
        if focused {
            self.move_cursor_to_end();
        }
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index();
        self.value.insert(at, c);
        self.cursor_position += 1;
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let border_style = if self.is_focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let content = if self.value.is_empty() && !self.is_focused {
            Line::from(Span::styled(PLACEHOLDER, Styles::inactive()))
        } else if self.is_focused {
            let at = self.byte_index();
            let (before, after) = self.value.split_at(at);
            Line::from(vec![
                Span::raw(before.to_string()),
                Span::styled("│", Styles::warning()),
                Span::raw(after.to_string()),
            ])
        } else {
            Line::from(self.value.clone())
        };

        let widget = Paragraph::new(content).block(
            Block::default()
                .title("Search [/]")
                .borders(Borders::ALL)
                .border_style(border_style),
        );
        f.render_widget(widget, area);
    }
}
