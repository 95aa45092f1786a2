//! Core traits for the explorer TUI components

/// Components with a movable cursor over a list of items
pub trait Navigable {
    /// Get currently selected index
    fn get_selected_index(&self) -> Option<usize>;

    /// Set selected index
    fn set_selected_index(&mut self, index: Option<usize>);

    /// Get total number of items
    fn get_item_count(&self) -> usize;

    /// Move selection up, wrapping to the bottom
    fn navigate_up(&mut self) {
        let count = self.get_item_count();
        if count == 0 {
            return;
        }
        let selected = self.get_selected_index().unwrap_or(0);
        let new_selected = if selected == 0 { count - 1 } else { selected - 1 };
        self.set_selected_index(Some(new_selected));
    }

    /// Move selection down, wrapping to the top
    fn navigate_down(&mut self) {
        let count = self.get_item_count();
        if count == 0 {
            return;
        }
        let new_selected = match self.get_selected_index() {
            Some(selected) => (selected + 1) % count,
            None => 0,
        };
        self.set_selected_index(Some(new_selected));
    }

    /// Navigate to first item
    fn navigate_to_first(&mut self) {
        if self.get_item_count() > 0 {
            self.set_selected_index(Some(0));
        }
    }

    /// Navigate to last item
    fn navigate_to_last(&mut self) {
        let count = self.get_item_count();
        if count > 0 {
            self.set_selected_index(Some(count - 1));
        }
    }

    /// Move by `amount` without wrapping
    fn navigate_by(&mut self, amount: isize) {
        let count = self.get_item_count();
        if count == 0 {
            return;
        }
        let current = self.get_selected_index().unwrap_or(0) as isize;
        let target = (current + amount).clamp(0, count as isize - 1);
        self.set_selected_index(Some(target as usize));
    }
}

/// Components with scrollable content
pub trait Scrollable {
    /// Get current scroll offset
    fn get_scroll_offset(&self) -> usize;

    /// Set scroll offset with bounds checking
    fn set_scroll_offset(&mut self, offset: usize);

    /// Calculate maximum scroll offset
    fn calculate_max_scroll(&self) -> usize;

    /// Scroll up by given amount
    fn scroll_up(&mut self, amount: usize) {
        let current = self.get_scroll_offset();
        self.set_scroll_offset(current.saturating_sub(amount));
    }

    /// Scroll down by given amount
    fn scroll_down(&mut self, amount: usize) {
        let current = self.get_scroll_offset();
        let max_scroll = self.calculate_max_scroll();
        self.set_scroll_offset(std::cmp::min(current + amount, max_scroll));
    }

    /// Scroll to top
    fn scroll_to_top(&mut self) {
        self.set_scroll_offset(0);
    }
}
