//! Document table component for the derived listing

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::{
    explore_tui::{traits::Navigable, ui::Styles},
    library::detail::{format_authors, format_date, row_tags},
    models::{DocumentRecord, SortKey, SortSpec},
};

/// Configuration for document table display
#[derive(Debug, Clone)]
pub struct DocumentTableConfig {
    pub title: String,
    /// Column widths in percent: title, authors, created, added
    pub column_widths: [u16; 4],
}

impl Default for DocumentTableConfig {
    fn default() -> Self {
        Self {
            title: "DOCUMENTS".to_string(),
            column_widths: [45, 25, 15, 15],
        }
    }
}

/// Table over the filtered and sorted records, with a cursor row.
///
/// The cursor is only a position in the current view; the selected record
/// (shown in the detail pane) is tracked by id in the explore state.
pub struct DocumentTable {
    pub state: TableState,
    pub config: DocumentTableConfig,
    item_count: usize,
}

impl Default for DocumentTable {
    fn default() -> Self {
        Self::new(DocumentTableConfig::default())
    }
}

impl DocumentTable {
    pub fn new(config: DocumentTableConfig) -> Self {
        Self {
            state: TableState::default(),
            config,
            item_count: 0,
        }
    }

    /// Record the current view length and keep the cursor inside it
    pub fn sync(&mut self, item_count: usize) {
        self.item_count = item_count;
        let cursor = match (item_count, self.state.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (count, Some(idx)) if idx >= count => Some(count - 1),
            (_, selected) => selected,
        };
        self.state.select(cursor);
    }

    /// Move the cursor back to the first row
    pub fn reset_cursor(&mut self) {
        self.state.select(if self.item_count == 0 { None } else { Some(0) });
        *self.state.offset_mut() = 0;
    }

    pub fn cursor(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Render the table; `empty_message` is shown when the view is empty
    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        view: &[&DocumentRecord],
        sort: SortSpec,
        selected_id: Option<&str>,
        empty_message: &str,
        focused: bool,
    ) {
        self.sync(view.len());

        let border_style = if focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let block = Block::default()
            .title(format!("{} ({})", self.config.title, view.len()))
            .borders(Borders::ALL)
            .border_style(border_style);

        if view.is_empty() {
            let empty_widget = Paragraph::new(empty_message)
                .style(Styles::inactive())
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(empty_widget, area);
            return;
        }

        let header = Row::new(SortKey::ALL.iter().enumerate().map(|(i, key)| {
            let mut label = format!("{} {}", i + 1, key.header());
            if sort.key == *key {
                label.push(' ');
                label.push_str(sort.direction.arrow());
            }
            Cell::from(label)
        }))
        .style(Styles::title());

        let rows = view.iter().map(|doc| {
            let marker = if selected_id == Some(doc.id.as_str()) { "● " } else { "" };
            let title_line = Line::from(vec![
                Span::styled(marker, Styles::info()),
                Span::raw(doc.display_title().to_string()),
            ]);

            let (shown, hidden) = row_tags(&doc.tags);
            let mut tag_spans: Vec<Span> = Vec::new();
            for tag in shown {
                tag_spans.push(Span::styled(format!(" {} ", tag), Styles::badge()));
                tag_spans.push(Span::raw(" "));
            }
            if hidden > 0 {
                tag_spans.push(Span::styled(format!("+{}", hidden), Styles::inactive()));
            }

            Row::new(vec![
                Cell::from(Text::from(vec![title_line, Line::from(tag_spans)])),
                Cell::from(format_authors(&doc.authors)).style(Styles::inactive()),
                Cell::from(format_date(doc.created_date.as_deref())).style(Styles::inactive()),
                Cell::from(format_date(doc.added_date.as_deref())).style(Styles::inactive()),
            ])
            .height(2)
            .style(Style::default())
        });

        let widths = self.config.column_widths.map(Constraint::Percentage);

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .highlight_style(Styles::selected());

        f.render_stateful_widget(table, area, &mut self.state);
    }
}

impl Navigable for DocumentTable {
    fn get_selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.state.select(index);
    }

    fn get_item_count(&self) -> usize {
        self.item_count
    }
}
