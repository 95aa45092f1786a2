//! Detail pane for the selected document

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    explore_tui::{traits::Scrollable, ui::Styles},
    library::detail::{DetailSection, DocumentDetail},
};

const BADGE_AUTHOR_LIMIT: usize = 3;

/// Scrollable rendering of a [`DocumentDetail`]
#[derive(Debug, Default)]
pub struct DetailPanel {
    scroll_offset: usize,
    line_count: usize,
    viewport_height: usize,
}

impl DetailPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Styled lines for a detail projection
    pub fn lines(detail: &DocumentDetail) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(detail.title.clone(), Styles::title())),
            Line::from(""),
        ];

        let mut badges = vec![Span::styled(format!(" {} ", detail.created), Styles::badge())];
        for author in detail.authors.iter().take(BADGE_AUTHOR_LIMIT) {
            badges.push(Span::raw(" "));
            badges.push(Span::styled(format!(" {} ", author), Styles::badge()));
        }
        if detail.authors.len() > BADGE_AUTHOR_LIMIT {
            badges.push(Span::raw(" "));
            badges.push(Span::styled(
                format!("+{} more", detail.authors.len() - BADGE_AUTHOR_LIMIT),
                Styles::inactive(),
            ));
        }
        lines.push(Line::from(badges));

        lines.push(Line::from(Span::styled(
            format!("Added {}", detail.added),
            Styles::inactive(),
        )));
        if let Some(processed) = &detail.processed {
            lines.push(Line::from(Span::styled(
                format!("Processed {}", processed),
                Styles::inactive(),
            )));
        }
        if let Some(name) = &detail.file_name {
            lines.push(Line::from(Span::styled(format!("File {}", name), Styles::inactive())));
        }

        for section in &detail.sections {
            lines.push(Line::from(""));
            match section {
                DetailSection::Summary(text) => {
                    lines.push(Line::from(Span::styled("SUMMARY", Styles::section())));
                    lines.extend(text_lines(text));
                }
                DetailSection::Analysis { full_text } => {
                    let toggle = if full_text.is_some() {
                        "SHOW LESS ▲"
                    } else {
                        "SHOW MORE ▼"
                    };
                    lines.push(Line::from(vec![
                        Span::styled("ANALYSIS", Styles::section()),
                        Span::raw("  "),
                        Span::styled(format!("[a] {}", toggle), Styles::info()),
                    ]));
                    if let Some(text) = full_text {
                        lines.extend(text_lines(text));
                    }
                }
                DetailSection::Tags(tags) => {
                    lines.push(Line::from(Span::styled("TAGS", Styles::section())));
                    let mut spans = Vec::new();
                    for tag in tags {
                        spans.push(Span::styled(format!(" {} ", tag), Styles::badge()));
                        spans.push(Span::raw(" "));
                    }
                    lines.push(Line::from(spans));
                }
                DetailSection::Affiliations(affiliations) => {
                    lines.push(Line::from(Span::styled("AFFILIATIONS", Styles::section())));
                    lines.push(Line::from(affiliations.join(", ")));
                }
            }
        }

        if let Some(link) = &detail.external_link {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("[o] VIEW ORIGINAL → ", Styles::info()),
                Span::styled(link.clone(), Styles::link()),
            ]));
        }

        lines
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, detail: Option<&DocumentDetail>) {
        let block = Block::default()
            .title("DETAIL")
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        let Some(detail) = detail else {
            self.line_count = 0;
            let placeholder = Paragraph::new("Select a document to view details")
                .style(Styles::inactive())
                .block(block);
            f.render_widget(placeholder, area);
            return;
        };

        let inner_width = area.width.saturating_sub(2) as usize;
        let lines = wrap_lines(Self::lines(detail), inner_width);
        self.line_count = lines.len();
        self.viewport_height = area.height.saturating_sub(2) as usize;
        let max_scroll = self.calculate_max_scroll();
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let offset = u16::try_from(self.scroll_offset).unwrap_or(u16::MAX);
        let paragraph = Paragraph::new(lines).block(block).scroll((offset, 0));

        f.render_widget(paragraph, area);
    }
}

/// Free text keeps its own line breaks
fn text_lines(text: &str) -> Vec<Line<'static>> {
    text.lines().map(|line| Line::from(line.to_string())).collect()
}

/// Word-wrap every line to `width` columns so one entry is one screen row
fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    lines
        .into_iter()
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 || line.width() <= width {
        return vec![line];
    }

    let mut rows = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for span in line.spans {
        let style = span.style;
        for token in split_tokens(&span.content) {
            let is_space = token.chars().all(char::is_whitespace);
            let token_width = token.width();

            if used > 0 && used + token_width > width {
                rows.push(finish_row(&mut current));
                used = 0;
                // whitespace at a break is dropped
                if is_space {
                    continue;
                }
            }

            if token_width <= width {
                used += token_width;
                current.push(Span::styled(token.to_string(), style));
                continue;
            }

            // A word wider than the pane is broken at the column limit
            let mut piece = String::new();
            let mut piece_width = 0;
            for c in token.chars() {
                let char_width = c.width().unwrap_or(0);
                if piece_width > 0 && piece_width + char_width > width {
                    current.push(Span::styled(std::mem::take(&mut piece), style));
                    rows.push(finish_row(&mut current));
                    piece_width = 0;
                }
                piece.push(c);
                piece_width += char_width;
            }
            used = piece_width;
            current.push(Span::styled(piece, style));
        }
    }

    if !current.is_empty() {
        rows.push(finish_row(&mut current));
    }
    rows
}

fn finish_row(current: &mut Vec<Span<'static>>) -> Line<'static> {
    while current
        .last()
        .is_some_and(|span| span.content.chars().all(char::is_whitespace))
    {
        current.pop();
    }
    Line::from(std::mem::take(current))
}

/// Split into alternating runs of whitespace and non-whitespace
fn split_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut previous: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let is_space = c.is_whitespace();
        if previous.is_some_and(|p| p != is_space) {
            tokens.push(&text[start..i]);
            start = i;
        }
        previous = Some(is_space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

impl Scrollable for DetailPanel {
    fn get_scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset;
    }

    fn calculate_max_scroll(&self) -> usize {
        self.line_count.saturating_sub(self.viewport_height.max(1))
    }
}
