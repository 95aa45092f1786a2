//! Detail projection of a single record and the display formatting shared by
//! the table and the detail pane.

use std::fmt;

use crate::library::sort::parse_timestamp;
use crate::models::DocumentRecord;

/// Number of tags shown in a table row before collapsing into `+N`
pub const ROW_TAG_LIMIT: usize = 3;

/// One optional block of the detail pane
#[derive(Debug, Clone, PartialEq)]
pub enum DetailSection {
    Summary(String),
    /// `full_text` is `None` while the analysis is collapsed
    Analysis { full_text: Option<String> },
    Tags(Vec<String>),
    Affiliations(Vec<String>),
}

/// Everything the detail pane shows for the selected record
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDetail {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub created: String,
    pub added: String,
    pub processed: Option<String>,
    pub file_name: Option<String>,
    pub sections: Vec<DetailSection>,
    pub external_link: Option<String>,
}

/// Project a record into its detail view.
///
/// Summary and analysis sections are left out entirely when the record has
/// no text for them.
pub fn project(record: &DocumentRecord, show_full_analysis: bool) -> DocumentDetail {
    let mut sections = Vec::new();

    if let Some(summary) = record.summary_text() {
        sections.push(DetailSection::Summary(summary.to_string()));
    }

    if let Some(analysis) = record.analysis_text() {
        sections.push(DetailSection::Analysis {
            full_text: show_full_analysis.then(|| analysis.to_string()),
        });
    }

    sections.push(DetailSection::Tags(record.tags.clone()));
    sections.push(DetailSection::Affiliations(record.affiliations.clone()));

    DocumentDetail {
        id: record.id.clone(),
        title: record.display_title().to_string(),
        authors: record.authors.clone(),
        created: format_date(record.created_date.as_deref()),
        added: format_date(record.added_date.as_deref()),
        processed: record.processed_date.as_deref().map(|d| format_date(Some(d))),
        file_name: record.name.clone().filter(|n| !n.trim().is_empty()),
        sections,
        external_link: record.external_link().map(str::to_string),
    }
}

impl DocumentDetail {
    pub fn has_section(&self, predicate: impl Fn(&DetailSection) -> bool) -> bool {
        self.sections.iter().any(predicate)
    }
}

/// `Dec 15, 2023`; `Unknown` when missing, `Invalid date` when unparseable
pub fn format_date(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => "Unknown".to_string(),
        Some(raw) => match parse_timestamp(raw) {
            Some(dt) => dt.format("%b %-d, %Y").to_string(),
            None => "Invalid date".to_string(),
        },
    }
}

/// Compact author credit used in the table
pub fn format_authors(authors: &[String]) -> String {
    match authors {
        [] => "Unknown".to_string(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [first, ..] => format!("{} et al.", first),
    }
}

/// The tags shown in a row and how many were left out
pub fn row_tags(tags: &[String]) -> (&[String], usize) {
    let shown = &tags[..tags.len().min(ROW_TAG_LIMIT)];
    (shown, tags.len() - shown.len())
}

impl fmt::Display for DocumentDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count().max(8)))?;
        writeln!(f, "ID:       {}", self.id)?;
        if let Some(name) = &self.file_name {
            writeln!(f, "File:     {}", name)?;
        }
        writeln!(f, "Authors:  {}", if self.authors.is_empty() {
            "Unknown".to_string()
        } else {
            self.authors.join(", ")
        })?;
        writeln!(f, "Created:  {}", self.created)?;
        writeln!(f, "Added:    {}", self.added)?;
        if let Some(processed) = &self.processed {
            writeln!(f, "Processed: {}", processed)?;
        }

        for section in &self.sections {
            writeln!(f)?;
            match section {
                DetailSection::Summary(text) => {
                    writeln!(f, "SUMMARY")?;
                    writeln!(f, "{}", text)?;
                }
                DetailSection::Analysis { full_text: Some(text) } => {
                    writeln!(f, "ANALYSIS (SHOW LESS ▲)")?;
                    writeln!(f, "{}", text)?;
                }
                DetailSection::Analysis { full_text: None } => {
                    writeln!(f, "ANALYSIS (SHOW MORE ▼)")?;
                }
                DetailSection::Tags(tags) => {
                    writeln!(f, "TAGS")?;
                    writeln!(f, "{}", tags.join(", "))?;
                }
                DetailSection::Affiliations(affiliations) => {
                    writeln!(f, "AFFILIATIONS")?;
                    writeln!(f, "{}", affiliations.join(", "))?;
                }
            }
        }

        if let Some(link) = &self.external_link {
            writeln!(f)?;
            writeln!(f, "VIEW ORIGINAL → {}", link)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> DocumentRecord {
        DocumentRecord {
            id: "doc-1".into(),
            title: "Annual Report 2023".into(),
            authors: vec!["Ada".into(), "Grace".into(), "Linus".into()],
            tags: vec!["finance".into(), "annual report".into()],
            created_date: Some("2023-12-15".into()),
            added_date: Some("not a date".into()),
            summary: Some("Revenue grew.".into()),
            analysis: Some("Line one\nLine two".into()),
            affiliations: vec!["Company Website".into()],
            external_link: Some("https://drive.example.com/doc-1".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_projection_includes_all_fields() {
        let detail = project(&full_record(), true);
        assert_eq!(detail.title, "Annual Report 2023");
        assert_eq!(detail.created, "Dec 15, 2023");
        assert_eq!(detail.added, "Invalid date");
        assert_eq!(detail.external_link.as_deref(), Some("https://drive.example.com/doc-1"));
        assert_eq!(
            detail.sections,
            vec![
                DetailSection::Summary("Revenue grew.".into()),
                DetailSection::Analysis {
                    full_text: Some("Line one\nLine two".into())
                },
                DetailSection::Tags(vec!["finance".into(), "annual report".into()]),
                DetailSection::Affiliations(vec!["Company Website".into()]),
            ]
        );
    }

    #[test]
    fn test_collapsed_analysis_hides_text() {
        let detail = project(&full_record(), false);
        assert!(detail.has_section(|s| *s == DetailSection::Analysis { full_text: None }));

        let rendered = detail.to_string();
        assert!(rendered.contains("SHOW MORE"));
        assert!(!rendered.contains("Line two"));
    }

    #[test]
    fn test_absent_optional_sections_are_omitted() {
        let mut record = full_record();
        record.summary = None;
        record.analysis = Some("   ".into());
        record.external_link = None;

        let detail = project(&record, true);
        assert!(!detail.has_section(|s| matches!(s, DetailSection::Summary(_))));
        assert!(!detail.has_section(|s| matches!(s, DetailSection::Analysis { .. })));

        let rendered = detail.to_string();
        assert!(!rendered.contains("SUMMARY"));
        assert!(!rendered.contains("ANALYSIS"));
        assert!(!rendered.contains("VIEW ORIGINAL"));
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_date(None), "Unknown");
        assert_eq!(format_date(Some("  ")), "Unknown");
        assert_eq!(format_date(Some("2024-03-05T09:00:00")), "Mar 5, 2024");

        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(format_authors(&[]), "Unknown");
        assert_eq!(format_authors(&names(&["Ada"])), "Ada");
        assert_eq!(format_authors(&names(&["Ada", "Grace"])), "Ada and Grace");
        assert_eq!(format_authors(&names(&["Ada", "Grace", "Linus"])), "Ada et al.");

        let tags = names(&["a", "b", "c", "d", "e"]);
        let (shown, hidden) = row_tags(&tags);
        assert_eq!(shown.len(), 3);
        assert_eq!(hidden, 2);
        assert_eq!(row_tags(&[]).1, 0);
    }
}
