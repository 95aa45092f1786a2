use serde::{Deserialize, Deserializer, Serialize};

/// One processed document as produced by the CORTEX pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, alias = "createdDate")]
    pub created_date: Option<String>,
    #[serde(default, alias = "addedDate")]
    pub added_date: Option<String>,
    #[serde(default, alias = "processedDate")]
    pub processed_date: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub affiliations: Vec<String>,
    #[serde(default, rename = "drive_link", alias = "externalLink", alias = "external_link")]
    pub external_link: Option<String>,
    /// Source file name
    #[serde(default)]
    pub name: Option<String>,
}

impl DocumentRecord {
    /// Title for display, `Untitled` when the record has none
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    /// First author, or the empty string
    pub fn primary_author(&self) -> &str {
        self.authors.first().map(String::as_str).unwrap_or("")
    }

    pub fn summary_text(&self) -> Option<&str> {
        non_blank(self.summary.as_deref())
    }

    pub fn analysis_text(&self) -> Option<&str> {
        non_blank(self.analysis.as_deref())
    }

    pub fn external_link(&self) -> Option<&str> {
        non_blank(self.external_link.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Treat an explicit JSON `null` the same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Columns the listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Title,
    PrimaryAuthor,
    CreatedDate,
    AddedDate,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Title,
        SortKey::PrimaryAuthor,
        SortKey::CreatedDate,
        SortKey::AddedDate,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            SortKey::Title => "title",
            SortKey::PrimaryAuthor => "author",
            SortKey::CreatedDate => "created",
            SortKey::AddedDate => "added",
        }
    }

    /// Column header label
    pub fn header(&self) -> &str {
        match self {
            SortKey::Title => "TITLE",
            SortKey::PrimaryAuthor => "AUTHORS",
            SortKey::CreatedDate => "CREATED",
            SortKey::AddedDate => "ADDED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::AddedDate,
            direction: SortDirection::Descending,
        }
    }
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Header click: the active column flips direction, any other column
    /// becomes active in descending order.
    pub fn clicked(self, key: SortKey) -> Self {
        if self.key == key {
            Self::new(key, self.direction.toggled())
        } else {
            Self::new(key, SortDirection::Descending)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserialization_snake_case() {
        let raw = r#"{
            "id": "doc-1",
            "name": "paper.pdf",
            "drive_link": "https://drive.example.com/doc-1",
            "created_date": "2023-12-15T10:00:00",
            "added_date": "2024-01-02T08:30:00",
            "processed_date": "2024-01-02T08:31:00",
            "authors": ["Ada Lovelace", "Charles Babbage"],
            "affiliations": ["Analytical Society"],
            "title": "Notes on the Engine",
            "summary": "A summary.",
            "tags": ["computing", "history"]
        }"#;

        let record: DocumentRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.id, "doc-1");
        assert_eq!(record.primary_author(), "Ada Lovelace");
        assert_eq!(record.external_link(), Some("https://drive.example.com/doc-1"));
        assert_eq!(record.added_date.as_deref(), Some("2024-01-02T08:30:00"));
        assert_eq!(record.analysis, None);
        assert_eq!(record.name.as_deref(), Some("paper.pdf"));
    }

    #[test]
    fn test_record_deserialization_camel_case_and_nulls() {
        let raw = r#"{
            "id": "doc-2",
            "title": null,
            "authors": null,
            "tags": null,
            "createdDate": "2023-01-01",
            "addedDate": "2023-02-01",
            "externalLink": "https://example.com/doc-2",
            "unknownField": 42
        }"#;

        let record: DocumentRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.display_title(), "Untitled");
        assert!(record.authors.is_empty());
        assert!(record.tags.is_empty());
        assert_eq!(record.primary_author(), "");
        assert_eq!(record.created_date.as_deref(), Some("2023-01-01"));
        assert_eq!(record.external_link(), Some("https://example.com/doc-2"));
    }

    #[test]
    fn test_blank_optional_text_is_absent() {
        let record = DocumentRecord {
            summary: Some("   ".to_string()),
            analysis: Some(String::new()),
            external_link: Some("".to_string()),
            ..Default::default()
        };
        assert_eq!(record.summary_text(), None);
        assert_eq!(record.analysis_text(), None);
        assert_eq!(record.external_link(), None);
    }

    #[test]
    fn test_header_click_policy() {
        let spec = SortSpec::default();
        assert_eq!(spec, SortSpec::new(SortKey::AddedDate, SortDirection::Descending));

        // Same column toggles
        let spec = spec.clicked(SortKey::AddedDate);
        assert_eq!(spec.direction, SortDirection::Ascending);
        let spec = spec.clicked(SortKey::AddedDate);
        assert_eq!(spec.direction, SortDirection::Descending);

        // New column starts descending, regardless of the previous direction
        let spec = SortSpec::new(SortKey::Title, SortDirection::Ascending).clicked(SortKey::CreatedDate);
        assert_eq!(spec, SortSpec::new(SortKey::CreatedDate, SortDirection::Descending));
    }
}
