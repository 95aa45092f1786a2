//! Free-text filtering over document records

use crate::models::DocumentRecord;

/// Keep the records matching `query`, in input order.
///
/// Matching is a case-insensitive substring test against the title, each
/// author and each tag. A blank query keeps everything.
pub fn filter<'a, I>(records: I, query: &str) -> Vec<&'a DocumentRecord>
where
    I: IntoIterator<Item = &'a DocumentRecord>,
{
    filter_with(records, query, false)
}

/// Like [`filter`], optionally also searching the summary text
pub fn filter_with<'a, I>(records: I, query: &str, include_summary: bool) -> Vec<&'a DocumentRecord>
where
    I: IntoIterator<Item = &'a DocumentRecord>,
{
    if query.trim().is_empty() {
        return records.into_iter().collect();
    }

    let needle = query.to_lowercase();
    records
        .into_iter()
        .filter(|record| matches(record, &needle, include_summary))
        .collect()
}

/// `needle` must already be lowercased
pub fn matches(record: &DocumentRecord, needle: &str, include_summary: bool) -> bool {
    let hit = |text: &str| text.to_lowercase().contains(needle);

    hit(&record.title)
        || record.authors.iter().any(|author| hit(author))
        || record.tags.iter().any(|tag| hit(tag))
        || (include_summary && record.summary.as_deref().map_or(false, |summary| hit(summary)))
}
