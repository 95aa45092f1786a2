//! Ordering of document records by a sort column

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::cmp::Ordering;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::models::{DocumentRecord, SortDirection, SortKey};

/// Return the records ordered by `key` in `direction`.
///
/// The sort is stable, so records that compare equal keep their input order
/// in both directions.
pub fn sort<'a, I>(records: I, key: SortKey, direction: SortDirection) -> Vec<&'a DocumentRecord>
where
    I: IntoIterator<Item = &'a DocumentRecord>,
{
    let mut sorted: Vec<&DocumentRecord> = records.into_iter().collect();
    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}

/// Ascending comparison of two records on one column
pub fn compare(a: &DocumentRecord, b: &DocumentRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => locale_cmp(&a.title, &b.title),
        SortKey::PrimaryAuthor => locale_cmp(a.primary_author(), b.primary_author()),
        SortKey::CreatedDate => date_key(a.created_date.as_deref())
            .cmp(&date_key(b.created_date.as_deref())),
        SortKey::AddedDate => date_key(a.added_date.as_deref())
            .cmp(&date_key(b.added_date.as_deref())),
    }
}

/// Missing and unparseable dates become `None`, which orders before every
/// real instant.
fn date_key(value: Option<&str>) -> Option<DateTime<Utc>> {
    value.and_then(parse_timestamp)
}

/// Accent- and case-insensitive string comparison.
///
/// Strings are compared on their base letters first (NFD with combining
/// marks removed, lowercased), so `Éclair` sorts with the e's. Ties fall back
/// to the accented form, unaccented first, and then to case, lowercase
/// first.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented_letters(a).cmp(accented_letters(b)))
        .then_with(|| b.cmp(a))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

/// Parse the timestamp shapes found in processed-file records
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
