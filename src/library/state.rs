//! Explicit view state for the document explorer
//!
//! All user-facing state (collection, query, sort, selection, analysis
//! toggle and load bookkeeping) lives in [`ExploreState`] and changes only
//! through its transition methods.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::library::detail::{project, DocumentDetail};
use crate::library::errors::LoadError;
use crate::library::filter::filter_with;
use crate::library::sort::sort;
use crate::models::{DocumentRecord, SortKey, SortSpec};

/// Sequence number handed out for every load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Outcome of the most recently applied load
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loaded { count: usize },
    Failed { message: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ExploreSnapshot {
    records: Vec<DocumentRecord>,
    query: String,
    sort: SortSpec,
    selected_id: Option<String>,
    show_full_analysis: bool,
    search_summary: bool,
    issued: u64,
    applied: u64,
    status: LoadStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "ExploreSnapshot", into = "ExploreSnapshot")]
pub struct ExploreState {
    records: Vec<DocumentRecord>,
    index: HashMap<String, usize>,
    query: String,
    sort: SortSpec,
    selected_id: Option<String>,
    show_full_analysis: bool,
    search_summary: bool,
    issued: u64,
    applied: u64,
    status: LoadStatus,
}

impl From<ExploreSnapshot> for ExploreState {
    fn from(snapshot: ExploreSnapshot) -> Self {
        let mut state = ExploreState {
            records: Vec::new(),
            index: HashMap::new(),
            query: snapshot.query,
            sort: snapshot.sort,
            selected_id: snapshot.selected_id,
            show_full_analysis: snapshot.show_full_analysis,
            search_summary: snapshot.search_summary,
            issued: snapshot.issued,
            applied: snapshot.applied,
            status: snapshot.status,
        };
        state.replace_records(snapshot.records);
        state
    }
}

impl From<ExploreState> for ExploreSnapshot {
    fn from(state: ExploreState) -> Self {
        ExploreSnapshot {
            records: state.records,
            query: state.query,
            sort: state.sort,
            selected_id: state.selected_id,
            show_full_analysis: state.show_full_analysis,
            search_summary: state.search_summary,
            issued: state.issued,
            applied: state.applied,
            status: state.status,
        }
    }
}

impl ExploreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary_search(mut self, enabled: bool) -> Self {
        self.search_summary = enabled;
        self
    }

    // Loading

    /// Issue a ticket for a new load request
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        debug!("Issued load ticket {}", self.issued);
        LoadTicket(self.issued)
    }

    /// Apply a finished load. Results older than one already applied are
    /// discarded and `false` is returned.
    ///
    /// A failure leaves the current collection in place.
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<DocumentRecord>, LoadError>,
    ) -> bool {
        if ticket.0 <= self.applied {
            debug!(
                "Discarding stale load result {} (already applied {})",
                ticket.0, self.applied
            );
            return false;
        }
        self.applied = ticket.0;

        match result {
            Ok(records) => {
                self.replace_records(records);
                info!("Collection replaced with {} documents", self.records.len());
                self.status = LoadStatus::Loaded {
                    count: self.records.len(),
                };
            }
            Err(e) => {
                warn!("Document load failed: {}", e);
                self.status = LoadStatus::Failed {
                    message: e.to_string(),
                };
            }
        }
        true
    }

    /// A request has been issued that has not been applied yet
    pub fn is_loading(&self) -> bool {
        self.issued > self.applied
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed { message } => Some(message),
            _ => None,
        }
    }

    fn replace_records(&mut self, records: Vec<DocumentRecord>) {
        let mut index = HashMap::with_capacity(records.len());
        let mut kept = Vec::with_capacity(records.len());

        for record in records {
            if index.contains_key(&record.id) {
                warn!("Ignoring duplicate document id {}", record.id);
                continue;
            }
            index.insert(record.id.clone(), kept.len());
            kept.push(record);
        }

        self.records = kept;
        self.index = index;
    }

    // Collection

    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&DocumentRecord> {
        self.index.get(id).and_then(|&pos| self.records.get(pos))
    }

    // Filtering and sorting

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn sort_spec(&self) -> SortSpec {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    /// Column header activation
    pub fn click_header(&mut self, key: SortKey) {
        self.sort = self.sort.clicked(key);
    }

    /// Records matching the query, in collection order
    pub fn filtered(&self) -> Vec<&DocumentRecord> {
        filter_with(&self.records, &self.query, self.search_summary)
    }

    /// The derived listing: filtered, then sorted
    pub fn view(&self) -> Vec<&DocumentRecord> {
        sort(self.filtered(), self.sort.key, self.sort.direction)
    }

    // Selection and detail

    /// Select a record by id. Ids outside the loaded collection are ignored.
    pub fn select(&mut self, id: &str) -> bool {
        if self.index.contains_key(id) {
            self.selected_id = Some(id.to_string());
            true
        } else {
            debug!("Ignoring selection of unknown document {}", id);
            false
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// The selected record, whether or not the current filter shows it
    pub fn current_detail(&self) -> Option<&DocumentRecord> {
        self.selected_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn detail(&self) -> Option<DocumentDetail> {
        self.current_detail()
            .map(|record| project(record, self.show_full_analysis))
    }

    pub fn show_full_analysis(&self) -> bool {
        self.show_full_analysis
    }

    pub fn toggle_analysis(&mut self) {
        self.show_full_analysis = !self.show_full_analysis;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::loader::{load, DocumentSource};
    use crate::models::SortDirection;
    use async_trait::async_trait;

    fn record(id: &str, title: &str, tags: &[&str], added: &str) -> DocumentRecord {
        DocumentRecord {
            id: id.to_string(),
            title: title.to_string(),
            tags: tags.iter().map(|s| s.to_string()).collect(),
            added_date: Some(added.to_string()),
            ..Default::default()
        }
    }

    fn loaded_state() -> ExploreState {
        let mut state = ExploreState::new();
        let ticket = state.begin_load();
        state.apply_load(
            ticket,
            Ok(vec![
                record("1", "Acme Corp", &["finance"], "2023-12-15"),
                record("2", "Market Analysis Q2", &["acme-related"], "2023-06-30"),
                record("3", "Board Meeting Minutes", &["governance"], "2023-11-05"),
            ]),
        );
        state
    }

    fn ids(records: &[&DocumentRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    struct FailingSource;

    #[async_trait]
    impl DocumentSource for FailingSource {
        async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
            Err(LoadError::Status {
                status_code: 500,
                location: "http://localhost/data/processed_files.json".to_string(),
            })
        }

        fn describe(&self) -> String {
            "failing source".to_string()
        }
    }

    #[test]
    fn test_empty_state_views_are_empty() {
        let mut state = ExploreState::new();
        state.set_query("anything");
        state.click_header(SortKey::Title);
        assert!(state.view().is_empty());
        assert!(state.current_detail().is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_default_view_is_added_date_descending() {
        let state = loaded_state();
        assert_eq!(ids(&state.view()), vec!["1", "3", "2"]);
        assert_eq!(state.status(), &LoadStatus::Loaded { count: 3 });
    }

    #[test]
    fn test_query_then_sort() {
        let mut state = loaded_state();
        state.set_query("ACME");
        state.click_header(SortKey::Title);
        assert_eq!(state.sort_spec(), SortSpec::new(SortKey::Title, SortDirection::Descending));
        assert_eq!(ids(&state.view()), vec!["2", "1"]);

        state.click_header(SortKey::Title);
        assert_eq!(ids(&state.view()), vec!["1", "2"]);
        // source collection untouched
        assert_eq!(ids(&state.records().iter().collect::<Vec<_>>()), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_selection_persists_when_filtered_out() {
        let mut state = loaded_state();
        assert!(state.select("3"));

        state.set_query("acme");
        assert!(!state.view().iter().any(|r| r.id == "3"));
        assert_eq!(state.current_detail().map(|r| r.id.as_str()), Some("3"));
    }

    #[test]
    fn test_selecting_unknown_id_is_noop() {
        let mut state = loaded_state();
        assert!(state.select("1"));
        assert!(!state.select("does-not-exist"));
        assert_eq!(state.selected_id(), Some("1"));
    }

    #[test]
    fn test_analysis_toggle_survives_new_selection() {
        let mut state = loaded_state();
        assert!(!state.show_full_analysis());

        state.select("1");
        state.toggle_analysis();
        state.select("2");
        assert!(state.show_full_analysis());

        state.toggle_analysis();
        assert!(!state.show_full_analysis());
    }

    #[test]
    fn test_stale_load_never_overwrites_newer() {
        let mut state = ExploreState::new();
        let first = state.begin_load();
        let second = state.begin_load();
        assert!(state.is_loading());

        assert!(state.apply_load(second, Ok(vec![record("new", "Fresh", &[], "2024-01-01")])));
        assert!(!state.apply_load(first, Ok(vec![record("old", "Stale", &[], "2020-01-01")])));

        assert_eq!(ids(&state.view()), vec!["new"]);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_earlier_result_applies_if_it_lands_first() {
        let mut state = ExploreState::new();
        let first = state.begin_load();
        let second = state.begin_load();

        assert!(state.apply_load(first, Ok(vec![record("a", "A", &[], "2024-01-01")])));
        assert!(state.is_loading());
        assert!(state.apply_load(second, Ok(vec![record("b", "B", &[], "2024-01-01")])));
        assert_eq!(ids(&state.view()), vec!["b"]);
    }

    #[test]
    fn test_refresh_replaces_collection() {
        let mut state = loaded_state();
        state.select("2");

        let ticket = state.begin_load();
        state.apply_load(ticket, Ok(vec![record("9", "Replacement", &[], "2024-01-01")]));

        assert_eq!(ids(&state.view()), vec!["9"]);
        assert!(state.get("1").is_none());
        // selection id kept but no longer resolves
        assert_eq!(state.selected_id(), Some("2"));
        assert!(state.current_detail().is_none());
    }

    #[test]
    fn test_failed_refresh_keeps_existing_records() {
        let mut state = loaded_state();
        let ticket = state.begin_load();
        state.apply_load(
            ticket,
            Err(LoadError::UnexpectedShape("a number".to_string())),
        );

        assert_eq!(state.view().len(), 3);
        assert!(state.last_error().unwrap().contains("a number"));
    }

    #[tokio::test]
    async fn test_server_error_yields_empty_collection_and_recorded_error() {
        let mut state = ExploreState::new();
        let ticket = state.begin_load();
        let result = load(&FailingSource).await;
        state.apply_load(ticket, result);

        assert!(state.view().is_empty());
        assert!(state.last_error().unwrap().contains("500"));
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut state = ExploreState::new();
        let ticket = state.begin_load();
        state.apply_load(
            ticket,
            Ok(vec![
                record("x", "First", &[], "2024-01-01"),
                record("x", "Second", &[], "2024-01-01"),
            ]),
        );
        assert_eq!(state.records().len(), 1);
        assert_eq!(state.get("x").unwrap().title, "First");
    }

    #[test]
    fn test_serialized_state_restores_lookup() {
        let mut state = loaded_state();
        state.set_query("board");
        state.select("3");
        state.toggle_analysis();

        let json = serde_json::to_string(&state).unwrap();
        let restored: ExploreState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.query(), "board");
        assert!(restored.show_full_analysis());
        assert_eq!(restored.current_detail().unwrap().title, "Board Meeting Minutes");
        assert_eq!(ids(&restored.view()), vec!["3"]);
    }
}
