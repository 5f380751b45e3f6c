use std::collections::BTreeSet;

use crate::data::aggregate::WordFrequencyConfig;
use crate::data::estimates::EstimatesTable;
use crate::data::filter::{filtered_indices, init_filter_state, FilterState};
use crate::data::model::CleanedTable;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which aggregate view fills the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Years,
    Journals,
    Words,
    Sources,
    Preview,
    EstimatedCases,
    TopCountries,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Years,
        View::Journals,
        View::Words,
        View::Sources,
        View::Preview,
        View::EstimatedCases,
        View::TopCountries,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::Years => "By year",
            View::Journals => "Top journals",
            View::Words => "Title words",
            View::Sources => "Sources",
            View::Preview => "Preview",
            View::EstimatedCases => "Est. cases",
            View::TopCountries => "Top countries",
        }
    }

    /// Whether this view draws from the estimates dataset rather than the
    /// publication metadata.
    pub fn uses_estimates(self) -> bool {
        matches!(self, View::EstimatedCases | View::TopCountries)
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Cleaned dataset (None until a file is loaded).
    pub table: Option<CleanedTable>,

    /// Year-range and journal filter selections.
    pub filters: FilterState,

    /// Indices of rows passing the current filters (recomputed on change).
    pub visible_indices: Vec<usize>,

    /// Active central view.
    pub view: View,

    /// Word-frequency knobs, adjustable from the side panel.
    pub word_config: WordFrequencyConfig,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Row cap applied to loads (from the command line).
    pub row_cap: Option<usize>,

    /// Country-year estimates dataset (None until loaded).
    pub estimates: Option<EstimatesTable>,

    /// Year shown in the top-countries view.
    pub estimate_year: Option<i32>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            view: View::Years,
            word_config: WordFrequencyConfig::default(),
            status_message: None,
            row_cap: None,
            estimates: None,
            estimate_year: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded table and reset filters to show everything.
    pub fn set_table(&mut self, table: CleanedTable) {
        self.filters = init_filter_state(&table);
        self.visible_indices = (0..table.len()).collect();
        self.table = Some(table);
        self.status_message = None;
    }

    /// Ingest a newly loaded estimates dataset, defaulting the top-countries
    /// view to the most recent year.
    pub fn set_estimates(&mut self, table: EstimatesTable) {
        self.estimate_year = table.latest_year();
        self.estimates = Some(table);
        self.status_message = None;
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(table) = &self.table {
            self.visible_indices = filtered_indices(table, &self.filters);
        }
    }

    /// Clamp and apply a new year range, keeping lo ≤ hi.
    pub fn set_year_range(&mut self, lo: i32, hi: i32) {
        self.filters.years = Some((lo.min(hi), lo.max(hi)));
        self.refilter();
    }

    /// Toggle a single journal in the filter.
    pub fn toggle_journal(&mut self, journal: &str) {
        if !self.filters.journals.remove(journal) {
            self.filters.journals.insert(journal.to_string());
        }
        self.refilter();
    }

    /// Select every journal.
    pub fn select_all_journals(&mut self) {
        if let Some(table) = &self.table {
            self.filters.journals = table.journals.clone();
            self.refilter();
        }
    }

    /// Deselect every journal.
    pub fn select_no_journals(&mut self) {
        self.filters.journals = BTreeSet::new();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Paper;

    fn paper(title: &str, journal: &str, year: Option<i32>) -> Paper {
        Paper {
            id: None,
            title: title.to_string(),
            authors: None,
            journal: journal.to_string(),
            source: None,
            published: year.and_then(|y| chrono::NaiveDate::from_ymd_opt(y, 1, 1)),
            year,
            abstract_word_count: 0,
        }
    }

    #[test]
    fn set_table_selects_everything() {
        let mut state = AppState::default();
        state.set_table(CleanedTable::from_papers(vec![
            paper("a", "Nature", Some(2020)),
            paper("b", "Lancet", Some(2021)),
        ]));
        assert_eq!(state.visible_indices, vec![0, 1]);
        assert_eq!(state.filters.years, Some((2020, 2021)));
        assert_eq!(state.filters.journals.len(), 2);
    }

    #[test]
    fn toggle_journal_refilters() {
        let mut state = AppState::default();
        state.set_table(CleanedTable::from_papers(vec![
            paper("a", "Nature", Some(2020)),
            paper("b", "Lancet", Some(2021)),
        ]));
        state.toggle_journal("Lancet");
        assert_eq!(state.visible_indices, vec![0]);
        state.toggle_journal("Lancet");
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn set_estimates_defaults_to_latest_year() {
        use crate::data::estimates::{EstimateRow, EstimatesTable};

        let mut state = AppState::default();
        state.set_estimates(EstimatesTable::from_rows(vec![
            EstimateRow {
                country: "India".to_string(),
                year: 2019,
                region: None,
                cases_median: Some(100.0),
                deaths_median: None,
            },
            EstimateRow {
                country: "Brazil".to_string(),
                year: 2021,
                region: None,
                cases_median: Some(50.0),
                deaths_median: None,
            },
        ]));
        assert_eq!(state.estimate_year, Some(2021));
    }

    #[test]
    fn year_range_is_normalised() {
        let mut state = AppState::default();
        state.set_table(CleanedTable::from_papers(vec![
            paper("a", "Nature", Some(2019)),
            paper("b", "Lancet", Some(2021)),
        ]));
        state.set_year_range(2021, 2019);
        assert_eq!(state.filters.years, Some((2019, 2021)));
    }
}
