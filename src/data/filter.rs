use std::collections::BTreeSet;

use super::model::CleanedTable;

// ---------------------------------------------------------------------------
// Filter predicate: year range + journal selection
// ---------------------------------------------------------------------------

/// User-selected restriction on which rows feed the aggregate views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Inclusive year range. `None` when the table has no parsed dates.
    pub years: Option<(i32, i32)>,
    /// Journals currently selected. Empty set matches nothing.
    pub journals: BTreeSet<String>,
}

/// Initialise a [`FilterState`] that shows everything: the full year span
/// and every journal selected.
pub fn init_filter_state(table: &CleanedTable) -> FilterState {
    FilterState {
        years: table.year_span,
        journals: table.journals.clone(),
    }
}

/// Return indices of rows that pass the active filters.
///
/// A row passes the year filter when:
/// * the selected range equals the table's full span → no constraint, rows
///   without a parsed year pass too;
/// * otherwise the row's year is present and inside the range.
///
/// A row passes the journal filter when every journal is selected (no
/// constraint) or its journal is in the selected set. An empty selection
/// hides everything.
pub fn filtered_indices(table: &CleanedTable, filters: &FilterState) -> Vec<usize> {
    let year_inert = filters.years == table.year_span;
    let journal_inert = filters.journals.len() == table.journals.len();

    table
        .papers
        .iter()
        .enumerate()
        .filter(|(_, paper)| {
            if !year_inert {
                let Some((lo, hi)) = filters.years else {
                    return false;
                };
                match paper.year {
                    Some(y) if (lo..=hi).contains(&y) => {}
                    _ => return false,
                }
            }
            journal_inert || filters.journals.contains(&paper.journal)
        })
        .map(|(i, _)| i)
        .collect()
}
