use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Sentinel substituted for a missing journal name during cleaning.
pub const UNKNOWN_JOURNAL: &str = "Unknown";

// ---------------------------------------------------------------------------
// Paper – one cleaned row of the source CSV
// ---------------------------------------------------------------------------

/// A single publication record after cleaning.
///
/// Invariant: `title` is never empty — rows without a title are dropped by
/// the loader. `journal` is always present, with [`UNKNOWN_JOURNAL`]
/// standing in for a missing value. `published` and `year` are absent when
/// the source date failed to parse; `year` is derived from `published`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paper {
    /// Source identifier (`cord_uid` or similar), if the column exists.
    pub id: Option<String>,
    pub title: String,
    /// Author list as it appears in the source, left absent when missing.
    pub authors: Option<String>,
    pub journal: String,
    /// Collection source (`source_x`), left absent when missing.
    pub source: Option<String>,
    pub published: Option<NaiveDate>,
    pub year: Option<i32>,
    /// Whitespace-separated word count of the abstract (0 when absent).
    pub abstract_word_count: usize,
}

// ---------------------------------------------------------------------------
// CleanedTable – the complete cleaned dataset
// ---------------------------------------------------------------------------

/// The full cleaned dataset with pre-computed category indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedTable {
    /// All cleaned rows, in source order.
    pub papers: Vec<Paper>,
    /// Min/max derived year present, `None` when no row has a parsed date.
    pub year_span: Option<(i32, i32)>,
    /// Sorted set of distinct journal names (includes the sentinel).
    pub journals: BTreeSet<String>,
}

impl CleanedTable {
    /// Build category indices from cleaned rows.
    pub fn from_papers(papers: Vec<Paper>) -> Self {
        let mut year_span: Option<(i32, i32)> = None;
        let mut journals = BTreeSet::new();

        for paper in &papers {
            journals.insert(paper.journal.clone());
            if let Some(y) = paper.year {
                year_span = Some(match year_span {
                    Some((lo, hi)) => (lo.min(y), hi.max(y)),
                    None => (y, y),
                });
            }
        }

        CleanedTable {
            papers,
            year_span,
            journals,
        }
    }

    /// Number of cleaned rows.
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// LoadError – fatal loading failures
// ---------------------------------------------------------------------------

/// Errors that abort a load. Per-row date/field parse failures are not
/// errors; they leave the affected fields absent.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("required column '{0}' missing from CSV header")]
    MissingColumn(&'static str),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}
