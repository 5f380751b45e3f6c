use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::model::{CleanedTable, UNKNOWN_JOURNAL};

// ---------------------------------------------------------------------------
// Aggregate views: pure functions of (table, row subset)
// ---------------------------------------------------------------------------
//
// Every function here takes an explicit index subset so the same code serves
// the unfiltered table and the dashboard's filtered views. Empty input
// produces an empty view.

/// Words ignored by the title word-frequency view.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "and", "of", "in", "to", "a", "for", "on", "with", "by", "an", "from", "study",
    "studies", "using", "use", "based",
];

/// Knobs for [`title_word_frequency`]. The stop list and minimum token
/// length are configuration, not fixed behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordFrequencyConfig {
    /// Shortest token kept.
    pub min_len: usize,
    /// Number of top words returned.
    pub top_n: usize,
    pub stopwords: BTreeSet<String>,
}

impl Default for WordFrequencyConfig {
    fn default() -> Self {
        WordFrequencyConfig {
            min_len: 2,
            top_n: 50,
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Publication counts per derived year. Rows without a parsed year are
/// excluded, so the counts sum to the number of rows with a date.
pub fn publications_by_year(table: &CleanedTable, indices: &[usize]) -> BTreeMap<i32, u64> {
    let mut counts = BTreeMap::new();
    for &i in indices {
        if let Some(year) = table.papers[i].year {
            *counts.entry(year).or_insert(0) += 1;
        }
    }
    counts
}

/// Top `top_n` journals by row count. The `"Unknown"` sentinel is a real
/// key; every row contributes exactly one count, so the untruncated counts
/// sum to the subset size.
pub fn journal_counts(table: &CleanedTable, indices: &[usize], top_n: usize) -> Vec<(String, u64)> {
    let mut ranked = ranked_counts(indices.iter().map(|&i| table.papers[i].journal.clone()));
    ranked.truncate(top_n);
    ranked
}

/// Row counts per collection source, missing sources counted as `"Unknown"`.
pub fn source_counts(table: &CleanedTable, indices: &[usize]) -> Vec<(String, u64)> {
    ranked_counts(indices.iter().map(|&i| {
        table.papers[i]
            .source
            .clone()
            .unwrap_or_else(|| UNKNOWN_JOURNAL.to_string())
    }))
}

/// Word frequency over titles: lowercase, split on non-alphabetic
/// boundaries, drop tokens shorter than `cfg.min_len` and stop-words,
/// return the top `cfg.top_n` by count. Ties keep first-encountered order.
pub fn title_word_frequency(
    table: &CleanedTable,
    indices: &[usize],
    cfg: &WordFrequencyConfig,
) -> Vec<(String, u64)> {
    let words = indices.iter().flat_map(|&i| {
        table.papers[i]
            .title
            .to_lowercase()
            .split(|c: char| !c.is_ascii_alphabetic())
            // Consecutive separators yield empty tokens; drop them even
            // when min_len is 0.
            .filter(|w| !w.is_empty() && w.len() >= cfg.min_len && !cfg.stopwords.contains(*w))
            .map(str::to_string)
            .collect::<Vec<_>>()
    });

    let mut ranked = ranked_counts(words);
    ranked.truncate(cfg.top_n);
    ranked
}

/// Count keys and rank by descending count, breaking ties by the order in
/// which each key was first seen.
fn ranked_counts(keys: impl Iterator<Item = String>) -> Vec<(String, u64)> {
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut ordered: Vec<(String, u64)> = Vec::new();

    for key in keys {
        match first_seen.get(&key) {
            Some(&slot) => ordered[slot].1 += 1,
            None => {
                first_seen.insert(key.clone(), ordered.len());
                ordered.push((key, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    ordered.sort_by(|a, b| b.1.cmp(&a.1));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Paper;

    fn paper(title: &str, journal: &str, source: Option<&str>, year: Option<i32>) -> Paper {
        Paper {
            id: None,
            title: title.to_string(),
            authors: None,
            journal: journal.to_string(),
            source: source.map(str::to_string),
            published: year.and_then(|y| chrono::NaiveDate::from_ymd_opt(y, 1, 1)),
            year,
            abstract_word_count: 0,
        }
    }

    fn table() -> CleanedTable {
        CleanedTable::from_papers(vec![
            paper("Viral Spread Dynamics", "Nature", Some("PMC"), Some(2020)),
            paper("Vaccine Trial Results", "Lancet", Some("PMC"), Some(2020)),
            paper("Ward Ventilation Audit", UNKNOWN_JOURNAL, None, Some(2021)),
            paper("Undated Serology Report", "Nature", Some("WHO"), None),
        ])
    }

    fn all(table: &CleanedTable) -> Vec<usize> {
        (0..table.len()).collect()
    }

    #[test]
    fn year_counts_sum_to_rows_with_a_date() {
        let t = table();
        let counts = publications_by_year(&t, &all(&t));
        assert_eq!(counts, BTreeMap::from([(2020, 2), (2021, 1)]));
        let dated = t.papers.iter().filter(|p| p.year.is_some()).count() as u64;
        assert_eq!(counts.values().sum::<u64>(), dated);
    }

    #[test]
    fn journal_counts_sum_to_table_length() {
        let t = table();
        let counts = journal_counts(&t, &all(&t), usize::MAX);
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<u64>(), t.len() as u64);
        assert_eq!(counts[0], ("Nature".to_string(), 2));
        assert!(counts.contains(&(UNKNOWN_JOURNAL.to_string(), 1)));
    }

    #[test]
    fn source_counts_fill_missing_with_sentinel() {
        let t = table();
        let counts = source_counts(&t, &all(&t));
        assert_eq!(counts[0], ("PMC".to_string(), 2));
        assert!(counts.contains(&(UNKNOWN_JOURNAL.to_string(), 1)));
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<u64>(), t.len() as u64);
    }

    #[test]
    fn word_frequency_honours_min_len_and_stopwords() {
        let t = CleanedTable::from_papers(vec![
            paper("The Mask Study", UNKNOWN_JOURNAL, None, None),
            paper("Mask Transmission Study", UNKNOWN_JOURNAL, None, None),
        ]);
        let cfg = WordFrequencyConfig {
            min_len: 4,
            top_n: 10,
            stopwords: ["the", "and", "study"].iter().map(|s| s.to_string()).collect(),
        };
        let freq = title_word_frequency(&t, &all(&t), &cfg);
        assert_eq!(
            freq,
            vec![("mask".to_string(), 2), ("transmission".to_string(), 1)]
        );
    }

    #[test]
    fn word_frequency_splits_on_non_alphabetic() {
        let t = CleanedTable::from_papers(vec![paper(
            "COVID-19 aerosol/droplet overlap",
            UNKNOWN_JOURNAL,
            None,
            None,
        )]);
        let freq = title_word_frequency(&t, &all(&t), &WordFrequencyConfig::default());
        let words: Vec<&str> = freq.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["covid", "aerosol", "droplet", "overlap"]);
    }

    #[test]
    fn zero_min_len_never_counts_empty_tokens() {
        let t = CleanedTable::from_papers(vec![paper(
            "gap--between//words 123",
            UNKNOWN_JOURNAL,
            None,
            None,
        )]);
        let cfg = WordFrequencyConfig {
            min_len: 0,
            ..WordFrequencyConfig::default()
        };
        let freq = title_word_frequency(&t, &all(&t), &cfg);
        assert!(freq.iter().all(|(w, _)| !w.is_empty()));
        let words: Vec<&str> = freq.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["gap", "between", "words"]);
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        let ranked = ranked_counts(
            ["beta", "alpha", "beta", "gamma", "alpha", "delta"]
                .iter()
                .map(|s| s.to_string()),
        );
        assert_eq!(
            ranked,
            vec![
                ("beta".to_string(), 2),
                ("alpha".to_string(), 2),
                ("gamma".to_string(), 1),
                ("delta".to_string(), 1),
            ]
        );
    }

    #[test]
    fn empty_subset_produces_empty_views() {
        let t = table();
        assert!(publications_by_year(&t, &[]).is_empty());
        assert!(journal_counts(&t, &[], 10).is_empty());
        assert!(source_counts(&t, &[]).is_empty());
        assert!(title_word_frequency(&t, &[], &WordFrequencyConfig::default()).is_empty());
    }
}
