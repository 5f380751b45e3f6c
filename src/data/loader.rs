use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate};

use super::model::{CleanedTable, LoadError, Paper, UNKNOWN_JOURNAL};

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

// Accepted header spellings per logical field, matched case-insensitively.
// CORD-19 metadata files drift between these variants.
const ID_HEADERS: &[&str] = &["cord_uid", "id", "uid"];
const TITLE_HEADERS: &[&str] = &["title"];
const AUTHOR_HEADERS: &[&str] = &["authors", "author", "creators"];
const JOURNAL_HEADERS: &[&str] = &["journal", "journal_x", "journal_title"];
const SOURCE_HEADERS: &[&str] = &["source_x", "source"];
const DATE_HEADERS: &[&str] = &["publish_time", "publish_date", "date"];
const ABSTRACT_HEADERS: &[&str] = &["abstract", "summary"];

/// Resolved column positions. Only `title` is mandatory; every other
/// field degrades to absent when its column is missing.
struct Columns {
    id: Option<usize>,
    title: usize,
    authors: Option<usize>,
    journal: Option<usize>,
    source: Option<usize>,
    date: Option<usize>,
    abstract_text: Option<usize>,
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<Columns, LoadError> {
    let find = |aliases: &[&str]| {
        headers
            .iter()
            .position(|h| aliases.iter().any(|a| h.trim().eq_ignore_ascii_case(a)))
    };

    Ok(Columns {
        id: find(ID_HEADERS),
        title: find(TITLE_HEADERS).ok_or(LoadError::MissingColumn("title"))?,
        authors: find(AUTHOR_HEADERS),
        journal: find(JOURNAL_HEADERS),
        source: find(SOURCE_HEADERS),
        date: find(DATE_HEADERS),
        abstract_text: find(ABSTRACT_HEADERS),
    })
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a metadata CSV and clean it into a [`CleanedTable`].
///
/// Cleaning rules, applied per row in order:
/// 1. drop the row when the title is missing or blank;
/// 2. fill a missing journal with the `"Unknown"` sentinel;
/// 3. parse the publish date where possible, leave it absent otherwise;
/// 4. derive the year from the parsed date;
/// 5. derive the abstract word count (0 when the abstract is absent).
///
/// `max_rows` caps the number of source rows read. A missing or unreadable
/// file and a header without a title column are fatal; a malformed date in
/// a single row is not.
pub fn load_and_clean(path: &Path, max_rows: Option<usize>) -> Result<CleanedTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(csv::Reader::from_reader(file), max_rows)?;
    log::info!(
        "loaded {} cleaned rows from {} ({} journals, year span {:?})",
        table.len(),
        path.display(),
        table.journals.len(),
        table.year_span,
    );
    Ok(table)
}

/// Loader core, generic over the byte source so tests can feed in-memory CSV.
fn read_table<R: Read>(
    mut reader: csv::Reader<R>,
    max_rows: Option<usize>,
) -> Result<CleanedTable, LoadError> {
    let headers = reader.headers()?.clone();
    let cols = resolve_columns(&headers)?;

    let mut papers = Vec::new();
    for (row_no, result) in reader
        .records()
        .take(max_rows.unwrap_or(usize::MAX))
        .enumerate()
    {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping unreadable row {row_no}: {e}");
                continue;
            }
        };
        if let Some(paper) = clean_row(&record, &cols) {
            papers.push(paper);
        }
    }

    Ok(CleanedTable::from_papers(papers))
}

// ---------------------------------------------------------------------------
// Row cleaning
// ---------------------------------------------------------------------------

/// Trimmed, non-empty field value at an optional column position.
fn field<'a>(record: &'a csv::StringRecord, idx: Option<usize>) -> Option<&'a str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Apply the cleaning rules to one row. Returns `None` when the row is
/// dropped (missing title). Rows are independent of each other.
fn clean_row(record: &csv::StringRecord, cols: &Columns) -> Option<Paper> {
    let title = record
        .get(cols.title)
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let published = field(record, cols.date).and_then(parse_date);

    Some(Paper {
        id: field(record, cols.id).map(str::to_string),
        title,
        authors: field(record, cols.authors).map(str::to_string),
        journal: field(record, cols.journal)
            .unwrap_or(UNKNOWN_JOURNAL)
            .to_string(),
        source: field(record, cols.source).map(str::to_string),
        year: published.map(|d| d.year()),
        published,
        abstract_word_count: field(record, cols.abstract_text)
            .map(|s| s.split_whitespace().count())
            .unwrap_or(0),
    })
}

/// Parse the loose date formats seen in publication metadata.
///
/// Full dates, year-month partials, and bare years are accepted; partials
/// resolve to the first day of the period. Anything else parses to `None`.
fn parse_date(s: &str) -> Option<NaiveDate> {
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%d %b %Y", "%b %d, %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    // "2020-03" → 2020-03-01
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Some(d);
    }

    // Bare "2020" → 2020-01-01. The bounds reject stray row numbers and
    // page counts that happen to land in a date column.
    if let Ok(y) = s.parse::<i32>() {
        if (1800..=2200).contains(&y) {
            return NaiveDate::from_ymd_opt(y, 1, 1);
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn table_from(text: &str, max_rows: Option<usize>) -> Result<CleanedTable, LoadError> {
        read_table(csv::Reader::from_reader(text.as_bytes()), max_rows)
    }

    const SAMPLE: &str = "\
cord_uid,title,journal,publish_time,abstract,source_x
a1,COVID-19 Transmission Study,,2020-03-15,Droplet spread in closed rooms.,PMC
a2,,Nature,2021-01-01,Orphan abstract.,PMC
a3,Mask Efficacy,Lancet,not-a-date,,WHO
a4,Ventilation Review,BMJ,2019,Short note,
";

    #[test]
    fn missing_title_rows_are_dropped() {
        let table = table_from(SAMPLE, None).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.papers.iter().all(|p| !p.title.is_empty()));
    }

    #[test]
    fn missing_journal_gets_sentinel_and_year_is_derived() {
        let table = table_from(SAMPLE, None).unwrap();
        let p = &table.papers[0];
        assert_eq!(p.journal, UNKNOWN_JOURNAL);
        assert_eq!(p.year, Some(2020));
        assert_eq!(p.published, NaiveDate::from_ymd_opt(2020, 3, 15));
        assert_eq!(p.abstract_word_count, 5);
    }

    #[test]
    fn malformed_date_keeps_row_without_year() {
        let table = table_from(SAMPLE, None).unwrap();
        let p = table.papers.iter().find(|p| p.title == "Mask Efficacy").unwrap();
        assert_eq!(p.journal, "Lancet");
        assert_eq!(p.year, None);
        assert_eq!(p.published, None);
    }

    #[test]
    fn partial_dates_resolve_to_first_day() {
        assert_eq!(parse_date("2021-06"), NaiveDate::from_ymd_opt(2021, 6, 1));
        assert_eq!(parse_date("2019"), NaiveDate::from_ymd_opt(2019, 1, 1));
        assert_eq!(parse_date("Mar 15, 2020"), NaiveDate::from_ymd_opt(2020, 3, 15));
        assert_eq!(parse_date("15"), None);
        assert_eq!(parse_date("n/a"), None);
    }

    #[test]
    fn max_rows_caps_source_rows_not_cleaned_rows() {
        // First two source rows: one kept, one dropped for missing title.
        let table = table_from(SAMPLE, Some(2)).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn header_aliases_are_case_insensitive() {
        let text = "Title,Journal_X,Publish_Date\nAlias Check,Cell,2022-05-01\n";
        let table = table_from(text, None).unwrap();
        assert_eq!(table.papers[0].journal, "Cell");
        assert_eq!(table.papers[0].year, Some(2022));
    }

    #[test]
    fn authors_column_is_parsed_when_present() {
        let text = "title,authors,journal\nAuthored Work,\"Smith, J; Doe, A\",Nature\nAnon Work,,Cell\n";
        let table = table_from(text, None).unwrap();
        assert_eq!(table.papers[0].authors.as_deref(), Some("Smith, J; Doe, A"));
        assert_eq!(table.papers[1].authors, None);
    }

    #[test]
    fn missing_title_column_is_a_schema_error() {
        let err = table_from("journal,publish_time\nNature,2020-01-01\n", None).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("title")));
    }

    #[test]
    fn missing_file_is_a_file_access_error() {
        let err = load_and_clean(Path::new("/no/such/metadata.csv"), None).unwrap_err();
        assert!(matches!(err, LoadError::FileAccess { .. }));
    }

    #[test]
    fn loading_is_idempotent() {
        let a = table_from(SAMPLE, None).unwrap();
        let b = table_from(SAMPLE, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn table_indices_cover_years_and_journals() {
        let table = table_from(SAMPLE, None).unwrap();
        assert_eq!(table.year_span, Some((2019, 2020)));
        assert!(table.journals.contains(UNKNOWN_JOURNAL));
        assert!(table.journals.contains("Lancet"));
        assert_eq!(table.journals.len(), 3);
    }
}
