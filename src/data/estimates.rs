use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use super::model::LoadError;

// ---------------------------------------------------------------------------
// Estimated country numbers: loader and aggregates
// ---------------------------------------------------------------------------
//
// Second dataset of the explorer: country-year estimates with median case
// and death counts. Cleaning mirrors the metadata loader: rows missing the
// country or an unparseable year are dropped, unparseable medians degrade
// to absent values.

// Accepted header spellings, matched case-insensitively after trimming.
const COUNTRY_HEADERS: &[&str] = &["country"];
const YEAR_HEADERS: &[&str] = &["year"];
const CASES_HEADERS: &[&str] = &["no. of cases_median", "cases_median"];
const DEATHS_HEADERS: &[&str] = &["no. of deaths_median", "deaths_median"];
const REGION_HEADERS: &[&str] = &["who region", "region"];

/// One cleaned country-year estimate row.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateRow {
    pub country: String,
    pub year: i32,
    pub region: Option<String>,
    /// Median estimated cases, absent when the source value is not numeric.
    pub cases_median: Option<f64>,
    pub deaths_median: Option<f64>,
}

/// The cleaned estimates dataset with its distinct-year index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EstimatesTable {
    pub rows: Vec<EstimateRow>,
    /// Sorted set of years present.
    pub years: BTreeSet<i32>,
}

impl EstimatesTable {
    pub fn from_rows(rows: Vec<EstimateRow>) -> Self {
        let years = rows.iter().map(|r| r.year).collect();
        EstimatesTable { rows, years }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most recent year present, the default for the top-countries view.
    pub fn latest_year(&self) -> Option<i32> {
        self.years.iter().next_back().copied()
    }
}

struct Columns {
    country: usize,
    year: usize,
    cases: Option<usize>,
    deaths: Option<usize>,
    region: Option<usize>,
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<Columns, LoadError> {
    let find = |aliases: &[&str]| {
        headers
            .iter()
            .position(|h| aliases.iter().any(|a| h.trim().eq_ignore_ascii_case(a)))
    };

    Ok(Columns {
        country: find(COUNTRY_HEADERS).ok_or(LoadError::MissingColumn("country"))?,
        year: find(YEAR_HEADERS).ok_or(LoadError::MissingColumn("year"))?,
        cases: find(CASES_HEADERS),
        deaths: find(DEATHS_HEADERS),
        region: find(REGION_HEADERS),
    })
}

/// Load an estimated-numbers CSV and clean it into an [`EstimatesTable`].
///
/// `country` and `year` columns are required; the median and region columns
/// are optional. `max_rows` caps the number of source rows read.
pub fn load_estimates(path: &Path, max_rows: Option<usize>) -> Result<EstimatesTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_estimates(csv::Reader::from_reader(file), max_rows)?;
    log::info!(
        "loaded {} estimate rows from {} ({} years)",
        table.len(),
        path.display(),
        table.years.len(),
    );
    Ok(table)
}

fn read_estimates<R: Read>(
    mut reader: csv::Reader<R>,
    max_rows: Option<usize>,
) -> Result<EstimatesTable, LoadError> {
    let headers = reader.headers()?.clone();
    let cols = resolve_columns(&headers)?;

    let mut rows = Vec::new();
    for (row_no, result) in reader
        .records()
        .take(max_rows.unwrap_or(usize::MAX))
        .enumerate()
    {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping unreadable estimate row {row_no}: {e}");
                continue;
            }
        };
        if let Some(row) = clean_row(&record, &cols) {
            rows.push(row);
        }
    }

    Ok(EstimatesTable::from_rows(rows))
}

fn field<'a>(record: &'a csv::StringRecord, idx: Option<usize>) -> Option<&'a str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Clean one row. Rows without a country or a parseable year are dropped;
/// non-numeric medians are kept as absent values.
fn clean_row(record: &csv::StringRecord, cols: &Columns) -> Option<EstimateRow> {
    let country = record
        .get(cols.country)
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();
    let year = record.get(cols.year)?.trim().parse::<i32>().ok()?;

    Some(EstimateRow {
        country,
        year,
        region: field(record, cols.region).map(str::to_string),
        cases_median: field(record, cols.cases).and_then(|s| s.parse().ok()),
        deaths_median: field(record, cols.deaths).and_then(|s| s.parse().ok()),
    })
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Total median cases per year summed across countries. Rows with an absent
/// median contribute nothing.
pub fn cases_by_year(table: &EstimatesTable) -> BTreeMap<i32, f64> {
    let mut totals = BTreeMap::new();
    for row in &table.rows {
        if let Some(cases) = row.cases_median {
            *totals.entry(row.year).or_insert(0.0) += cases;
        }
    }
    totals
}

/// Top `top_n` countries by median cases for one year, largest first. Rows
/// with an absent median are excluded; ties keep source order.
pub fn top_countries_for_year(table: &EstimatesTable, year: i32, top_n: usize) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = table
        .rows
        .iter()
        .filter(|r| r.year == year)
        .filter_map(|r| r.cases_median.map(|c| (r.country.clone(), c)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_from(text: &str, max_rows: Option<usize>) -> Result<EstimatesTable, LoadError> {
        read_estimates(csv::Reader::from_reader(text.as_bytes()), max_rows)
    }

    const SAMPLE: &str = "\
Country,Year,No. of cases_median,No. of deaths_median,WHO Region
India,2019,1500.5,40,South-East Asia
India,2020,2500,60,South-East Asia
Brazil,2020,1800,50,Americas
Brazil,2021,not-a-number,30,Americas
,2020,999,10,Africa
France,n/a,100,5,Europe
";

    #[test]
    fn rows_without_country_or_year_are_dropped() {
        let table = table_from(SAMPLE, None).unwrap();
        assert_eq!(table.len(), 4);
        assert!(table.rows.iter().all(|r| !r.country.is_empty()));
        assert_eq!(table.years, BTreeSet::from([2019, 2020, 2021]));
    }

    #[test]
    fn non_numeric_medians_become_absent() {
        let table = table_from(SAMPLE, None).unwrap();
        let row = table
            .rows
            .iter()
            .find(|r| r.country == "Brazil" && r.year == 2021)
            .unwrap();
        assert_eq!(row.cases_median, None);
        assert_eq!(row.deaths_median, Some(30.0));
        assert_eq!(row.region.as_deref(), Some("Americas"));
    }

    #[test]
    fn cases_by_year_sums_present_medians() {
        let table = table_from(SAMPLE, None).unwrap();
        let totals = cases_by_year(&table);
        assert_eq!(totals.get(&2019), Some(&1500.5));
        assert_eq!(totals.get(&2020), Some(&4300.0));
        // 2021 has only an absent median, so the year does not appear.
        assert_eq!(totals.get(&2021), None);
    }

    #[test]
    fn top_countries_rank_one_year_descending() {
        let table = table_from(SAMPLE, None).unwrap();
        let top = top_countries_for_year(&table, 2020, 10);
        assert_eq!(
            top,
            vec![("India".to_string(), 2500.0), ("Brazil".to_string(), 1800.0)]
        );
        assert_eq!(top_countries_for_year(&table, 2020, 1).len(), 1);
        assert!(top_countries_for_year(&table, 1999, 10).is_empty());
    }

    #[test]
    fn missing_required_columns_are_schema_errors() {
        let err = table_from("Country,cases\nIndia,5\n", None).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("year")));
        let err = table_from("Year,cases\n2020,5\n", None).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("country")));
    }

    #[test]
    fn missing_file_is_a_file_access_error() {
        let err = load_estimates(Path::new("/no/such/estimated_numbers.csv"), None).unwrap_err();
        assert!(matches!(err, LoadError::FileAccess { .. }));
    }

    #[test]
    fn latest_year_is_the_default_selection() {
        let table = table_from(SAMPLE, None).unwrap();
        assert_eq!(table.latest_year(), Some(2021));
        assert_eq!(EstimatesTable::default().latest_year(), None);
    }

    #[test]
    fn max_rows_caps_source_rows() {
        let table = table_from(SAMPLE, Some(2)).unwrap();
        assert_eq!(table.len(), 2);
    }
}
