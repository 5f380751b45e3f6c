/// Data layer: core types, loading/cleaning, filtering, aggregation.
///
/// Architecture:
/// ```text
///  metadata.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read CSV → clean rows → CleanedTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ CleanedTable │  Vec<Paper>, year span, journal index
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐      ┌────────────┐
///   │  filter   │ ───▶ │ aggregate  │  counts by year / journal / word
///   └──────────┘      └────────────┘
/// ```

pub mod aggregate;
pub mod estimates;
pub mod filter;
pub mod loader;
pub mod model;
