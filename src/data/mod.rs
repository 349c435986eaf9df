/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .json / directory of .parquet|.csv|.json sheets
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read both sheets → typed records
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ DatasetStore  │  Vec<EmployeeRecord>, Vec<SatisfactionRecord>, filter options
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  department / year selection → ordered row views
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
