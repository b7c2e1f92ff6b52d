/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Row>, column kinds, unique-value index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply categorical predicates → filtered indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
