/// Data layer: core types, loading, type inference and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet   (+ column list .csv)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files → DatasetParts → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  headers, rows (all text), filterable columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐     ┌───────────┐
///   │  types    │ ──▶ │ operators │  column type → offered operators
///   └──────────┘     └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterRow predicates (AND) → visible row indices
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod operators;
pub mod types;
pub mod value;
