/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RentalDataset (day type derived per row)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ RentalDataset │  Vec<RentalRecord>, immutable
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply Selection predicates → FilteredView (indices)
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
pub mod sample;
