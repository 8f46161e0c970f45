/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ShoppingDataset   (once, shared via Arc)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → FilteredView   (every redraw)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  FilteredView → DashboardCharts  (every redraw)
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
