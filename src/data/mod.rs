/// Data layer: core types, loading, classification and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + clean rows → AirQualityDataset   (cache: once per path)
///   └──────────┘
///        │            category: AQI score → band + color
///        ▼
///   ┌───────────────────┐
///   │ AirQualityDataset  │  Vec<AirQualityRecord>, selector indices
///   └───────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  record type → dates → station → PM2.5 → indices
///   └──────────┘
///        │
///        ▼
///   stats (summary) · projection (map markers, table cells)
/// ```

pub mod cache;
pub mod category;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod projection;
pub mod stats;
