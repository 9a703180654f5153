/// Data layer: core types, loading, and export.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<Measurement>
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ Measurement  │  label, estimate, SE
///   └─────────────┘
///        │
///        ▼  (statistics layer)
///   ┌──────────┐
///   │  export   │  comparison table → CSV
///   └──────────┘
/// ```
pub mod export;
pub mod loader;
pub mod model;
