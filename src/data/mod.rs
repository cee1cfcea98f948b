//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  chicago.csv / new_york_city.parquet / washington.json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  locate + parse file → TripDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ TripDataset  │  Vec<Trip>, demographic column flags
//!   └─────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  month / weekday equality → subset
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
