//! Data layer: core types, retrieval, preparation and splitting.
//!
//! Architecture:
//! ```text
//!  object store / local dir / .csv .json .parquet
//!        │
//!        ▼
//!   ┌──────────────────┐
//!   │ remote / loader  │  fetch or read file → Dataset
//!   └──────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ prepare  │  drop the `Id` column
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  split   │  per-row Bernoulli draw → (remaining, selected)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  writer  │  train_df.csv / test_df.csv / val_df.csv
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
pub mod prepare;
pub mod remote;
pub mod split;
pub mod writer;
