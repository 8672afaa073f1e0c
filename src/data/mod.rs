//! Data layer: core types, loading, and the view pipeline.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  raw rows → normalize → GameDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ GameDataset  │  Vec<GameRecord>, selector indexes
//!   └─────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  selection → sorted view + running totals
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
