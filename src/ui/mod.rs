//! Presentation layer: panels, charts and the recent-games table.
//! All widgets receive already-computed data; no aggregation happens here.

pub mod panels;
pub mod plot;
pub mod table;
