//! Aggregation of posted journal lines into per-account movement.
//!
//! Every report recomputes from the selected entries; nothing is cached.

pub mod engine;
pub mod window;


pub use engine::{AccountMovement, AggregationEngine, MovementMap};
pub use window::{DateWindow, EntrySelection};
