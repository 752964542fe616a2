//! Matching external transactions against posted journal lines.

pub mod error;
pub mod matcher;
pub mod types;

pub use error::ReconError;
pub use matcher::ReconMatcher;
pub use types::{MatchSuggestion, NewReconItem, ReconItem, ReconStatus};
