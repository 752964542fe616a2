//! Calendar periods used to bucket journal entries.

pub mod period;

pub use period::PeriodLabel;
