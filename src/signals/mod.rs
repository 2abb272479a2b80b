//! Signal reconciliation.
//!
//! Turns the latest records of the two upstream SPaT feeds (remaining-time
//! counters and phase status strings) into one ordered list of movements,
//! corrected for the age of the data. Everything here is pure and
//! synchronous; fetching and caching live in the callers.

pub mod codes;
pub mod merge;
pub mod phase;
pub mod reconcile;
pub mod select;
pub mod timing;
pub mod types;
pub mod utility;

pub use merge::merge_items;
pub use phase::extract_phase_status;
pub use reconcile::{SignalSnapshot, reconcile};
pub use select::pick_latest;
pub use timing::extract_timing_items;
pub use types::{MergedItem, PhaseItem, RawRecord, TimingItem};
