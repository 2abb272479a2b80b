mod client;

pub use client::{DEFAULT_PHASE_ENDPOINT, DEFAULT_TIMING_ENDPOINT, TDataClient};
