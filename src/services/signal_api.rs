//! Trait for the upstream SPaT gateway.

use std::fmt;
use std::time::Duration;

use anyhow::Result;

use crate::fetch::UpstreamResponse;

/// Which of the two SPaT endpoints to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalFeed {
    /// Per-movement remaining-time counters.
    Timing,
    /// Per-movement phase status strings.
    Phase,
}

impl SignalFeed {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalFeed::Timing => "timing",
            SignalFeed::Phase => "phase",
        }
    }
}

impl fmt::Display for SignalFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstraction over the SPaT data provider (e.g. the Seoul t-data gateway).
///
/// Implementations return the raw response even when it is not JSON or not
/// successful; interpreting it is up to the caller.
#[async_trait::async_trait]
pub trait SignalApi: Send + Sync {
    async fn fetch(
        &self,
        feed: SignalFeed,
        itst_id: &str,
        timeout: Duration,
    ) -> Result<UpstreamResponse>;
}
