use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::signals::merge::merge_items;
use crate::signals::phase::extract_phase_status;
use crate::signals::select::pick_latest;
use crate::signals::timing::extract_timing_items;
use crate::signals::types::MergedItem;
use crate::signals::utility::{parse_transmission_time_ms, round_to, to_kst_string};

/// Data older than this is flagged stale. Matches the upstream reporting cadence.
pub const STALE_AFTER_SECS: f64 = 3.0;

/// Reconciled view of one intersection for one poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSnapshot {
    pub items: Vec<MergedItem>,
    /// Transmission time of the fresher feed, `0` if neither had one.
    #[serde(skip)]
    pub trsm_ms: i64,
    pub trsm_kst: Option<String>,
    pub age_sec: Option<f64>,
    pub is_stale: bool,
}

/// Seconds elapsed since `trsm_ms`, rounded to milliseconds. `None` for the
/// no-timestamp sentinel.
pub fn age_seconds(trsm_ms: i64, now_ms: i64) -> Option<f64> {
    if trsm_ms == 0 {
        return None;
    }
    let age = ((now_ms - trsm_ms) as f64 / 1000.0).max(0.0);
    Some(round_to(age, 3))
}

pub fn is_stale(age_sec: Option<f64>) -> bool {
    age_sec.is_none_or(|age| age > STALE_AFTER_SECS)
}

/// Runs the full pipeline over the record arrays of both feeds.
///
/// The fresher of the two latest records is the time reference for latency
/// correction, since either feed may lag the other.
pub fn reconcile(
    timing_records: &[Value],
    phase_records: &[Value],
    itst_id: &str,
    now_ms: i64,
) -> SignalSnapshot {
    let latest_timing = pick_latest(timing_records, itst_id);
    let latest_phase = pick_latest(phase_records, itst_id);

    let trsm_ms = parse_transmission_time_ms(latest_timing).max(parse_transmission_time_ms(latest_phase));
    let age_sec = age_seconds(trsm_ms, now_ms);

    debug!(
        itst_id,
        has_timing = latest_timing.is_some(),
        has_phase = latest_phase.is_some(),
        trsm_ms,
        ?age_sec,
        "Reconciling signal feeds"
    );

    let timing_items = extract_timing_items(latest_timing, age_sec.unwrap_or(0.0));
    let phase_items = extract_phase_status(latest_phase);

    SignalSnapshot {
        items: merge_items(timing_items, phase_items),
        trsm_ms,
        trsm_kst: to_kst_string(trsm_ms),
        age_sec,
        is_stale: is_stale(age_sec),
    }
}
