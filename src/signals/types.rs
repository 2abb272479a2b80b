//! Data types produced by the reconciliation pipeline.

use serde::Serialize;
use serde_json::{Map, Value};

/// One upstream record: field name to JSON value.
pub type RawRecord = Map<String, Value>;

/// Remaining time of one movement, corrected for message age.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingItem {
    pub title: String,
    pub kind: String,
    /// Seconds left now, never negative.
    pub sec: f64,
    /// Seconds left when the upstream message was transmitted.
    pub sec_at_msg: f64,
    pub dir_code: String,
    pub mov_code: String,
    pub key: String,
}

/// Signal state string of one movement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseItem {
    pub title: String,
    pub kind: String,
    pub status: String,
    pub dir_code: String,
    pub mov_code: String,
    pub key: String,
}

/// A movement as displayed, joined from both feeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedItem {
    pub title: String,
    pub kind: String,
    pub sec: Option<f64>,
    pub sec_at_msg: Option<f64>,
    pub status: Option<String>,
    pub dir_code: String,
    pub mov_code: String,
    /// Timing field name, when the timing feed reported this movement.
    pub key: Option<String>,
    /// Phase field name, when the phase feed reported this movement.
    pub phase_key: Option<String>,
}

impl From<TimingItem> for MergedItem {
    fn from(t: TimingItem) -> Self {
        MergedItem {
            title: t.title,
            kind: t.kind,
            sec: Some(t.sec),
            sec_at_msg: Some(t.sec_at_msg),
            status: None,
            dir_code: t.dir_code,
            mov_code: t.mov_code,
            key: Some(t.key),
            phase_key: None,
        }
    }
}

impl From<PhaseItem> for MergedItem {
    fn from(p: PhaseItem) -> Self {
        MergedItem {
            title: p.title,
            kind: p.kind,
            sec: None,
            sec_at_msg: None,
            status: Some(p.status),
            dir_code: p.dir_code,
            mov_code: p.mov_code,
            key: None,
            phase_key: Some(p.key),
        }
    }
}
