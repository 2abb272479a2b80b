use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde_json::Value;

use crate::signals::types::RawRecord;

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const KST_OFFSET_SECS: i32 = 9 * 60 * 60;

/// Primary transmission timestamp field (epoch milliseconds).
pub const TRSM_FIELD: &str = "trsmUtcTime";
/// Fallback registration timestamp (epoch milliseconds or ISO-8601 string).
pub const REG_FIELD: &str = "regDt";

fn parse_numeric_str(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Reads a JSON number or a numeric string as a finite `f64`.
pub fn as_finite_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

/// Converts an upstream remaining-time counter (tenths of a second) into seconds.
/// Returns `None` when the value is missing or not numeric.
pub fn timing_raw_to_seconds(raw: Option<&Value>) -> Option<f64> {
    raw.and_then(as_finite_number).map(|n| n / 10.0)
}

/// Extracts the transmission time of a record in epoch milliseconds.
///
/// `trsmUtcTime` wins when it is a positive number; otherwise `regDt` is
/// used either as a number or as an ISO-8601 date-time. Returns `0` when
/// neither field is usable, and `0` must be read as "no timestamp".
pub fn parse_transmission_time_ms(record: Option<&RawRecord>) -> i64 {
    let Some(record) = record else {
        return 0;
    };

    if let Some(t) = record.get(TRSM_FIELD).and_then(as_finite_number) {
        if t > 0.0 {
            return t as i64;
        }
    }

    match record.get(REG_FIELD) {
        Some(Value::Number(n)) => match n.as_f64() {
            // `as` saturates out-of-range values; to_kst_string rejects those
            Some(t) if t.is_finite() && t > 0.0 => t as i64,
            _ => 0,
        },
        Some(Value::String(s)) => match parse_numeric_str(s) {
            Some(t) if t > 0.0 => t as i64,
            _ => parse_iso_ms(s).filter(|ms| *ms > 0).unwrap_or(0),
        },
        _ => 0,
    }
}

/// Parses an RFC 3339 date-time, or a zone-less ISO date-time taken as UTC.
fn parse_iso_ms(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Great-circle distance in meters between two WGS84 points.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).expect("+09:00 is a valid offset")
}

fn format_kst(dt: DateTime<Utc>, with_ms: bool) -> String {
    let fmt = if with_ms {
        "%Y-%m-%d %H:%M:%S%.3f"
    } else {
        "%Y-%m-%d %H:%M:%S"
    };
    dt.with_timezone(&kst()).format(fmt).to_string()
}

/// Formats an epoch-millisecond instant as `YYYY-MM-DD HH:MM:SS.mmm` in KST.
/// Returns `None` for the `0` sentinel.
pub fn to_kst_string(epoch_ms: i64) -> Option<String> {
    if epoch_ms == 0 {
        return None;
    }
    DateTime::from_timestamp_millis(epoch_ms).map(|dt| format_kst(dt, true))
}

/// Current wall-clock time in KST.
pub fn now_kst_string(with_ms: bool) -> String {
    format_kst(Utc::now(), with_ms)
}

/// Rounds to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
