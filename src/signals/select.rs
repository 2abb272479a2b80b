use serde_json::Value;

use crate::signals::types::RawRecord;
use crate::signals::utility::parse_transmission_time_ms;

/// Intersection identifier field carried by every upstream record.
pub const ITST_ID_FIELD: &str = "itstId";

/// Renders the `itstId` of a record as a string, whatever its JSON type.
fn itst_id_of(record: &RawRecord) -> String {
    match record.get(ITST_ID_FIELD) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Picks the most recently transmitted record for `itst_id`.
///
/// Non-object entries are ignored. Among records with equal transmission
/// time the first one wins, so a record without a timestamp is only chosen
/// when no other candidate has one.
pub fn pick_latest<'a>(records: &'a [Value], itst_id: &str) -> Option<&'a RawRecord> {
    records
        .iter()
        .filter_map(Value::as_object)
        .filter(|r| itst_id_of(r) == itst_id)
        .fold(None::<(&RawRecord, i64)>, |best, r| {
            let t = parse_transmission_time_ms(Some(r));
            match best {
                Some((_, best_t)) if best_t >= t => best,
                _ => Some((r, t)),
            }
        })
        .map(|(r, _)| r)
}
