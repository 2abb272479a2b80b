use serde_json::Value;

use crate::signals::codes::{FieldCode, STATUS_SUFFIX};
use crate::signals::types::{PhaseItem, RawRecord};

/// Builds status items from the latest phase record, ordered by title.
pub fn extract_phase_status(record: Option<&RawRecord>) -> Vec<PhaseItem> {
    let Some(record) = record else {
        return Vec::new();
    };

    let mut out: Vec<PhaseItem> = record
        .iter()
        .filter(|(key, value)| key.ends_with(STATUS_SUFFIX) && !value.is_null())
        .map(|(key, value)| {
            let code = FieldCode::split(key);
            let status = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };

            PhaseItem {
                title: code.title(),
                kind: code.movement_label().to_string(),
                status,
                dir_code: code.dir_code.to_string(),
                mov_code: code.mov_code.to_string(),
                key: key.clone(),
            }
        })
        .collect();

    out.sort_by(|a, b| a.title.cmp(&b.title));
    out
}
