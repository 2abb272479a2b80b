use crate::signals::codes::{FieldCode, REMAINING_SUFFIX};
use crate::signals::types::{RawRecord, TimingItem};
use crate::signals::utility::{round_to, timing_raw_to_seconds};

/// Builds remaining-time items from the latest timing record.
///
/// `age_sec` is how long ago the record was transmitted; each countdown is
/// reduced by it and clamped at zero. The result is ordered soonest first,
/// keeping record order among equal countdowns.
pub fn extract_timing_items(record: Option<&RawRecord>, age_sec: f64) -> Vec<TimingItem> {
    let Some(record) = record else {
        return Vec::new();
    };

    let mut out: Vec<TimingItem> = record
        .iter()
        .filter(|(key, _)| key.ends_with(REMAINING_SUFFIX))
        .filter_map(|(key, value)| {
            let sec_at_msg = timing_raw_to_seconds(Some(value))?;
            let sec_now = (sec_at_msg - age_sec).max(0.0);
            let code = FieldCode::split(key);

            Some(TimingItem {
                title: code.title(),
                kind: code.movement_label().to_string(),
                sec: round_to(sec_now, 1),
                sec_at_msg: round_to(sec_at_msg, 1),
                dir_code: code.dir_code.to_string(),
                mov_code: code.mov_code.to_string(),
                key: key.clone(),
            })
        })
        .collect();

    out.sort_by(|a, b| a.sec.total_cmp(&b.sec));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_latency_corrected_pedestrian_countdown() {
        let rec = record(json!({ "itstId": "1000", "ntPdsgRmdrCs": 120 }));
        let items = extract_timing_items(Some(&rec), 5.0);

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.title, "북측 보행");
        assert_eq!(item.kind, "보행");
        assert_eq!(item.sec, 7.0);
        assert_eq!(item.sec_at_msg, 12.0);
        assert_eq!(item.dir_code, "nt");
        assert_eq!(item.mov_code, "PdsgRmdrCs");
        assert_eq!(item.key, "ntPdsgRmdrCs");
    }

    #[test]
    fn test_countdown_clamped_at_zero() {
        let rec = record(json!({ "stStsgRmdrCs": 30 }));
        let items = extract_timing_items(Some(&rec), 10.0);
        assert_eq!(items[0].sec, 0.0);
        assert_eq!(items[0].sec_at_msg, 3.0);
    }

    #[test]
    fn test_skips_null_and_non_numeric_values() {
        let rec = record(json!({
            "ntPdsgRmdrCs": null,
            "etStsgRmdrCs": "abc",
            "wtLtsgRmdrCs": 45,
            "ntPdsgStatNm": "stop-And-Remain",
            "trsmUtcTime": 1705651200000_i64,
        }));
        let items = extract_timing_items(Some(&rec), 0.0);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key, "wtLtsgRmdrCs");
        assert_eq!(items[0].title, "서측 좌회전");
    }

    #[test]
    fn test_sorted_soonest_first() {
        let rec = record(json!({
            "ntStsgRmdrCs": 300,
            "etStsgRmdrCs": 50,
            "stStsgRmdrCs": 120,
        }));
        let items = extract_timing_items(Some(&rec), 0.0);
        let secs: Vec<f64> = items.iter().map(|i| i.sec).collect();
        assert_eq!(secs, vec![5.0, 12.0, 30.0]);
    }

    #[test]
    fn test_ties_keep_record_order() {
        let rec = record(json!({
            "stStsgRmdrCs": 10,
            "ntStsgRmdrCs": 10,
            "etStsgRmdrCs": 10,
        }));
        let keys: Vec<String> = extract_timing_items(Some(&rec), 5.0)
            .into_iter()
            .map(|i| i.key)
            .collect();
        assert_eq!(keys, vec!["stStsgRmdrCs", "ntStsgRmdrCs", "etStsgRmdrCs"]);
    }

    #[test]
    fn test_ties_follow_upstream_body_order() {
        let rec: RawRecord =
            serde_json::from_str(r#"{"wtLtsgRmdrCs":4,"stStsgRmdrCs":4,"ntStsgRmdrCs":4,"etStsgRmdrCs":4}"#)
                .unwrap();
        let keys: Vec<String> = extract_timing_items(Some(&rec), 0.0)
            .into_iter()
            .map(|i| i.key)
            .collect();
        assert_eq!(
            keys,
            vec!["wtLtsgRmdrCs", "stStsgRmdrCs", "ntStsgRmdrCs", "etStsgRmdrCs"]
        );
    }

    #[test]
    fn test_unknown_codes_pass_through() {
        let rec = record(json!({ "qqZzzzRmdrCs": 15 }));
        let items = extract_timing_items(Some(&rec), 0.0);
        assert_eq!(items[0].title, "qq ZzzzRmdrCs");
        assert_eq!(items[0].kind, "ZzzzRmdrCs");
    }

    #[test]
    fn test_sec_never_exceeds_sec_at_msg() {
        let rec = record(json!({ "ntPdsgRmdrCs": 77, "etBcsgRmdrCs": 3, "swUtsgRmdrCs": 250 }));
        for age in [0.0, 0.3, 1.0, 7.7, 100.0] {
            for item in extract_timing_items(Some(&rec), age) {
                assert!(item.sec <= item.sec_at_msg);
                if age >= item.sec_at_msg {
                    assert_eq!(item.sec, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_missing_record_is_empty() {
        assert!(extract_timing_items(None, 1.0).is_empty());
    }
}
