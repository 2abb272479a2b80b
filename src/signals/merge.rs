use std::cmp::Ordering;
use std::collections::HashMap;

use crate::signals::codes::{PEDESTRIAN_LABEL, base_movement};
use crate::signals::types::{MergedItem, PhaseItem, TimingItem};

/// Joins timing and phase items on `(direction, base movement)`.
///
/// Every movement seen in either feed appears exactly once. Movements only
/// the phase feed reports keep `sec`, `sec_at_msg` and `key` empty.
pub fn merge_items(timing_items: Vec<TimingItem>, phase_items: Vec<PhaseItem>) -> Vec<MergedItem> {
    let mut merged: Vec<MergedItem> = Vec::with_capacity(timing_items.len() + phase_items.len());
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for t in timing_items {
        let join_key = (t.dir_code.clone(), base_movement(&t.mov_code).to_string());
        match index.get(&join_key) {
            // duplicate join key: later item wins
            Some(&i) => merged[i] = t.into(),
            None => {
                index.insert(join_key, merged.len());
                merged.push(t.into());
            }
        }
    }

    for p in phase_items {
        let join_key = (p.dir_code.clone(), base_movement(&p.mov_code).to_string());
        match index.get(&join_key) {
            Some(&i) => {
                merged[i].status = Some(p.status);
                merged[i].phase_key = Some(p.key);
            }
            None => {
                index.insert(join_key, merged.len());
                merged.push(p.into());
            }
        }
    }

    merged.sort_by(display_order);
    merged
}

fn is_pedestrian(item: &MergedItem) -> bool {
    item.kind == PEDESTRIAN_LABEL
}

/// Pedestrian movements first, then known countdowns ascending, then title.
fn display_order(a: &MergedItem, b: &MergedItem) -> Ordering {
    is_pedestrian(b)
        .cmp(&is_pedestrian(a))
        .then_with(|| match (a.sec, b.sec) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.title.cmp(&b.title))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing(dir: &str, mov: &str, title: &str, kind: &str, sec: f64) -> TimingItem {
        TimingItem {
            title: title.to_string(),
            kind: kind.to_string(),
            sec,
            sec_at_msg: sec,
            dir_code: dir.to_string(),
            mov_code: format!("{mov}RmdrCs"),
            key: format!("{dir}{mov}RmdrCs"),
        }
    }

    fn phase(dir: &str, mov: &str, title: &str, kind: &str, status: &str) -> PhaseItem {
        PhaseItem {
            title: title.to_string(),
            kind: kind.to_string(),
            status: status.to_string(),
            dir_code: dir.to_string(),
            mov_code: format!("{mov}StatNm"),
            key: format!("{dir}{mov}StatNm"),
        }
    }

    #[test]
    fn test_merge_matching_movement() {
        let result = merge_items(
            vec![timing("nt", "Pdsg", "북측 보행", "보행", 10.5)],
            vec![phase("nt", "Pdsg", "북측 보행", "보행", "protected-Movement-Allowed")],
        );

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sec, Some(10.5));
        assert_eq!(result[0].status.as_deref(), Some("protected-Movement-Allowed"));
        assert_eq!(result[0].key.as_deref(), Some("ntPdsgRmdrCs"));
        assert_eq!(result[0].phase_key.as_deref(), Some("ntPdsgStatNm"));
        assert_eq!(result[0].mov_code, "PdsgRmdrCs");
    }

    #[test]
    fn test_timing_without_phase() {
        let result = merge_items(vec![timing("nt", "Stsg", "북측 직진", "직진", 5.0)], vec![]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sec, Some(5.0));
        assert_eq!(result[0].status, None);
        assert_eq!(result[0].phase_key, None);
    }

    #[test]
    fn test_phase_without_timing() {
        let result = merge_items(vec![], vec![phase("et", "Ltsg", "동측 좌회전", "좌회전", "stop-And-Remain")]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sec, None);
        assert_eq!(result[0].sec_at_msg, None);
        assert_eq!(result[0].key, None);
        assert_eq!(result[0].status.as_deref(), Some("stop-And-Remain"));
        assert_eq!(result[0].phase_key.as_deref(), Some("etLtsgStatNm"));
    }

    #[test]
    fn test_pedestrian_first_despite_longer_countdown() {
        let result = merge_items(
            vec![
                timing("nt", "Stsg", "북측 직진", "직진", 5.0),
                timing("nt", "Pdsg", "북측 보행", "보행", 15.0),
            ],
            vec![],
        );

        assert_eq!(result[0].kind, "보행");
        assert_eq!(result[1].kind, "직진");
    }

    #[test]
    fn test_full_ordering_chain() {
        let result = merge_items(
            vec![
                timing("et", "Stsg", "동측 직진", "직진", 8.0),
                timing("st", "Pdsg", "남측 보행", "보행", 20.0),
                timing("wt", "Stsg", "서측 직진", "직진", 2.0),
                timing("nt", "Pdsg", "북측 보행", "보행", 4.0),
            ],
            vec![
                phase("wt", "Pdsg", "서측 보행", "보행", "stop-And-Remain"),
                phase("et", "Pdsg", "동측 보행", "보행", "stop-And-Remain"),
                phase("nt", "Ltsg", "북측 좌회전", "좌회전", "stop-And-Remain"),
                phase("et", "Stsg", "동측 직진", "직진", "permissive-Movement-Allowed"),
            ],
        );

        let titles: Vec<&str> = result.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "북측 보행",
                "남측 보행",
                "동측 보행",
                "서측 보행",
                "서측 직진",
                "동측 직진",
                "북측 좌회전",
            ]
        );
        assert_eq!(result[5].status.as_deref(), Some("permissive-Movement-Allowed"));
    }

    #[test]
    fn test_every_join_key_appears_once() {
        let timing_items = vec![
            timing("nt", "Pdsg", "북측 보행", "보행", 3.0),
            timing("et", "Stsg", "동측 직진", "직진", 6.0),
        ];
        let phase_items = vec![
            phase("nt", "Pdsg", "북측 보행", "보행", "a"),
            phase("st", "Bssg", "남측 버스", "버스", "b"),
            phase("et", "Stsg", "동측 직진", "직진", "c"),
        ];

        let result = merge_items(timing_items, phase_items);
        let mut keys: Vec<(String, String)> = result
            .iter()
            .map(|i| (i.dir_code.clone(), base_movement(&i.mov_code).to_string()))
            .collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 3);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let build = || {
            merge_items(
                vec![
                    timing("nt", "Stsg", "북측 직진", "직진", 5.0),
                    timing("st", "Stsg", "남측 직진", "직진", 5.0),
                ],
                vec![phase("wt", "Utsg", "서측 유턴", "유턴", "x")],
            )
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge_items(vec![], vec![]).is_empty());
    }
}
