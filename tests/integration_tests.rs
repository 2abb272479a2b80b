use serde_json::Value;
use spat_dashboard::payload::find_first_array;
use spat_dashboard::signals::{extract_phase_status, extract_timing_items, merge_items, pick_latest, reconcile};

const NOW: i64 = 1_705_651_205_000;

fn load(fixture: &str) -> Value {
    serde_json::from_str(fixture).expect("Failed to parse fixture")
}

#[test]
fn test_full_pipeline() {
    let timing = load(include_str!("fixtures/timing_sample.json"));
    let phase = load(include_str!("fixtures/phase_sample.json"));
    let timing_records = find_first_array(&timing).expect("timing array");
    let phase_records = find_first_array(&phase).expect("phase array");

    let snap = reconcile(timing_records, phase_records, "1560", NOW);

    // the phase record is one second fresher than the latest timing record
    assert_eq!(snap.age_sec, Some(2.0));
    assert!(!snap.is_stale);
    assert_eq!(snap.trsm_kst.as_deref(), Some("2024-01-19 17:00:03.000"));

    let titles: Vec<&str> = snap.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "북측 보행",
            "동측 보행",
            "서측 버스",
            "남측 직진",
            "북측 직진",
            "동측 좌회전",
            "남서측 유턴",
        ]
    );

    let ped = &snap.items[0];
    assert_eq!(ped.sec, Some(10.0));
    assert_eq!(ped.sec_at_msg, Some(12.0));
    assert_eq!(ped.status.as_deref(), Some("protected-Movement-Allowed"));
    assert_eq!(ped.key.as_deref(), Some("ntPdsgRmdrCs"));
    assert_eq!(ped.phase_key.as_deref(), Some("ntPdsgStatNm"));

    // reported by the phase feed only
    let east_ped = &snap.items[1];
    assert_eq!(east_ped.sec, None);
    assert_eq!(east_ped.key, None);
    assert_eq!(east_ped.status.as_deref(), Some("stop-And-Remain"));

    assert_eq!(snap.items[2].sec, Some(0.0));
}

#[test]
fn test_pipeline_properties_hold() {
    let timing = load(include_str!("fixtures/timing_sample.json"));
    let phase = load(include_str!("fixtures/phase_sample.json"));
    let timing_records = find_first_array(&timing).unwrap();
    let phase_records = find_first_array(&phase).unwrap();

    let latest_timing = pick_latest(timing_records, "1560");
    let latest_phase = pick_latest(phase_records, "1560");

    for age in [0.0, 1.0, 3.5, 60.0] {
        let timing_items = extract_timing_items(latest_timing, age);
        for item in &timing_items {
            assert!(item.sec <= item.sec_at_msg);
            assert!(item.sec >= 0.0);
        }

        let first = merge_items(timing_items.clone(), extract_phase_status(latest_phase));
        let second = merge_items(timing_items, extract_phase_status(latest_phase));
        assert_eq!(first, second);

        let first_non_ped = first.iter().position(|i| i.kind != "보행").unwrap_or(first.len());
        assert!(first[first_non_ped..].iter().all(|i| i.kind != "보행"));
    }
}

#[test]
fn test_unknown_intersection_yields_nothing() {
    let timing = load(include_str!("fixtures/timing_sample.json"));
    let records = find_first_array(&timing).unwrap();

    let snap = reconcile(records, &[], "9999", NOW);
    assert!(snap.items.is_empty());
    assert!(snap.is_stale);
    assert_eq!(snap.age_sec, None);
}
