//! State save/restore roundtrip tests.
//!
//! Verifies that parameter state survives JSON serialization, including
//! edge cases like min/max values, and that a restored store drives the
//! processor exactly like the original.

use pareq_core::{EqParam, ParameterSnapshot, Slope};
use pareq_host::{EqProcessor, ParameterStore};

fn assert_stores_match(a: &ParameterStore, b: &ParameterStore) {
    for i in 0..a.param_count() {
        let v1 = a.get_value(i).unwrap();
        let v2 = b.get_value(i).unwrap();
        assert_eq!(v1, v2, "param {i} roundtrip mismatch: {v1} != {v2}");
    }
}

#[test]
fn state_roundtrip_defaults() {
    let store = ParameterStore::new();
    let blob = store.save_state().unwrap();

    let restored = ParameterStore::new();
    restored.load_state(&blob).unwrap();
    assert_stores_match(&store, &restored);
}

#[test]
fn state_roundtrip_min_values() {
    let store = ParameterStore::new();
    for (i, desc) in store.descriptors().iter().enumerate() {
        store.set_value(i, desc.min);
    }
    let blob = store.save_state().unwrap();

    let restored = ParameterStore::new();
    restored.load_state(&blob).unwrap();
    assert_stores_match(&store, &restored);
}

#[test]
fn state_roundtrip_max_values() {
    let store = ParameterStore::new();
    for (i, desc) in store.descriptors().iter().enumerate() {
        store.set_value(i, desc.max);
    }
    let blob = store.save_state().unwrap();

    let restored = ParameterStore::new();
    restored.load_state(&blob).unwrap();
    assert_stores_match(&store, &restored);
}

#[test]
fn state_roundtrip_non_default() {
    let store = ParameterStore::new();
    store.publish(&ParameterSnapshot {
        low_cut_freq: 63.5,
        high_cut_freq: 11025.0,
        peak_freq: 2718.0,
        peak_gain_db: -7.5,
        peak_quality: 3.25,
        low_cut_slope: Slope::Db36,
        high_cut_slope: Slope::Db48,
    });
    let blob = store.save_state().unwrap();

    let restored = ParameterStore::new();
    restored.load_state(&blob).unwrap();
    assert_stores_match(&store, &restored);
    assert_eq!(restored.snapshot().high_cut_slope, Slope::Db48);
}

#[test]
fn blob_uses_stable_ids() {
    let store = ParameterStore::new();
    store.set_value(EqParam::PeakGain.index(), 3.0);
    let blob = store.save_state().unwrap();

    let value: serde_json::Value = serde_json::from_slice(&blob).unwrap();
    assert_eq!(value["103"].as_f64(), Some(3.0));
    assert_eq!(value["100"].as_f64(), Some(20.0));
}

#[test]
fn restored_store_renders_identically() {
    let store = ParameterStore::new();
    store.set_by_name("peak_gain", 5.0).unwrap();
    store.set_by_name("low_cut_freq", 200.0).unwrap();
    store.set_by_name("low_cut_slope", 1.0).unwrap();
    let restored = ParameterStore::new();
    restored.load_state(&store.save_state().unwrap()).unwrap();

    let render = |s: &ParameterStore| {
        let mut p = EqProcessor::new(s);
        p.prepare(44100.0, 256).unwrap();
        let mut buf: Vec<f32> = (0..2048).map(|i| (i as f32 * 0.021).sin()).collect();
        p.process(&mut [&mut buf[..]]);
        buf
    };

    assert_eq!(render(&store), render(&restored));
}

#[test]
fn loading_state_while_running_is_picked_up() {
    let store = ParameterStore::new();
    let mut processor = EqProcessor::new(&store);
    processor.prepare(48000.0, 128).unwrap();

    store.load_state(br#"{"102": 4000.0, "103": -12.0}"#).unwrap();
    let mut buf = vec![0.0f32; 128];
    processor.process(&mut [&mut buf[..]]);

    let applied = processor.inner().snapshot();
    assert_eq!(applied.peak_freq, 4000.0);
    assert_eq!(applied.peak_gain_db, -12.0);
}
