//! Property-based tests for pareq-core.
//!
//! Coefficient finiteness and stability over the whole parameter space
//! (and beyond it), bounded output for bounded input, and snapshot
//! sanitisation, using proptest for randomized input generation.

use pareq_core::{
    ChainCoefficients, CutKind, EqParam, PARAM_COUNT, ParameterSnapshot, Slope, Stage,
    StereoProcessor, cut_coefficients, peak_coefficients,
};
use proptest::prelude::*;

fn slope() -> impl Strategy<Value = Slope> {
    (0usize..4).prop_map(Slope::from_index)
}

fn sample_rate() -> impl Strategy<Value = f32> {
    prop_oneof![
        Just(22050.0f32),
        Just(44100.0),
        Just(48000.0),
        Just(88200.0),
        Just(96000.0),
        Just(176400.0),
        Just(192000.0),
    ]
}

fn snapshot() -> impl Strategy<Value = ParameterSnapshot> {
    (
        20.0f32..=20000.0,
        20.0f32..=20000.0,
        20.0f32..=20000.0,
        -24.0f32..=24.0,
        0.1f32..=10.0,
        slope(),
        slope(),
    )
        .prop_map(|(lc, hc, pf, gain, q, lcs, hcs)| ParameterSnapshot {
            low_cut_freq: lc,
            high_cut_freq: hc,
            peak_freq: pf,
            peak_gain_db: gain,
            peak_quality: q,
            low_cut_slope: lcs,
            high_cut_slope: hcs,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every valid snapshot designs finite, stable coefficients at every
    /// common sample rate.
    #[test]
    fn valid_snapshots_design_stable_filters(snap in snapshot(), sr in sample_rate()) {
        let coeffs = ChainCoefficients::from_snapshot(&snap, sr);
        prop_assert!(coeffs.is_finite());
        prop_assert!(coeffs.peak.is_stable(), "peak unstable: {:?}", coeffs.peak);
        for c in coeffs.low_cut.as_slice().iter().chain(coeffs.high_cut.as_slice()) {
            prop_assert!(c.is_stable(), "cut section unstable: {:?}", c);
        }
    }

    /// Arbitrary (including non-finite) arguments still yield finite
    /// coefficients.
    #[test]
    fn arbitrary_arguments_stay_finite(
        sr in any::<f32>(),
        freq in any::<f32>(),
        q in any::<f32>(),
        gain in any::<f32>(),
        s in slope(),
    ) {
        prop_assert!(peak_coefficients(sr, freq, q, gain).is_finite());
        for kind in [CutKind::LowCut, CutKind::HighCut] {
            let cut = cut_coefficients(kind, sr, freq, s);
            prop_assert_eq!(cut.len(), s.sections());
            prop_assert!(cut.as_slice().iter().all(|c| c.is_finite()));
        }
    }

    /// Bounded input through a fully configured stereo processor produces
    /// finite output.
    #[test]
    fn processing_stays_finite(
        snap in snapshot(),
        sr in sample_rate(),
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut eq = StereoProcessor::new();
        eq.prepare(sr, 32);
        eq.update_from_parameters(&snap);

        for _ in 0..16 {
            let mut left = input;
            let mut right = input;
            eq.process_block(&mut left, &mut right);
            prop_assert!(left.iter().all(|x| x.is_finite()));
            prop_assert_eq!(left, right);
        }
    }

    /// Any raw slot values become an in-range snapshot.
    #[test]
    fn from_values_is_always_in_range(values in prop::array::uniform7(any::<f32>())) {
        let snap = ParameterSnapshot::from_values(&values);
        let back = snap.to_values();
        for param in EqParam::ALL {
            let desc = param.descriptor();
            let v = back[param.index()];
            prop_assert!(v >= desc.min && v <= desc.max, "{:?} = {}", param, v);
        }
        prop_assert_eq!(back.len(), PARAM_COUNT);
    }

    /// Changing parameters mid-stream keeps output finite and applies the
    /// latest slopes.
    #[test]
    fn parameter_changes_keep_output_finite(
        a in snapshot(),
        b in snapshot(),
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut eq = StereoProcessor::new();
        eq.prepare(48000.0, 32);
        for snap in [a, b, a] {
            eq.update_from_parameters(&snap);
            let mut block = input;
            eq.process_mono(&mut block);
            prop_assert!(block.iter().all(|x| x.is_finite()));
        }
        prop_assert_eq!(eq.left().low_cut().order(), a.low_cut_slope.sections());
        prop_assert_eq!(eq.left().high_cut().order(), a.high_cut_slope.sections());

        let mut chain = eq.left().clone();
        let mut tail = [0.0f32; 32];
        chain.process_block(&mut tail);
        prop_assert!(tail.iter().all(|x| x.is_finite()));
    }
}
