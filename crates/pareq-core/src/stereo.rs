//! Two independent channel chains sharing one coefficient set.

use crate::chain::ChannelChain;
use crate::coefficients::ChainCoefficients;
use crate::snapshot::ParameterSnapshot;
use crate::stage::Stage;

/// Left and right [`ChannelChain`]s driven from a single parameter set.
///
/// Coefficients are designed once per update and copied into both chains,
/// so identical input yields bit-identical output on both sides. There is
/// no cross-channel coupling.
///
/// The processor remembers the last snapshot it was given. Before the first
/// [`prepare`](Self::prepare) the sample rate is zero and the chains run
/// identity coefficients; `prepare` redesigns for the real rate.
///
/// # Example
///
/// ```rust
/// use pareq_core::{ParameterSnapshot, StereoProcessor};
///
/// let mut eq = StereoProcessor::new();
/// eq.prepare(44100.0, 512);
/// eq.update_from_parameters(&ParameterSnapshot {
///     peak_freq: 1000.0,
///     peak_gain_db: 6.0,
///     ..Default::default()
/// });
///
/// let mut left = [0.0f32; 512];
/// let mut right = [0.0f32; 512];
/// eq.process_block(&mut left, &mut right);
/// ```
#[derive(Debug, Clone)]
pub struct StereoProcessor {
    left: ChannelChain,
    right: ChannelChain,
    sample_rate: f32,
    snapshot: ParameterSnapshot,
    coefficients: ChainCoefficients,
}

impl StereoProcessor {
    /// Creates an unprepared processor holding the default parameters.
    pub fn new() -> Self {
        let snapshot = ParameterSnapshot::default();
        Self {
            left: ChannelChain::new(),
            right: ChannelChain::new(),
            sample_rate: 0.0,
            coefficients: ChainCoefficients::from_snapshot(&snapshot, 0.0),
            snapshot,
        }
    }

    /// Prepares both chains identically and redesigns the current
    /// parameters for `sample_rate`. All filter state is cleared.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) {
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, max_block_size, "preparing stereo processor");

        self.sample_rate = sample_rate;
        self.left.prepare(sample_rate, max_block_size);
        self.right.prepare(sample_rate, max_block_size);
        let snapshot = self.snapshot;
        self.update_from_parameters(&snapshot);
    }

    /// Designs coefficients for `snapshot` once and applies them to both
    /// chains. Filter state is preserved.
    pub fn update_from_parameters(&mut self, snapshot: &ParameterSnapshot) {
        self.snapshot = *snapshot;
        self.coefficients = ChainCoefficients::from_snapshot(snapshot, self.sample_rate);
        self.left.update_coefficients(&self.coefficients);
        self.right.update_coefficients(&self.coefficients);
    }

    /// Processes the left and right buffers in place through their chains.
    ///
    /// The buffers need not have the same length; empty buffers are no-ops.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.left.process_block(left);
        self.right.process_block(right);
    }

    /// Processes a single channel through the left chain (mono layouts).
    pub fn process_mono(&mut self, samples: &mut [f32]) {
        self.left.process_block(samples);
    }

    /// Clears all filter state without changing parameters.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }

    /// Sample rate bound by the last [`prepare`](Self::prepare).
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// The parameters currently applied.
    pub fn snapshot(&self) -> &ParameterSnapshot {
        &self.snapshot
    }

    /// The coefficients currently applied to both chains.
    pub fn coefficients(&self) -> &ChainCoefficients {
        &self.coefficients
    }

    /// The left chain.
    pub fn left(&self) -> &ChannelChain {
        &self.left
    }

    /// The right chain.
    pub fn right(&self) -> &ChannelChain {
        &self.right
    }
}

impl Default for StereoProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biquad::BiquadCoefficients;
    use crate::snapshot::Slope;

    #[test]
    fn unprepared_processor_uses_identity() {
        let eq = StereoProcessor::new();
        assert_eq!(eq.sample_rate(), 0.0);
        assert_eq!(eq.coefficients().peak, BiquadCoefficients::IDENTITY);
        assert!(eq.coefficients().is_finite());
    }

    #[test]
    fn prepare_redesigns_remembered_snapshot() {
        let mut eq = StereoProcessor::new();
        let snapshot = ParameterSnapshot {
            peak_gain_db: 6.0,
            low_cut_slope: Slope::Db24,
            ..Default::default()
        };
        eq.update_from_parameters(&snapshot);
        assert_eq!(eq.coefficients().peak, BiquadCoefficients::IDENTITY);

        eq.prepare(48000.0, 128);
        assert_eq!(eq.snapshot(), &snapshot);
        assert_ne!(eq.coefficients().peak, BiquadCoefficients::IDENTITY);
        assert_eq!(eq.left().low_cut().order(), 2);
        assert_eq!(eq.right().low_cut().order(), 2);
    }

    #[test]
    fn both_chains_get_identical_coefficients() {
        let mut eq = StereoProcessor::new();
        eq.prepare(44100.0, 64);
        eq.update_from_parameters(&ParameterSnapshot {
            high_cut_freq: 5000.0,
            high_cut_slope: Slope::Db48,
            peak_gain_db: -3.5,
            ..Default::default()
        });

        assert_eq!(eq.left().peak().coefficients(), eq.right().peak().coefficients());
        for i in 0..4 {
            assert_eq!(
                eq.left().high_cut().section(i).map(|s| *s.coefficients()),
                eq.right().high_cut().section(i).map(|s| *s.coefficients())
            );
        }
    }

    #[test]
    fn mono_leaves_right_chain_untouched() {
        let mut eq = StereoProcessor::new();
        eq.prepare(48000.0, 16);
        eq.update_from_parameters(&ParameterSnapshot {
            peak_gain_db: 9.0,
            ..Default::default()
        });
        let mut block = [0.5f32; 16];
        eq.process_mono(&mut block);
        assert!(!eq.left().peak().is_cleared());
        assert!(eq.right().peak().is_cleared());
    }

    #[test]
    fn reset_keeps_parameters() {
        let mut eq = StereoProcessor::new();
        eq.prepare(48000.0, 16);
        let snapshot = ParameterSnapshot {
            peak_gain_db: 9.0,
            ..Default::default()
        };
        eq.update_from_parameters(&snapshot);
        let mut l = [0.5f32; 16];
        let mut r = [0.5f32; 16];
        eq.process_block(&mut l, &mut r);

        eq.reset();
        assert!(eq.left().peak().is_cleared());
        assert!(eq.right().peak().is_cleared());
        assert_eq!(eq.snapshot(), &snapshot);
    }

    #[test]
    fn tiny_sample_rates_process_finite() {
        let steep = ParameterSnapshot {
            low_cut_slope: Slope::Db48,
            high_cut_slope: Slope::Db48,
            peak_gain_db: 24.0,
            peak_quality: 10.0,
            ..Default::default()
        };
        for &sr in &[16.0f32, 20.0, 30.0] {
            for snapshot in [ParameterSnapshot::default(), steep] {
                let mut eq = StereoProcessor::new();
                eq.prepare(sr, 64);
                eq.update_from_parameters(&snapshot);

                let coeffs = eq.coefficients();
                assert!(coeffs.is_finite(), "sr {sr}");
                assert!(coeffs.peak.is_stable(), "sr {sr}: {:?}", coeffs.peak);
                for c in coeffs.low_cut.as_slice().iter().chain(coeffs.high_cut.as_slice()) {
                    assert!(c.is_stable(), "sr {sr}: {c:?}");
                }

                let mut l: Vec<f32> = (0..20000)
                    .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
                    .collect();
                let mut r = l.clone();
                for (lc, rc) in l.chunks_mut(64).zip(r.chunks_mut(64)) {
                    eq.process_block(lc, rc);
                }
                assert!(l.iter().chain(&r).all(|x| x.is_finite()), "sr {sr}");
            }
        }
    }
}
