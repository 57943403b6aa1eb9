//! Per-channel signal path: low-cut, peak, high-cut.

use crate::biquad::Biquad;
use crate::cascade::FilterCascade;
use crate::coefficients::ChainCoefficients;
use crate::stage::Stage;

/// One channel's filters, processed strictly as low-cut → peak → high-cut.
///
/// Constructed once; [`prepare`](Self::prepare) binds the sample rate and
/// clears all state whenever the host changes sample rate or block size.
///
/// # Example
///
/// ```rust
/// use pareq_core::{ChainCoefficients, ChannelChain, ParameterSnapshot, Stage};
///
/// let mut chain = ChannelChain::new();
/// chain.prepare(48000.0, 256);
///
/// let snapshot = ParameterSnapshot { peak_gain_db: 6.0, ..Default::default() };
/// chain.update_coefficients(&ChainCoefficients::from_snapshot(&snapshot, 48000.0));
///
/// let mut block = [0.25f32; 256];
/// chain.process_block(&mut block);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChannelChain {
    low_cut: FilterCascade,
    peak: Biquad,
    high_cut: FilterCascade,
    sample_rate: f32,
    max_block_size: usize,
}

impl ChannelChain {
    /// Creates an unprepared chain with identity stages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the sample rate and maximum block size and zeroes all state.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) {
        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.reset();
    }

    /// Pushes freshly designed coefficients into all three stages.
    ///
    /// Cut orders follow the section counts in `coeffs`. State is kept.
    pub fn update_coefficients(&mut self, coeffs: &ChainCoefficients) {
        self.low_cut.set_coefficients(&coeffs.low_cut);
        self.peak.set_coefficients(coeffs.peak);
        self.high_cut.set_coefficients(&coeffs.high_cut);
    }

    /// Sample rate bound by the last [`prepare`](Self::prepare), `0.0` before.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Maximum block size bound by the last [`prepare`](Self::prepare).
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// The low-cut cascade.
    pub fn low_cut(&self) -> &FilterCascade {
        &self.low_cut
    }

    /// The peak section.
    pub fn peak(&self) -> &Biquad {
        &self.peak
    }

    /// The high-cut cascade.
    pub fn high_cut(&self) -> &FilterCascade {
        &self.high_cut
    }
}

impl Stage for ChannelChain {
    #[inline]
    fn process_sample(&mut self, input: f32) -> f32 {
        let x = self.low_cut.process_sample(input);
        let x = self.peak.process_sample(x);
        self.high_cut.process_sample(x)
    }

    fn process_block(&mut self, samples: &mut [f32]) {
        if samples.is_empty() {
            return;
        }
        self.low_cut.process_block(samples);
        self.peak.process_block(samples);
        self.high_cut.process_block(samples);
    }

    fn reset(&mut self) {
        self.low_cut.reset();
        self.peak.reset();
        self.high_cut.reset();
    }
}
