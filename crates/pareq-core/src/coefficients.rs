//! Coefficient calculator for the peak section and the cut cascades.
//!
//! Pure functions of their inputs: no state, no allocation, deterministic.
//! Every public entry point sanitises its arguments first, so the returned
//! coefficients are always finite and stable even for NaN, infinite or
//! out-of-range input.
//!
//! # Cut filters
//!
//! A [`Slope`] of `n` sections realises a Butterworth filter of order `2n`
//! (12/24/36/48 dB per octave). The sections are not copies of one design:
//! section `k` gets the Q of the `k`-th conjugate pole pair of the `2n`-pole
//! Butterworth prototype,
//!
//! ```text
//! Q_k = 1 / (2 * sin((2k + 1) * PI / (4n)))      k = 0..n
//! ```
//!
//! so the cascade is maximally flat and sits at exactly -3.01 dB at the
//! cutoff for every slope. Repeating a Q = 0.707 section four times would
//! instead be -12 dB at the cutoff with a rounded knee. Because the pole
//! count is always even, no first-order sections are needed and the 12 and
//! 36 dB slopes are exact Butterworth responses.
//!
//! Section designs are the RBJ Audio EQ Cookbook high-pass/low-pass,
//! prewarped at the cutoff, which maps the analog prototype exactly at that
//! frequency.
//!
//! # Peak filter
//!
//! RBJ peaking EQ with `A = 10^(gain_db / 40)`, giving a centre gain of
//! `10^(gain_db / 20)` and zero phase shift at the centre frequency.

use core::f32::consts::PI;
use libm::{cosf, powf, sinf};

use crate::biquad::BiquadCoefficients;
use crate::math::finite_or;
use crate::snapshot::{ParameterSnapshot, Slope};

/// Maximum number of second-order sections in a cut cascade.
pub const MAX_CUT_SECTIONS: usize = 4;

/// Upper frequency bound as a fraction of the sample rate.
///
/// 95% of Nyquist. Above this the RBJ designs lose precision in `f32`.
pub const NYQUIST_MARGIN: f32 = 0.475;

/// Lowest frequency accepted by the designs, in Hz.
///
/// Below this, `cosf(omega)` rounds to 1.0 at high sample rates and the
/// high-pass poles land on the unit circle.
pub const MIN_FREQUENCY: f32 = 10.0;

/// Q range accepted by the peak design.
pub const MIN_Q: f32 = 0.1;
/// Q range accepted by the peak design.
pub const MAX_Q: f32 = 10.0;

/// Gain range accepted by the peak design, in dB.
pub const MAX_GAIN_DB: f32 = 24.0;

/// Which side of the spectrum a cut cascade removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutKind {
    /// Removes content below the cutoff (high-pass sections).
    LowCut,
    /// Removes content above the cutoff (low-pass sections).
    HighCut,
}

/// Fixed-capacity list of cut-filter sections.
///
/// Holds up to [`MAX_CUT_SECTIONS`] coefficient sets; only the first
/// [`len`](Self::len) are meaningful, the rest are [`BiquadCoefficients::IDENTITY`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutCoefficients {
    sections: [BiquadCoefficients; MAX_CUT_SECTIONS],
    len: usize,
}

impl CutCoefficients {
    /// An empty list.
    pub const fn empty() -> Self {
        Self {
            sections: [BiquadCoefficients::IDENTITY; MAX_CUT_SECTIONS],
            len: 0,
        }
    }

    /// Number of active sections.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no sections.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The active sections, in processing order.
    #[inline]
    pub fn as_slice(&self) -> &[BiquadCoefficients] {
        &self.sections[..self.len]
    }

    /// Section at `index`, if active.
    pub fn get(&self, index: usize) -> Option<&BiquadCoefficients> {
        self.as_slice().get(index)
    }

    fn push(&mut self, coeffs: BiquadCoefficients) {
        if self.len < MAX_CUT_SECTIONS {
            self.sections[self.len] = coeffs;
            self.len += 1;
        }
    }
}

impl Default for CutCoefficients {
    fn default() -> Self {
        Self::empty()
    }
}

/// Everything one channel chain needs, derived once from a snapshot.
///
/// Computed a single time per block and copied into both channels, so the
/// left and right responses are bit-identical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainCoefficients {
    /// Peak/bell section.
    pub peak: BiquadCoefficients,
    /// Low-cut cascade sections.
    pub low_cut: CutCoefficients,
    /// High-cut cascade sections.
    pub high_cut: CutCoefficients,
}

impl ChainCoefficients {
    /// Designs all three stages for `snapshot` at `sample_rate`.
    pub fn from_snapshot(snapshot: &ParameterSnapshot, sample_rate: f32) -> Self {
        Self {
            peak: peak_coefficients(
                sample_rate,
                snapshot.peak_freq,
                snapshot.peak_quality,
                snapshot.peak_gain_db,
            ),
            low_cut: cut_coefficients(
                CutKind::LowCut,
                sample_rate,
                snapshot.low_cut_freq,
                snapshot.low_cut_slope,
            ),
            high_cut: cut_coefficients(
                CutKind::HighCut,
                sample_rate,
                snapshot.high_cut_freq,
                snapshot.high_cut_slope,
            ),
        }
    }

    /// Returns `true` if every coefficient in every stage is finite.
    pub fn is_finite(&self) -> bool {
        self.peak.is_finite()
            && self.low_cut.as_slice().iter().all(BiquadCoefficients::is_finite)
            && self.high_cut.as_slice().iter().all(BiquadCoefficients::is_finite)
    }

    /// Magnitude of the whole chain at `freq` Hz, in dB.
    pub fn magnitude_db(&self, freq: f32, sample_rate: f32) -> f64 {
        self.peak.magnitude_db(freq, sample_rate)
            + cascade_magnitude_db(self.low_cut.as_slice(), freq, sample_rate)
            + cascade_magnitude_db(self.high_cut.as_slice(), freq, sample_rate)
    }
}

/// Sum of per-section magnitudes in dB.
pub fn cascade_magnitude_db(sections: &[BiquadCoefficients], freq: f32, sample_rate: f32) -> f64 {
    sections
        .iter()
        .map(|c| c.magnitude_db(freq, sample_rate))
        .sum()
}

/// Returns `true` if `sample_rate` can be designed for.
#[inline]
pub fn is_valid_sample_rate(sample_rate: f32) -> bool {
    sample_rate.is_finite() && sample_rate > 0.0
}

/// Clamps `freq` into `[MIN_FREQUENCY, NYQUIST_MARGIN * sample_rate]`.
///
/// Non-finite frequencies are replaced by `fallback` before clamping. When
/// the sample rate is so low that the upper bound falls under
/// [`MIN_FREQUENCY`], the whole range collapses onto the upper bound, which
/// stays below Nyquist.
#[inline]
pub fn sanitize_frequency(freq: f32, sample_rate: f32, fallback: f32) -> f32 {
    let max = sample_rate * NYQUIST_MARGIN;
    finite_or(freq, fallback).clamp(MIN_FREQUENCY.min(max), max)
}

/// Q of section `index` in a Butterworth cascade of `sections` biquads.
///
/// `index = 0` is the most resonant section (highest Q).
///
/// # Example
///
/// ```rust
/// use pareq_core::butterworth_q;
///
/// // One section is the classic 2-pole Butterworth.
/// assert!((butterworth_q(1, 0) - core::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
/// // Two sections: 0.5412 and 1.3066 (order-4 prototype).
/// assert!((butterworth_q(2, 0) - 1.3066).abs() < 1e-3);
/// assert!((butterworth_q(2, 1) - 0.5412).abs() < 1e-3);
/// ```
pub fn butterworth_q(sections: usize, index: usize) -> f32 {
    let order = 2 * sections.max(1);
    let theta = (2 * index + 1) as f32 * PI / (2 * order) as f32;
    1.0 / (2.0 * sinf(theta))
}

/// Designs an RBJ high-pass section.
///
/// Arguments are assumed sane; public callers go through
/// [`cut_coefficients`].
fn highpass(freq: f32, q: f32, sample_rate: f32) -> BiquadCoefficients {
    let omega = 2.0 * PI * freq / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 + cos_omega) / 2.0;
    let b1 = -(1.0 + cos_omega);
    let b2 = (1.0 + cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    BiquadCoefficients::from_raw(b0, b1, b2, a0, a1, a2)
}

/// Designs an RBJ low-pass section.
fn lowpass(freq: f32, q: f32, sample_rate: f32) -> BiquadCoefficients {
    let omega = 2.0 * PI * freq / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 - cos_omega) / 2.0;
    let b1 = 1.0 - cos_omega;
    let b2 = (1.0 - cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    BiquadCoefficients::from_raw(b0, b1, b2, a0, a1, a2)
}

/// Peak/bell section coefficients.
///
/// # Arguments
///
/// * `sample_rate` - Sample rate in Hz
/// * `freq` - Centre frequency in Hz, clamped below Nyquist
/// * `q` - Quality factor, clamped to `[0.1, 10]`
/// * `gain_db` - Gain at the centre frequency, clamped to `[-24, 24]` dB
///
/// An invalid sample rate yields [`BiquadCoefficients::IDENTITY`].
///
/// # Example
///
/// ```rust
/// use pareq_core::peak_coefficients;
///
/// let c = peak_coefficients(44100.0, 1000.0, 1.0, 6.0);
/// let gain = c.magnitude_at(1000.0, 44100.0);
/// assert!((gain - 1.9953).abs() < 1e-3);
/// ```
pub fn peak_coefficients(sample_rate: f32, freq: f32, q: f32, gain_db: f32) -> BiquadCoefficients {
    if !is_valid_sample_rate(sample_rate) {
        return BiquadCoefficients::IDENTITY;
    }

    let freq = sanitize_frequency(freq, sample_rate, 1000.0);
    let q = finite_or(q, core::f32::consts::FRAC_1_SQRT_2).clamp(MIN_Q, MAX_Q);
    let gain_db = finite_or(gain_db, 0.0).clamp(-MAX_GAIN_DB, MAX_GAIN_DB);

    let a = powf(10.0, gain_db / 40.0); // sqrt(10^(dB/20))
    let omega = 2.0 * PI * freq / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = 1.0 + alpha * a;
    let b1 = -2.0 * cos_omega;
    let b2 = 1.0 - alpha * a;
    let a0 = 1.0 + alpha / a;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha / a;

    BiquadCoefficients::from_raw(b0, b1, b2, a0, a1, a2)
}

/// Cut-filter section coefficients, one per section of `slope`.
///
/// The returned list always has `slope.sections()` entries. An invalid
/// sample rate yields identity sections. A non-finite frequency opens the
/// filter (lowest cutoff for a low-cut, highest for a high-cut).
///
/// # Example
///
/// ```rust
/// use pareq_core::{CutKind, Slope, cut_coefficients};
///
/// let sections = cut_coefficients(CutKind::LowCut, 48000.0, 1000.0, Slope::Db48);
/// assert_eq!(sections.len(), 4);
///
/// let at_cutoff: f64 = sections
///     .as_slice()
///     .iter()
///     .map(|c| c.magnitude_db(1000.0, 48000.0))
///     .sum();
/// assert!((at_cutoff + 3.01).abs() < 0.05);
/// ```
pub fn cut_coefficients(kind: CutKind, sample_rate: f32, freq: f32, slope: Slope) -> CutCoefficients {
    let count = slope.sections();
    let mut out = CutCoefficients::empty();

    if !is_valid_sample_rate(sample_rate) {
        for _ in 0..count {
            out.push(BiquadCoefficients::IDENTITY);
        }
        return out;
    }

    let fallback = match kind {
        CutKind::LowCut => MIN_FREQUENCY,
        CutKind::HighCut => f32::MAX,
    };
    let freq = sanitize_frequency(freq, sample_rate, fallback);

    for index in 0..count {
        let q = butterworth_q(count, index);
        out.push(match kind {
            CutKind::LowCut => highpass(freq, q, sample_rate),
            CutKind::HighCut => lowpass(freq, q, sample_rate),
        });
    }
    out
}

/// Low-cut (high-pass) cascade for `slope`.
pub fn low_cut_coefficients(sample_rate: f32, freq: f32, slope: Slope) -> CutCoefficients {
    cut_coefficients(CutKind::LowCut, sample_rate, freq, slope)
}

/// High-cut (low-pass) cascade for `slope`.
pub fn high_cut_coefficients(sample_rate: f32, freq: f32, slope: Slope) -> CutCoefficients {
    cut_coefficients(CutKind::HighCut, sample_rate, freq, slope)
}
