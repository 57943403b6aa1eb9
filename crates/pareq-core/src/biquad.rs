//! Biquad (bi-quadratic) filter section.
//!
//! [`BiquadCoefficients`] is a plain value normalised so that `a0 = 1`.
//! [`Biquad`] owns a copy of its coefficients plus its delay line, so the
//! same coefficient set can be pushed into the left and right channels
//! without aliasing any state.
//!
//! Coefficient design lives in [`coefficients`](crate::coefficients).

use crate::flush_denormal;
use crate::stage::Stage;

/// Normalised second-order IIR coefficients.
///
/// Transfer function:
/// ```text
///         b0 + b1*z^-1 + b2*z^-2
/// H(z) = ------------------------
///          1 + a1*z^-1 + a2*z^-2
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward coefficient for x[n].
    pub b0: f32,
    /// Feedforward coefficient for x[n-1].
    pub b1: f32,
    /// Feedforward coefficient for x[n-2].
    pub b2: f32,
    /// Feedback coefficient for y[n-1].
    pub a1: f32,
    /// Feedback coefficient for y[n-2].
    pub a2: f32,
}

impl BiquadCoefficients {
    /// Passthrough: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Builds coefficients from an un-normalised set, dividing through by `a0`.
    ///
    /// # Arguments
    ///
    /// * `b0, b1, b2` - Feedforward coefficients
    /// * `a0, a1, a2` - Feedback coefficients
    pub fn from_raw(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }

    /// Returns `true` if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.b0.is_finite()
            && self.b1.is_finite()
            && self.b2.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
    }

    /// Returns `true` if both poles lie strictly inside the unit circle.
    ///
    /// Uses the stability triangle: `|a2| < 1` and `|a1| < 1 + a2`.
    pub fn is_stable(&self) -> bool {
        self.a2.abs() < 1.0 && self.a1.abs() < 1.0 + self.a2
    }

    /// Complex response `H(e^jw)` at `freq` Hz, as `(re, im)`.
    ///
    /// Evaluated in `f64` so that deep stop-band values stay meaningful.
    pub fn response_at(&self, freq: f32, sample_rate: f32) -> (f64, f64) {
        let w = core::f64::consts::TAU * f64::from(freq) / f64::from(sample_rate);
        // z^-1 = cos(w) - j sin(w), z^-2 = cos(2w) - j sin(2w)
        let (c1, s1) = (libm::cos(w), libm::sin(w));
        let (c2, s2) = (libm::cos(2.0 * w), libm::sin(2.0 * w));

        let num_re = f64::from(self.b0) + f64::from(self.b1) * c1 + f64::from(self.b2) * c2;
        let num_im = -(f64::from(self.b1) * s1 + f64::from(self.b2) * s2);
        let den_re = 1.0 + f64::from(self.a1) * c1 + f64::from(self.a2) * c2;
        let den_im = -(f64::from(self.a1) * s1 + f64::from(self.a2) * s2);

        let den_mag_sq = den_re * den_re + den_im * den_im;
        (
            (num_re * den_re + num_im * den_im) / den_mag_sq,
            (num_im * den_re - num_re * den_im) / den_mag_sq,
        )
    }

    /// Linear magnitude `|H(e^jw)|` at `freq` Hz.
    pub fn magnitude_at(&self, freq: f32, sample_rate: f32) -> f64 {
        let (re, im) = self.response_at(freq, sample_rate);
        libm::sqrt(re * re + im * im)
    }

    /// Magnitude in dB at `freq` Hz.
    pub fn magnitude_db(&self, freq: f32, sample_rate: f32) -> f64 {
        20.0 * libm::log10(self.magnitude_at(freq, sample_rate).max(1e-30))
    }

    /// Phase in radians at `freq` Hz.
    pub fn phase_at(&self, freq: f32, sample_rate: f32) -> f64 {
        let (re, im) = self.response_at(freq, sample_rate);
        libm::atan2(im, re)
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A single biquad section: coefficients plus delay line.
///
/// Implements the Direct Form I structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// Replacing coefficients never touches the delay line, so parameter
/// automation does not click. The state is only cleared by
/// [`Stage::reset`].
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: BiquadCoefficients,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients and zeroed state.
    pub fn new() -> Self {
        Self::with_coefficients(BiquadCoefficients::IDENTITY)
    }

    /// Creates a biquad with the given coefficients and zeroed state.
    pub fn with_coefficients(coeffs: BiquadCoefficients) -> Self {
        Self {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Replaces the coefficients. The delay line is preserved.
    #[inline]
    pub fn set_coefficients(&mut self, coeffs: BiquadCoefficients) {
        self.coeffs = coeffs;
    }

    /// Current coefficients.
    #[inline]
    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coeffs
    }

    /// Returns `true` if the delay line is all zeros.
    pub fn is_cleared(&self) -> bool {
        self.x1 == 0.0 && self.x2 == 0.0 && self.y1 == 0.0 && self.y2 == 0.0
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for Biquad {
    #[inline]
    fn process_sample(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;
        let output = flush_denormal(output);

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}
