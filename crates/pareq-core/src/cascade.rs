//! Configurable-order cut filter built from up to four biquad sections.

use crate::biquad::{Biquad, BiquadCoefficients};
use crate::coefficients::{CutCoefficients, MAX_CUT_SECTIONS};
use crate::snapshot::Slope;
use crate::stage::Stage;

/// Ordered, fixed-capacity series of [`Biquad`] sections.
///
/// The first [`order`](Self::order) sections are active and run in index
/// order; the rest are skipped entirely. Changing the order never touches
/// the state of sections that stay active. A section that becomes active
/// again starts from zeroed state instead of whatever it held when it was
/// switched off, which would otherwise ring against the new coefficients.
///
/// Block processing is a strict pipeline: each active section processes the
/// whole block before the next one starts.
///
/// # Example
///
/// ```rust
/// use pareq_core::{FilterCascade, Slope, Stage, low_cut_coefficients};
///
/// let mut cascade = FilterCascade::new();
/// cascade.set_coefficients(&low_cut_coefficients(48000.0, 80.0, Slope::Db24));
/// assert_eq!(cascade.order(), 2);
///
/// let mut block = [0.0f32; 64];
/// block[0] = 1.0;
/// cascade.process_block(&mut block);
/// ```
#[derive(Debug, Clone)]
pub struct FilterCascade {
    sections: [Biquad; MAX_CUT_SECTIONS],
    order: usize,
}

impl FilterCascade {
    /// Creates a cascade with one active identity section.
    pub fn new() -> Self {
        Self {
            sections: core::array::from_fn(|_| Biquad::new()),
            order: 1,
        }
    }

    /// Number of active sections, `1..=4`.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Sets the number of active sections, clamped to `1..=4`.
    ///
    /// Sections that go from inactive to active are reset.
    pub fn set_order(&mut self, order: usize) {
        let order = order.clamp(1, MAX_CUT_SECTIONS);
        if order > self.order {
            for section in &mut self.sections[self.order..order] {
                section.reset();
            }
        }
        self.order = order;
    }

    /// Sets the order from a [`Slope`].
    pub fn set_slope(&mut self, slope: Slope) {
        self.set_order(slope.sections());
    }

    /// Replaces the coefficients of active section `index`.
    ///
    /// Indices at or above the current order are ignored.
    pub fn set_section_coefficients(&mut self, index: usize, coeffs: BiquadCoefficients) {
        if index < self.order {
            self.sections[index].set_coefficients(coeffs);
        }
    }

    /// Applies a designed cut filter: order becomes `cut.len()` and each
    /// section receives its coefficients. An empty list is ignored.
    pub fn set_coefficients(&mut self, cut: &CutCoefficients) {
        if cut.is_empty() {
            return;
        }
        self.set_order(cut.len());
        for (index, coeffs) in cut.as_slice().iter().enumerate() {
            self.set_section_coefficients(index, *coeffs);
        }
    }

    /// Section at `index`, active or not.
    pub fn section(&self, index: usize) -> Option<&Biquad> {
        self.sections.get(index)
    }

    /// The active sections in processing order.
    pub fn active_sections(&self) -> &[Biquad] {
        &self.sections[..self.order]
    }
}

impl Default for FilterCascade {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for FilterCascade {
    #[inline]
    fn process_sample(&mut self, input: f32) -> f32 {
        self.sections[..self.order]
            .iter_mut()
            .fold(input, |x, section| section.process_sample(x))
    }

    fn process_block(&mut self, samples: &mut [f32]) {
        for section in &mut self.sections[..self.order] {
            section.process_block(samples);
        }
    }

    fn reset(&mut self) {
        for section in &mut self.sections {
            section.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::low_cut_coefficients;

    fn run(cascade: &mut FilterCascade, n: usize) {
        for i in 0..n {
            cascade.process_sample(libm::sinf(i as f32 * 0.05));
        }
    }

    #[test]
    fn starts_with_one_identity_section() {
        let mut cascade = FilterCascade::new();
        assert_eq!(cascade.order(), 1);
        for &x in &[0.3, -0.7, 1.0] {
            assert_eq!(cascade.process_sample(x), x);
        }
    }

    #[test]
    fn order_is_clamped() {
        let mut cascade = FilterCascade::new();
        cascade.set_order(0);
        assert_eq!(cascade.order(), 1);
        cascade.set_order(9);
        assert_eq!(cascade.order(), MAX_CUT_SECTIONS);
    }

    #[test]
    fn lowering_order_keeps_active_state() {
        let mut cascade = FilterCascade::new();
        cascade.set_coefficients(&low_cut_coefficients(48000.0, 200.0, Slope::Db48));
        run(&mut cascade, 100);

        cascade.set_order(2);
        assert!(!cascade.section(0).is_some_and(Biquad::is_cleared));
        assert!(!cascade.section(1).is_some_and(Biquad::is_cleared));
        // Inactive sections keep their stale state until reactivated.
        assert!(!cascade.section(3).is_some_and(Biquad::is_cleared));
    }

    #[test]
    fn reactivated_sections_are_reset() {
        let mut cascade = FilterCascade::new();
        cascade.set_coefficients(&low_cut_coefficients(48000.0, 200.0, Slope::Db48));
        run(&mut cascade, 100);

        cascade.set_order(2);
        run(&mut cascade, 10);
        cascade.set_order(4);

        assert!(!cascade.section(1).is_some_and(Biquad::is_cleared));
        assert!(cascade.section(2).is_some_and(Biquad::is_cleared));
        assert!(cascade.section(3).is_some_and(Biquad::is_cleared));
    }

    #[test]
    fn out_of_range_section_is_ignored() {
        let mut cascade = FilterCascade::new();
        let coeffs = BiquadCoefficients::from_raw(0.5, 0.0, 0.0, 1.0, 0.0, 0.0);
        cascade.set_section_coefficients(2, coeffs);
        assert_eq!(
            cascade.section(2).map(|s| *s.coefficients()),
            Some(BiquadCoefficients::IDENTITY)
        );
    }

    #[test]
    fn block_matches_sample_pipeline() {
        let cut = low_cut_coefficients(44100.0, 500.0, Slope::Db36);
        let mut a = FilterCascade::new();
        let mut b = FilterCascade::new();
        a.set_coefficients(&cut);
        b.set_coefficients(&cut);

        let mut block: [f32; 32] = core::array::from_fn(|i| if i == 0 { 1.0 } else { 0.0 });
        let expected: [f32; 32] = core::array::from_fn(|i| b.process_sample(block[i]));
        a.process_block(&mut block);

        for (x, y) in block.iter().zip(expected.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_cut_list_is_ignored() {
        let mut cascade = FilterCascade::new();
        cascade.set_order(3);
        cascade.set_coefficients(&CutCoefficients::empty());
        assert_eq!(cascade.order(), 3);
    }
}
