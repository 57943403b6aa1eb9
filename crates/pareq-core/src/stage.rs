//! The [`Stage`] trait shared by every element of the filter path.
//!
//! A biquad section, a cut cascade and a whole channel chain all expose the
//! same in-place block capability, so composite stages are written as plain
//! structs holding their children in a fixed order.
//!
//! ## Design Decisions
//!
//! - **Mono**: One `f32` stream per stage. Stereo is two independent chains
//!   (see [`StereoProcessor`](crate::StereoProcessor)).
//!
//! - **Static dispatch**: The set and order of stages is known at compile
//!   time, so no trait objects are involved on the audio thread.
//!
//! - **No allocations**: All methods are called from the real-time thread.

/// A mono processing stage operating in place.
///
/// # Example
///
/// ```rust
/// use pareq_core::Stage;
///
/// struct Gain(f32);
///
/// impl Stage for Gain {
///     fn process_sample(&mut self, input: f32) -> f32 {
///         input * self.0
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// let mut g = Gain(0.5);
/// let mut buf = [1.0, 2.0];
/// g.process_block(&mut buf);
/// assert_eq!(buf, [0.5, 1.0]);
/// ```
pub trait Stage {
    /// Process a single sample, advancing internal state by one step.
    fn process_sample(&mut self, input: f32) -> f32;

    /// Process a block of samples in place.
    ///
    /// The default implementation calls [`process_sample`](Self::process_sample)
    /// for each sample in order. An empty block is a no-op.
    fn process_block(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Zero all internal state without touching coefficients.
    fn reset(&mut self);
}
