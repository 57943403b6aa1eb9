//! Pareq Core - real-time parametric EQ signal path
//!
//! A per-channel filter chain (low-cut → peak → high-cut) whose coefficients
//! are redesigned from a parameter snapshot and applied to streaming audio
//! in place, with zero allocation on the audio thread.
//!
//! # Core Abstractions
//!
//! ## Coefficient Design
//!
//! - [`peak_coefficients`] - RBJ peaking EQ section
//! - [`cut_coefficients`] - Butterworth low-cut/high-cut as 1-4 second-order sections
//! - [`ChainCoefficients`] - Everything a channel needs, designed once per snapshot
//!
//! ## Processing
//!
//! - [`Stage`] - Uniform in-place block processing
//! - [`Biquad`] - Second-order IIR section (Direct Form I)
//! - [`FilterCascade`] - Up to four sections with activate-with-reset order changes
//! - [`ChannelChain`] - Low-cut → peak → high-cut
//! - [`StereoProcessor`] - Two chains sharing one coefficient set
//!
//! ## Parameters
//!
//! - [`ParameterSnapshot`] - Atomic set of all seven parameters
//! - [`EqParam`] / [`ParamDescriptor`] - Ranges, defaults and stable IDs
//! - [`Slope`] - 12/24/36/48 dB per octave
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! pareq-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use pareq_core::{ParameterSnapshot, Slope, StereoProcessor};
//!
//! let mut eq = StereoProcessor::new();
//! eq.prepare(48000.0, 256);
//! eq.update_from_parameters(&ParameterSnapshot {
//!     low_cut_freq: 80.0,
//!     low_cut_slope: Slope::Db24,
//!     peak_freq: 3000.0,
//!     peak_gain_db: -4.0,
//!     ..Default::default()
//! });
//!
//! let mut left = [0.0f32; 256];
//! let mut right = [0.0f32; 256];
//! eq.process_block(&mut left, &mut right);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations, locks or panics in processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Sanitised input**: Any parameter value designs finite, stable coefficients

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod cascade;
pub mod chain;
pub mod coefficients;
pub mod math;
pub mod param_info;
pub mod snapshot;
pub mod stage;
pub mod stereo;

// Re-export main types at crate root
pub use biquad::{Biquad, BiquadCoefficients};
pub use cascade::FilterCascade;
pub use chain::ChannelChain;
pub use coefficients::{
    ChainCoefficients, CutCoefficients, CutKind, MAX_CUT_SECTIONS, MAX_GAIN_DB, MAX_Q,
    MIN_FREQUENCY, MIN_Q, NYQUIST_MARGIN, butterworth_q, cascade_magnitude_db, cut_coefficients,
    high_cut_coefficients, is_valid_sample_rate, low_cut_coefficients, peak_coefficients,
    sanitize_frequency,
};
pub use math::{db_to_linear, finite_or, flush_denormal, linear_to_db};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit, ParameterInfo};
pub use snapshot::{EqParam, PARAM_COUNT, ParameterSnapshot, Slope};
pub use stage::Stage;
pub use stereo::StereoProcessor;
