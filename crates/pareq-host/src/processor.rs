//! Host-facing audio processor.
//!
//! Handles the real-time audio callback: picks up the latest parameter
//! snapshot, redesigns coefficients when it changed, and processes the
//! first one or two channels in place.

use pareq_core::{StereoProcessor, is_valid_sample_rate};

use crate::error::HostError;
use crate::layout::{BusLayout, is_layout_supported};
use crate::params::{ParameterStore, SnapshotReader};

/// Audio-thread processor for one equalizer instance.
///
/// Created on the control side from a [`ParameterStore`], prepared while
/// audio is stopped, then driven by [`process`](Self::process) from the
/// audio thread.
///
/// # Example
///
/// ```rust
/// use pareq_host::{EqProcessor, ParameterStore};
///
/// let store = ParameterStore::new();
/// let mut processor = EqProcessor::new(&store);
/// processor.prepare(48000.0, 256).unwrap();
///
/// store.set_by_name("peak_gain", 6.0).unwrap();
///
/// let mut left = vec![0.1f32; 256];
/// let mut right = vec![0.1f32; 256];
/// processor.process(&mut [&mut left[..], &mut right[..]]);
/// ```
#[derive(Debug)]
pub struct EqProcessor {
    reader: SnapshotReader,
    eq: StereoProcessor,
    max_block_size: usize,
}

impl EqProcessor {
    /// Display name reported to hosts.
    pub const NAME: &'static str = "Pareq";

    /// Creates an unprepared processor reading from `store`.
    pub fn new(store: &ParameterStore) -> Self {
        Self {
            reader: store.reader(),
            eq: StereoProcessor::new(),
            max_block_size: 0,
        }
    }

    /// Binds sample rate and maximum block size, clears all filter state and
    /// applies the current parameters. Call only while audio is stopped.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) -> Result<(), HostError> {
        if !is_valid_sample_rate(sample_rate) {
            return Err(HostError::InvalidSampleRate(sample_rate));
        }
        if max_block_size == 0 {
            return Err(HostError::InvalidBlockSize);
        }

        self.max_block_size = max_block_size;
        let (snapshot, _) = self.reader.read();
        self.eq.prepare(sample_rate, max_block_size);
        self.eq.update_from_parameters(&snapshot);

        tracing::info!(sample_rate, max_block_size, "equalizer prepared");
        Ok(())
    }

    /// Processes one block in place.
    ///
    /// Channel 0 (and channel 1, if present) are filtered; further channels
    /// are left untouched. Blocks longer than the prepared maximum are
    /// processed in chunks. Before [`prepare`](Self::prepare) this does
    /// nothing.
    pub fn process(&mut self, channels: &mut [&mut [f32]]) {
        let chunk = self.max_block_size;
        if chunk == 0 {
            return;
        }

        let (snapshot, changed) = self.reader.read();
        if changed {
            self.eq.update_from_parameters(&snapshot);
        }

        match channels {
            [] => {}
            [mono] => {
                for block in mono.chunks_mut(chunk) {
                    self.eq.process_mono(block);
                }
            }
            [left, right, ..] => {
                let mut left = left.chunks_mut(chunk);
                let mut right = right.chunks_mut(chunk);
                loop {
                    match (left.next(), right.next()) {
                        (None, None) => break,
                        (l, r) => self.eq.process_block(l.unwrap_or_default(), r.unwrap_or_default()),
                    }
                }
            }
        }
    }

    /// Clears all filter state (transport reset). Parameters are kept.
    pub fn reset(&mut self) {
        self.eq.reset();
    }

    /// Whether the processor accepts `layout`.
    pub fn supports_layout(&self, layout: &BusLayout) -> bool {
        is_layout_supported(layout)
    }

    /// Tail length reported to hosts.
    pub fn tail_length_seconds(&self) -> f64 {
        0.0
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Sample rate bound by the last successful [`prepare`](Self::prepare).
    pub fn sample_rate(&self) -> f32 {
        self.eq.sample_rate()
    }

    /// The underlying stereo processor.
    pub fn inner(&self) -> &StereoProcessor {
        &self.eq
    }
}
