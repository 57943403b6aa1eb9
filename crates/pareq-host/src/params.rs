//! Thread-safe parameter store and the snapshot handoff to the audio thread.
//!
//! [`ParameterStore`] lives for the lifetime of the plugin instance and is
//! shared between control threads (host automation, UI, state loading) and
//! the audio thread. Parameter values are stored as atomic `u32` (f32
//! bit-cast).
//!
//! # Snapshot handoff
//!
//! The seven values are published as a unit through a sequence lock:
//!
//! ```text
//! writer (control thread, serialised by a mutex)
//!     generation += 1          -> odd: write in progress
//!     store values
//!     generation += 1          -> even: consistent
//!
//! reader (audio thread, never blocks)
//!     g1 = generation          (odd -> retry)
//!     load values
//!     g2 = generation          (g1 != g2 -> retry)
//! ```
//!
//! The reader gives up after [`MAX_READ_ATTEMPTS`] and keeps using the last
//! snapshot it read in full. A torn snapshot is never observed.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering, fence};

use pareq_core::{EqParam, PARAM_COUNT, ParamDescriptor, ParamId, ParameterSnapshot};
use parking_lot::Mutex;

use crate::error::HostError;

/// Attempts [`SnapshotReader::read`] makes before falling back to the last
/// snapshot.
pub const MAX_READ_ATTEMPTS: usize = 4;

/// Inner storage, behind an `Arc` so the store can be cloned into any
/// thread.
struct StoreData {
    /// Current parameter values as f32 bit-cast to u32.
    values: [AtomicU32; PARAM_COUNT],
    /// Sequence counter. Odd while a write is in progress.
    generation: AtomicU64,
    /// Serialises writers. Never touched by the audio thread.
    write_lock: Mutex<()>,
}

/// Shared parameter state for one equalizer instance.
///
/// Cheap to clone; all clones refer to the same values.
///
/// # Example
///
/// ```rust
/// use pareq_host::ParameterStore;
///
/// let store = ParameterStore::new();
/// store.set_by_name("Peak Gain", 4.5).unwrap();
///
/// let mut reader = store.reader();
/// let (snapshot, changed) = reader.read();
/// assert!(changed);
/// assert_eq!(snapshot.peak_gain_db, 4.5);
/// ```
#[derive(Clone)]
pub struct ParameterStore {
    inner: Arc<StoreData>,
}

impl ParameterStore {
    /// Creates a store holding the default value of every parameter.
    pub fn new() -> Self {
        let defaults = ParameterSnapshot::default().to_values();
        Self {
            inner: Arc::new(StoreData {
                values: defaults.map(|v| AtomicU32::new(v.to_bits())),
                generation: AtomicU64::new(0),
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Number of parameters.
    pub fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    /// Descriptor of the parameter at `index`.
    pub fn descriptor(&self, index: usize) -> Option<&'static ParamDescriptor> {
        EqParam::from_index(index).map(EqParam::descriptor)
    }

    /// All parameter descriptors, in index order.
    pub fn descriptors(&self) -> &'static [ParamDescriptor] {
        EqParam::descriptors()
    }

    /// Finds a parameter index by stable [`ParamId`].
    pub fn index_by_id(&self, id: ParamId) -> Option<usize> {
        self.descriptors().iter().position(|d| d.id == id)
    }

    /// Finds a parameter index by name, short name, string id or numeric
    /// id (all case-insensitive).
    pub fn find_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        if let Ok(id) = name.parse::<u32>() {
            return self.index_by_id(ParamId(id));
        }
        self.descriptors().iter().position(|d| {
            d.name.eq_ignore_ascii_case(name)
                || d.short_name.eq_ignore_ascii_case(name)
                || d.string_id.eq_ignore_ascii_case(name)
        })
    }

    /// Reads the current value of a parameter.
    pub fn get_value(&self, index: usize) -> Option<f32> {
        self.inner
            .values
            .get(index)
            .map(|v| f32::from_bits(v.load(Ordering::Acquire)))
    }

    /// Writes a parameter value. Clamps to the descriptor range and rounds
    /// stepped parameters. Out-of-range indices are ignored.
    pub fn set_value(&self, index: usize, value: f32) {
        let Some(desc) = self.descriptor(index) else {
            return;
        };
        let value = desc.sanitize(value);
        self.write(|values| values[index].store(value.to_bits(), Ordering::Relaxed));
    }

    /// Writes a parameter addressed by name (see [`find_index`](Self::find_index)).
    ///
    /// Returns the parameter index.
    pub fn set_by_name(&self, name: &str, value: f32) -> Result<usize, HostError> {
        let index = self
            .find_index(name)
            .ok_or_else(|| HostError::unknown_parameter(name))?;
        self.set_value(index, value);
        Ok(index)
    }

    /// Publishes a whole snapshot as one atomic update.
    pub fn publish(&self, snapshot: &ParameterSnapshot) {
        let raw = snapshot.to_values();
        self.write(|values| {
            for (slot, value) in values.iter().zip(raw) {
                slot.store(value.to_bits(), Ordering::Relaxed);
            }
        });
    }

    /// The current values as a snapshot (control thread).
    pub fn snapshot(&self) -> ParameterSnapshot {
        let _guard = self.inner.write_lock.lock();
        ParameterSnapshot::from_values(&self.load_raw())
    }

    /// Creates a reader for the audio thread.
    ///
    /// The first [`SnapshotReader::read`] always reports a change.
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            store: self.clone(),
            generation: u64::MAX,
            snapshot: ParameterSnapshot::default(),
        }
    }

    /// Number of completed writes so far.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire) / 2
    }

    fn write(&self, apply: impl FnOnce(&[AtomicU32; PARAM_COUNT])) {
        let _guard = self.inner.write_lock.lock();
        let generation = &self.inner.generation;
        let start = generation.load(Ordering::Relaxed);
        generation.store(start.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);
        apply(&self.inner.values);
        generation.store(start.wrapping_add(2), Ordering::Release);
    }

    fn load_raw(&self) -> [f32; PARAM_COUNT] {
        core::array::from_fn(|i| f32::from_bits(self.inner.values[i].load(Ordering::Relaxed)))
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterStore")
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

/// Audio-thread view of a [`ParameterStore`].
///
/// [`read`](Self::read) is wait-free: no locks, no allocation, bounded
/// retries.
#[derive(Debug)]
pub struct SnapshotReader {
    store: ParameterStore,
    generation: u64,
    snapshot: ParameterSnapshot,
}

impl SnapshotReader {
    /// Returns the latest complete snapshot and whether it differs from the
    /// one returned by the previous call.
    ///
    /// If a writer is active for all [`MAX_READ_ATTEMPTS`] attempts, the
    /// previous snapshot is returned unchanged.
    pub fn read(&mut self) -> (ParameterSnapshot, bool) {
        let data = &self.store.inner;
        for _ in 0..MAX_READ_ATTEMPTS {
            let start = data.generation.load(Ordering::Acquire);
            if start & 1 == 1 {
                std::hint::spin_loop();
                continue;
            }
            if start == self.generation {
                return (self.snapshot, false);
            }

            let raw = self.store.load_raw();
            fence(Ordering::Acquire);
            if data.generation.load(Ordering::Relaxed) == start {
                self.generation = start;
                self.snapshot = ParameterSnapshot::from_values(&raw);
                return (self.snapshot, true);
            }
        }
        (self.snapshot, false)
    }

    /// The last snapshot returned by [`read`](Self::read).
    pub fn latest(&self) -> &ParameterSnapshot {
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pareq_core::Slope;

    #[test]
    fn defaults_match_descriptors() {
        let store = ParameterStore::new();
        for (i, desc) in store.descriptors().iter().enumerate() {
            assert_eq!(store.get_value(i), Some(desc.default), "{}", desc.name);
        }
        assert_eq!(store.snapshot(), ParameterSnapshot::default());
    }

    #[test]
    fn set_value_clamps_and_rounds() {
        let store = ParameterStore::new();
        store.set_value(EqParam::PeakGain.index(), 100.0);
        assert_eq!(store.get_value(EqParam::PeakGain.index()), Some(24.0));

        store.set_value(EqParam::LowCutSlope.index(), 2.4);
        assert_eq!(store.get_value(EqParam::LowCutSlope.index()), Some(2.0));

        store.set_value(EqParam::PeakQuality.index(), f32::NAN);
        assert_eq!(store.get_value(EqParam::PeakQuality.index()), Some(1.0));
    }

    #[test]
    fn out_of_range_index_is_safe() {
        let store = ParameterStore::new();
        assert_eq!(store.get_value(99), None);
        assert!(store.descriptor(99).is_none());
        store.set_value(99, 1.0);
        assert_eq!(store.generation(), 0);
    }

    #[test]
    fn lookup_by_name_and_id() {
        let store = ParameterStore::new();
        assert_eq!(store.find_index("lowcut freq"), Some(0));
        assert_eq!(store.find_index("HIGH_CUT_SLOPE"), Some(6));
        assert_eq!(store.find_index("PeakQ"), Some(4));
        assert_eq!(store.find_index("102"), Some(2));
        assert_eq!(store.find_index("999"), None);
        assert_eq!(store.index_by_id(ParamId(105)), Some(5));
        assert_eq!(
            store.set_by_name("nope", 1.0),
            Err(HostError::unknown_parameter("nope"))
        );
    }

    #[test]
    fn reader_reports_changes_once() {
        let store = ParameterStore::new();
        let mut reader = store.reader();

        let (first, changed) = reader.read();
        assert!(changed);
        assert_eq!(first, ParameterSnapshot::default());
        assert!(!reader.read().1);

        store.set_by_name("high_cut_slope", 3.0).unwrap();
        let (snap, changed) = reader.read();
        assert!(changed);
        assert_eq!(snap.high_cut_slope, Slope::Db48);
        assert!(!reader.read().1);
        assert_eq!(reader.latest(), &snap);
    }

    #[test]
    fn publish_is_one_generation() {
        let store = ParameterStore::new();
        let snapshot = ParameterSnapshot {
            low_cut_freq: 90.0,
            high_cut_freq: 9000.0,
            peak_freq: 900.0,
            peak_gain_db: -9.0,
            peak_quality: 0.9,
            low_cut_slope: Slope::Db36,
            high_cut_slope: Slope::Db24,
        };
        store.publish(&snapshot);
        assert_eq!(store.generation(), 1);
        assert_eq!(store.snapshot(), snapshot);
    }

    #[test]
    fn clones_share_values() {
        let store = ParameterStore::new();
        let other = store.clone();
        other.set_value(2, 4000.0);
        assert_eq!(store.get_value(2), Some(4000.0));
    }
}
