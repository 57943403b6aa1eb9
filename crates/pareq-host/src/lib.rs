//! Host layer for the pareq equalizer.
//!
//! Everything between a plugin host and the `pareq-core` signal path:
//!
//! | Host concept | Pareq |
//! |--------------|-------|
//! | Parameter list, automation | [`ParameterStore`] |
//! | Parameter handoff to audio thread | [`SnapshotReader`] (sequence lock) |
//! | Bus layout query | [`is_layout_supported`] |
//! | State chunk | [`ParameterStore::save_state`] / [`ParameterStore::load_state`] |
//! | Activate / process / reset | [`EqProcessor`] |
//!
//! # Threading
//!
//! The store is written from control threads and read by exactly one audio
//! thread through its [`SnapshotReader`]. The audio side never locks,
//! allocates or waits: a read that collides with a write retries a bounded
//! number of times and otherwise keeps the previous snapshot.
//!
//! ```rust
//! use pareq_host::{EqProcessor, ParameterStore};
//!
//! let store = ParameterStore::new();
//! let mut processor = EqProcessor::new(&store);
//! processor.prepare(44100.0, 128).unwrap();
//!
//! // Control thread
//! let automation = store.clone();
//! std::thread::spawn(move || {
//!     automation.set_by_name("LowCut Freq", 80.0).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! // Audio thread
//! let mut block = vec![0.0f32; 128];
//! processor.process(&mut [&mut block[..]]);
//! assert_eq!(processor.inner().snapshot().low_cut_freq, 80.0);
//! ```

pub mod error;
pub mod layout;
pub mod params;
pub mod processor;
mod state;

pub use error::{HostError, StateError};
pub use layout::{BusLayout, ChannelSet, is_layout_supported};
pub use params::{MAX_READ_ATTEMPTS, ParameterStore, SnapshotReader};
pub use processor::EqProcessor;
