//! State save/restore for the parameter store.
//!
//! State format: JSON object mapping stable `ParamId` to value.
//!
//! ```json
//! {"100": 20.0, "101": 20000.0, "102": 750.0, "103": 0.0, "104": 1.0, "105": 0.0, "106": 0.0}
//! ```
//!
//! Using stable IDs (not indices) keeps state valid across parameter
//! reordering. Unknown IDs are skipped and missing IDs keep their current
//! value, so blobs from older or newer versions still load.

use pareq_core::{PARAM_COUNT, ParamId, ParameterSnapshot};

use crate::error::StateError;
use crate::params::ParameterStore;

impl ParameterStore {
    /// Serializes all parameter values to a JSON state blob.
    pub fn save_state(&self) -> Result<Vec<u8>, StateError> {
        let mut state = serde_json::Map::new();
        let values = self.snapshot().to_values();

        for (desc, value) in self.descriptors().iter().zip(values) {
            state.insert(desc.id.0.to_string(), serde_json::Value::from(f64::from(value)));
        }

        Ok(serde_json::to_vec(&serde_json::Value::Object(state))?)
    }

    /// Restores parameter values from a blob written by
    /// [`save_state`](Self::save_state).
    ///
    /// The blob is validated completely before anything is applied; the
    /// result is published as a single snapshot.
    pub fn load_state(&self, blob: &[u8]) -> Result<(), StateError> {
        let value: serde_json::Value = serde_json::from_slice(blob)?;
        let Some(obj) = value.as_object() else {
            return Err(StateError::NotAnObject);
        };

        let mut values: [f32; PARAM_COUNT] = self.snapshot().to_values();
        let mut applied = 0usize;

        for (key, val) in obj {
            let Some(index) = key
                .parse::<u32>()
                .ok()
                .and_then(|id| self.index_by_id(ParamId(id)))
            else {
                tracing::warn!(key = %key, "ignoring unknown parameter in state");
                continue;
            };
            let Some(v) = val.as_f64() else {
                return Err(StateError::non_numeric(key.as_str()));
            };
            values[index] = v as f32;
            applied += 1;
        }

        self.publish(&ParameterSnapshot::from_values(&values));
        tracing::debug!(applied, "state loaded");
        Ok(())
    }
}
