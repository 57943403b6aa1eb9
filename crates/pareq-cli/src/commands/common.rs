//! Shared CLI helpers used across multiple commands.

use std::path::Path;

use anyhow::Context;
use pareq_host::ParameterStore;

use crate::wav::BIT_DEPTHS;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        ));
    }
    Ok((parts[0].trim().to_string(), parts[1].trim().to_string()))
}

/// Parse an output bit depth for clap's `value_parser`.
pub fn parse_bit_depth(s: &str) -> Result<u16, String> {
    let depth: u16 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid bit depth: '{}'", s))?;
    if BIT_DEPTHS.contains(&depth) {
        Ok(depth)
    } else {
        Err(format!("Unsupported bit depth: {} (expected 16, 24 or 32)", depth))
    }
}

/// Builds a parameter store from an optional state file plus `--param`
/// overrides, applied in that order.
pub fn build_store(
    params: &[(String, String)],
    state: Option<&Path>,
) -> anyhow::Result<ParameterStore> {
    let store = ParameterStore::new();

    if let Some(path) = state {
        let blob = std::fs::read(path)
            .with_context(|| format!("failed to read state file {}", path.display()))?;
        store
            .load_state(&blob)
            .with_context(|| format!("invalid state file {}", path.display()))?;
    }

    for (name, raw) in params {
        let value: f32 = raw
            .parse()
            .with_context(|| format!("parameter '{name}': '{raw}' is not a number"))?;
        let index = store.set_by_name(name, value)?;
        tracing::debug!(param = name.as_str(), index, value, "parameter override");
    }

    Ok(store)
}
