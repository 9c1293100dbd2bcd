//! Shared test utilities for the licenseguard workspace.
//!
//! Golden-report comparisons in the CLI tests and in other crates need
//! `normalize_nondeterministic` outside `#[cfg(test)]`, so it lives here rather
//! than in `licenseguard-types`.

use serde_json::Value;

const VERSION_PLACEHOLDER: &str = "__VERSION__";
const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";
const LOCATION_PLACEHOLDER: &str = "__SCAN_LOCATION__";

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// Two concerns are handled separately:
///
/// 1. **Root-only**: `tool.version` and `scan_location` are replaced only when
///    the *root* object looks like a scan report (has `schema`, `tool`,
///    `verdict`, `counts` and `archives`). Archive records never carry these
///    keys, but a nested look-alike is left alone either way.
///
/// 2. **Recursive**: `started_at` and `finished_at` are normalized at any
///    depth because their placeholder values are fixed and cannot collide with
///    real data.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_report = ["schema", "tool", "verdict", "counts", "archives"]
            .iter()
            .all(|k| obj.contains_key(*k));
        if is_report {
            if let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
                && tool.contains_key("version")
            {
                tool.insert(
                    "version".to_string(),
                    Value::String(VERSION_PLACEHOLDER.to_string()),
                );
            }
            if obj.contains_key("scan_location") {
                obj.insert(
                    "scan_location".to_string(),
                    Value::String(LOCATION_PLACEHOLDER.to_string()),
                );
            }
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "finished_at"] {
                if map.contains_key(key) {
                    map.insert(
                        key.to_string(),
                        Value::String(TIMESTAMP_PLACEHOLDER.to_string()),
                    );
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}
