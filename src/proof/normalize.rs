//! Key casing normalization

use serde_json::{Map, Value};

/// Convert a key to camelCase
///
/// Words are split on `_`, `-` and spaces. Existing interior capitals are
/// kept, so already camelCased keys pass through unchanged.
pub fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());

    for (i, word) in key
        .split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Rewrite the top-level keys of an object to camelCase
pub fn camel_case_keys(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter().map(|(k, v)| (camel_case(&k), v)).collect()
}
