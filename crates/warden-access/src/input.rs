//! Parsing of structured caller input handed over by adapters.

use crate::error::{AccessError, AccessResult};

/// Parse a reader list given as a JSON array of strings, e.g. `["bob","carol"]`.
///
/// Anything else (an object, a bare string, an array with non-string
/// members) is `InvalidInput`.
pub fn parse_reader_list(json: &str) -> AccessResult<Vec<String>> {
    serde_json::from_str::<Vec<String>>(json).map_err(|e| {
        AccessError::InvalidInput(format!("reader list must be a JSON array of strings: {e}"))
    })
}
