pub mod geojson;
pub mod kinds;
pub mod parser;
pub mod schema;

pub use geojson::*;
pub use kinds::*;
pub use parser::*;
pub use schema::*;

/// Maximum number of characters of a parameter value written to logs.
pub const LOG_VALUE_LIMIT: usize = 100;

/// Maximum number of characters of a parameter value embedded in an artifact.
pub const ARTIFACT_VALUE_LIMIT: usize = 200;

/// Truncate `value` to at most `limit` characters, marking the cut with `...`.
pub fn truncate(value: &str, limit: usize) -> String {
    match value.char_indices().nth(limit) {
        Some((index, _)) => format!("{}...", &value[..index]),
        None => value.to_string(),
    }
}
