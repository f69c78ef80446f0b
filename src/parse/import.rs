use serde_json::Value;

use crate::model::migrate::RawProject;

/// Extract raw project records from a JSON import payload.
///
/// Accepts a bare array of records, a single record object, or a full
/// export/backup envelope (any object with a `projects` array). Individual
/// records stay raw; migration and validation happen at import time.
pub fn parse_json_records(text: &str) -> Result<Vec<RawProject>, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Array(_) => serde_json::from_value(value),
        Value::Object(ref map) if map.contains_key("projects") => {
            serde_json::from_value(map["projects"].clone())
        }
        _ => serde_json::from_value(value).map(|raw| vec![raw]),
    }
}
