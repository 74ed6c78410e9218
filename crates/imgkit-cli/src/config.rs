use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

/// Load an operator configuration from a JSON file, or its defaults without a file.
///
/// Missing fields keep their default values.
pub fn load_config<T>(path: Option<&Path>) -> Result<T, String>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };

    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
