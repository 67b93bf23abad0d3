pub mod draft;
pub mod feedback;
pub mod local;
pub mod profile;

use crate::error::{CalcError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Writes `value` next to `path` and renames it into place, so a failed write keeps the old file.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(CalcError::Io)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, json).map_err(CalcError::Io)?;
    fs::rename(&staging, path).map_err(CalcError::Io)?;
    Ok(())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(CalcError::Io(error)),
    };
    Ok(Some(serde_json::from_str(&content)?))
}
