use crate::error::{CalcError, Result};
use crate::types::config::CalcConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "educalc.toml";
pub const DEFAULT_LOCAL_FILE: &str = "local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/educalc/config.toml";
pub const DEFAULT_DATA_DIR: &str = ".educalc";
pub const DATA_DIR_ENV: &str = "EDUCALC_DATA_DIR";

/// Resolves the data directory: explicit flag, then environment, then `~/.educalc`.
pub fn resolve_data_dir(flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if let Some(path) = std::env::var_os(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(path);
    }
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DATA_DIR)
}

pub fn load_config(data_dir: &Path) -> Result<CalcConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(data_dir, global.as_deref())
}

pub(crate) fn load_config_with_global(
    data_dir: &Path,
    global_path: Option<&Path>,
) -> Result<CalcConfig> {
    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &data_dir.join(DEFAULT_CONFIG_FILE))?;
    merge_file_if_exists(&mut merged, &data_dir.join(DEFAULT_LOCAL_FILE))?;

    let cfg: CalcConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| CalcError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| CalcError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

/// Joins a configured path onto the data directory unless it is absolute.
pub fn resolve_path(data_dir: &Path, path: &str) -> PathBuf {
    let candidate = PathBuf::from(path);
    if candidate.is_absolute() {
        candidate
    } else {
        data_dir.join(candidate)
    }
}
