use super::{read_json, write_json};
use crate::engine::history::{delete_result, record_delivery};
use crate::error::{CalcError, Result};
use crate::types::record::{HistoryRecord, UserRecord};
use std::path::{Path, PathBuf};
use tracing::info;

pub const PROFILES_DIR: &str = "profiles";

/// Per-user profile storage keyed by register number.
///
/// Appends may be delivered more than once; the merge goes through
/// history reconciliation so repeats do not duplicate records.
pub trait ProfileStore {
    fn create_profile(&self, id: &str, name: &str, stream: &str) -> Result<UserRecord>;
    fn read_profile(&self, id: &str) -> Result<Option<UserRecord>>;
    fn append_to_history(&self, id: &str, record: &HistoryRecord) -> Result<()>;
    fn remove_from_history(&self, id: &str, record_id: &str) -> Result<()>;
}

pub struct FileProfileStore {
    dir: PathBuf,
}

impl FileProfileStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.join(PROFILES_DIR),
        }
    }

    fn profile_path(&self, id: &str) -> Result<PathBuf> {
        validate_profile_id(id)?;
        Ok(self.dir.join(format!("{id}.json")))
    }

    fn update<F>(&self, id: &str, change: F) -> Result<()>
    where
        F: FnOnce(UserRecord) -> UserRecord,
    {
        let path = self.profile_path(id)?;
        let profile = read_json::<UserRecord>(&path)?
            .ok_or_else(|| CalcError::ProfileNotFound(id.to_string()))?;
        write_json(&path, &change(profile))
    }
}

impl ProfileStore for FileProfileStore {
    fn create_profile(&self, id: &str, name: &str, stream: &str) -> Result<UserRecord> {
        let path = self.profile_path(id)?;
        if path.exists() {
            return Err(CalcError::ProfileStore(format!(
                "profile already exists: {id}"
            )));
        }
        if name.trim().is_empty() {
            return Err(CalcError::ProfileStore(
                "profile name must be non-empty".to_string(),
            ));
        }
        let profile = UserRecord::registered(id, name.trim(), stream.trim());
        write_json(&path, &profile)?;
        info!(profile = %id, "profile created");
        Ok(profile)
    }

    fn read_profile(&self, id: &str) -> Result<Option<UserRecord>> {
        read_json(&self.profile_path(id)?)
    }

    fn append_to_history(&self, id: &str, record: &HistoryRecord) -> Result<()> {
        self.update(id, |mut profile| {
            profile.history = record_delivery(profile.history, record.clone());
            profile
        })?;
        info!(profile = %id, record = %record.id(), "history synced to profile");
        Ok(())
    }

    fn remove_from_history(&self, id: &str, record_id: &str) -> Result<()> {
        self.update(id, |mut profile| {
            profile.history = delete_result(profile.history, record_id);
            profile
        })
    }
}

fn validate_profile_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CalcError::ProfileStore(format!(
            "register number must be 1-64 letters, digits, '-' or '_': {id}"
        )))
    }
}
