use super::draft::DraftStore;
use super::{read_json, write_json};
use crate::error::Result;
use crate::types::record::UserRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const USER_FILE: &str = "user.json";

/// The active user's full record, kept across restarts.
pub struct LocalStore {
    path: PathBuf,
    drafts: DraftStore,
}

impl LocalStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(USER_FILE),
            drafts: DraftStore::new(data_dir),
        }
    }

    /// Loads the active user, or a fresh guest when nothing was saved yet.
    pub fn load_user(&self) -> Result<UserRecord> {
        match read_json::<UserRecord>(&self.path)? {
            Some(user) => {
                debug!(user = %user.id, "active user loaded");
                Ok(user)
            }
            None => Ok(UserRecord::guest()),
        }
    }

    pub fn save_user(&self, user: &UserRecord) -> Result<()> {
        write_json(&self.path, user)
    }

    /// Ends the session: a new guest replaces the active user and the draft is dropped.
    pub fn clear(&self) -> Result<UserRecord> {
        let guest = UserRecord::guest();
        self.save_user(&guest)?;
        self.drafts.clear()?;
        info!(user = %guest.id, "session cleared");
        Ok(guest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::history::upsert_period_result;
    use crate::engine::Draft;
    use crate::types::record::PeriodResult;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn first_load_is_a_guest() {
        let dir = TempDir::new().expect("temp dir should be created");
        let user = LocalStore::new(dir.path())
            .load_user()
            .expect("load should succeed");
        assert!(user.is_guest);
        assert!(user.history.is_empty());
    }

    #[test]
    fn saved_history_survives_reload() {
        let dir = TempDir::new().expect("temp dir should be created");
        let store = LocalStore::new(dir.path());
        let mut user = store.load_user().expect("load should succeed");
        user.history = upsert_period_result(
            user.history,
            PeriodResult::new(1, "CSE", 8.2, Vec::new(), Utc::now()),
        );
        store.save_user(&user).expect("save should succeed");

        let reloaded = LocalStore::new(dir.path())
            .load_user()
            .expect("reload should succeed");
        assert_eq!(reloaded, user);
    }

    #[test]
    fn clear_replaces_user_and_drops_draft() {
        let dir = TempDir::new().expect("temp dir should be created");
        let store = LocalStore::new(dir.path());
        let before = store.load_user().expect("load should succeed");
        store.save_user(&before).expect("save should succeed");
        let drafts = DraftStore::new(dir.path());
        drafts
            .save(&Draft::new("CSE", 1, Vec::new()))
            .expect("draft should save");

        let guest = store.clear().expect("clear should succeed");
        assert_ne!(guest.id, before.id);
        assert!(drafts.load().expect("draft load").is_none());
    }
}
