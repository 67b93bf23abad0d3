use crate::engine::history::{
    append_cumulative_result, contains_id, delete_result, upsert_period_result,
};
use crate::error::{CalcError, Result};
use crate::store::draft::DraftStore;
use crate::store::local::LocalStore;
use crate::store::profile::{FileProfileStore, ProfileStore};
use crate::types::record::{CumulativeResult, History, HistoryRecord, PeriodResult, UserRecord};
use std::path::Path;
use tracing::{info, warn};

pub const REGISTERED_BADGE: &str = "pioneer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    LocalOnly,
    Synced,
    SyncFailed,
}

/// The acting user plus the stores their record lives in.
pub struct Session<P: ProfileStore = FileProfileStore> {
    local: LocalStore,
    drafts: DraftStore,
    profiles: P,
    user: UserRecord,
}

impl Session<FileProfileStore> {
    pub fn open(data_dir: &Path) -> Result<Self> {
        Self::with_profiles(data_dir, FileProfileStore::new(data_dir))
    }
}

impl<P: ProfileStore> Session<P> {
    pub fn with_profiles(data_dir: &Path, profiles: P) -> Result<Self> {
        let local = LocalStore::new(data_dir);
        let user = local.load_user()?;
        Ok(Self {
            local,
            drafts: DraftStore::new(data_dir),
            profiles,
            user,
        })
    }

    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    pub fn save_period(&mut self, result: PeriodResult) -> Result<SyncStatus> {
        let history = upsert_period_result(self.user.history.clone(), result.clone());
        self.commit(history)?;
        info!(
            period = result.period,
            score = result.score,
            id = %result.id,
            "semester result saved"
        );
        Ok(self.sync(&HistoryRecord::Period(result)))
    }

    pub fn save_cumulative(&mut self, result: CumulativeResult) -> Result<SyncStatus> {
        let history = append_cumulative_result(self.user.history.clone(), result.clone());
        self.commit(history)?;
        info!(
            periods = result.periods_covered,
            score = result.score,
            id = %result.id,
            "cumulative result saved"
        );
        Ok(self.sync(&HistoryRecord::Cumulative(result)))
    }

    /// Removes a record; returns whether anything was there to remove.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if !contains_id(&self.user.history, id) {
            return Ok(false);
        }
        let history = delete_result(self.user.history.clone(), id);
        self.commit(history)?;
        if !self.user.is_guest {
            if let Err(error) = self.profiles.remove_from_history(&self.user.id, id) {
                warn!(%error, record = id, "profile store delete failed; local copy updated");
            }
        }
        info!(record = id, "result deleted");
        Ok(true)
    }

    /// Registers a new profile and signs in as it.
    pub fn register(
        &mut self,
        register_number: &str,
        name: &str,
        stream: &str,
    ) -> Result<&UserRecord> {
        let profile = self.profiles.create_profile(register_number, name, stream)?;
        self.adopt(profile)
    }

    /// Signs in as an existing registered user; their stored history replaces the guest's.
    pub fn login(&mut self, register_number: &str) -> Result<&UserRecord> {
        let profile = self
            .profiles
            .read_profile(register_number)?
            .ok_or_else(|| CalcError::ProfileNotFound(register_number.to_string()))?;
        self.adopt(profile)
    }

    pub fn logout(&mut self) -> Result<&UserRecord> {
        self.user = self.local.clear()?;
        Ok(&self.user)
    }

    fn adopt(&mut self, mut profile: UserRecord) -> Result<&UserRecord> {
        if !profile.badges.iter().any(|badge| badge == REGISTERED_BADGE) {
            profile.badges.push(REGISTERED_BADGE.to_string());
        }
        self.local.save_user(&profile)?;
        self.drafts.clear()?;
        self.user = profile;
        info!(user = %self.user.id, "signed in");
        Ok(&self.user)
    }

    // Persist first; the in-memory record only moves once the write landed.
    fn commit(&mut self, history: History) -> Result<()> {
        let mut next = self.user.clone();
        next.history = history;
        self.local.save_user(&next)?;
        self.user = next;
        Ok(())
    }

    fn sync(&self, record: &HistoryRecord) -> SyncStatus {
        if self.user.is_guest {
            return SyncStatus::LocalOnly;
        }
        match self.profiles.append_to_history(&self.user.id, record) {
            Ok(()) => SyncStatus::Synced,
            Err(error) => {
                warn!(%error, record = %record.id(), "profile sync failed; record kept locally");
                SyncStatus::SyncFailed
            }
        }
    }
}
