use super::{read_json, write_json};
use crate::engine::Draft;
use crate::error::{CalcError, Result};
use std::path::{Path, PathBuf};

pub const DRAFT_FILE: &str = "session/draft.json";

/// Scratch space for the form in progress. Dropped on save, discard and session end.
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(DRAFT_FILE),
        }
    }

    pub fn load(&self) -> Result<Option<Draft>> {
        read_json(&self.path)
    }

    /// Loads the draft, refusing when there is none.
    pub fn require(&self) -> Result<Draft> {
        self.load()?.ok_or_else(|| {
            CalcError::Incomplete("no draft in progress; start with `gpa load`".to_string())
        })
    }

    pub fn save(&self, draft: &Draft) -> Result<()> {
        write_json(&self.path, draft)
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(CalcError::Io(error)),
        }
    }
}
