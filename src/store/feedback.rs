use crate::error::{CalcError, Result};
use crate::types::record::{record_id, UserRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const FEEDBACK_FILE: &str = "feedback.jsonl";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    pub fn new(user: &UserRecord, rating: u8, comment: &str, now: DateTime<Utc>) -> Result<Self> {
        if !(1..=5).contains(&rating) {
            return Err(CalcError::Incomplete(
                "rating must be between 1 and 5".to_string(),
            ));
        }
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(CalcError::Incomplete("comment must not be blank".to_string()));
        }
        Ok(Self {
            id: record_id("feedback", &user.id, now),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            rating,
            comment: comment.to_string(),
            created_at: now,
        })
    }
}

pub struct FeedbackLog {
    path: PathBuf,
}

impl FeedbackLog {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(FEEDBACK_FILE),
        }
    }

    pub fn append(&self, record: &FeedbackRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(CalcError::Io)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(CalcError::Io)?;
        writeln!(file, "{}", serde_json::to_string(record)?).map_err(CalcError::Io)?;
        file.flush().map_err(CalcError::Io)
    }
}
