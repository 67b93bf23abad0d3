use super::normalizer::NormalizedExtraction;
use super::scoring::{compute_period_score, is_complete};
use crate::error::{CalcError, Result};
use crate::types::grade::Grade;
use crate::types::record::{PeriodResult, ScoredSubject, Subject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftSource {
    Manual,
    Scan,
}

/// A period result still being filled in. Only `promote` turns it into a saved record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub stream: String,
    pub period: u32,
    pub source: DraftSource,
    pub subjects: Vec<ScoredSubject>,
}

impl Draft {
    pub fn new(stream: &str, period: u32, curriculum: Vec<Subject>) -> Self {
        Self {
            stream: stream.to_string(),
            period,
            source: DraftSource::Manual,
            subjects: curriculum
                .into_iter()
                .map(|subject| ScoredSubject::new(subject, Grade::Unset))
                .collect(),
        }
    }

    pub fn from_extraction(extraction: NormalizedExtraction) -> Self {
        Self {
            stream: extraction.stream,
            period: extraction.period,
            source: DraftSource::Scan,
            subjects: extraction.subjects,
        }
    }

    /// Sets the grade for every row carrying `code` (case-insensitive).
    pub fn assign(&mut self, code: &str, grade: Grade) -> Result<()> {
        let mut matched = false;
        for scored in self
            .subjects
            .iter_mut()
            .filter(|scored| scored.subject.code.eq_ignore_ascii_case(code.trim()))
        {
            scored.grade = grade;
            matched = true;
        }
        if matched {
            Ok(())
        } else {
            Err(CalcError::UnknownSubject(code.to_string()))
        }
    }

    pub fn pending(&self) -> Vec<&str> {
        self.subjects
            .iter()
            .filter(|scored| !scored.grade.is_set())
            .map(|scored| scored.subject.code.as_str())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        !self.subjects.is_empty() && is_complete(&self.subjects)
    }

    /// `None` until every subject is graded; partial scores are never reported.
    pub fn score(&self) -> Option<f64> {
        self.is_complete()
            .then(|| compute_period_score(&self.subjects))
    }

    pub fn promote(&self, verified: bool, now: DateTime<Utc>) -> Result<PeriodResult> {
        let score = self.score().ok_or_else(|| {
            CalcError::Incomplete(format!("ungraded subjects: {}", self.pending().join(", ")))
        })?;
        if !verified {
            return Err(CalcError::Incomplete(
                "review the grades and confirm with --verified before saving".to_string(),
            ));
        }
        Ok(PeriodResult::new(
            self.period,
            &self.stream,
            score,
            self.subjects.clone(),
            now,
        ))
    }
}
