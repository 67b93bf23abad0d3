use super::grade::Grade;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub code: String,
    pub name: String,
    pub credits: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSubject {
    #[serde(flatten)]
    pub subject: Subject,
    pub grade: Grade,
}

impl ScoredSubject {
    pub fn new(subject: Subject, grade: Grade) -> Self {
        Self { subject, grade }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodResult {
    pub id: String,
    pub period: u32,
    pub stream: String,
    pub score: f64,
    pub subjects: Vec<ScoredSubject>,
    pub created_at: DateTime<Utc>,
}

impl PeriodResult {
    pub fn new(
        period: u32,
        stream: &str,
        score: f64,
        subjects: Vec<ScoredSubject>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let id = record_id("period", &format!("{stream}:{period}:{score:.2}"), created_at);
        Self {
            id,
            period,
            stream: stream.to_string(),
            score,
            subjects,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeResult {
    pub id: String,
    pub score: f64,
    pub periods_covered: u32,
    pub created_at: DateTime<Utc>,
}

impl CumulativeResult {
    pub fn new(score: f64, periods_covered: u32, created_at: DateTime<Utc>) -> Self {
        let id = record_id(
            "cumulative",
            &format!("{periods_covered}:{score:.2}"),
            created_at,
        );
        Self {
            id,
            score,
            periods_covered,
            created_at,
        }
    }
}

/// Saved results, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub periods: Vec<PeriodResult>,
    #[serde(default)]
    pub cumulatives: Vec<CumulativeResult>,
}

impl History {
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() && self.cumulatives.is_empty()
    }
}

/// A fully formed record handed to a profile store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HistoryRecord {
    Period(PeriodResult),
    Cumulative(CumulativeResult),
}

impl HistoryRecord {
    pub fn id(&self) -> &str {
        match self {
            Self::Period(record) => &record.id,
            Self::Cumulative(record) => &record.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub register_number: String,
    pub name: String,
    #[serde(default)]
    pub stream: String,
    #[serde(default)]
    pub history: History,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub is_guest: bool,
}

impl UserRecord {
    pub fn guest() -> Self {
        let now = Utc::now();
        Self {
            id: format!("guest-{}", record_id("guest", "session", now)),
            register_number: "GUEST-USER".to_string(),
            name: "Guest User".to_string(),
            stream: String::new(),
            history: History::default(),
            badges: Vec::new(),
            is_guest: true,
        }
    }

    pub fn registered(register_number: &str, name: &str, stream: &str) -> Self {
        Self {
            id: register_number.to_string(),
            register_number: register_number.to_string(),
            name: name.to_string(),
            stream: stream.to_string(),
            history: History::default(),
            badges: Vec::new(),
            is_guest: false,
        }
    }
}

pub fn record_id(kind: &str, payload: &str, created_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(payload.as_bytes());
    hasher.update(
        created_at
            .timestamp_nanos_opt()
            .unwrap_or_else(|| created_at.timestamp())
            .to_le_bytes(),
    );
    let digest = hasher.finalize();
    let hex = digest
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();
    hex[..9].to_string()
}
