use crate::error::{CalcError, Result};
use crate::types::record::Subject;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

pub const STANDARD_PERIODS: u32 = 8;
pub const EXTENDED_PERIODS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub id: String,
    pub name: String,
}

/// Source of the authoritative subject list per stream and period.
pub trait CatalogProvider {
    fn streams(&self) -> Result<Vec<StreamInfo>>;

    /// Credit-bearing subjects for the selection, in catalog order.
    fn curriculum(&self, stream: &str, period: u32) -> Result<Vec<Subject>>;
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    departments: Vec<Department>,
}

#[derive(Debug, Clone, Deserialize)]
struct Department {
    id: String,
    name: String,
    #[serde(default)]
    semesters: BTreeMap<u32, Vec<Subject>>,
}

#[derive(Debug, Clone)]
pub struct JsonCatalog {
    departments: Vec<Department>,
    extended_streams: Vec<String>,
}

impl JsonCatalog {
    pub fn load(path: &Path, extended_streams: &[String]) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CalcError::CurriculumUnavailable(format!("{}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json(&content, extended_streams)?;
        debug!(
            path = %path.display(),
            streams = catalog.departments.len(),
            "curriculum catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_json(content: &str, extended_streams: &[String]) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(content)
            .map_err(|e| CalcError::CurriculumUnavailable(format!("catalog parse error: {e}")))?;
        Ok(Self {
            departments: document.departments,
            extended_streams: extended_streams.to_vec(),
        })
    }

    pub fn max_periods(&self, stream: &str) -> u32 {
        if self
            .extended_streams
            .iter()
            .any(|extended| extended.eq_ignore_ascii_case(stream))
        {
            EXTENDED_PERIODS
        } else {
            STANDARD_PERIODS
        }
    }

    fn department(&self, stream: &str) -> Option<&Department> {
        self.departments
            .iter()
            .find(|department| department.id.eq_ignore_ascii_case(stream))
    }
}

impl CatalogProvider for JsonCatalog {
    fn streams(&self) -> Result<Vec<StreamInfo>> {
        Ok(self
            .departments
            .iter()
            .map(|department| StreamInfo {
                id: department.id.clone(),
                name: department.name.clone(),
            })
            .collect())
    }

    fn curriculum(&self, stream: &str, period: u32) -> Result<Vec<Subject>> {
        let department = self
            .department(stream)
            .ok_or_else(|| CalcError::NoSuchPeriod(format!("unknown stream {stream}")))?;

        let max = self.max_periods(&department.id);
        if !(1..=max).contains(&period) {
            return Err(CalcError::NoSuchPeriod(format!(
                "{} offers semesters 1-{max}, not {period}",
                department.id
            )));
        }

        let subjects = department
            .semesters
            .get(&period)
            .map(|subjects| {
                subjects
                    .iter()
                    .filter(|subject| subject.credits > 0.0)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        if subjects.is_empty() {
            return Err(CalcError::NoSuchPeriod(format!(
                "curriculum for {} semester {period} is under update",
                department.id
            )));
        }
        Ok(subjects)
    }
}
