use crate::catalog::{CatalogProvider, StreamInfo};
use crate::error::{CalcError, Result};
use crate::types::config::NormalizerPolicy;
use crate::types::extraction::RawExtraction;
use crate::types::grade::Grade;
use crate::types::record::{ScoredSubject, Subject};
use tracing::{debug, warn};

pub const UNVERIFIED_SUBJECT_NAME: &str = "Unverified Subject";

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedExtraction {
    pub stream: String,
    pub stream_matched: bool,
    pub period: u32,
    pub subjects: Vec<ScoredSubject>,
    pub unverified: usize,
}

/// Finds the catalog stream whose id or name contains, or is contained in, the label.
pub fn resolve_stream(detected: &str, streams: &[StreamInfo]) -> Option<String> {
    let needle = detected.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let overlaps = |candidate: &str| {
        let candidate = candidate.trim().to_lowercase();
        !candidate.is_empty() && (needle.contains(&candidate) || candidate.contains(&needle))
    };
    streams
        .iter()
        .find(|stream| overlaps(&stream.id) || overlaps(&stream.name))
        .map(|stream| stream.id.clone())
}

/// Upper-cases and keeps only `[A-Z0-9]`.
pub fn normalize_code(raw: &str) -> String {
    raw.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect()
}

/// Anything outside the assignable grade set falls to RA.
pub fn normalize_grade(raw: &str) -> Grade {
    let trimmed = raw.trim();
    Grade::SELECTABLE
        .into_iter()
        .find(|grade| grade.symbol() == trimmed)
        .unwrap_or(Grade::Ra)
}

pub fn normalize(
    raw: &RawExtraction,
    catalog: &dyn CatalogProvider,
    policy: &NormalizerPolicy,
) -> Result<NormalizedExtraction> {
    let streams = catalog.streams()?;
    let (stream, stream_matched) = match resolve_stream(&raw.detected_department, &streams) {
        Some(stream) => (stream, true),
        None => {
            warn!(
                detected = %raw.detected_department,
                fallback = %policy.default_stream,
                "stream not recognized, using default"
            );
            (policy.default_stream.clone(), false)
        }
    };
    let period = raw.detected_semester.filter(|period| *period > 0).unwrap_or(1);

    let curriculum = match catalog.curriculum(&stream, period) {
        Ok(subjects) => subjects,
        Err(CalcError::NoSuchPeriod(reason)) => {
            warn!(%stream, period, %reason, "no curriculum for detected period");
            Vec::new()
        }
        Err(other) => return Err(other),
    };

    let mut unverified = 0;
    let mut subjects = Vec::with_capacity(raw.results.len());
    for row in &raw.results {
        let code = normalize_code(&row.code);
        if code.chars().count() < policy.min_code_len {
            debug!(raw = %row.code, "discarding short code");
            continue;
        }

        let grade = normalize_grade(&row.grade);
        let subject = match curriculum
            .iter()
            .find(|subject| subject.code.eq_ignore_ascii_case(&code))
        {
            Some(known) => known.clone(),
            None => {
                unverified += 1;
                debug!(%code, "code not in curriculum, keeping as unverified");
                Subject {
                    code,
                    name: UNVERIFIED_SUBJECT_NAME.to_string(),
                    credits: policy.fallback_credits,
                }
            }
        };
        subjects.push(ScoredSubject::new(subject, grade));
    }

    if subjects.is_empty() {
        return Err(CalcError::NothingRecognized);
    }

    Ok(NormalizedExtraction {
        stream,
        stream_matched,
        period,
        subjects,
        unverified,
    })
}
