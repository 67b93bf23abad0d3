use crate::types::record::ScoredSubject;

pub const MIN_PERIODS_COVERED: u32 = 2;
pub const MAX_PERIODS_COVERED: u32 = 10;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Credit-weighted mean of grade points, rounded to two decimals.
///
/// Subjects still `Unset` do not participate. Accumulation runs in input
/// order. An empty list or a zero credit total scores 0.
pub fn compute_period_score(subjects: &[ScoredSubject]) -> f64 {
    let (points, credits) = subjects
        .iter()
        .filter(|scored| scored.grade.is_set())
        .fold((0.0_f64, 0.0_f64), |(points, credits), scored| {
            (
                points + f64::from(scored.grade.points()) * scored.subject.credits,
                credits + scored.subject.credits,
            )
        });

    if credits > 0.0 {
        round2(points / credits)
    } else {
        0.0
    }
}

/// True when every subject carries a real grade. Callers gate on this before scoring.
pub fn is_complete(subjects: &[ScoredSubject]) -> bool {
    subjects.iter().all(|scored| scored.grade.is_set())
}

/// Unweighted mean of the first `periods_covered` scores, rounded to two decimals.
pub fn compute_cumulative_score(period_scores: &[f64], periods_covered: u32) -> f64 {
    let take = (periods_covered as usize).min(period_scores.len());
    let effective = &period_scores[..take];
    if effective.is_empty() {
        return 0.0;
    }
    let sum: f64 = effective.iter().sum();
    round2(sum / effective.len() as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    AtRisk,
    Standard,
    Distinction,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score < 5.0 {
            Self::AtRisk
        } else if score >= 8.5 {
            Self::Distinction
        } else {
            Self::Standard
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AtRisk => "at risk",
            Self::Standard => "standard",
            Self::Distinction => "distinction",
        }
    }
}
