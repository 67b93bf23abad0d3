use super::scoring::{MAX_PERIODS_COVERED, MIN_PERIODS_COVERED};
use crate::error::{CalcError, Result};
use crate::types::record::{CumulativeResult, History, HistoryRecord, PeriodResult};
use std::collections::BTreeMap;

/// Replaces any saved result for the same period and puts `new_result` first.
///
/// Other entries keep their relative order. Re-applying the same result is a no-op.
pub fn upsert_period_result(history: History, new_result: PeriodResult) -> History {
    let History {
        periods,
        cumulatives,
    } = history;
    let target = new_result.period;
    let mut next = Vec::with_capacity(periods.len() + 1);
    next.push(new_result);
    next.extend(periods.into_iter().filter(|existing| existing.period != target));
    History {
        periods: next,
        cumulatives,
    }
}

/// Cumulative snapshots accumulate; two records covering the same span are both kept.
pub fn append_cumulative_result(history: History, new_result: CumulativeResult) -> History {
    let History {
        periods,
        cumulatives,
    } = history;
    let mut next = Vec::with_capacity(cumulatives.len() + 1);
    next.push(new_result);
    next.extend(cumulatives);
    History {
        periods,
        cumulatives: next,
    }
}

/// Drops the record with `id` from either list. Absent ids leave history untouched.
pub fn delete_result(history: History, id: &str) -> History {
    let History {
        mut periods,
        mut cumulatives,
    } = history;
    periods.retain(|record| record.id != id);
    cumulatives.retain(|record| record.id != id);
    History {
        periods,
        cumulatives,
    }
}

pub fn contains_id(history: &History, id: &str) -> bool {
    history.periods.iter().any(|record| record.id == id)
        || history.cumulatives.iter().any(|record| record.id == id)
}

/// Merges a record delivered by a profile store, where the same append may arrive twice
/// or out of order. A late period record never displaces a newer one for its semester.
pub fn record_delivery(history: History, record: HistoryRecord) -> History {
    match record {
        HistoryRecord::Period(result) => {
            let superseded = history.periods.iter().any(|existing| {
                existing.period == result.period && existing.created_at > result.created_at
            });
            if superseded {
                history
            } else {
                upsert_period_result(history, result)
            }
        }
        HistoryRecord::Cumulative(result) => {
            if contains_id(&history, &result.id) {
                history
            } else {
                append_cumulative_result(history, result)
            }
        }
    }
}

/// Most recent saved score for each period.
pub fn latest_period_scores(history: &History) -> BTreeMap<u32, f64> {
    let mut ordered = history.periods.iter().collect::<Vec<_>>();
    ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut latest = BTreeMap::new();
    for record in ordered {
        latest.entry(record.period).or_insert(record.score);
    }
    latest
}

/// Builds the ordered scores for periods `1..=periods_covered`.
///
/// Explicit overrides win over saved history. Any gap refuses the calculation.
pub fn cumulative_inputs(
    history: &History,
    periods_covered: u32,
    overrides: &BTreeMap<u32, f64>,
) -> Result<Vec<f64>> {
    if !(MIN_PERIODS_COVERED..=MAX_PERIODS_COVERED).contains(&periods_covered) {
        return Err(CalcError::InvalidPeriodCount(periods_covered));
    }

    let latest = latest_period_scores(history);
    let mut scores = Vec::with_capacity(periods_covered as usize);
    let mut missing = Vec::new();
    for period in 1..=periods_covered {
        match overrides.get(&period).or_else(|| latest.get(&period)) {
            Some(score) if (0.0..=10.0).contains(score) => scores.push(*score),
            Some(score) => {
                return Err(CalcError::Incomplete(format!(
                    "period {period} score {score} is outside 0-10"
                )))
            }
            None => missing.push(period.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(CalcError::Incomplete(format!(
            "missing score for period(s) {}",
            missing.join(", ")
        )));
    }
    Ok(scores)
}
