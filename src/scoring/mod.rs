//! Scoring engine — guess parsing, per-period scoring, and standings.

pub mod guess;
pub mod period;
pub mod standings;

use serde::Serialize;
use tracing::info;

use crate::storage::ContestRecord;
use crate::types::{Period, PeriodResult, StandingEntry};

/// Everything derived from one contest record.
#[derive(Debug, Clone, Serialize)]
pub struct ContestResults {
    /// Resolved monthly periods, in record order.
    pub periods: Vec<PeriodResult>,
    /// Monthly standings.
    pub standings: Vec<StandingEntry>,
    /// Yearly pools; resolved pools are scored, open ones listed as-is.
    pub yearly: Vec<YearlyPool>,
}

/// A yearly prediction pool.
#[derive(Debug, Clone, Serialize)]
pub struct YearlyPool {
    pub period: Period,
    pub result: Option<PeriodResult>,
}

/// Score a whole contest record.
///
/// Monthly periods feed the standings; yearly pools never do.
pub fn evaluate(record: &ContestRecord) -> ContestResults {
    let periods: Vec<PeriodResult> = record.periods.iter().filter_map(period::score).collect();
    let standings = standings::aggregate_results(&periods);
    let yearly = record
        .yearly
        .iter()
        .map(|p| YearlyPool {
            period: p.clone(),
            result: period::score(p),
        })
        .collect();

    info!(
        periods = record.periods.len(),
        resolved = periods.len(),
        participants = standings.len(),
        "Contest evaluated"
    );

    ContestResults {
        periods,
        standings,
        yearly,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
