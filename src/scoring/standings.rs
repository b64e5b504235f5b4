//! Standings aggregator.
//!
//! Folds the scores of every resolved period into one ranked table.

use std::collections::HashMap;
use tracing::debug;

use super::period;
use crate::types::{HistoryEntry, Period, PeriodResult, StandingEntry, WINNING_POINTS};

/// Score every resolved period and rank participants.
///
/// Unresolved periods are skipped; participants who only appear in them
/// are left out entirely.
pub fn aggregate(periods: &[Period]) -> Vec<StandingEntry> {
    let results: Vec<PeriodResult> = periods.iter().filter_map(period::score).collect();
    aggregate_results(&results)
}

/// Rank participants from already-scored periods.
pub fn aggregate_results(results: &[PeriodResult]) -> Vec<StandingEntry> {
    let mut standings: Vec<StandingEntry> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for result in results {
        for scored in &result.scored {
            let slot = *index
                .entry(scored.participant_name.as_str())
                .or_insert_with(|| {
                    standings.push(StandingEntry::new(scored.participant_name.clone()));
                    standings.len() - 1
                });

            let entry = &mut standings[slot];
            entry.total_points += scored.points;
            if scored.points == WINNING_POINTS {
                entry.correct_count += 1;
            }
            entry.history.push(HistoryEntry {
                period_label: result.label.clone(),
                actual_price: result.actual_price,
                raw_text: scored.raw_text.clone(),
                was_exact_match: scored.exact_match,
            });
        }
    }

    // Stable: equal (points, correct) keep first-seen order.
    standings.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| b.correct_count.cmp(&a.correct_count))
    });

    debug!(
        periods = results.len(),
        participants = standings.len(),
        "Standings aggregated"
    );

    standings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
