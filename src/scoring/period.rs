//! Period scorer.
//!
//! Awards points for one resolved period. Every guess whose range holds
//! the actual price wins; if nobody's range holds it, the guesses with the
//! smallest miss distance win instead (ties share the win).

use rust_decimal::Decimal;
use tracing::debug;

use super::guess;
use crate::types::{Guess, Period, PeriodResult, ScoredGuess, WINNING_POINTS};

/// Score a period. Returns `None` while the period is unresolved.
pub fn score(period: &Period) -> Option<PeriodResult> {
    let actual_price = period.actual_price?;
    let scored = score_guesses(&period.guesses, actual_price);
    let winning_range = scored.iter().find(|s| s.is_winner()).map(|s| s.parsed);

    debug!(
        period = %period.period_id,
        price = %actual_price,
        guesses = scored.len(),
        winners = scored.iter().filter(|s| s.is_winner()).count(),
        "Period scored"
    );

    Some(PeriodResult {
        period_id: period.period_id.clone(),
        label: period.label.clone(),
        actual_price,
        winning_range,
        scored,
    })
}

/// Score guesses against a known price.
///
/// The result is sorted by points descending; guesses with equal points
/// keep their submission order.
pub fn score_guesses(guesses: &[Guess], actual_price: Decimal) -> Vec<ScoredGuess> {
    let mut scored: Vec<ScoredGuess> = guesses
        .iter()
        .map(|g| {
            let parsed = guess::parse(&g.raw_text);
            let exact_match = parsed.contains(actual_price);
            ScoredGuess {
                participant_name: g.participant_name.clone(),
                raw_text: g.raw_text.clone(),
                parsed,
                points: if exact_match { WINNING_POINTS } else { 0 },
                exact_match,
                miss_distance: None,
            }
        })
        .collect();

    if !scored.iter().any(|s| s.exact_match) {
        award_closest(&mut scored, actual_price);
    }

    // `sort_by` is stable, so equal points keep guess order.
    scored.sort_by(|a, b| b.points.cmp(&a.points));
    scored
}

/// Closest-miss fallback: unparseable guesses sit out.
fn award_closest(scored: &mut [ScoredGuess], actual_price: Decimal) {
    for s in scored.iter_mut() {
        s.miss_distance = s.parsed.distance_to(actual_price);
    }

    let Some(closest) = scored.iter().filter_map(|s| s.miss_distance).min() else {
        debug!(price = %actual_price, "No parseable guesses, nobody scores");
        return;
    };

    for s in scored.iter_mut() {
        if s.miss_distance == Some(closest) {
            s.points = WINNING_POINTS;
        }
    }

    debug!(
        price = %actual_price,
        distance = %closest,
        "No exact match, awarded closest miss"
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParsedRange;
    use rust_decimal_macros::dec;

    fn period(price: Option<Decimal>, guesses: &[(&str, &str)]) -> Period {
        Period {
            period_id: "2025-12".into(),
            label: "December 2025".into(),
            actual_price: price,
            guesses: guesses.iter().map(|(n, g)| Guess::new(*n, *g)).collect(),
        }
    }

    fn points_of(result: &PeriodResult, name: &str) -> u32 {
        result
            .scored
            .iter()
            .find(|s| s.participant_name == name)
            .map(|s| s.points)
            .unwrap()
    }

    #[test]
    fn test_exact_match_wins() {
        let p = period(
            Some(dec!(95000)),
            &[("A", "90000-100000"), ("B", "110000-120000")],
        );
        let result = score(&p).unwrap();
        assert_eq!(points_of(&result, "A"), 3);
        assert_eq!(points_of(&result, "B"), 0);
        assert!(result.scored[0].exact_match);
        assert!(result.scored.iter().all(|s| s.miss_distance.is_none()));
        assert!(!result.decided_by_distance());
    }

    #[test]
    fn test_several_exact_matches_all_win() {
        let p = period(
            Some(dec!(100000)),
            &[("A", "90k-100k"), ("B", "100k-110k"), ("C", "<80k")],
        );
        let result = score(&p).unwrap();
        assert_eq!(points_of(&result, "A"), 3);
        assert_eq!(points_of(&result, "B"), 3);
        assert_eq!(points_of(&result, "C"), 0);
    }

    #[test]
    fn test_closest_miss_wins() {
        let p = period(
            Some(dec!(100000)),
            &[("A", "50000-60000"), ("B", "70000-80000")],
        );
        let result = score(&p).unwrap();
        assert_eq!(points_of(&result, "B"), 3);
        assert_eq!(points_of(&result, "A"), 0);
        assert_eq!(result.scored[0].participant_name, "B");
        assert_eq!(result.scored[0].miss_distance, Some(dec!(20000)));
        assert!(!result.scored[0].exact_match);
        assert!(result.decided_by_distance());
    }

    #[test]
    fn test_price_below_every_range() {
        let p = period(
            Some(dec!(60000)),
            &[("A", "70k-80k"), ("B", "90k-100k")],
        );
        let result = score(&p).unwrap();
        assert_eq!(points_of(&result, "A"), 3);
        assert_eq!(result.scored[0].miss_distance, Some(dec!(10000)));
    }

    #[test]
    fn test_equidistant_misses_share_the_win() {
        let p = period(
            Some(dec!(100000)),
            &[("A", "80k-90k"), ("B", "110k-120k"), ("C", "50k-60k")],
        );
        let result = score(&p).unwrap();
        assert_eq!(points_of(&result, "A"), 3);
        assert_eq!(points_of(&result, "B"), 3);
        assert_eq!(points_of(&result, "C"), 0);
    }

    #[test]
    fn test_unparseable_never_wins() {
        let p = period(
            Some(dec!(100000)),
            &[("A", "moon"), ("B", "50k-60k")],
        );
        let result = score(&p).unwrap();
        assert_eq!(points_of(&result, "A"), 0);
        assert_eq!(points_of(&result, "B"), 3);
        let a = result.scored.iter().find(|s| s.participant_name == "A").unwrap();
        assert_eq!(a.parsed, ParsedRange::Unparseable);
        assert_eq!(a.miss_distance, None);
    }

    #[test]
    fn test_all_unparseable_nobody_scores() {
        let p = period(Some(dec!(100000)), &[("A", "moon"), ("B", "lambo")]);
        let result = score(&p).unwrap();
        assert!(result.scored.iter().all(|s| s.points == 0));
        assert_eq!(result.winning_range, None);
    }

    #[test]
    fn test_unresolved_period_is_not_scored() {
        let p = period(None, &[("A", "90k-100k")]);
        assert!(score(&p).is_none());
    }

    #[test]
    fn test_empty_period() {
        let p = period(Some(dec!(100000)), &[]);
        let result = score(&p).unwrap();
        assert!(result.scored.is_empty());
        assert_eq!(result.winning_range, None);
    }

    #[test]
    fn test_sorted_by_points_stable() {
        let p = period(
            Some(dec!(95000)),
            &[("A", "50k-60k"), ("B", "90k-100k"), ("C", "70k-80k"), ("D", "94k-96k")],
        );
        let result = score(&p).unwrap();
        let order: Vec<&str> = result
            .scored
            .iter()
            .map(|s| s.participant_name.as_str())
            .collect();
        assert_eq!(order, vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn test_winning_range_is_first_winner() {
        let p = period(
            Some(dec!(95000)),
            &[("A", "50k-60k"), ("B", "90k-100k"), ("C", "94k-96k")],
        );
        let result = score(&p).unwrap();
        assert_eq!(
            result.winning_range,
            Some(ParsedRange::between(dec!(90000), dec!(100000)))
        );
    }

    #[test]
    fn test_points_total_matches_winner_count() {
        let p = period(
            Some(dec!(100000)),
            &[("A", "80k-90k"), ("B", "110k-120k"), ("C", "junk")],
        );
        let result = score(&p).unwrap();
        let total: u32 = result.scored.iter().map(|s| s.points).sum();
        assert_eq!(total, 3 * result.winners().count() as u32);
    }

    #[test]
    fn test_split_number_cannot_win_closest_miss() {
        let p = period(
            Some(dec!(100000000)),
            &[("A", "90 100k"), ("B", "50k-60k")],
        );
        let result = score(&p).unwrap();
        assert_eq!(points_of(&result, "A"), 0);
        assert_eq!(points_of(&result, "B"), 3);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let p = period(
            Some(dec!(100000)),
            &[("A", "80k-90k"), ("B", "<95k"), ("C", "120k")],
        );
        assert_eq!(score(&p), score(&p));
    }
}
