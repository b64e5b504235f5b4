//! End-to-end contest scoring.
//!
//! Loads a multi-month record through `storage`, scores it, and checks the
//! standings and report against hand-computed results.

use rust_decimal_macros::dec;

use price_poll::report::{self, ReportOptions};
use price_poll::scoring::{self, guess, period, standings};
use price_poll::storage::{self, ContestRecord};
use price_poll::types::{Currency, Guess, ParsedRange, Period};

/// Three months (two resolved) plus an open yearly pool.
///
/// - 2025-11 @ 91,000: Alice (90k-100k) and Bob (85k–95k) both contain it.
/// - 2025-12 @ 87,500: nobody contains it; Carol (<85k) misses by 2,500,
///   Alice (90k-100k) by 2,500 too, Bob (95k-105k) by 7,500. Dave is junk.
/// - 2026-01: unresolved; Erin only guesses here.
const RECORD: &str = r#"{
    "monthly": {
        "2025-12": {
            "month": "December 2025",
            "bitcoin_usd_price": 87500,
            "participants": [
                {"name": "Bob", "guess": "95k-105k"},
                {"name": "Alice", "guess": "90k-100k"},
                {"name": "Carol", "guess": "<85k"},
                {"name": "Dave", "guess": "wagmi"}
            ]
        },
        "2025-11": {
            "month": "November 2025",
            "bitcoin_usd_price": 91000,
            "participants": [
                {"name": "Alice", "guess": "$90k-$100k"},
                {"name": "Bob", "guess": "85k – 95k"},
                {"name": "Carol", "guess": "120k"}
            ]
        },
        "2026-01": {
            "month": "January 2026",
            "bitcoin_usd_price": null,
            "participants": [
                {"name": "Alice", "guess": "100k-110k"},
                {"name": "Erin", "guess": "<90k"}
            ]
        }
    },
    "yearly": {
        "2026": {
            "participants": [
                {"name": "Alice", "guess": "150k"},
                {"name": "Bob", "guess": "$120k-$140k"}
            ]
        }
    }
}"#;

fn temp_path() -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("price_poll_it_{}.json", uuid::Uuid::new_v4()));
    p.to_string_lossy().to_string()
}

fn load() -> ContestRecord {
    storage::parse_record(RECORD, Currency::Usd).unwrap()
}

#[test]
fn test_parse_common_shapes() {
    assert_eq!(
        guess::parse("95000-105000"),
        ParsedRange::between(dec!(95000), dec!(105000))
    );
    assert_eq!(guess::parse("105000-95000"), guess::parse("95000-105000"));
    assert_eq!(
        guess::parse("$95k-$105k"),
        ParsedRange::between(dec!(95000), dec!(105000))
    );
    assert_eq!(
        guess::parse("<90k"),
        ParsedRange::between(dec!(0), dec!(90000))
    );
    assert_eq!(guess::parse("not a number"), ParsedRange::Unparseable);
}

#[test]
fn test_full_contest_standings() {
    let results = scoring::evaluate(&load());

    assert_eq!(results.periods.len(), 2);
    assert_eq!(results.periods[0].period_id, "2025-11");

    let table: Vec<(&str, u32, u32)> = results
        .standings
        .iter()
        .map(|s| (s.participant_name.as_str(), s.total_points, s.correct_count))
        .collect();

    // Alice: 3 + 3, Bob: 3 + 0, Carol: 0 + 3, Dave: 0. Erin never resolved.
    assert_eq!(
        table,
        vec![("Alice", 6, 2), ("Bob", 3, 1), ("Carol", 3, 1), ("Dave", 0, 0)]
    );
}

#[test]
fn test_history_tracks_exact_and_closest_wins() {
    let results = scoring::evaluate(&load());
    let alice = &results.standings[0];

    assert_eq!(alice.history.len(), 2);
    assert_eq!(alice.history[0].period_label, "November 2025");
    assert!(alice.history[0].was_exact_match);
    assert_eq!(alice.history[1].period_label, "December 2025");
    assert_eq!(alice.history[1].actual_price, dec!(87500));
    assert!(!alice.history[1].was_exact_match);
}

#[test]
fn test_december_closest_miss_co_winners() {
    let results = scoring::evaluate(&load());
    let december = &results.periods[1];

    assert!(december.decided_by_distance());
    let winners: Vec<&str> = december
        .winners()
        .map(|s| s.participant_name.as_str())
        .collect();
    assert_eq!(winners, vec!["Alice", "Carol"]);

    let dave = december
        .scored
        .iter()
        .find(|s| s.participant_name == "Dave")
        .unwrap();
    assert_eq!(dave.parsed, ParsedRange::Unparseable);
    assert_eq!(dave.points, 0);
}

#[test]
fn test_standalone_aggregate_matches_evaluate() {
    let record = load();
    assert_eq!(
        standings::aggregate(&record.periods),
        scoring::evaluate(&record).standings
    );
}

#[test]
fn test_unresolved_only_participant_absent() {
    let results = scoring::evaluate(&load());
    assert!(results.standings.iter().all(|s| s.participant_name != "Erin"));
}

#[test]
fn test_score_is_pure() {
    let p = Period {
        period_id: "x".into(),
        label: "X".into(),
        actual_price: Some(dec!(100000)),
        guesses: vec![Guess::new("A", "50000-60000"), Guess::new("B", "70000-80000")],
    };
    let first = period::score(&p).unwrap();
    let second = period::score(&p).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.scored[0].participant_name, "B");
    assert_eq!(first.scored[0].points, 3);
    assert_eq!(first.scored[1].points, 0);
}

#[test]
fn test_report_from_file() {
    let path = temp_path();
    std::fs::write(&path, RECORD).unwrap();

    let record = storage::load_record(&path, Currency::Usd).unwrap();
    let text = report::render(
        &scoring::evaluate(&record),
        &ReportOptions {
            title: "WA Bitcoiners Vote".into(),
            currency: Currency::Usd,
            show_yearly: true,
        },
    );

    assert!(text.contains("📅 NOVEMBER 2025"));
    assert!(text.contains("Bitcoin USD Price: $91,000"));
    assert!(text.contains("🥇 1. Alice: 6 pts (2 correct)"));
    assert!(text.contains("📌 Bob: $120k-$140k"));
    assert!(!text.contains("JANUARY 2026"));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_export_roundtrip_shape() {
    let path = temp_path();
    let results = scoring::evaluate(&load());
    storage::export_standings(&results.standings, &path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 4);
    assert_eq!(json[0]["participant_name"], "Alice");
    assert_eq!(json[0]["history"][1]["was_exact_match"], false);

    std::fs::remove_file(&path).unwrap();
}
