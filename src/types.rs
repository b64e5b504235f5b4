//! Shared types for the price poll.
//!
//! These types form the data model used across all modules. The scoring
//! core only ever reads them; everything it produces is rebuilt from
//! scratch on each run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points awarded to every winner of a period.
pub const WINNING_POINTS: u32 = 3;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A participant's free-text guess for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    pub participant_name: String,
    pub raw_text: String,
}

impl Guess {
    pub fn new(participant_name: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            participant_name: participant_name.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// One scoring round (e.g. a calendar month) with its guesses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub period_id: String,
    /// Display label, e.g. "December 2025".
    pub label: String,
    /// Resolved price; `None` while the period is still open.
    pub actual_price: Option<Decimal>,
    pub guesses: Vec<Guess>,
}

impl Period {
    /// Whether the actual price is known.
    pub fn is_resolved(&self) -> bool {
        self.actual_price.is_some()
    }
}

// ---------------------------------------------------------------------------
// Parsed guesses
// ---------------------------------------------------------------------------

/// Normalized numeric form of a guess.
///
/// `Unparseable` never matches and never wins on distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RangeRepr", into = "RangeRepr")]
pub enum ParsedRange {
    Bounded { lower: Decimal, upper: Decimal },
    Unparseable,
}

impl ParsedRange {
    /// Build a bounded range, ordering the endpoints.
    pub fn between(a: Decimal, b: Decimal) -> Self {
        ParsedRange::Bounded {
            lower: a.min(b),
            upper: a.max(b),
        }
    }

    /// A single-value guess.
    pub fn point(value: Decimal) -> Self {
        ParsedRange::Bounded {
            lower: value,
            upper: value,
        }
    }

    pub fn lower(&self) -> Option<Decimal> {
        match self {
            ParsedRange::Bounded { lower, .. } => Some(*lower),
            ParsedRange::Unparseable => None,
        }
    }

    pub fn upper(&self) -> Option<Decimal> {
        match self {
            ParsedRange::Bounded { upper, .. } => Some(*upper),
            ParsedRange::Unparseable => None,
        }
    }

    /// Whether `price` falls inside the range (inclusive at both ends).
    pub fn contains(&self, price: Decimal) -> bool {
        match self {
            ParsedRange::Bounded { lower, upper } => *lower <= price && price <= *upper,
            ParsedRange::Unparseable => false,
        }
    }

    /// Distance from `price` to the nearest edge of the range.
    /// Zero when inside; `None` for an unparseable guess.
    pub fn distance_to(&self, price: Decimal) -> Option<Decimal> {
        match self {
            ParsedRange::Bounded { lower, upper } => {
                let distance = if price < *lower {
                    *lower - price
                } else if price > *upper {
                    price - *upper
                } else {
                    Decimal::ZERO
                };
                Some(distance)
            }
            ParsedRange::Unparseable => None,
        }
    }
}

impl fmt::Display for ParsedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedRange::Bounded { lower, upper } if lower == upper => {
                write!(f, "${}", format_amount(*lower))
            }
            ParsedRange::Bounded { lower, upper } => {
                write!(f, "${} - ${}", format_amount(*lower), format_amount(*upper))
            }
            ParsedRange::Unparseable => write!(f, "N/A"),
        }
    }
}

/// Wire shape of a `ParsedRange`: both bounds null for the sentinel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RangeRepr {
    lower: Option<Decimal>,
    upper: Option<Decimal>,
}

impl From<ParsedRange> for RangeRepr {
    fn from(range: ParsedRange) -> Self {
        RangeRepr {
            lower: range.lower(),
            upper: range.upper(),
        }
    }
}

impl From<RangeRepr> for ParsedRange {
    fn from(repr: RangeRepr) -> Self {
        match (repr.lower, repr.upper) {
            (Some(lower), Some(upper)) => ParsedRange::between(lower, upper),
            _ => ParsedRange::Unparseable,
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// A guess after scoring against a resolved price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredGuess {
    pub participant_name: String,
    pub raw_text: String,
    pub parsed: ParsedRange,
    /// Either 0 or `WINNING_POINTS`.
    pub points: u32,
    /// The price fell inside this guess's range.
    pub exact_match: bool,
    /// Only computed on the closest-miss path, for parsed guesses.
    pub miss_distance: Option<Decimal>,
}

impl ScoredGuess {
    pub fn is_winner(&self) -> bool {
        self.points == WINNING_POINTS
    }
}

impl fmt::Display for ScoredGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} - {} pts",
            self.participant_name, self.raw_text, self.points
        )
    }
}

/// Scores for one resolved period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodResult {
    pub period_id: String,
    pub label: String,
    pub actual_price: Decimal,
    /// Range of the first winner; `None` when nobody scored.
    pub winning_range: Option<ParsedRange>,
    /// Sorted by points descending, ties in guess order.
    pub scored: Vec<ScoredGuess>,
}

impl PeriodResult {
    pub fn winners(&self) -> impl Iterator<Item = &ScoredGuess> {
        self.scored.iter().filter(|s| s.is_winner())
    }

    /// True when the winners were picked by distance, not containment.
    pub fn decided_by_distance(&self) -> bool {
        self.winners().next().is_some() && !self.scored.iter().any(|s| s.exact_match)
    }
}

/// One period in a participant's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub period_label: String,
    pub actual_price: Decimal,
    pub raw_text: String,
    pub was_exact_match: bool,
}

/// Cumulative standing of one participant across resolved periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub participant_name: String,
    pub total_points: u32,
    pub correct_count: u32,
    pub history: Vec<HistoryEntry>,
}

impl StandingEntry {
    pub fn new(participant_name: impl Into<String>) -> Self {
        Self {
            participant_name: participant_name.into(),
            total_points: 0,
            correct_count: 0,
            history: Vec::new(),
        }
    }
}

impl fmt::Display for StandingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} pts ({} correct)",
            self.participant_name, self.total_points, self.correct_count
        )
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Quote currency of the contest record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
    Aud,
}

impl Currency {
    /// Name of the price field for this currency in the contest record.
    pub fn price_field(&self) -> &'static str {
        match self {
            Currency::Usd => "bitcoin_usd_price",
            Currency::Aud => "bitcoin_aud_price",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
            Currency::Aud => write!(f, "AUD"),
        }
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format an amount with thousands separators and no decimals, e.g. `95,000`.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round();
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
