//! Guess parser.
//!
//! Turns free-text guesses such as `$95k-$105k`, `105000 – 95000`,
//! `<90k` or `120K` into a [`ParsedRange`]. Anything that does not fit
//! one of those shapes becomes [`ParsedRange::Unparseable`]; the parser
//! never fails.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::types::ParsedRange;

const EN_DASH: char = '\u{2013}';

/// Parse a raw guess. Rules are tried in order and the first one that
/// applies decides the outcome:
///
/// 1. range separator (`-` or en-dash): exactly two amounts, order-free
/// 2. `<` prefix: `0` up to the amount
/// 3. `k`/`K` shorthand: a single value
/// 4. anything else is unparseable
pub fn parse(raw_text: &str) -> ParsedRange {
    let text = raw_text.trim();

    if text.contains('-') || text.contains(EN_DASH) {
        return parse_range(text);
    }

    if text.contains('<') {
        return match parse_amount(&text.replace('<', "")) {
            Some(value) => ParsedRange::Bounded {
                lower: Decimal::ZERO,
                upper: value,
            },
            None => ParsedRange::Unparseable,
        };
    }

    if text.contains(['k', 'K']) {
        return parse_amount(text)
            .map(ParsedRange::point)
            .unwrap_or(ParsedRange::Unparseable);
    }

    ParsedRange::Unparseable
}

fn parse_range(text: &str) -> ParsedRange {
    let normalized = text.replace(EN_DASH, "-");
    let parts: Vec<&str> = normalized.split('-').collect();
    let [low, high] = parts.as_slice() else {
        return ParsedRange::Unparseable;
    };

    match (parse_amount(low), parse_amount(high)) {
        (Some(a), Some(b)) => ParsedRange::between(a, b),
        _ => ParsedRange::Unparseable,
    }
}

/// Parse one amount: drops `$`, trims surrounding whitespace, expands a
/// trailing `k`/`K`. Interior whitespace is left in and rejects the amount.
fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned = text.trim().replace('$', "");
    let cleaned = cleaned.trim();

    let (digits, multiplier) = match cleaned.strip_suffix(['k', 'K']) {
        Some(rest) => (rest, Decimal::ONE_THOUSAND),
        None => (cleaned, Decimal::ONE),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    Decimal::from_str(digits)
        .ok()
        .and_then(|value| value.checked_mul(multiplier))
        .map(|value| value.normalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
