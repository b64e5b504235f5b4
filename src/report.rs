//! Plain-text results report.
//!
//! Renders `ContestResults` the way the poll results are posted in chat:
//! one block per resolved month, the overall standings, then the open
//! yearly predictions.

use std::fmt;

use crate::scoring::{ContestResults, YearlyPool};
use crate::types::{format_amount, Currency, PeriodResult, StandingEntry};

const RULE: &str = "============================================================";
const THIN_RULE: &str = "----------------------------------------";

/// Options that shape the report.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub currency: Currency,
    pub show_yearly: bool,
}

/// Render the full report.
pub fn render(results: &ContestResults, options: &ReportOptions) -> String {
    Report { results, options }.to_string()
}

/// One resolved month: price, winning range, and every guess.
pub fn render_period(period: &PeriodResult, currency: Currency) -> String {
    PeriodBlock { period, currency }.to_string()
}

/// Ranked standings with medals for the podium.
pub fn render_standings(standings: &[StandingEntry]) -> String {
    StandingsBlock(standings).to_string()
}

/// A yearly pool: scored if resolved, otherwise just the predictions.
pub fn render_yearly(pool: &YearlyPool, currency: Currency) -> String {
    YearlyBlock { pool, currency }.to_string()
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

struct Report<'a> {
    results: &'a ContestResults,
    options: &'a ReportOptions,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Report { results, options } = self;

        writeln!(f, "{RULE}")?;
        writeln!(f, "🦞 {} - RESULTS ({})", options.title.to_uppercase(), options.currency)?;
        writeln!(f, "{RULE}")?;

        if results.periods.is_empty() {
            writeln!(f, "\nNo resolved months yet.")?;
        }
        for period in &results.periods {
            write!(f, "\n{}", PeriodBlock { period, currency: options.currency })?;
        }

        writeln!(f, "\n{RULE}")?;
        writeln!(f, "📊 MONTHLY STANDINGS")?;
        writeln!(f, "{THIN_RULE}")?;
        write!(f, "{}", StandingsBlock(&results.standings))?;

        if options.show_yearly {
            for pool in &results.yearly {
                writeln!(f, "\n{RULE}")?;
                write!(f, "{}", YearlyBlock { pool, currency: options.currency })?;
            }
        }

        writeln!(f, "\n{RULE}")
    }
}

struct PeriodBlock<'a> {
    period: &'a PeriodResult,
    currency: Currency,
}

impl fmt::Display for PeriodBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📅 {}", self.period.label.to_uppercase())?;
        writeln!(f, "{THIN_RULE}")?;
        write_outcome(f, self.period, self.currency)
    }
}

/// Price, winning range and marked guesses, without a heading.
fn write_outcome(f: &mut fmt::Formatter<'_>, period: &PeriodResult, currency: Currency) -> fmt::Result {
    writeln!(f, "Bitcoin {currency} Price: ${}", format_amount(period.actual_price))?;
    match &period.winning_range {
        Some(range) => write!(f, "Correct Range: {range}")?,
        None => write!(f, "Correct Range: N/A")?,
    }
    if period.decided_by_distance() {
        write!(f, " (closest)")?;
    }
    writeln!(f)?;
    writeln!(f, "\nParticipants:")?;
    for scored in &period.scored {
        let marker = if scored.is_winner() { "🎯" } else { "  " };
        writeln!(f, "  {marker} {scored}")?;
    }
    Ok(())
}

struct StandingsBlock<'a>(&'a [StandingEntry]);

impl fmt::Display for StandingsBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "  No results yet");
        }
        for (i, entry) in self.0.iter().enumerate() {
            let rank = i + 1;
            writeln!(f, "  {} {rank}. {entry}", medal(rank))?;
        }
        Ok(())
    }
}

struct YearlyBlock<'a> {
    pool: &'a YearlyPool,
    currency: Currency,
}

impl fmt::Display for YearlyBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let YearlyBlock { pool, currency } = self;
        writeln!(f, "🎯 YEARLY {} PREDICTIONS ({currency})", pool.period.label)?;
        writeln!(f, "{THIN_RULE}")?;

        match &pool.result {
            Some(result) => write_outcome(f, result, *currency),
            None => {
                for guess in &pool.period.guesses {
                    writeln!(f, "  📌 {}: {}", guess.participant_name, guess.raw_text)?;
                }
                Ok(())
            }
        }
    }
}

fn medal(rank: usize) -> &'static str {
    match rank {
        1 => "🥇",
        2 => "🥈",
        3 => "🥉",
        _ => "  ",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
