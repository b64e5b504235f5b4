//! Contest record loading.
//!
//! Reads the poll record from a JSON file and turns it into validated
//! `Period`s. The record itself is maintained by hand or by another tool;
//! this crate only reads it, apart from the optional standings export.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::types::{Currency, Guess, Period, StandingEntry};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A record that loads as JSON but cannot be scored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("participant without a name in period {period}")]
    MissingName { period: String },

    #[error("{name} guessed more than once in period {period}")]
    DuplicateParticipant { period: String, name: String },

    #[error("negative price in period {period}")]
    NegativePrice { period: String },
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A validated contest record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContestRecord {
    /// Monthly periods ordered by period id.
    pub periods: Vec<Period>,
    /// Yearly pools ordered by year.
    pub yearly: Vec<Period>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    monthly: BTreeMap<String, RawPeriod>,
    #[serde(default)]
    yearly: BTreeMap<String, RawPeriod>,
}

#[derive(Debug, Deserialize)]
struct RawPeriod {
    #[serde(default)]
    month: Option<String>,
    #[serde(default)]
    bitcoin_usd_price: Option<Decimal>,
    #[serde(default)]
    bitcoin_aud_price: Option<Decimal>,
    #[serde(default)]
    participants: Vec<RawGuess>,
}

#[derive(Debug, Deserialize)]
struct RawGuess {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    guess: Option<String>,
}

impl RawPeriod {
    fn price(&self, currency: Currency) -> Option<Decimal> {
        match currency {
            Currency::Usd => self.bitcoin_usd_price,
            Currency::Aud => self.bitcoin_aud_price,
        }
    }

    fn into_period(self, id: String, currency: Currency) -> Result<Period, RecordError> {
        let actual_price = match self.price(currency) {
            Some(price) if price.is_sign_negative() && !price.is_zero() => {
                return Err(RecordError::NegativePrice { period: id });
            }
            Some(price) if price.is_zero() => {
                warn!(period = %id, field = currency.price_field(), "Zero price, treating period as unresolved");
                None
            }
            other => other,
        };

        let mut seen = HashSet::new();
        let mut guesses = Vec::with_capacity(self.participants.len());
        for raw in self.participants {
            let name = match raw.name.map(|n| n.trim().to_string()) {
                Some(n) if !n.is_empty() => n,
                _ => return Err(RecordError::MissingName { period: id }),
            };
            if !seen.insert(name.clone()) {
                return Err(RecordError::DuplicateParticipant { period: id, name });
            }
            guesses.push(Guess::new(name, raw.guess.unwrap_or_default()));
        }

        Ok(Period {
            label: self.month.unwrap_or_else(|| id.clone()),
            period_id: id,
            actual_price,
            guesses,
        })
    }
}

fn convert(
    raw: BTreeMap<String, RawPeriod>,
    currency: Currency,
) -> Result<Vec<Period>, RecordError> {
    raw.into_iter()
        .map(|(id, period)| period.into_period(id, currency))
        .collect()
}

/// Parse and validate a contest record from JSON text.
pub fn parse_record(json: &str, currency: Currency) -> Result<ContestRecord> {
    let raw: RawRecord = serde_json::from_str(json).context("Failed to parse contest record")?;

    let record = ContestRecord {
        periods: convert(raw.monthly, currency).context("Invalid monthly period")?,
        yearly: convert(raw.yearly, currency).context("Invalid yearly pool")?,
    };

    debug!(
        periods = record.periods.len(),
        yearly = record.yearly.len(),
        %currency,
        "Contest record parsed"
    );
    Ok(record)
}

/// Load a contest record from a JSON file.
pub fn load_record(path: &str, currency: Currency) -> Result<ContestRecord> {
    let json = std::fs::read_to_string(path)
        .context(format!("Failed to read contest record from {path}"))?;
    let record = parse_record(&json, currency).context(format!("Bad contest record in {path}"))?;

    info!(
        path,
        periods = record.periods.len(),
        resolved = record.periods.iter().filter(|p| p.is_resolved()).count(),
        yearly = record.yearly.len(),
        "Contest record loaded"
    );
    Ok(record)
}

/// Write a standings table to a JSON file.
pub fn export_standings(standings: &[StandingEntry], path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create directory for {path}"))?;
    }

    let json = serde_json::to_string_pretty(standings).context("Failed to serialise standings")?;
    std::fs::write(path, &json).context(format!("Failed to write standings to {path}"))?;

    debug!(path, participants = standings.len(), "Standings exported");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
