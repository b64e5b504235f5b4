//! Dashboard API route handlers.
//!
//! All endpoints return JSON. The record is re-read on every request so
//! edits to the data file show up without a restart.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::scoring::{self, ContestResults};
use crate::storage;
use crate::types::{Currency, Guess, PeriodResult, StandingEntry};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Read-only settings shared by all route handlers.
pub struct DashboardState {
    pub title: String,
    pub data_file: String,
    pub currency: Currency,
}

impl DashboardState {
    pub fn new(title: impl Into<String>, data_file: impl Into<String>, currency: Currency) -> Self {
        Self {
            title: title.into(),
            data_file: data_file.into(),
            currency,
        }
    }

    /// Load and score the current record. The file read runs on the
    /// blocking pool.
    async fn results(&self) -> Result<ContestResults, ApiError> {
        let path = self.data_file.clone();
        let currency = self.currency;
        let record = tokio::task::spawn_blocking(move || storage::load_record(&path, currency))
            .await
            .map_err(|e| {
                error!(error = %e, "Record loading task failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            })?
            .map_err(|e| {
                error!(error = %format!("{e:#}"), path = %self.data_file, "Failed to load contest record");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
            })?;
        Ok(scoring::evaluate(&record))
    }
}

pub type AppState = Arc<DashboardState>;

type ApiError = (StatusCode, String);

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct StandingsResponse {
    pub title: String,
    pub currency: Currency,
    /// When the record was scored.
    pub generated_at: DateTime<Utc>,
    pub standings: Vec<StandingEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearlyEntry {
    pub year: String,
    pub resolved: bool,
    pub guesses: Vec<Guess>,
    pub result: Option<PeriodResult>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/standings
pub async fn get_standings(
    State(state): State<AppState>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let results = state.results().await?;
    Ok(Json(StandingsResponse {
        title: state.title.clone(),
        currency: state.currency,
        generated_at: Utc::now(),
        standings: results.standings,
    }))
}

/// GET /api/periods
pub async fn get_periods(
    State(state): State<AppState>,
) -> Result<Json<Vec<PeriodResult>>, ApiError> {
    Ok(Json(state.results().await?.periods))
}

/// GET /api/yearly
pub async fn get_yearly(State(state): State<AppState>) -> Result<Json<Vec<YearlyEntry>>, ApiError> {
    let yearly = state
        .results()
        .await?
        .yearly
        .into_iter()
        .map(|pool| YearlyEntry {
            year: pool.period.label,
            resolved: pool.result.is_some(),
            guesses: pool.period.guesses,
            result: pool.result,
        })
        .collect();
    Ok(Json(yearly))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
