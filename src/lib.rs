//! Price Poll — scoring for a monthly price-prediction contest
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod scoring;
pub mod storage;
pub mod report;
pub mod dashboard;
