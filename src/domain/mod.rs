//! Core domain types and logic: trade records, the ledger and its metrics.

pub mod trade;
pub mod synthetic;
pub mod calendar;
pub mod ledger;
pub mod metrics;
pub mod journal_config;
pub mod config_validation;
pub mod error;
