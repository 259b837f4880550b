//! tradejournal: a single-user discretionary trade journal.
//!
//! Hexagonal architecture: the trade ledger and metrics engine live in
//! [`domain`], port traits in [`ports`], concrete implementations in
//! [`adapters`], and the command line front end in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
