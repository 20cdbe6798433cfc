//! LockBox — sports odds ingestion, analysis, and staking recommendation
//! service.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod ledger;
pub mod odds;
pub mod server;
pub mod strategy;
pub mod types;
