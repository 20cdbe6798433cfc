//! Odds ingestion pipeline.
//!
//! Defines the `QuoteSource` trait and provides:
//! - `client` — The Odds API HTTP client
//! - `cache` — per-sport TTL fetch-through cache
//! - `normalize` — raw payload → actionable `GameQuote` list

pub mod cache;
pub mod client;
pub mod normalize;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{RawGame, Sport};

/// Abstraction over the upstream odds provider.
///
/// The production implementation is `client::OddsApiClient`; tests substitute
/// deterministic in-memory sources.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the raw game list for one sport.
    async fn fetch(&self, sport: Sport) -> Result<Vec<RawGame>>;
}
