//! The Odds API integration.
//!
//! Read-only client for live bookmaker quotes.
//!
//! API docs: https://the-odds-api.com/liveapi/guides/v4/
//! Base URL: https://api.the-odds-api.com/v4/sports
//! Auth: `apiKey` query parameter. Quota is per-request, so callers should
//! go through `cache::QuoteCache` rather than hitting this directly.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::debug;

use super::QuoteSource;
use crate::types::{RawGame, Sport};

/// Regions whose bookmakers we aggregate.
const REGIONS: &str = "us,us2";
/// Markets requested from the provider.
const MARKETS: &str = "h2h,spreads";
/// How far ahead (days) the provider should look for games.
const DAYS_FROM: &str = "8";

pub struct OddsApiClient {
    http: Client,
    base_url: String,
    api_key: Secret<String>,
}

impl OddsApiClient {
    pub fn new(base_url: String, api_key: Secret<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("lockbox/0.1.0")
            .build()
            .context("Failed to build odds HTTP client")?;
        Ok(Self { http, base_url, api_key })
    }
}

#[async_trait]
impl QuoteSource for OddsApiClient {
    async fn fetch(&self, sport: Sport) -> Result<Vec<RawGame>> {
        let url = format!("{}/{}/odds", self.base_url, sport.key());

        let response = self
            .http
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.expose_secret().as_str()),
                ("regions", REGIONS),
                ("markets", MARKETS),
                ("oddsFormat", "american"),
                ("dateFormat", "iso"),
                ("daysFrom", DAYS_FROM),
            ])
            .send()
            .await
            .with_context(|| format!("Odds request failed for {sport}"))?
            .error_for_status()
            .with_context(|| format!("Odds provider rejected request for {sport}"))?;

        let games: Vec<RawGame> = response
            .json()
            .await
            .with_context(|| format!("Failed to decode odds payload for {sport}"))?;

        debug!(sport = %sport, games = games.len(), "Fetched odds from provider");
        Ok(games)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        let client = OddsApiClient::new(
            "https://api.the-odds-api.com/v4/sports".into(),
            Secret::new("test-key".into()),
            Duration::from_secs(30),
        );
        assert!(client.is_ok());
    }
}
