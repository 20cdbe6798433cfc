//! Shared types for the LockBox service.
//!
//! These types form the data model used across all modules: the supported
//! sport set, the raw provider payload, the normalized caller-facing quote,
//! the staking recommendation, and the caller-facing error taxonomy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Sports
// ---------------------------------------------------------------------------

/// The fixed set of sports the service supports.
///
/// Requests for anything else are rejected before the cache or provider is
/// touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    #[serde(rename = "americanfootball_nfl")]
    Nfl,
    #[serde(rename = "americanfootball_ncaaf")]
    Ncaaf,
    #[serde(rename = "basketball_nba")]
    Nba,
    #[serde(rename = "baseball_mlb")]
    Mlb,
    #[serde(rename = "icehockey_nhl")]
    Nhl,
}

impl Sport {
    pub const ALL: [Sport; 5] = [Sport::Nfl, Sport::Ncaaf, Sport::Nba, Sport::Mlb, Sport::Nhl];

    /// The provider key for this sport (also the URL path segment).
    pub fn key(&self) -> &'static str {
        match self {
            Sport::Nfl => "americanfootball_nfl",
            Sport::Ncaaf => "americanfootball_ncaaf",
            Sport::Nba => "basketball_nba",
            Sport::Mlb => "baseball_mlb",
            Sport::Nhl => "icehockey_nhl",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Sport {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sport::ALL
            .iter()
            .copied()
            .find(|sport| sport.key() == s)
            .ok_or_else(|| AnalysisError::UnsupportedSport(s.to_string()))
    }
}

/// Which market a recommendation is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    #[default]
    Moneyline,
    Spread,
}

impl MarketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketKind::Moneyline => "moneyline",
            MarketKind::Spread => "spread",
        }
    }
}

// ---------------------------------------------------------------------------
// Provider payload (The Odds API JSON → Rust)
// ---------------------------------------------------------------------------

/// One game record as returned by the odds provider.
/// We only deserialize the fields we need; unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGame {
    #[serde(default)]
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    /// Kickoff timestamp, ISO 8601. May be absent or malformed; such games
    /// are dropped at the normalization boundary.
    #[serde(default)]
    pub commence_time: String,
    /// Whether the game has finished.
    #[serde(default)]
    pub completed: bool,
    /// Score entries, present once a game is underway. We only care whether
    /// any exist, never their contents.
    #[serde(default)]
    pub scores: Vec<serde_json::Value>,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

/// One bookmaker's offers for a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmaker {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub markets: Vec<BookmakerMarket>,
}

/// A single market ("h2h" or "spreads") offered by a bookmaker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmakerMarket {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

/// A priced outcome within a bookmaker market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub name: String,
    /// American-format price; absent when the bookmaker omitted it.
    #[serde(default)]
    pub price: Option<f64>,
    /// Point value for spread markets; absent for moneylines.
    #[serde(default)]
    pub point: Option<f64>,
}

// ---------------------------------------------------------------------------
// Normalized quote
// ---------------------------------------------------------------------------

/// A normalized, caller-facing game quote. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameQuote {
    /// Display label, "Away vs Home".
    pub game: String,
    pub home_team: String,
    pub away_team: String,
    /// American-format moneyline prices.
    pub home_odds: f64,
    pub away_odds: f64,
    /// Consensus (median) home spread; absent when no bookmaker lists one.
    pub home_spread: Option<f64>,
    pub away_spread: Option<f64>,
    /// Kickoff, UTC.
    pub commence: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// The decision engine's staking recommendation for one matchup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Display label, "Away vs Home".
    pub game: String,
    /// Team to back (home or away team name).
    pub pick: String,
    /// Model probability of the pick, in [0, 1].
    pub confidence: f64,
    /// Model-vs-market edge for the pick, signed percentage points.
    pub edge: f64,
    /// Expected profit per unit stake, fractional.
    pub expected_value: f64,
    /// Quarter-Kelly staking fraction, in [0, 1].
    pub kelly_fraction: f64,
    /// Dollar wager, at least the house minimum.
    pub wager: f64,
    /// Bankroll after the wager is committed.
    pub new_bankroll: f64,
    /// Consensus home spread as a signed string, spread market only.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub spread_value: Option<String>,
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Caller-facing analysis errors.
///
/// Display strings double as the wire-level `{"error": ...}` messages, so
/// they must stay stable.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unsupported sport: {0}")]
    UnsupportedSport(String),

    #[error("Game not found")]
    GameNotFound,

    #[error("Moneyline not available")]
    MoneylineUnavailable,

    #[error("Spread market not available")]
    MarketUnavailable,

    #[error("Odds provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Insufficient bankroll: ${0:.2} is below the minimum wager")]
    InsufficientBankroll(f64),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sport_roundtrip() {
        for sport in Sport::ALL {
            let parsed: Sport = sport.key().parse().unwrap();
            assert_eq!(parsed, sport);
        }
    }

    #[test]
    fn test_sport_unsupported() {
        let err = "soccer_epl".parse::<Sport>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported sport: soccer_epl");
    }

    #[test]
    fn test_sport_serde_uses_provider_key() {
        let json = serde_json::to_string(&Sport::Nhl).unwrap();
        assert_eq!(json, "\"icehockey_nhl\"");
    }

    #[test]
    fn test_market_kind_default_is_moneyline() {
        assert_eq!(MarketKind::default(), MarketKind::Moneyline);
        let parsed: MarketKind = serde_json::from_str("\"spread\"").unwrap();
        assert_eq!(parsed, MarketKind::Spread);
    }

    #[test]
    fn test_raw_game_tolerates_sparse_payload() {
        let g: RawGame =
            serde_json::from_str(r#"{"home_team": "Bills", "away_team": "Jets"}"#).unwrap();
        assert_eq!(g.home_team, "Bills");
        assert!(!g.completed);
        assert!(g.scores.is_empty());
        assert!(g.bookmakers.is_empty());
        assert!(g.commence_time.is_empty());
    }

    #[test]
    fn test_recommendation_omits_absent_spread() {
        let rec = Recommendation {
            game: "Jets vs Bills".into(),
            pick: "Bills".into(),
            confidence: 0.58,
            edge: 1.2,
            expected_value: 0.031,
            kelly_fraction: 0.0123,
            wager: 12.3,
            new_bankroll: 987.7,
            spread_value: None,
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(!json.contains("spread_value"));
    }

    #[test]
    fn test_error_wire_messages() {
        assert_eq!(AnalysisError::GameNotFound.to_string(), "Game not found");
        assert_eq!(
            AnalysisError::MoneylineUnavailable.to_string(),
            "Moneyline not available"
        );
        assert_eq!(
            AnalysisError::MarketUnavailable.to_string(),
            "Spread market not available"
        );
    }
}
