//! HTTP route handlers.
//!
//! All endpoints return JSON. Failures come back as `{"error": "..."}`
//! bodies on a 200, matching the wire contract the frontend already speaks.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use super::SharedState;
use crate::odds::normalize::{self, h2h_prices, median_home_spread};
use crate::strategy::{self, MatchupInput};
use crate::types::{AnalysisError, MarketKind, Recommendation, Sport};

/// `POST /analyze` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub market: MarketKind,
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /odds/:sport
pub async fn get_odds(State(state): State<SharedState>, Path(sport): Path<String>) -> Json<Value> {
    Json(odds_for(&state, &sport).await.unwrap_or_else(error_body))
}

async fn odds_for(state: &SharedState, sport_key: &str) -> Result<Value, AnalysisError> {
    let sport: Sport = sport_key.parse()?;
    let cached = state.cache.get(sport).await?;
    let games = normalize::normalize(&cached.games, Utc::now());

    Ok(json!({
        "sport": sport,
        "games": games,
        "cache_age_sec": cached.age_secs,
    }))
}

/// POST /analyze
pub async fn analyze(
    State(state): State<SharedState>,
    Json(req): Json<AnalyzeRequest>,
) -> Json<Value> {
    match run_analysis(&state, &req).await {
        Ok(rec) => Json(json!(rec)),
        Err(e) => match e.downcast_ref::<AnalysisError>() {
            Some(analysis) => Json(error_body_ref(analysis)),
            None => {
                error!(error = %e, "Analyze request failed internally");
                Json(json!({"error": "Internal error"}))
            }
        },
    }
}

/// The full analyze flow: cache → locate game → extract prices → engine →
/// ledger. All-or-nothing; nothing is persisted unless the engine succeeds.
async fn run_analysis(state: &SharedState, req: &AnalyzeRequest) -> anyhow::Result<Recommendation> {
    let sport: Sport = req.sport.parse::<Sport>()?;
    let cached = state.cache.get(sport).await?;

    let game = cached
        .games
        .iter()
        .find(|g| g.home_team == req.home_team && g.away_team == req.away_team)
        .ok_or(AnalysisError::GameNotFound)?;

    let (home_odds, away_odds) = h2h_prices(game).ok_or(AnalysisError::MoneylineUnavailable)?;
    let home_spread = median_home_spread(game).map(|(home, _)| home);
    if req.market == MarketKind::Spread && home_spread.is_none() {
        return Err(AnalysisError::MarketUnavailable.into());
    }

    let bankroll = state.ledger.read_bankroll().await?;

    let rec = strategy::recommend(
        &MatchupInput {
            home_team: &req.home_team,
            away_team: &req.away_team,
            home_odds,
            away_odds,
            market: req.market,
            home_spread,
        },
        bankroll.amount,
    )?;

    state.ledger.record(&rec, req.market, &bankroll).await?;
    Ok(rec)
}

fn error_body(err: AnalysisError) -> Value {
    error_body_ref(&err)
}

fn error_body_ref(err: &AnalysisError) -> Value {
    json!({"error": err.to_string()})
}
