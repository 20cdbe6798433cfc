//! HTTP server — the axum surface over the odds pipeline and decision
//! engine.
//!
//! Routing only; request orchestration lives in `routes`. CORS is
//! permissive for local frontend development.

pub mod routes;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::ledger::BankrollLedger;
use crate::odds::cache::QuoteCache;

/// Shared state accessible by all route handlers.
pub struct AppState {
    pub cache: QuoteCache,
    pub ledger: BankrollLedger,
}

pub type SharedState = Arc<AppState>;

/// Build the axum router with all routes and middleware.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/odds/:sport", get(routes::get_odds))
        .route("/analyze", post(routes::analyze))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ConsistencyMode;
    use crate::odds::cache::DEFAULT_TTL;
    use crate::odds::QuoteSource;
    use crate::types::{RawGame, Sport};
    use anyhow::Result;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    struct FixedSource {
        games: Vec<RawGame>,
    }

    #[async_trait]
    impl QuoteSource for FixedSource {
        async fn fetch(&self, _sport: Sport) -> Result<Vec<RawGame>> {
            Ok(self.games.clone())
        }
    }

    fn fixture_game(home: &str, away: &str) -> RawGame {
        let commence = (Utc::now() + Duration::days(2)).to_rfc3339();
        serde_json::from_value(json!({
            "home_team": home,
            "away_team": away,
            "commence_time": commence,
            "bookmakers": [{
                "key": "bk",
                "markets": [
                    {"key": "h2h", "outcomes": [
                        {"name": home, "price": -150.0},
                        {"name": away, "price": 130.0},
                    ]},
                    {"key": "spreads", "outcomes": [
                        {"name": home, "price": -110.0, "point": -3.5},
                        {"name": away, "price": -110.0, "point": 3.5},
                    ]},
                ],
            }],
        }))
        .unwrap()
    }

    async fn test_state(games: Vec<RawGame>) -> SharedState {
        // One connection: each pooled connection to :memory: is its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let ledger = BankrollLedger::new(pool, ConsistencyMode::Atomic, 1000.0);
        ledger.migrate().await.unwrap();
        let cache = QuoteCache::new(Arc::new(FixedSource { games }), DEFAULT_TTL);
        Arc::new(AppState { cache, ledger })
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(test_state(Vec::new()).await);
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_odds_unsupported_sport() {
        let app = build_router(test_state(Vec::new()).await);
        let resp = app
            .oneshot(Request::builder().uri("/odds/cricket_ipl").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["error"], "Unsupported sport: cricket_ipl");
    }

    #[tokio::test]
    async fn test_odds_happy_path() {
        let state = test_state(vec![fixture_game("Lakers", "Celtics")]).await;
        let app = build_router(state);
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/odds/basketball_nba")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["sport"], "basketball_nba");
        assert_eq!(json["cache_age_sec"], 0);
        let games = json["games"].as_array().unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0]["game"], "Celtics vs Lakers");
        assert_eq!(games[0]["home_odds"], -150.0);
        assert_eq!(games[0]["home_spread"], -3.5);
    }

    #[tokio::test]
    async fn test_analyze_game_not_found() {
        let state = test_state(vec![fixture_game("Lakers", "Celtics")]).await;
        let app = build_router(state);

        let body = json!({
            "sport": "basketball_nba",
            "home_team": "Knicks",
            "away_team": "Heat",
        });
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["error"], "Game not found");
    }
}
