//! Bankroll ledger.
//!
//! SQLite-backed persistence for the single bankroll scalar and the
//! append-only log of recommendations. The analyze flow calls
//! `read_bankroll` before the engine runs and `record` after it succeeds —
//! once each, in that order. Nothing is written when the engine errors.
//!
//! The write path is selectable: `ConsistencyMode::Legacy` reproduces the
//! original behaviour of two independent statements (bet insert, bankroll
//! update) with no isolation between concurrent analyze calls, while
//! `ConsistencyMode::Atomic` wraps both in a single transaction.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::types::{MarketKind, Recommendation};

/// Bankroll seeded when no record exists yet.
pub const DEFAULT_BANKROLL: f64 = 1000.0;

/// How bet insert + bankroll update are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyMode {
    /// Two independent statements, no isolation (legacy behaviour).
    Legacy,
    /// One transaction covering both writes.
    #[default]
    Atomic,
}

/// The single bankroll row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BankrollRow {
    pub id: i64,
    pub amount: f64,
}

/// A persisted bet, as read back from the log.
#[derive(Debug, Clone, Serialize)]
pub struct BetRecord {
    pub id: i64,
    pub game: String,
    pub pick: String,
    pub market: String,
    pub result: String,
    pub wager: f64,
    pub change: f64,
    pub new_bankroll: f64,
    pub created_at: String,
}

pub struct BankrollLedger {
    pool: SqlitePool,
    mode: ConsistencyMode,
    initial_amount: f64,
}

const INSERT_BET: &str = "INSERT INTO bets (game, pick, market, result, wager, change, new_bankroll, created_at) \
     VALUES (?, ?, ?, 'PENDING', ?, 0, ?, ?)";
const UPDATE_BANKROLL: &str = "UPDATE bankroll SET amount = ? WHERE id = ?";

impl BankrollLedger {
    pub fn new(pool: SqlitePool, mode: ConsistencyMode, initial_amount: f64) -> Self {
        Self {
            pool,
            mode,
            initial_amount,
        }
    }

    /// Create the bankroll and bets tables if they don't exist.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS bankroll (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create bankroll table")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS bets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                game TEXT NOT NULL,
                pick TEXT NOT NULL,
                market TEXT NOT NULL,
                result TEXT NOT NULL,
                wager REAL NOT NULL,
                change REAL NOT NULL,
                new_bankroll REAL NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create bets table")?;

        debug!(mode = ?self.mode, "Ledger schema ready");
        Ok(())
    }

    /// Read the bankroll row, seeding it with the configured initial amount
    /// on first use so later updates always have a row to target.
    pub async fn read_bankroll(&self) -> Result<BankrollRow> {
        let row = sqlx::query("SELECT id, amount FROM bankroll LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .context("Failed to read bankroll")?;

        if let Some(row) = row {
            return Ok(BankrollRow {
                id: row.get("id"),
                amount: row.get("amount"),
            });
        }

        let result = sqlx::query("INSERT INTO bankroll (amount) VALUES (?)")
            .bind(self.initial_amount)
            .execute(&self.pool)
            .await
            .context("Failed to seed bankroll")?;

        info!(amount = self.initial_amount, "Seeded fresh bankroll");
        Ok(BankrollRow {
            id: result.last_insert_rowid(),
            amount: self.initial_amount,
        })
    }

    /// Persist a successful recommendation: append the PENDING bet, then
    /// write the new bankroll amount.
    pub async fn record(
        &self,
        rec: &Recommendation,
        market: MarketKind,
        bankroll: &BankrollRow,
    ) -> Result<()> {
        let created_at = Utc::now().to_rfc3339();

        match self.mode {
            ConsistencyMode::Legacy => {
                sqlx::query(INSERT_BET)
                    .bind(&rec.game)
                    .bind(&rec.pick)
                    .bind(market.as_str())
                    .bind(rec.wager)
                    .bind(rec.new_bankroll)
                    .bind(&created_at)
                    .execute(&self.pool)
                    .await
                    .context("Failed to insert bet")?;

                sqlx::query(UPDATE_BANKROLL)
                    .bind(rec.new_bankroll)
                    .bind(bankroll.id)
                    .execute(&self.pool)
                    .await
                    .context("Failed to update bankroll")?;
            }
            ConsistencyMode::Atomic => {
                let mut tx = self.pool.begin().await.context("Failed to begin ledger tx")?;

                sqlx::query(INSERT_BET)
                    .bind(&rec.game)
                    .bind(&rec.pick)
                    .bind(market.as_str())
                    .bind(rec.wager)
                    .bind(rec.new_bankroll)
                    .bind(&created_at)
                    .execute(&mut *tx)
                    .await
                    .context("Failed to insert bet")?;

                sqlx::query(UPDATE_BANKROLL)
                    .bind(rec.new_bankroll)
                    .bind(bankroll.id)
                    .execute(&mut *tx)
                    .await
                    .context("Failed to update bankroll")?;

                tx.commit().await.context("Failed to commit ledger tx")?;
            }
        }

        info!(
            game = %rec.game,
            pick = %rec.pick,
            market = market.as_str(),
            wager = rec.wager,
            new_bankroll = rec.new_bankroll,
            "Recommendation saved"
        );
        Ok(())
    }

    /// Most recent bets, newest first.
    pub async fn recent_bets(&self, limit: i64) -> Result<Vec<BetRecord>> {
        let rows = sqlx::query(
            "SELECT id, game, pick, market, result, wager, change, new_bankroll, created_at \
             FROM bets ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to read bets")?;

        Ok(rows
            .into_iter()
            .map(|row| BetRecord {
                id: row.get("id"),
                game: row.get("game"),
                pick: row.get("pick"),
                market: row.get("market"),
                result: row.get("result"),
                wager: row.get("wager"),
                change: row.get("change"),
                new_bankroll: row.get("new_bankroll"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn ledger(mode: ConsistencyMode) -> BankrollLedger {
        // One connection: each pooled connection to :memory: is its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let ledger = BankrollLedger::new(pool, mode, DEFAULT_BANKROLL);
        ledger.migrate().await.unwrap();
        ledger
    }

    fn sample_rec(wager: f64, new_bankroll: f64) -> Recommendation {
        Recommendation {
            game: "Celtics vs Lakers".into(),
            pick: "Celtics".into(),
            confidence: 0.421,
            edge: 0.1,
            expected_value: -0.031,
            kelly_fraction: 0.0,
            wager,
            new_bankroll,
            spread_value: None,
        }
    }

    #[tokio::test]
    async fn test_read_seeds_default_bankroll() {
        let ledger = ledger(ConsistencyMode::Atomic).await;
        let row = ledger.read_bankroll().await.unwrap();
        assert_eq!(row.amount, DEFAULT_BANKROLL);

        // Second read returns the same row, not another seed.
        let again = ledger.read_bankroll().await.unwrap();
        assert_eq!(again, row);
    }

    #[tokio::test]
    async fn test_record_atomic_persists_bet_and_bankroll() {
        let ledger = ledger(ConsistencyMode::Atomic).await;
        let row = ledger.read_bankroll().await.unwrap();

        ledger
            .record(&sample_rec(5.0, 995.0), MarketKind::Moneyline, &row)
            .await
            .unwrap();

        let after = ledger.read_bankroll().await.unwrap();
        assert_eq!(after.amount, 995.0);
        assert_eq!(after.id, row.id);

        let bets = ledger.recent_bets(10).await.unwrap();
        assert_eq!(bets.len(), 1);
        assert_eq!(bets[0].pick, "Celtics");
        assert_eq!(bets[0].result, "PENDING");
        assert_eq!(bets[0].wager, 5.0);
        assert_eq!(bets[0].change, 0.0);
        assert_eq!(bets[0].market, "moneyline");
    }

    #[tokio::test]
    async fn test_record_legacy_persists_bet_and_bankroll() {
        let ledger = ledger(ConsistencyMode::Legacy).await;
        let row = ledger.read_bankroll().await.unwrap();

        ledger
            .record(&sample_rec(12.5, 987.5), MarketKind::Spread, &row)
            .await
            .unwrap();

        let after = ledger.read_bankroll().await.unwrap();
        assert_eq!(after.amount, 987.5);

        let bets = ledger.recent_bets(10).await.unwrap();
        assert_eq!(bets.len(), 1);
        assert_eq!(bets[0].market, "spread");
    }

    #[tokio::test]
    async fn test_bets_are_append_only_newest_first() {
        let ledger = ledger(ConsistencyMode::Atomic).await;
        let row = ledger.read_bankroll().await.unwrap();

        ledger
            .record(&sample_rec(5.0, 995.0), MarketKind::Moneyline, &row)
            .await
            .unwrap();
        let row = ledger.read_bankroll().await.unwrap();
        ledger
            .record(&sample_rec(7.0, 988.0), MarketKind::Moneyline, &row)
            .await
            .unwrap();

        let bets = ledger.recent_bets(10).await.unwrap();
        assert_eq!(bets.len(), 2);
        assert_eq!(bets[0].wager, 7.0);
        assert_eq!(bets[1].wager, 5.0);
    }

    #[tokio::test]
    async fn test_consistency_mode_config_spelling() {
        let legacy: ConsistencyMode = serde_json::from_str("\"legacy\"").unwrap();
        let atomic: ConsistencyMode = serde_json::from_str("\"atomic\"").unwrap();
        assert_eq!(legacy, ConsistencyMode::Legacy);
        assert_eq!(atomic, ConsistencyMode::Atomic);
        assert_eq!(ConsistencyMode::default(), ConsistencyMode::Atomic);
    }
}
