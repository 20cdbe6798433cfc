//! Quote normalization.
//!
//! Turns the raw provider payload into an ordered list of actionable
//! `GameQuote`s: extracts moneyline prices and a consensus spread per game,
//! drops finished/live games, and keeps only kickoffs inside the actionable
//! window. Malformed records (unparseable kickoff, missing prices) are
//! dropped silently — they never surface to the caller.

use chrono::{DateTime, Duration, Utc};

use crate::types::{GameQuote, RawGame};

/// Games kicking off within this many minutes are too close to act on.
pub const KICKOFF_GRACE_MIN: i64 = 15;
/// A game with scores whose kickoff is within this window is treated as live.
pub const LIVE_GRACE_MIN: i64 = 5;
/// How far ahead a kickoff may be and still be actionable.
pub const HORIZON_DAYS: i64 = 8;

/// Parse a provider kickoff timestamp. Returns `None` for absent or
/// malformed values; callers drop such games.
pub fn parse_kickoff(ts: &str) -> Option<DateTime<Utc>> {
    if ts.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Moneyline extraction: the first head-to-head offer (in payload order)
/// carrying both a home and an away price wins. No averaging across books.
pub fn h2h_prices(game: &RawGame) -> Option<(f64, f64)> {
    for bookmaker in &game.bookmakers {
        for market in &bookmaker.markets {
            if market.key != "h2h" {
                continue;
            }
            let mut home = None;
            let mut away = None;
            for outcome in &market.outcomes {
                if outcome.name == game.home_team {
                    home = outcome.price;
                } else if outcome.name == game.away_team {
                    away = outcome.price;
                }
            }
            if let (Some(h), Some(a)) = (home, away) {
                return Some((h, a));
            }
        }
    }
    None
}

/// Consensus spread: the median of every home-team point listed across all
/// spread offers (one per offer). The away spread is the negation. Returns
/// `None` when no book lists a home point — absent, not zero.
pub fn median_home_spread(game: &RawGame) -> Option<(f64, f64)> {
    let mut points = Vec::new();
    for bookmaker in &game.bookmakers {
        for market in &bookmaker.markets {
            if market.key != "spreads" {
                continue;
            }
            if let Some(point) = market
                .outcomes
                .iter()
                .filter(|o| o.name == game.home_team)
                .find_map(|o| o.point)
            {
                points.push(point);
            }
        }
    }
    if points.is_empty() {
        return None;
    }
    let med = median(&mut points);
    Some((med, -med))
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).expect("spread points are finite"));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// True when a game is finished, or has score entries and a kickoff close
/// enough to `now` to be considered underway.
pub fn clearly_past_or_live(game: &RawGame, kickoff: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    if game.completed {
        return true;
    }
    !game.scores.is_empty() && kickoff <= now + Duration::minutes(LIVE_GRACE_MIN)
}

/// Normalize a raw payload into the actionable quote list, ordered by
/// kickoff ascending.
pub fn normalize(games: &[RawGame], now: DateTime<Utc>) -> Vec<GameQuote> {
    let grace = Duration::minutes(KICKOFF_GRACE_MIN);
    let horizon = Duration::days(HORIZON_DAYS);

    let mut out: Vec<GameQuote> = games
        .iter()
        .filter_map(|g| {
            let kickoff = parse_kickoff(&g.commence_time)?;
            if kickoff <= now + grace || kickoff > now + horizon {
                return None;
            }
            if clearly_past_or_live(g, kickoff, now) {
                return None;
            }
            let (home_odds, away_odds) = h2h_prices(g)?;
            let spreads = median_home_spread(g);
            Some(GameQuote {
                game: format!("{} vs {}", g.away_team, g.home_team),
                home_team: g.home_team.clone(),
                away_team: g.away_team.clone(),
                home_odds,
                away_odds,
                home_spread: spreads.map(|(h, _)| h),
                away_spread: spreads.map(|(_, a)| a),
                commence: kickoff,
            })
        })
        .collect();

    out.sort_by_key(|q| q.commence);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
