//! Decision engine.
//!
//! Turns a matchup's moneyline prices into a staking recommendation:
//! no-vig implied probabilities, a reproducible hash-derived model bias,
//! per-side edge/EV/Kelly, pick selection, and the wager against the
//! current bankroll.
//!
//! `recommend` is a pure function of its inputs — the bias is derived from
//! the team names, never from a random draw — so identical requests always
//! produce identical recommendations.

pub mod odds_math;

use tracing::debug;

use crate::types::{AnalysisError, MarketKind, Recommendation};
use odds_math::{
    ev_percent, implied_prob, kelly_fraction, round_to, CONFIDENCE_PLACES, EV_FRACTION_PLACES,
    MIN_WAGER, MONEY_PLACES, PCT_PLACES,
};

/// Model probabilities are clamped to this band.
pub const MODEL_PROB_FLOOR: f64 = 0.05;
pub const MODEL_PROB_CEIL: f64 = 0.95;
/// Weight applied to the matchup bias before it shifts the no-vig baseline.
const BIAS_WEIGHT: f64 = 0.1;

/// Everything the engine needs to know about one matchup.
#[derive(Debug, Clone)]
pub struct MatchupInput<'a> {
    pub home_team: &'a str,
    pub away_team: &'a str,
    pub home_odds: f64,
    pub away_odds: f64,
    pub market: MarketKind,
    /// Consensus home spread, required when `market` is `Spread`.
    pub home_spread: Option<f64>,
}

/// Reproducible integer key for a matchup: the sum of the character codes
/// of `"{home}-{away}"`, mod 1000.
fn matchup_key(home_team: &str, away_team: &str) -> u32 {
    format!("{home_team}-{away_team}")
        .chars()
        .map(|c| c as u32)
        .sum::<u32>()
        % 1000
}

/// Placeholder predictive signal: an integer-stepped bias in [-0.10, 0.10]
/// derived from the team names. Not a trained model.
pub fn matchup_bias(home_team: &str, away_team: &str) -> f64 {
    let hkey = matchup_key(home_team, away_team);
    ((hkey % 21) as f64 - 10.0) / 100.0
}

/// No-vig implied probabilities: both sides rescaled so they sum to exactly 1.
pub fn no_vig_probs(home_odds: f64, away_odds: f64) -> (f64, f64) {
    let p_home = implied_prob(home_odds);
    let p_away = implied_prob(away_odds);
    let z = p_home + p_away;
    (p_home / z, p_away / z)
}

/// Produce a staking recommendation for one matchup.
pub fn recommend(input: &MatchupInput<'_>, bankroll: f64) -> Result<Recommendation, AnalysisError> {
    if bankroll < MIN_WAGER {
        return Err(AnalysisError::InsufficientBankroll(bankroll));
    }

    let spread_value = match input.market {
        MarketKind::Moneyline => None,
        MarketKind::Spread => match input.home_spread {
            Some(spread) => Some(format!("{spread:+}")),
            None => return Err(AnalysisError::MarketUnavailable),
        },
    };

    let (p_home, p_away) = no_vig_probs(input.home_odds, input.away_odds);

    let bias = matchup_bias(input.home_team, input.away_team);
    let model_home = (p_home + bias * BIAS_WEIGHT).clamp(MODEL_PROB_FLOOR, MODEL_PROB_CEIL);
    let model_away = 1.0 - model_home;

    let ev_home = ev_percent(model_home, input.home_odds);
    let ev_away = ev_percent(model_away, input.away_odds);

    // Strictly greater EV wins; exact ties go to the home side.
    let back_home = ev_home >= ev_away;
    let (pick, model_prob, implied, odds, ev) = if back_home {
        (input.home_team, model_home, p_home, input.home_odds, ev_home)
    } else {
        (input.away_team, model_away, p_away, input.away_odds, ev_away)
    };

    let edge = round_to((model_prob - implied) * 100.0, PCT_PLACES);
    let kelly = kelly_fraction(model_prob, odds);

    let wager = round_to(bankroll * kelly, MONEY_PLACES)
        .max(MIN_WAGER)
        .min(bankroll);
    let new_bankroll = round_to(bankroll - wager, MONEY_PLACES);

    debug!(
        home = input.home_team,
        away = input.away_team,
        bias,
        pick,
        ev,
        kelly,
        wager,
        "Recommendation computed"
    );

    Ok(Recommendation {
        game: format!("{} vs {}", input.away_team, input.home_team),
        pick: pick.to_string(),
        confidence: round_to(model_prob, CONFIDENCE_PLACES),
        edge,
        expected_value: round_to(ev / 100.0, EV_FRACTION_PLACES),
        kelly_fraction: kelly,
        wager,
        new_bankroll,
        spread_value,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
