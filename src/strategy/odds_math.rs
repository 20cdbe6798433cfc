//! American-odds math primitives.
//!
//! Conversions between American prices, implied probabilities, payouts,
//! expected value, and quarter-Kelly staking fractions. All rounding rules
//! live here as named constants so every field is rounded in exactly one
//! place.

/// House minimum wager in dollars.
pub const MIN_WAGER: f64 = 5.0;
/// Fractional Kelly multiplier (0.25 = quarter-Kelly).
pub const KELLY_SCALE: f64 = 0.25;

/// Decimal places for percentage fields (edge, EV%).
pub const PCT_PLACES: i32 = 2;
/// Decimal places for the confidence field.
pub const CONFIDENCE_PLACES: i32 = 3;
/// Decimal places for the fractional expected-value field.
pub const EV_FRACTION_PLACES: i32 = 3;
/// Decimal places for the Kelly fraction.
pub const KELLY_PLACES: i32 = 4;
/// Decimal places for currency amounts.
pub const MONEY_PLACES: i32 = 2;

/// Round half-away-from-zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Implied probability of American odds `o`:
/// `100/(o+100)` for positive odds, `|o|/(|o|+100)` for negative.
pub fn implied_prob(odds: f64) -> f64 {
    if odds > 0.0 {
        100.0 / (odds + 100.0)
    } else {
        odds.abs() / (odds.abs() + 100.0)
    }
}

/// Profit per unit stake (stake excluded): `o/100` for positive odds,
/// `100/|o|` for negative.
pub fn payout_per_unit(odds: f64) -> f64 {
    if odds > 0.0 {
        odds / 100.0
    } else {
        100.0 / odds.abs()
    }
}

/// Expected profit per unit stake, fractional form.
pub fn ev_fraction(prob: f64, odds: f64) -> f64 {
    prob * payout_per_unit(odds) - (1.0 - prob)
}

/// Expected value as a rounded percentage.
pub fn ev_percent(prob: f64, odds: f64) -> f64 {
    round_to(ev_fraction(prob, odds) * 100.0, PCT_PLACES)
}

/// Quarter-Kelly staking fraction, clamped to [0, 1] and rounded.
pub fn kelly_fraction(prob: f64, odds: f64) -> f64 {
    let b = payout_per_unit(odds);
    let f = (b * prob - (1.0 - prob)) / b;
    round_to((f * KELLY_SCALE).clamp(0.0, 1.0), KELLY_PLACES)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
