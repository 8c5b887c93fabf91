//! Verdict classification shared by every engine.

use valora_traits::Verdict;

/// Relative gap between intrinsic value and price beyond which a stock is
/// labelled under- or overvalued.
pub const VERDICT_THRESHOLD: f64 = 0.20;

/// Relative gap `(intrinsic - price) / price`.
///
/// Zero when the price is not positive or either input is not finite.
#[must_use]
pub fn upside(intrinsic_value: f64, market_price: f64) -> f64 {
    if market_price <= 0.0 || !market_price.is_finite() || !intrinsic_value.is_finite() {
        return 0.0;
    }
    (intrinsic_value - market_price) / market_price
}

/// Classify an intrinsic value against the market price.
///
/// Strictly more than 20% above the price is [`Verdict::Undervalued`],
/// strictly more than 20% below is [`Verdict::Overvalued`], anything else is
/// [`Verdict::Neutral`]. A non-positive price yields `Neutral`.
#[must_use]
pub fn get_verdict(intrinsic_value: f64, market_price: f64) -> Verdict {
    let delta = upside(intrinsic_value, market_price);
    if delta > VERDICT_THRESHOLD {
        Verdict::Undervalued
    } else if delta < -VERDICT_THRESHOLD {
        Verdict::Overvalued
    } else {
        Verdict::Neutral
    }
}
