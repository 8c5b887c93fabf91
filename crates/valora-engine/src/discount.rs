//! Discounting and terminal value.
//!
//! This is the only place cash flows are discounted. The DCF, reverse DCF and
//! growth engines all go through [`discount_cash_flows`], which keeps their
//! numbers consistent with one another.
//!
//! ```text
//! PV = Σ fcf_i / (1 + r(i))^i  +  TV / (1 + r(N))^N
//! ```

use serde::{Deserialize, Serialize};
use valora_traits::{ProjectedCashFlow, Result, Schedule, TerminalConvention, ValoraError};

/// Breakdown of a discounted projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountedValue {
    /// Discount factor `1 / (1 + r(i))^i` for each projected year.
    pub discount_factors: Vec<f64>,
    /// Present value of each projected year's free cash flow.
    pub present_values: Vec<f64>,
    /// Sum of [`present_values`](Self::present_values).
    pub present_value_of_cash_flows: f64,
    /// Undiscounted terminal value at year N.
    pub terminal_value: f64,
    /// Terminal value discounted at the final year's rate.
    pub present_value_of_terminal_value: f64,
    /// Total present value.
    pub present_value: f64,
}

/// Terminal value under the exit-multiple convention.
#[must_use]
pub fn exit_multiple_terminal_value(last_free_cash_flow: f64, multiple: f64) -> f64 {
    last_free_cash_flow * multiple
}

/// Terminal value under the perpetuity-growth convention.
///
/// Returns `None` when `discount_rate <= growth_rate`: the perpetuity is
/// undefined there and no number is produced.
#[must_use]
pub fn perpetuity_terminal_value(
    last_free_cash_flow: f64,
    discount_rate: f64,
    growth_rate: f64,
) -> Option<f64> {
    if discount_rate.is_nan() || growth_rate.is_nan() || discount_rate <= growth_rate {
        return None;
    }
    Some(last_free_cash_flow * (1.0 + growth_rate) / (discount_rate - growth_rate))
}

/// Compounding factor `(1 + rate)^year`.
#[must_use]
pub fn growth_factor(rate: f64, year: u32) -> f64 {
    let base = 1.0 + rate;
    i32::try_from(year).map_or_else(|_| base.powf(f64::from(year)), |n| base.powi(n))
}

/// Discount factor for `year` at `rate`.
#[must_use]
pub fn discount_factor(rate: f64, year: u32) -> f64 {
    growth_factor(rate, year).recip()
}

/// Discount a projection and append its terminal value.
///
/// # Errors
///
/// - [`ValoraError::InvalidInput`] when `cash_flows` is empty.
/// - [`ValoraError::InvalidAssumption`] when the perpetuity convention is used
///   with a capitalization rate at or below the growth rate.
pub fn discount_cash_flows<S: Schedule + ?Sized>(
    cash_flows: &[ProjectedCashFlow],
    rate: &S,
    terminal: &TerminalConvention,
) -> Result<DiscountedValue> {
    let Some(last) = cash_flows.last() else {
        return Err(ValoraError::InvalidInput(
            "cannot discount an empty cash flow projection".to_string(),
        ));
    };
    let final_year = last.year;
    let final_rate = rate.rate(final_year);

    // Checked before any discounting happens.
    let terminal_value = match *terminal {
        TerminalConvention::ExitMultiple { multiple } => {
            exit_multiple_terminal_value(last.free_cash_flow, multiple)
        }
        TerminalConvention::PerpetuityGrowth {
            growth_rate,
            discount_rate,
        } => {
            let cap_rate = discount_rate.unwrap_or(final_rate);
            perpetuity_terminal_value(last.free_cash_flow, cap_rate, growth_rate).ok_or_else(
                || {
                    ValoraError::InvalidAssumption(format!(
                        "discount rate {cap_rate} must exceed terminal growth rate {growth_rate}"
                    ))
                },
            )?
        }
    };

    let discount_factors: Vec<f64> = cash_flows
        .iter()
        .map(|cf| discount_factor(rate.rate(cf.year), cf.year))
        .collect();
    let present_values: Vec<f64> = cash_flows
        .iter()
        .zip(&discount_factors)
        .map(|(cf, df)| cf.free_cash_flow * df)
        .collect();
    let present_value_of_cash_flows: f64 = present_values.iter().sum();
    let present_value_of_terminal_value = terminal_value * discount_factor(final_rate, final_year);

    Ok(DiscountedValue {
        discount_factors,
        present_values,
        present_value_of_cash_flows,
        terminal_value,
        present_value_of_terminal_value,
        present_value: present_value_of_cash_flows + present_value_of_terminal_value,
    })
}
