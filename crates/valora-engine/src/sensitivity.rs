//! DCF sensitivity grid.
//!
//! Re-runs the forward DCF across a grid of growth rates and discount rates,
//! giving the familiar two-way table shown next to a point estimate.

use serde::{Deserialize, Serialize};
use valora_traits::{DcfAssumptions, FinancialSnapshot, Result, ValoraError};

use crate::dcf::DcfEngine;

/// Intrinsic value per share over a growth x discount-rate grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityTable {
    /// Row labels.
    pub growth_rates: Vec<f64>,
    /// Column labels.
    pub discount_rates: Vec<f64>,
    /// `values[row][col]`; `None` where the valuation is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl SensitivityTable {
    /// Value at a grid cell.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied().flatten()
    }
}

/// Build a DCF sensitivity table.
///
/// Cells whose assumptions make the valuation undefined (for example a
/// perpetuity terminal value with the discount rate at or below its growth
/// rate) are left empty rather than failing the whole table.
///
/// # Errors
///
/// Returns [`ValoraError::InvalidInput`] when either axis is empty, and
/// propagates calling-contract errors such as a zero projection horizon.
pub fn dcf_sensitivity(
    snapshot: &FinancialSnapshot,
    assumptions: &DcfAssumptions,
    growth_rates: &[f64],
    discount_rates: &[f64],
) -> Result<SensitivityTable> {
    if growth_rates.is_empty() || discount_rates.is_empty() {
        return Err(ValoraError::InvalidInput(
            "sensitivity axes must not be empty".to_string(),
        ));
    }

    let engine = DcfEngine::new();
    let mut values = Vec::with_capacity(growth_rates.len());
    for &growth_rate in growth_rates {
        let row_assumptions = DcfAssumptions {
            growth_rate,
            ..assumptions.clone()
        };
        let mut row = Vec::with_capacity(discount_rates.len());
        for &rate in discount_rates {
            match engine.run_with_rate(snapshot, &row_assumptions, rate) {
                Ok(out) => row.push(Some(out.intrinsic_value_per_share)),
                Err(ValoraError::InvalidAssumption(_)) => row.push(None),
                Err(e) => return Err(e),
            }
        }
        values.push(row);
    }

    Ok(SensitivityTable {
        growth_rates: growth_rates.to_vec(),
        discount_rates: discount_rates.to_vec(),
        values,
    })
}

/// Evenly spaced axis centred on `center`: `center + k * step` for
/// `k in -steps..=steps`.
#[must_use]
pub fn centered_axis(center: f64, step: f64, steps: usize) -> Vec<f64> {
    let steps = steps as i64;
    (-steps..=steps).map(|k| center + k as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scenario_snapshot;
    use approx::assert_relative_eq;
    use valora_traits::{DiscountRateInput, TerminalConvention};

    fn assumptions() -> DcfAssumptions {
        DcfAssumptions {
            discount_rate: DiscountRateInput::Override { wacc: 0.10 },
            growth_rate: 0.10,
            terminal: TerminalConvention::ExitMultiple { multiple: 15.0 },
            exclude_stock_based_compensation: false,
            projection_years: 5,
        }
    }

    #[test]
    fn test_grid_matches_point_estimate() {
        let table = dcf_sensitivity(
            &scenario_snapshot(),
            &assumptions(),
            &[0.05, 0.10, 0.15],
            &[0.08, 0.10, 0.12],
        )
        .unwrap();
        assert_eq!(table.values.len(), 3);
        assert_eq!(table.values[0].len(), 3);
        assert_relative_eq!(table.get(1, 1).unwrap(), 160.0, epsilon = 1e-9);
    }

    #[test]
    fn test_grid_is_monotonic() {
        let table = dcf_sensitivity(
            &scenario_snapshot(),
            &assumptions(),
            &[0.0, 0.05, 0.10],
            &[0.08, 0.12],
        )
        .unwrap();
        for col in 0..2 {
            assert!(table.get(0, col).unwrap() < table.get(1, col).unwrap());
            assert!(table.get(1, col).unwrap() < table.get(2, col).unwrap());
        }
        for row in 0..3 {
            assert!(table.get(row, 0).unwrap() > table.get(row, 1).unwrap());
        }
    }

    #[test]
    fn test_undefined_cells_are_empty() {
        let a = DcfAssumptions {
            terminal: TerminalConvention::PerpetuityGrowth {
                growth_rate: 0.03,
                discount_rate: None,
            },
            ..assumptions()
        };
        let table = dcf_sensitivity(&scenario_snapshot(), &a, &[0.05], &[0.02, 0.03, 0.09]).unwrap();
        assert_eq!(table.get(0, 0), None);
        assert_eq!(table.get(0, 1), None);
        assert!(table.get(0, 2).is_some());
    }

    #[test]
    fn test_empty_axis_rejected() {
        let result = dcf_sensitivity(&scenario_snapshot(), &assumptions(), &[], &[0.1]);
        assert!(matches!(result, Err(ValoraError::InvalidInput(_))));
    }

    #[test]
    fn test_centered_axis() {
        let axis = centered_axis(0.10, 0.01, 2);
        assert_eq!(axis.len(), 5);
        assert_relative_eq!(axis[0], 0.08, epsilon = 1e-12);
        assert_relative_eq!(axis[2], 0.10, epsilon = 1e-12);
        assert_relative_eq!(axis[4], 0.12, epsilon = 1e-12);
    }
}
