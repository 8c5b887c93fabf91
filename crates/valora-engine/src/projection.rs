//! Free cash flow projection.
//!
//! A [`CashFlowProjector`] describes a projection; [`CashFlowProjector::iter`]
//! produces it lazily as a finite [`Projection`] iterator that can be cloned
//! and restarted at will.

use valora_traits::{ProjectedCashFlow, Result, Schedule, check_projection_years};

/// Projects operating cash flow and capital expenditure forward.
#[derive(Debug, Clone)]
pub struct CashFlowProjector<S> {
    base_operating_cash_flow: f64,
    base_capital_expenditure: f64,
    growth: S,
    horizon: u32,
}

impl<S: Schedule + Clone> CashFlowProjector<S> {
    /// Create a projector.
    ///
    /// `stock_based_compensation` is subtracted once from the base operating
    /// cash flow when given; it is not re-subtracted in later years.
    ///
    /// # Errors
    ///
    /// Returns [`ValoraError::InvalidInput`](valora_traits::ValoraError::InvalidInput)
    /// when `horizon` is zero or above
    /// [`MAX_PROJECTION_YEARS`](valora_traits::MAX_PROJECTION_YEARS).
    pub fn new(
        operating_cash_flow: f64,
        capital_expenditure: f64,
        stock_based_compensation: Option<f64>,
        growth: S,
        horizon: u32,
    ) -> Result<Self> {
        check_projection_years(horizon)?;
        let base_operating_cash_flow = operating_cash_flow - stock_based_compensation.unwrap_or(0.0);
        Ok(Self {
            base_operating_cash_flow,
            base_capital_expenditure: capital_expenditure.abs(),
            growth,
            horizon,
        })
    }

    /// Number of projected years.
    #[must_use]
    pub const fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Operating cash flow the projection compounds from.
    #[must_use]
    pub const fn base_operating_cash_flow(&self) -> f64 {
        self.base_operating_cash_flow
    }

    /// Iterate the projected years from year 1.
    #[must_use]
    pub fn iter(&self) -> Projection<S> {
        Projection {
            operating_cash_flow: self.base_operating_cash_flow,
            capital_expenditure: self.base_capital_expenditure,
            growth: self.growth.clone(),
            year: 0,
            horizon: self.horizon,
        }
    }

    /// Collect the full projection.
    #[must_use]
    pub fn project(&self) -> Vec<ProjectedCashFlow> {
        self.iter().collect()
    }
}

/// Lazy, finite sequence of projected years.
#[derive(Debug, Clone)]
pub struct Projection<S> {
    operating_cash_flow: f64,
    capital_expenditure: f64,
    growth: S,
    year: u32,
    horizon: u32,
}

impl<S: Schedule> Iterator for Projection<S> {
    type Item = ProjectedCashFlow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.year >= self.horizon {
            return None;
        }
        self.year += 1;
        let factor = 1.0 + self.growth.rate(self.year);
        self.operating_cash_flow *= factor;
        self.capital_expenditure *= factor;

        Some(ProjectedCashFlow {
            year: self.year,
            operating_cash_flow: self.operating_cash_flow,
            capital_expenditure: self.capital_expenditure,
            free_cash_flow: self.operating_cash_flow - self.capital_expenditure.abs(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.horizon - self.year).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl<S: Schedule> ExactSizeIterator for Projection<S> {}

impl<S: Schedule> std::iter::FusedIterator for Projection<S> {}
