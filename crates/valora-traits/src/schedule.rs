//! Per-year rate schedules.
//!
//! Growth rates, margins and discount rates are all modelled as pure functions
//! of the projection year. Engines compose schedules rather than re-deriving
//! rates inline, so each schedule can be tested on its own.

/// A rate as a function of the projection year (1-based).
pub trait Schedule {
    /// Rate for `year`.
    fn rate(&self, year: u32) -> f64;
}

impl<S: Schedule + ?Sized> Schedule for &S {
    fn rate(&self, year: u32) -> f64 {
        (**self).rate(year)
    }
}

/// The same rate in every year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flat(pub f64);

impl Schedule for Flat {
    fn rate(&self, _year: u32) -> f64 {
        self.0
    }
}

/// A schedule backed by a closure.
#[derive(Clone, Copy)]
pub struct FnSchedule<F>(pub F);

impl<F: Fn(u32) -> f64> Schedule for FnSchedule<F> {
    fn rate(&self, year: u32) -> f64 {
        (self.0)(year)
    }
}

impl<F> std::fmt::Debug for FnSchedule<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSchedule").finish_non_exhaustive()
    }
}
