//! Interpolated schedules for the multi-phase growth model.

use valora_traits::Schedule;

/// Number of years revenue grows at the initial rate before fading.
pub const NEAR_TERM_YEARS: u32 = 3;

/// Linear move from `start` to `end` over `years`, flat at `end` afterwards.
///
/// The move begins at `anchor`: year `t` takes
/// `start + (end - start) * min(t - anchor, years) / years`, so `start` is the
/// value in year `anchor` and `end` is reached `years` later. Years before the
/// anchor stay at `start`. With `years == 0` every year is at `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSchedule {
    /// Value at the anchor year.
    pub start: f64,
    /// Value from `anchor + years` onwards.
    pub end: f64,
    /// Length of the transition.
    pub years: u32,
    /// Year holding `start`.
    pub anchor: u32,
}

impl LinearSchedule {
    /// Create a linear schedule anchored at year 0.
    #[must_use]
    pub const fn new(start: f64, end: f64, years: u32) -> Self {
        Self {
            start,
            end,
            years,
            anchor: 0,
        }
    }

    /// Create a linear schedule whose first projected year holds `start`.
    #[must_use]
    pub const fn from_year_one(start: f64, end: f64, years: u32) -> Self {
        Self {
            start,
            end,
            years,
            anchor: 1,
        }
    }
}

impl Schedule for LinearSchedule {
    fn rate(&self, year: u32) -> f64 {
        let elapsed = year.saturating_sub(self.anchor);
        if self.years == 0 || elapsed >= self.years {
            return self.end;
        }
        let progress = f64::from(elapsed) / f64::from(self.years);
        self.start + (self.end - self.start) * progress
    }
}

/// Revenue growth: flat near term, linear fade, then terminal.
///
/// - years `1..=3`: `initial`
/// - the next `fade_years`: linear from `initial` to `terminal`
/// - afterwards: `terminal`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthFadeSchedule {
    /// Near-term growth rate.
    pub initial: f64,
    /// Long-run growth rate.
    pub terminal: f64,
    /// Length of the fade.
    pub fade_years: u32,
}

impl GrowthFadeSchedule {
    /// Create a growth fade schedule.
    #[must_use]
    pub const fn new(initial: f64, terminal: f64, fade_years: u32) -> Self {
        Self {
            initial,
            terminal,
            fade_years,
        }
    }
}

impl Schedule for GrowthFadeSchedule {
    fn rate(&self, year: u32) -> f64 {
        if year <= NEAR_TERM_YEARS {
            return self.initial;
        }
        LinearSchedule::new(self.initial, self.terminal, self.fade_years)
            .rate(year - NEAR_TERM_YEARS)
    }
}
