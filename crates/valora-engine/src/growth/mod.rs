//! Multi-phase growth valuation.
//!
//! This module provides the three-phase model used for young or fast-growing
//! companies:
//! - Revenue growth: flat near term, linear fade, terminal rate
//! - Operating margin: linear convergence to a target
//! - Cost of capital: linear convergence from a start-up to a mature rate
//!
//! Each schedule is a pure function of the projection year and is composed
//! with the shared discounting module.

mod engine;
mod schedule;

pub use engine::{GrowthEngine, GrowthSchedules};
pub use schedule::{GrowthFadeSchedule, LinearSchedule, NEAR_TERM_YEARS};
