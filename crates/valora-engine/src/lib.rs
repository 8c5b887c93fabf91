//! Valuation engines for valora.
//!
//! This crate provides the deterministic numeric core:
//! - DCF: flat-growth projection with an exit-multiple or perpetuity terminal value
//! - Reverse DCF: the growth rate implied by the market price, found by bisection
//! - Growth: multi-phase fade with margin and cost-of-capital convergence
//!
//! Every engine is a pure function of a [`FinancialSnapshot`](valora_traits::FinancialSnapshot)
//! and its assumptions. Shared building blocks (WACC, projection, discounting,
//! verdict classification) live in their own modules and are reused by all
//! three engines.
//!
//! # Example
//!
//! ```ignore
//! use valora_engine::dcf::DcfEngine;
//! use valora_engine::registry::available_engines;
//! use valora_traits::DcfAssumptions;
//!
//! let assumptions = DcfAssumptions::from_snapshot(&snapshot);
//! let output = DcfEngine::new().run(&snapshot, &assumptions)?;
//!
//! // Discover available engines
//! let engines = available_engines();
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod dcf;
pub mod discount;
pub mod growth;
pub mod projection;
pub mod registry;
pub mod reverse_dcf;
pub mod sensitivity;
pub mod solver;
pub mod verdict;
pub mod wacc;

// Re-export key types
pub use dcf::DcfEngine;
pub use growth::GrowthEngine;
pub use registry::EngineInfo;
pub use reverse_dcf::ReverseDcfEngine;
pub use solver::{BisectionSolver, RootResult, SolverConfig};
pub use verdict::{VERDICT_THRESHOLD, get_verdict, upside};
