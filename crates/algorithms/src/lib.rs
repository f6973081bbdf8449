//! Concrete algorithms for the Cadence framework.
//!
//! Each algorithm implements [`cadence_core::Algorithm`] and ships the
//! stopping rules that make sense for it, so runs are driven by the generic
//! [`cadence_core::solve`] family.

mod problem;

pub mod gradient_descent;

pub use problem::DifferentiableProblem;
