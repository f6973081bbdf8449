//! Core traits and types for the Cadence framework.
//!
//! This crate separates an iterative run into three parts:
//!
//! - a problem `P`: static, algorithm-independent facts
//! - an [`Algorithm`]: static configuration that owns a stopping [`Criterion`]
//! - a [`State`]: per-run data, including the iteration counter and the
//!   [`CriterionState`] that mirrors the algorithm's criterion
//!
//! The [`solve`] family drives a run: evaluate the criterion, step, increment,
//! repeat. Stopping criteria combine with [`combine_all`] / [`combine_any`]
//! (or `&` / `|`) into flat groups, and the [`stopping`] module evaluates and
//! reports on them.

mod algorithm;
mod error;
mod observer;
mod options;
mod solve;
mod state;

pub mod stopping;

pub use algorithm::Algorithm;
pub use error::Error;
pub use observer::Observer;
pub use options::OptionsError;
pub use solve::{
    Event, evaluate_state, increment, initialize_state, is_finished, reinitialize_state, solve,
    solve_in_place, solve_in_place_observed, step,
};
pub use state::State;
pub use stopping::{
    Criterion, CriterionError, CriterionState, Evaluation, StoppingRule, StructureError,
    combine_all, combine_any, evaluate, get_reason, has_stopped, indicates_convergence,
    indicates_convergence_at, summary,
};

#[cfg(feature = "derive")]
pub use cadence_macros::State;
