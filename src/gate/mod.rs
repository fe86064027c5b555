//! The complexity gate: threshold evaluation, batch processing, and the
//! regression ratchet. Everything here is a pure function of its inputs.

pub mod batch;
pub mod evaluator;
pub mod ratchet;

pub use batch::{evaluate_batch, BatchResult, Outcome, UnitResult};
pub use evaluator::evaluate;
pub use ratchet::{
    check_aggregate_regression, check_regression, check_regressions, compare_totals,
    RegressionVerdict,
};
