// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod formatting;
pub mod gate;
pub mod io;
pub mod output;

// Re-export commonly used types
pub use crate::core::{
    names, BaselineSnapshot, Error, MetricRecord, RawMetricRecord, Reason, Result, Severity,
    UnitId, UnitKind, Verdict,
};

pub use crate::config::{GateConfig, LimitOverrides, ThresholdPreset, ThresholdSpec, ThresholdTable};

pub use crate::gate::{
    check_aggregate_regression, check_regression, evaluate, evaluate_batch, BatchResult, Outcome,
    RegressionVerdict, UnitResult,
};

pub use crate::output::{format_verdicts, GateReport, OutputFormat};
