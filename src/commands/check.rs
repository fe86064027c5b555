//! The `check` command: evaluate, ratchet, report.
//!
//! Loading and writing happen at the edges; everything between is the pure
//! gate in [`crate::gate`].

use crate::config::{load_config, LimitOverrides, ThresholdPreset};
use crate::core::BaselineSnapshot;
use crate::formatting::{ColoredFormatter, FormattingConfig, OutputFormatter, PlainFormatter};
use crate::gate::{check_aggregate_regression, check_regressions, evaluate_batch, BatchResult};
use crate::io;
use crate::output::{self, GateReport, OutputFormat};
use anyhow::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration for a check run
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub records: PathBuf,
    pub config: Option<PathBuf>,
    pub preset: Option<ThresholdPreset>,
    pub limits: LimitOverrides,
    pub baseline: Option<PathBuf>,
    pub max_delta_pct: Option<u32>,
    pub update_baseline: bool,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub formatting: FormattingConfig,
    pub strict_input: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    Failed,
}

/// I/O shell for `check`.
pub fn run_check(config: CheckConfig) -> Result<CheckStatus> {
    let (gate_config, source) = load_config(config.config.as_deref())?;
    match &source {
        Some(path) => debug!("Using config {}", path.display()),
        None => debug!("Using default config"),
    }
    let table = gate_config.threshold_table(config.preset, config.limits)?;
    let max_delta_pct = gate_config.max_delta_pct(config.max_delta_pct);

    let raw_records = io::load_records(&config.records)?;
    let baseline = match &config.baseline {
        Some(path) => {
            let snapshot = io::load_baseline(path)?.unwrap_or_default();
            if snapshot.is_empty() {
                info!("Baseline {} is empty; every unit is new", path.display());
            }
            Some(snapshot)
        }
        None => None,
    };

    let batch = evaluate_batch(raw_records, &table);
    let report = build_report(&batch, baseline.as_ref(), max_delta_pct);
    let status = determine_status(&report, config.strict_input);

    info!(
        "{} pass, {} warn, {} block, {} errored, {} regressed",
        report.summary.pass,
        report.summary.warn,
        report.summary.block,
        report.summary.errored,
        report.summary.regressed
    );

    let formatter = select_formatter(&config);
    let rendered = output::render(&report, config.format, formatter.as_ref())?;
    io::write_output(config.output.as_deref(), &rendered)?;

    if config.update_baseline {
        if let (Some(path), Some(previous)) = (&config.baseline, &baseline) {
            update_baseline(path, previous, &batch, status)?;
        }
    }

    Ok(status)
}

/// Pure: evaluate the ratchet (when a baseline is present) and assemble the
/// report.
pub fn build_report(
    batch: &BatchResult,
    baseline: Option<&BaselineSnapshot>,
    max_delta_pct: u32,
) -> GateReport {
    let report = GateReport::from_results(&batch.results);
    match baseline {
        Some(baseline) => {
            let regressions = check_regressions(&batch.records, baseline, max_delta_pct);
            let aggregate = check_aggregate_regression(&batch.records, baseline, max_delta_pct);
            report.with_regressions(max_delta_pct, &regressions, aggregate)
        }
        None => report,
    }
}

/// Pure: blocks and regressions fail the run; malformed records only fail it
/// under `strict_input`.
pub fn determine_status(report: &GateReport, strict_input: bool) -> CheckStatus {
    let bad_input = strict_input && report.summary.errored > 0;
    if report.is_failing() || bad_input {
        CheckStatus::Failed
    } else {
        CheckStatus::Passed
    }
}

fn select_formatter(config: &CheckConfig) -> Box<dyn OutputFormatter> {
    let to_terminal = config.output.is_none() && config.format == OutputFormat::Terminal;
    if to_terminal {
        Box::new(ColoredFormatter::new(config.formatting))
    } else {
        Box::new(PlainFormatter)
    }
}

/// Pure: the snapshot a run would persist, or `None` when the baseline must
/// stay as it is.
pub fn next_baseline(
    previous: &BaselineSnapshot,
    batch: &BatchResult,
    status: CheckStatus,
) -> Option<BaselineSnapshot> {
    if status == CheckStatus::Failed {
        return None;
    }
    previous.advance(&batch.records, &batch.errored_identities)
}

fn update_baseline(
    path: &Path,
    previous: &BaselineSnapshot,
    batch: &BatchResult,
    status: CheckStatus,
) -> Result<()> {
    let Some(snapshot) = next_baseline(previous, batch, status) else {
        warn!("Leaving baseline {} unchanged", path.display());
        return Ok(());
    };
    let snapshot = snapshot.stamped(Utc::now());
    io::write_baseline(path, &snapshot)?;
    info!("Updated baseline {} ({} units)", path.display(), snapshot.len());
    Ok(())
}
