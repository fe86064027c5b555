//! Report rendering.

pub mod json;
pub mod markdown;
pub mod report;
pub mod terminal;

pub use report::{ErroredLine, GateReport, RegressionLine, ReportSummary, UnitLine};
pub use terminal::format_verdicts;

use crate::formatting::OutputFormatter;
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub fn render(
    report: &GateReport,
    format: OutputFormat,
    formatter: &dyn OutputFormatter,
) -> Result<String> {
    match format {
        OutputFormat::Json => json::render(report),
        OutputFormat::Markdown => Ok(markdown::render(report)),
        OutputFormat::Terminal => Ok(terminal::render(report, formatter)),
    }
}
