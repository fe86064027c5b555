use super::report::{GateReport, UnitLine};
use crate::core::Verdict;
use crate::formatting::{OutputFormatter, PlainFormatter};
use crate::gate::RegressionVerdict;
use std::fmt::Write;

/// Render the report as plain lines:
///
/// ```text
/// BLOCK a: cyclomatic=20 (yellow-max=15) [src/a.rs]
/// WARN  b: cyclomatic=12 (yellow-max=15) [src/b.rs]
/// ERROR record #4: Malformed record record #4: missing field `name`
/// Summary: 1 pass, 1 warn, 1 block, 1 errored
/// ```
pub fn render(report: &GateReport, formatter: &dyn OutputFormatter) -> String {
    let mut out = String::new();

    for line in &report.blocked {
        writeln!(out, "{}", unit_line(&formatter.error(&label("BLOCK")), line, formatter)).ok();
    }
    for line in &report.warned {
        writeln!(out, "{}", unit_line(&formatter.warning(&label("WARN")), line, formatter)).ok();
    }
    for line in &report.errored {
        writeln!(
            out,
            "{} {}: {}",
            formatter.info(&label("ERROR")),
            formatter.bold(&line.unit),
            line.message
        )
        .ok();
    }

    if let Some(max_delta_pct) = report.max_delta_pct {
        for line in &report.regressions {
            writeln!(
                out,
                "{} {}: {}",
                formatter.error("REGRESSED"),
                formatter.bold(line.unit.as_str()),
                regression_detail(&line.verdict, max_delta_pct)
            )
            .ok();
        }
        if let Some(aggregate) = report.aggregate.filter(RegressionVerdict::is_regressed) {
            writeln!(
                out,
                "{} (aggregate): {}",
                formatter.error("REGRESSED"),
                regression_detail(&aggregate, max_delta_pct)
            )
            .ok();
        }
    }

    writeln!(out, "{}", formatter.header(&summary_line(report))).ok();
    out
}

/// Plain-text report for bare `(unit name, verdict)` pairs
pub fn format_verdicts(verdicts: &[(String, Verdict)]) -> String {
    render(&GateReport::from_verdicts(verdicts), &PlainFormatter)
}

fn label(text: &str) -> String {
    format!("{text:<5}")
}

fn unit_line(label: &str, line: &UnitLine, formatter: &dyn OutputFormatter) -> String {
    let mut text = format!("{} {}", label, formatter.bold(&line.unit));
    if let Some(worst) = line.worst() {
        write!(text, ": {worst}").ok();
    }
    if line.reasons.len() > 1 {
        write!(text, " (+{} more)", line.reasons.len() - 1).ok();
    }
    if let Some(path) = &line.path {
        write!(text, " {}", formatter.dim(&format!("[{}]", path.display()))).ok();
    }
    text
}

fn regression_detail(verdict: &RegressionVerdict, max_delta_pct: u32) -> String {
    match verdict {
        RegressionVerdict::Regressed {
            delta_pct,
            previous_total,
            current_total,
        }
        | RegressionVerdict::ImprovedOrFlat {
            delta_pct,
            previous_total,
            current_total,
        } => format!(
            "total {previous_total} -> {current_total} ({delta_pct:+.1}%, limit {max_delta_pct}%)"
        ),
        RegressionVerdict::NewUnit { current_total } => format!("new unit, total {current_total}"),
    }
}

fn summary_line(report: &GateReport) -> String {
    let s = &report.summary;
    let mut line = format!(
        "Summary: {} pass, {} warn, {} block, {} errored",
        s.pass, s.warn, s.block, s.errored
    );
    if report.max_delta_pct.is_some() {
        write!(line, ", {} regressed", s.regressed).ok();
    }
    line
}
