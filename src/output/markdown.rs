use super::report::{GateReport, UnitLine};
use crate::gate::RegressionVerdict;
use std::fmt::Write;

pub fn render(report: &GateReport) -> String {
    let mut out = String::from("# Complexity Gate Report\n\n");

    if !report.blocked.is_empty() || !report.warned.is_empty() {
        out.push_str("| Status | Unit | Path | Metric | Value | Yellow max |\n");
        out.push_str("|--------|------|------|--------|-------|------------|\n");
        for line in &report.blocked {
            table_row(&mut out, "BLOCK", line);
        }
        for line in &report.warned {
            table_row(&mut out, "WARN", line);
        }
        out.push('\n');
    }

    if !report.errored.is_empty() {
        out.push_str("## Errored units\n\n");
        for line in &report.errored {
            writeln!(out, "- `{}`: {}", line.unit, line.message).ok();
        }
        out.push('\n');
    }

    if let Some(max_delta_pct) = report.max_delta_pct {
        let aggregate = report.aggregate.filter(RegressionVerdict::is_regressed);
        if !report.regressions.is_empty() || aggregate.is_some() {
            writeln!(out, "## Regressions (limit {max_delta_pct}%)\n").ok();
            out.push_str("| Unit | Previous | Current | Delta |\n");
            out.push_str("|------|----------|---------|-------|\n");
            for line in &report.regressions {
                regression_row(&mut out, &format!("`{}`", line.unit), &line.verdict);
            }
            if let Some(aggregate) = aggregate {
                regression_row(&mut out, "**aggregate**", &aggregate);
            }
            out.push('\n');
        }
    }

    let s = &report.summary;
    write!(
        out,
        "**Summary:** {} pass, {} warn, {} block, {} errored",
        s.pass, s.warn, s.block, s.errored
    )
    .ok();
    if report.max_delta_pct.is_some() {
        write!(out, ", {} regressed", s.regressed).ok();
    }
    out.push('\n');
    out
}

fn table_row(out: &mut String, status: &str, line: &UnitLine) {
    let path = line
        .path
        .as_ref()
        .map(|p| format!("`{}`", p.display()))
        .unwrap_or_default();
    let worst = line
        .worst()
        .map(|w| format!("{} | {} | {}", w.metric, w.value, w.boundary()))
        .unwrap_or_else(|| "| |".to_string());
    writeln!(out, "| {} | `{}` | {} | {} |", status, line.unit, path, worst).ok();
}

fn regression_row(out: &mut String, unit: &str, verdict: &RegressionVerdict) {
    let previous = verdict
        .previous_total()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());
    let delta = verdict
        .delta_pct()
        .map(|d| format!("{d:+.1}%"))
        .unwrap_or_else(|| "new".to_string());
    writeln!(
        out,
        "| {} | {} | {} | {} |",
        unit,
        previous,
        verdict.current_total(),
        delta
    )
    .ok();
}
