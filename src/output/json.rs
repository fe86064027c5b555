use super::report::GateReport;
use anyhow::Result;

pub fn render(report: &GateReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Reason, Severity, Verdict};

    #[test]
    fn test_json_report_shape() {
        let report = GateReport::from_verdicts(&[(
            "a".to_string(),
            Verdict::Block(vec![Reason {
                metric: "cyclomatic".to_string(),
                value: 20,
                severity: Severity::Red,
                green_max: 8,
                yellow_max: 15,
            }]),
        )]);

        let value: serde_json::Value = serde_json::from_str(&render(&report).unwrap()).unwrap();
        assert_eq!(value["blocked"][0]["unit"], "a");
        assert_eq!(value["blocked"][0]["reasons"][0]["severity"], "red");
        assert_eq!(value["summary"]["block"], 1);
        assert!(value.get("max_delta_pct").is_none());
    }
}
