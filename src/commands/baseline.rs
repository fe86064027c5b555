use crate::core::{BaselineSnapshot, MetricRecord};
use crate::io;
use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use tracing::warn;

/// Snapshot the totals of every well-formed record in `records` into
/// `output`. Malformed records are skipped with a warning.
pub fn write_baseline(records: &Path, output: &Path) -> Result<BaselineSnapshot> {
    let raw_records = io::load_records(records)?;

    let valid: Vec<MetricRecord> = raw_records
        .into_iter()
        .filter_map(|raw| match raw.validate() {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping record: {}", e);
                None
            }
        })
        .collect();

    let snapshot = BaselineSnapshot::from_records(&valid).stamped(Utc::now());
    io::write_baseline(output, &snapshot)?;
    println!(
        "Wrote baseline with {} units to {}",
        snapshot.len(),
        output.display()
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UnitId;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_baseline_skips_malformed_records() {
        let temp = TempDir::new().unwrap();
        let records = temp.path().join("metrics.json");
        let output = temp.path().join("baseline.json");
        fs::write(
            &records,
            r#"[
                {"name": "a", "path": "src/a.rs", "kind": "function", "measurements": {"cyclomatic": 7}},
                {"path": "src/b.rs", "kind": "function", "measurements": {"cyclomatic": 9}}
            ]"#,
        )
        .unwrap();

        let snapshot = write_baseline(&records, &output).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.total_for(&UnitId::from("src/a.rs::a")), Some(7));
        assert!(snapshot.generated_at.is_some());

        let on_disk = io::load_baseline(&output).unwrap().unwrap();
        assert_eq!(on_disk, snapshot);
    }
}
