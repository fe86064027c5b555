//! File I/O at the edges: analyzer output, baseline snapshots, reports.

use crate::core::{BaselineSnapshot, RawMetricRecord, BASELINE_SCHEMA_VERSION};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Analyzer output is either a bare array of records or an object with a
/// `units` array. Elements stay untyped here so that one bad record cannot
/// reject the whole document.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsDocument {
    Bare(Vec<Value>),
    Wrapped { units: Vec<Value> },
}

/// Parse analyzer output.
///
/// Only a document that is neither an array nor a `units` object is an
/// error. Records of the wrong shape come back with a defect and turn into
/// errored units during evaluation.
pub fn parse_records(contents: &str) -> crate::core::Result<Vec<RawMetricRecord>> {
    let document: RecordsDocument = serde_json::from_str(contents)?;
    let (RecordsDocument::Bare(units) | RecordsDocument::Wrapped { units }) = document;

    let records: Vec<RawMetricRecord> = units.iter().map(RawMetricRecord::from_json).collect();
    let defective = records.iter().filter(|r| r.defect.is_some()).count();
    if defective > 0 {
        warn!("{} of {} records could not be read", defective, records.len());
    }
    Ok(records)
}

/// Load analyzer output from `path`, or from stdin when `path` is `-`.
pub fn load_records(path: &Path) -> Result<Vec<RawMetricRecord>> {
    let contents = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read metric records from stdin")?;
        buffer
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read metric records: {}", path.display()))?
    };

    let records = parse_records(&contents)
        .with_context(|| format!("Failed to parse metric records from: {}", path.display()))?;
    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Load a baseline snapshot. A missing file yields `None` (first run).
pub fn load_baseline(path: &Path) -> Result<Option<BaselineSnapshot>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(
                "Baseline {} not found; treating every unit as new",
                path.display()
            );
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read baseline: {}", path.display()))
        }
    };

    let snapshot: BaselineSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse baseline JSON from: {}", path.display()))?;
    if snapshot.schema_version > BASELINE_SCHEMA_VERSION {
        anyhow::bail!(
            "Baseline {} has schema version {}, newest supported is {}",
            path.display(),
            snapshot.schema_version,
            BASELINE_SCHEMA_VERSION
        );
    }
    debug!("Loaded baseline with {} units", snapshot.len());
    Ok(Some(snapshot))
}

/// Persist a baseline snapshot, replacing `path` only once the new content is
/// fully written.
pub fn write_baseline(path: &Path, snapshot: &BaselineSnapshot) -> Result<()> {
    let mut json = serde_json::to_string_pretty(snapshot)?;
    json.push('\n');

    let tmp = path.with_extension("json.tmp");
    write_file(&tmp, &json)?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace baseline: {}", path.display()))?;
    debug!("Wrote baseline with {} units to {}", snapshot.len(), path.display());
    Ok(())
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Write to `output` when given, stdout otherwise
pub fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => write_file(path, content),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MetricRecord, UnitId, UnitKind};
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_parse_bare_and_wrapped_records() {
        let bare = parse_records(indoc! {r#"
            [{"name": "a", "path": "src/a.rs", "kind": "function", "measurements": {"cyclomatic": 3}}]
        "#})
        .unwrap();
        let wrapped = parse_records(indoc! {r#"
            {"units": [{"name": "a", "path": "src/a.rs", "kind": "function", "measurements": {"cyclomatic": 3}}]}
        "#})
        .unwrap();

        assert_eq!(bare, wrapped);
        assert_eq!(bare[0].kind, Some(UnitKind::Function));
    }

    #[test]
    fn test_parse_keeps_records_with_missing_identity() {
        let records = parse_records(r#"[{"measurements": {"lines": 10}}, {"name": "b"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].name.is_none());
    }

    #[test]
    fn test_bad_record_does_not_reject_document() {
        let records = parse_records(indoc! {r#"
            [
                {"name": "a", "path": "src/a.rs", "kind": "function", "measurements": {"cyclomatic": 20}},
                {"name": "b", "path": "src/b.rs", "kind": "function", "measurements": {"cyclomatic": 3.5}},
                {"name": "c", "path": "src/c.rs", "kind": "function", "measurements": {"lines": -1}}
            ]
        "#})
        .unwrap();

        assert_eq!(records.len(), 3);
        assert!(records[0].defect.is_none());
        assert!(records[1].defect.is_some());
        assert_eq!(records[1].name.as_deref(), Some("b"));
        assert!(records[2].defect.is_some());
    }

    #[test]
    fn test_parse_rejects_non_record_document() {
        assert!(parse_records(r#"{"functions": []}"#).is_err());
        assert!(parse_records("42").is_err());
    }

    #[test]
    fn test_missing_baseline_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(load_baseline(&temp.path().join("baseline.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_baseline_round_trip_through_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("baseline.json");
        let records = vec![MetricRecord::function("a", "src/a.rs").with_measurement("cyclomatic", 9)];
        let snapshot = BaselineSnapshot::from_records(&records);

        write_baseline(&path, &snapshot).unwrap();
        let loaded = load_baseline(&path).unwrap().unwrap();

        assert_eq!(loaded.total_for(&UnitId::from("src/a.rs::a")), Some(9));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_future_baseline_schema_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("baseline.json");
        fs::write(&path, r#"{"schema_version": 99, "totals": {}}"#).unwrap();
        let err = load_baseline(&path).unwrap_err();
        assert!(err.to_string().contains("schema version 99"));
    }
}
