use crate::config::{load_config, LimitOverrides, ThresholdPreset, ThresholdTable};
use crate::output::OutputFormat;
use anyhow::Result;
use comfy_table::{presets, Table};
use std::path::Path;

/// Resolve the effective thresholds and render them.
pub fn show_thresholds(
    config_path: Option<&Path>,
    preset: Option<ThresholdPreset>,
    limits: LimitOverrides,
    format: OutputFormat,
) -> Result<String> {
    let (config, _) = load_config(config_path)?;
    let table = config.threshold_table(preset, limits)?;
    render_thresholds(&table, format)
}

pub fn render_thresholds(table: &ThresholdTable, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let mut json = serde_json::to_string_pretty(table)?;
        json.push('\n');
        return Ok(json);
    }

    let mut rendered = Table::new();
    rendered.load_preset(match format {
        OutputFormat::Markdown => presets::ASCII_MARKDOWN,
        _ => presets::UTF8_FULL,
    });
    rendered.set_header(vec!["Metric", "Scope", "Green max", "Yellow max", "Red from"]);
    for (metric, spec) in table.iter() {
        rendered.add_row(vec![
            metric.to_string(),
            spec.scope.map_or_else(|| "any".to_string(), |s| s.to_string()),
            spec.green_max.to_string(),
            spec.yellow_max.to_string(),
            spec.red_min().to_string(),
        ]);
    }

    Ok(format!("{rendered}\n"))
}
