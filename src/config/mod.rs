//! Gate configuration.
//!
//! Configuration is read from `.complexity-gate.toml`:
//!
//! ```toml
//! preset = "balanced"
//!
//! [thresholds.cyclomatic]
//! green_max = 8
//! yellow_max = 15
//!
//! [limits]
//! lines_per_function_max = 200
//!
//! [ratchet]
//! max_delta_pct = 0
//! ```
//!
//! The effective threshold table starts from the preset, replaces any metric
//! listed under `[thresholds]`, then applies the `[limits]` shorthands.

mod loader;
mod presets;
mod thresholds;

pub use loader::{
    directory_ancestors, find_config_file, load_config, load_config_from_path, parse_config,
    CONFIG_ENV_VAR, CONFIG_FILE_NAME,
};
pub use presets::ThresholdPreset;
pub use thresholds::{ThresholdSpec, ThresholdTable};

use crate::core::{names, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    #[serde(default)]
    pub preset: Option<ThresholdPreset>,

    /// Full threshold specs, replacing the preset's entry for each metric
    #[serde(default)]
    pub thresholds: BTreeMap<String, ThresholdSpec>,

    #[serde(default)]
    pub limits: LimitOverrides,

    #[serde(default)]
    pub ratchet: RatchetConfig,
}

/// Single-number limits, each overriding a metric's `yellow_max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cyclomatic_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nesting_depth_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_depth_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines_per_function_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_total_max: Option<u32>,
}

impl LimitOverrides {
    /// Combine with `other`, preferring values set in `other`
    #[must_use]
    pub fn merged_with(self, other: LimitOverrides) -> Self {
        Self {
            cyclomatic_max: other.cyclomatic_max.or(self.cyclomatic_max),
            nesting_depth_max: other.nesting_depth_max.or(self.nesting_depth_max),
            callback_depth_max: other.callback_depth_max.or(self.callback_depth_max),
            lines_per_function_max: other.lines_per_function_max.or(self.lines_per_function_max),
            params_max: other.params_max.or(self.params_max),
            file_total_max: other.file_total_max.or(self.file_total_max),
        }
    }

    fn entries(&self) -> [(&'static str, Option<u32>); 6] {
        [
            (names::CYCLOMATIC, self.cyclomatic_max),
            (names::NESTING_DEPTH, self.nesting_depth_max),
            (names::CALLBACK_DEPTH, self.callback_depth_max),
            (names::LINES, self.lines_per_function_max),
            (names::PARAMS, self.params_max),
            (names::TOTAL_COMPLEXITY, self.file_total_max),
        ]
    }

    pub fn apply(&self, table: &mut ThresholdTable) {
        for (metric, limit) in self.entries() {
            if let Some(yellow_max) = limit {
                table.set_yellow_max(metric, yellow_max);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RatchetConfig {
    /// Largest tolerated growth of a unit's total, in percent
    #[serde(default)]
    pub max_delta_pct: u32,
}

impl GateConfig {
    /// Resolve the effective threshold table.
    ///
    /// `preset_override` and `limit_overrides` come from the command line and
    /// win over the file.
    pub fn threshold_table(
        &self,
        preset_override: Option<ThresholdPreset>,
        limit_overrides: LimitOverrides,
    ) -> Result<ThresholdTable> {
        let preset = preset_override.or(self.preset).unwrap_or_default();
        let mut table = ThresholdTable::from_preset(preset);

        for (metric, spec) in &self.thresholds {
            table.insert(metric.clone(), *spec);
        }

        self.limits.merged_with(limit_overrides).apply(&mut table);
        table.validate()?;
        Ok(table)
    }

    /// Check the `[thresholds]` entries of a loaded file.
    pub fn validate(&self, source: Option<&Path>) -> Result<()> {
        for (metric, spec) in &self.thresholds {
            if metric.trim().is_empty() {
                return Err(Error::configuration(
                    "threshold with an empty metric name",
                    source.map(Path::to_path_buf),
                ));
            }
            spec.validate(metric)
                .map_err(|e| Error::configuration(e.to_string(), source.map(Path::to_path_buf)))?;
        }
        Ok(())
    }

    pub fn max_delta_pct(&self, override_pct: Option<u32>) -> u32 {
        override_pct.unwrap_or(self.ratchet.max_delta_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Error, UnitKind};

    #[test]
    fn test_default_config_uses_balanced_preset() {
        let table = GateConfig::default()
            .threshold_table(None, LimitOverrides::default())
            .unwrap();
        assert_eq!(table, ThresholdTable::from_preset(ThresholdPreset::Balanced));
    }

    #[test]
    fn test_cli_preset_wins_over_file() {
        let config = GateConfig {
            preset: Some(ThresholdPreset::Lenient),
            ..Default::default()
        };
        let table = config
            .threshold_table(Some(ThresholdPreset::Strict), LimitOverrides::default())
            .unwrap();
        assert_eq!(table.boundaries_for(names::CYCLOMATIC).unwrap().yellow_max, 10);
    }

    #[test]
    fn test_file_thresholds_replace_preset_entries() {
        let mut thresholds = BTreeMap::new();
        thresholds.insert("cognitive".to_string(), ThresholdSpec::new(10, 25));
        thresholds.insert(names::LINES.to_string(), ThresholdSpec::new(80, 200));
        let config = GateConfig {
            thresholds,
            ..Default::default()
        };

        let table = config
            .threshold_table(None, LimitOverrides::default())
            .unwrap();
        assert_eq!(
            table.boundaries_for("cognitive").unwrap(),
            &ThresholdSpec::new(10, 25)
        );
        let lines = table.boundaries_for(names::LINES).unwrap();
        assert_eq!(lines.scope, None);
        assert_eq!(lines.yellow_max, 200);
    }

    #[test]
    fn test_cli_limits_win_over_file_limits() {
        let config = GateConfig {
            limits: LimitOverrides {
                cyclomatic_max: Some(30),
                params_max: Some(9),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = LimitOverrides {
            cyclomatic_max: Some(12),
            ..Default::default()
        };

        let table = config.threshold_table(None, cli).unwrap();
        assert_eq!(table.boundaries_for(names::CYCLOMATIC).unwrap().yellow_max, 12);
        assert_eq!(table.boundaries_for(names::PARAMS).unwrap().yellow_max, 9);
        assert_eq!(
            table.boundaries_for(names::PARAMS).unwrap().scope,
            Some(UnitKind::Function)
        );
    }

    #[test]
    fn test_invalid_file_threshold_is_rejected() {
        let mut thresholds = BTreeMap::new();
        thresholds.insert(names::LINES.to_string(), ThresholdSpec::new(200, 100));
        let config = GateConfig {
            thresholds,
            ..Default::default()
        };
        assert!(matches!(
            config.threshold_table(None, LimitOverrides::default()),
            Err(Error::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_validate_reports_config_path() {
        let mut thresholds = BTreeMap::new();
        thresholds.insert(names::PARAMS.to_string(), ThresholdSpec::new(9, 3));
        let config = GateConfig {
            thresholds,
            ..Default::default()
        };

        let err = config
            .validate(Some(Path::new(".complexity-gate.toml")))
            .unwrap_err();
        match err {
            Error::Configuration { message, path } => {
                assert!(message.contains("params"));
                assert_eq!(path.as_deref(), Some(Path::new(".complexity-gate.toml")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_max_delta_pct_override() {
        let config = GateConfig {
            ratchet: RatchetConfig { max_delta_pct: 15 },
            ..Default::default()
        };
        assert_eq!(config.max_delta_pct(None), 15);
        assert_eq!(config.max_delta_pct(Some(5)), 5);
    }
}
