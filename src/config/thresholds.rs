use crate::core::{Error, Result, Severity, UnitKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::presets::ThresholdPreset;

/// Green / yellow boundaries for one metric.
///
/// Values up to `green_max` are green, up to `yellow_max` yellow, and
/// anything above `yellow_max` red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdSpec {
    pub green_max: u32,
    pub yellow_max: u32,

    /// Restrict the threshold to one kind of unit; `None` applies to all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<UnitKind>,
}

impl ThresholdSpec {
    pub const fn new(green_max: u32, yellow_max: u32) -> Self {
        Self {
            green_max,
            yellow_max,
            scope: None,
        }
    }

    pub const fn functions(green_max: u32, yellow_max: u32) -> Self {
        Self {
            green_max,
            yellow_max,
            scope: Some(UnitKind::Function),
        }
    }

    pub const fn files(green_max: u32, yellow_max: u32) -> Self {
        Self {
            green_max,
            yellow_max,
            scope: Some(UnitKind::File),
        }
    }

    /// Smallest value classified red
    pub fn red_min(&self) -> u32 {
        self.yellow_max.saturating_add(1)
    }

    pub fn classify(&self, value: u32) -> Severity {
        match value {
            v if v <= self.green_max => Severity::Green,
            v if v <= self.yellow_max => Severity::Yellow,
            _ => Severity::Red,
        }
    }

    pub fn applies_to(&self, kind: UnitKind) -> bool {
        self.scope.map_or(true, |scope| scope == kind)
    }

    pub fn validate(&self, metric: &str) -> Result<()> {
        if self.green_max > self.yellow_max {
            return Err(Error::InvalidThreshold {
                metric: metric.to_string(),
                green_max: self.green_max,
                yellow_max: self.yellow_max,
            });
        }
        Ok(())
    }

    /// Replace the block boundary, pulling `green_max` down if needed
    #[must_use]
    pub fn with_yellow_max(self, yellow_max: u32) -> Self {
        Self {
            green_max: self.green_max.min(yellow_max),
            yellow_max,
            scope: self.scope,
        }
    }
}

/// Metric name to threshold mapping.
///
/// Built once at startup and then only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdTable {
    specs: BTreeMap<String, ThresholdSpec>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::from_preset(ThresholdPreset::Balanced)
    }
}

impl ThresholdTable {
    /// A table with no registered metrics
    pub fn empty() -> Self {
        Self {
            specs: BTreeMap::new(),
        }
    }

    pub fn from_preset(preset: ThresholdPreset) -> Self {
        Self {
            specs: preset.specs(),
        }
    }

    #[must_use]
    pub fn with(mut self, metric: impl Into<String>, spec: ThresholdSpec) -> Self {
        self.insert(metric, spec);
        self
    }

    pub fn insert(&mut self, metric: impl Into<String>, spec: ThresholdSpec) -> Option<ThresholdSpec> {
        self.specs.insert(metric.into(), spec)
    }

    /// Look up the boundaries registered for `metric`.
    pub fn boundaries_for(&self, metric: &str) -> Result<&ThresholdSpec> {
        self.specs
            .get(metric)
            .ok_or_else(|| Error::unknown_metric(metric))
    }

    /// Override the block boundary of an already registered metric.
    ///
    /// Unregistered metrics get a spec where green and yellow coincide.
    pub fn set_yellow_max(&mut self, metric: &str, yellow_max: u32) {
        let updated = match self.specs.get(metric) {
            Some(spec) => spec.with_yellow_max(yellow_max),
            None => ThresholdSpec::new(yellow_max, yellow_max),
        };
        self.specs.insert(metric.to_string(), updated);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThresholdSpec)> {
        self.specs.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        self.specs
            .iter()
            .try_for_each(|(metric, spec)| spec.validate(metric))
    }
}
