use crate::core::names;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::thresholds::ThresholdSpec;

/// Preset threshold configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdPreset {
    /// Strict thresholds for high code quality standards
    Strict,
    /// Balanced thresholds for typical projects
    #[default]
    Balanced,
    /// Lenient thresholds for legacy or complex domains
    Lenient,
}

impl ThresholdPreset {
    /// The threshold specs registered by this preset.
    ///
    /// Per-function metrics are scoped to function records and the file total
    /// to file records.
    pub fn specs(&self) -> BTreeMap<String, ThresholdSpec> {
        let (cyclomatic, nesting, callbacks, lines, params, file_total) = match self {
            Self::Strict => ((5, 10), (2, 3), (1, 2), (30, 50), (3, 5), (30, 60)),
            Self::Balanced => ((8, 15), (3, 4), (2, 3), (50, 100), (4, 6), (50, 100)),
            Self::Lenient => ((10, 20), (4, 6), (3, 4), (100, 200), (6, 8), (100, 200)),
        };

        [
            (names::CYCLOMATIC, ThresholdSpec::functions(cyclomatic.0, cyclomatic.1)),
            (names::NESTING_DEPTH, ThresholdSpec::functions(nesting.0, nesting.1)),
            (names::CALLBACK_DEPTH, ThresholdSpec::functions(callbacks.0, callbacks.1)),
            (names::LINES, ThresholdSpec::functions(lines.0, lines.1)),
            (names::PARAMS, ThresholdSpec::functions(params.0, params.1)),
            (names::TOTAL_COMPLEXITY, ThresholdSpec::files(file_total.0, file_total.1)),
        ]
        .into_iter()
        .map(|(name, spec)| (name.to_string(), spec))
        .collect()
    }
}
