use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# Complexity gate configuration

# Starting thresholds: strict, balanced or lenient
preset = "balanced"

# Full boundaries per metric. Values up to green_max pass, up to yellow_max
# warn, anything larger blocks. `scope` limits a metric to "function" or
# "file" records.
#
# [thresholds.cyclomatic]
# green_max = 8
# yellow_max = 15
# scope = "function"

# Single-number limits, each replacing the matching metric's yellow_max.
[limits]
# cyclomatic_max = 15
# nesting_depth_max = 4
# callback_depth_max = 3
# lines_per_function_max = 100
# params_max = 6
# file_total_max = 100

[ratchet]
# Largest tolerated growth of a unit's total complexity, in percent.
max_delta_pct = 0
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_at(Path::new(CONFIG_FILE_NAME), force)
}

pub fn init_config_at(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(config_path, DEFAULT_CONFIG)?;
    println!("Created {} configuration file", config_path.display());

    Ok(())
}
