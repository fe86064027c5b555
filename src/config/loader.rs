use anyhow::{Context, Result};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::GateConfig;

pub const CONFIG_FILE_NAME: &str = ".complexity-gate.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "COMPLEXITY_GATE_CONFIG";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse config from TOML. Threshold consistency is checked when the table
/// is resolved, not here.
pub fn parse_config(contents: &str) -> crate::core::Result<GateConfig> {
    Ok(toml::from_str::<GateConfig>(contents)?)
}

/// `start` followed by its ancestors, at most `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for a config file
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

pub fn load_config_from_path(path: &Path) -> Result<GateConfig> {
    let contents = read_config_file(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse_config(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config.validate(Some(path))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Load the gate configuration.
///
/// Resolution order: `explicit`, then `$COMPLEXITY_GATE_CONFIG`, then the
/// nearest `.complexity-gate.toml` above the current directory. Returns the
/// path the config came from, or `None` when defaults are used. A config
/// file that exists but fails to parse is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<(GateConfig, Option<PathBuf>)> {
    let env_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    if let Some(path) = explicit.map(Path::to_path_buf).or(env_path) {
        let config = load_config_from_path(&path)?;
        return Ok((config, Some(path)));
    }

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            warn!("Failed to get current directory: {}. Using default config.", e);
            return Ok((GateConfig::default(), None));
        }
    };

    match find_config_file(&current) {
        Some(path) => {
            let config = load_config_from_path(&path)?;
            Ok((config, Some(path)))
        }
        None => {
            debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            Ok((GateConfig::default(), None))
        }
    }
}
