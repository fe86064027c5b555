use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{LimitOverrides, ThresholdPreset as ConfigPreset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThresholdPreset {
    /// Strict thresholds for high code quality standards
    Strict,
    /// Balanced thresholds for typical projects (default)
    Balanced,
    /// Lenient thresholds for legacy or complex domains
    Lenient,
}

impl From<ThresholdPreset> for ConfigPreset {
    fn from(p: ThresholdPreset) -> Self {
        match p {
            ThresholdPreset::Strict => ConfigPreset::Strict,
            ThresholdPreset::Balanced => ConfigPreset::Balanced,
            ThresholdPreset::Lenient => ConfigPreset::Lenient,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::output::OutputFormat::Terminal,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl From<ColorChoice> for crate::formatting::ColorMode {
    fn from(c: ColorChoice) -> Self {
        match c {
            ColorChoice::Auto => crate::formatting::ColorMode::Auto,
            ColorChoice::Always => crate::formatting::ColorMode::Always,
            ColorChoice::Never => crate::formatting::ColorMode::Never,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "complexity-gate")]
#[command(about = "Gate code complexity metrics against thresholds and a baseline", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Threshold selection shared by the commands that evaluate records
#[derive(Args, Debug, Clone, Default)]
pub struct ThresholdArgs {
    /// Configuration file (defaults to the nearest .complexity-gate.toml)
    #[arg(short, long, env = "COMPLEXITY_GATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Threshold preset, overriding the config file
    #[arg(long = "preset", value_enum)]
    pub preset: Option<ThresholdPreset>,

    /// Block above this cyclomatic complexity per function
    #[arg(long = "cyclomatic-max")]
    pub cyclomatic_max: Option<u32>,

    /// Block above this nesting depth
    #[arg(long = "nesting-depth-max")]
    pub nesting_depth_max: Option<u32>,

    /// Block above this nested-callback depth
    #[arg(long = "callback-depth-max")]
    pub callback_depth_max: Option<u32>,

    /// Block above this many lines per function
    #[arg(long = "lines-per-function-max")]
    pub lines_per_function_max: Option<u32>,

    /// Block above this many parameters
    #[arg(long = "params-max")]
    pub params_max: Option<u32>,

    /// Block above this total complexity per file
    #[arg(long = "file-total-max")]
    pub file_total_max: Option<u32>,
}

impl ThresholdArgs {
    pub fn limits(&self) -> LimitOverrides {
        LimitOverrides {
            cyclomatic_max: self.cyclomatic_max,
            nesting_depth_max: self.nesting_depth_max,
            callback_depth_max: self.callback_depth_max,
            lines_per_function_max: self.lines_per_function_max,
            params_max: self.params_max,
            file_total_max: self.file_total_max,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate metric records against thresholds and an optional baseline
    Check {
        /// JSON file with metric records from the analyzer ("-" for stdin)
        records: PathBuf,

        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// Baseline snapshot for the regression ratchet
        #[arg(short, long)]
        baseline: Option<PathBuf>,

        /// Largest tolerated growth of a unit's total, in percent
        #[arg(long = "max-delta-pct")]
        max_delta_pct: Option<u32>,

        /// Rewrite the baseline when the run passes
        #[arg(long = "update-baseline", requires = "baseline")]
        update_baseline: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Colorize terminal output
        #[arg(long, value_enum, default_value = "auto")]
        color: ColorChoice,

        /// Fail the run when any record is malformed
        #[arg(long = "strict-input")]
        strict_input: bool,
    },

    /// Write a baseline snapshot from metric records
    Baseline {
        /// JSON file with metric records from the analyzer ("-" for stdin)
        records: PathBuf,

        /// Where to write the snapshot
        #[arg(short, long, default_value = ".complexity-baseline.json")]
        output: PathBuf,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective threshold table
    Thresholds {
        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// Output format (markdown is rendered as a table as well)
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_check_command() {
        let cli = Cli::parse_from([
            "complexity-gate",
            "check",
            "metrics.json",
            "--baseline",
            "base.json",
            "--max-delta-pct",
            "15",
            "--cyclomatic-max",
            "12",
            "--format",
            "json",
        ]);

        match cli.command {
            Commands::Check {
                records,
                thresholds,
                baseline,
                max_delta_pct,
                format,
                ..
            } => {
                assert_eq!(records, PathBuf::from("metrics.json"));
                assert_eq!(baseline, Some(PathBuf::from("base.json")));
                assert_eq!(max_delta_pct, Some(15));
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(thresholds.limits().cyclomatic_max, Some(12));
                assert_eq!(thresholds.limits().params_max, None);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_update_baseline_requires_baseline() {
        let result = Cli::try_parse_from(["complexity-gate", "check", "m.json", "--update-baseline"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parsing_init_command() {
        let cli = Cli::parse_from(["complexity-gate", "init", "--force"]);
        match cli.command {
            Commands::Init { force } => assert!(force),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_global_verbosity() {
        let cli = Cli::parse_from(["complexity-gate", "thresholds", "-vv", "--preset", "strict"]);
        assert_eq!(cli.verbosity, 2);
        match cli.command {
            Commands::Thresholds { thresholds, .. } => {
                assert_eq!(thresholds.preset, Some(ThresholdPreset::Strict));
            }
            _ => panic!("Expected Thresholds command"),
        }
    }

    #[test]
    fn test_preset_conversion() {
        assert_eq!(ConfigPreset::from(ThresholdPreset::Lenient), ConfigPreset::Lenient);
        assert_eq!(ConfigPreset::from(ThresholdPreset::Strict), ConfigPreset::Strict);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
