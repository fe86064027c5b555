use anyhow::Result;
use complexity_gate::cli::{Cli, Commands};
use complexity_gate::commands::{self, CheckConfig, CheckStatus};
use complexity_gate::formatting::FormattingConfig;
use complexity_gate::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code when the gate could not run at all
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = complexity_gate::cli::parse_args();
    init_logging(cli.verbosity);

    match run(cli) {
        Ok(CheckStatus::Passed) => ExitCode::SUCCESS,
        Ok(CheckStatus::Failed) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

// Logs go to stderr so reports on stdout stay machine-readable
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn run(cli: Cli) -> Result<CheckStatus> {
    match cli.command {
        Commands::Check {
            records,
            thresholds,
            baseline,
            max_delta_pct,
            update_baseline,
            format,
            output,
            color,
            strict_input,
        } => commands::run_check(CheckConfig {
            records,
            config: thresholds.config.clone(),
            preset: thresholds.preset.map(Into::into),
            limits: thresholds.limits(),
            baseline,
            max_delta_pct,
            update_baseline,
            format: format.into(),
            output,
            formatting: FormattingConfig::from_env(color.into()),
            strict_input,
        }),
        Commands::Baseline { records, output } => {
            commands::baseline::write_baseline(&records, &output)?;
            Ok(CheckStatus::Passed)
        }
        Commands::Init { force } => {
            commands::init::init_config(force)?;
            Ok(CheckStatus::Passed)
        }
        Commands::Thresholds { thresholds, format } => {
            let rendered = commands::thresholds::show_thresholds(
                thresholds.config.as_deref(),
                thresholds.preset.map(Into::into),
                thresholds.limits(),
                format.into(),
            )?;
            io::write_output(None, &rendered)?;
            Ok(CheckStatus::Passed)
        }
    }
}
