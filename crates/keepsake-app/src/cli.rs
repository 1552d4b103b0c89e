//! Command-line arguments for the `keepsake` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

use crate::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "keepsake",
    version,
    about = "Keepsake - a shared notebook for two",
    long_about = "Articles, confession roulette, a suggestions box and a grievance tracker,\n\
                  kept in one JSON document on a small HTTP endpoint."
)]
pub struct Cli {
    /// Data endpoint URL (overrides the settings file).
    #[arg(long, value_name = "URL", conflicts_with = "offline")]
    pub endpoint: Option<String>,

    /// Keep data in memory only; nothing is sent anywhere.
    #[arg(long)]
    pub offline: bool,

    /// Settings file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_offline_conflicts_with_endpoint() {
        let result = Cli::try_parse_from(["keepsake", "--offline", "--endpoint", "http://x"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["keepsake", "--log-format", "json", "-v"]).unwrap();
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert!(cli.verbosity.is_present());
    }
}
