//! Command-line argument definitions for the survey data tool
//!
//! This module defines the CLI interface using the clap derive API.

use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the survey data tool
///
/// Inspects, converts and prunes sensor-based survey data files in the
/// three-block text format.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "survey-data",
    version,
    about = "Inspect, convert and prune sensor-based survey data files",
    long_about = "Loads survey data files holding a sensor block, a data block and an optional \
                  topography block. Sensors are deduplicated on load, rows holding NaN or Infinity \
                  are flagged invalid, and files can be written back with a chosen column order, \
                  with invalid rows or selected sensors removed."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    ///
    /// TOML configuration file with container settings. If not specified,
    /// looks for ~/.config/survey-data/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress output except errors"
    )]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Load files and print sensor, record and token summaries
    Info(InfoArgs),
    /// Load a file and write it back with a chosen column order
    Convert(ConvertArgs),
    /// Remove sensors and every row referencing them
    PruneSensors(PruneSensorsArgs),
}

/// Settings shared by every command that loads files
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct LoadOptions {
    /// Tokens holding sensor indices (comma-separated list)
    #[arg(
        short = 's',
        long = "sensor-index",
        value_name = "LIST",
        help = "Comma-separated list of sensor-index tokens, e.g. a,b,m,n"
    )]
    pub sensor_index: Option<TokenList>,

    /// Sensor indices on file start at 1
    #[arg(long = "from-one", help = "Sensor indices on file start at 1")]
    pub from_one: bool,

    /// Drop invalid rows right after loading
    #[arg(long = "remove-invalid", help = "Remove invalid rows after loading")]
    pub remove_invalid: bool,
}

/// Arguments for the info command
#[derive(Debug, Clone, Parser)]
pub struct InfoArgs {
    /// Files or glob patterns to inspect
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<String>,

    #[command(flatten)]
    pub load: LoadOptions,
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// Input data file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output data file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Data column order to write
    ///
    /// Whitespace-separated tokens; aliases are resolved. Defaults to the
    /// column order read from the input file.
    #[arg(
        short = 'd',
        long = "data-format",
        value_name = "TOKENS",
        conflicts_with = "all",
        help = "Data column order to write, e.g. \"a b m n rhoa\""
    )]
    pub data_format: Option<String>,

    /// Sensor column order to write
    #[arg(
        long = "sensor-format",
        value_name = "TOKENS",
        help = "Sensor column order to write, e.g. \"x z\""
    )]
    pub sensor_format: Option<String>,

    /// Write every column and every row, including invalid ones
    #[arg(long = "all", help = "Write all columns and all rows")]
    pub all: bool,

    #[command(flatten)]
    pub load: LoadOptions,
}

/// Arguments for the prune-sensors command
#[derive(Debug, Clone, Parser)]
pub struct PruneSensorsArgs {
    /// Input data file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output data file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Sensor ids to remove (comma-separated list, 0-based)
    #[arg(
        long = "ids",
        value_name = "LIST",
        required = true,
        help = "Comma-separated list of sensor ids to remove"
    )]
    pub ids: SensorIdList,

    /// Data column order to write
    #[arg(
        short = 'd',
        long = "data-format",
        value_name = "TOKENS",
        help = "Data column order to write"
    )]
    pub data_format: Option<String>,

    /// Sensor column order to write
    #[arg(long = "sensor-format", value_name = "TOKENS")]
    pub sensor_format: Option<String>,

    #[command(flatten)]
    pub load: LoadOptions,
}

/// Wrapper for parsing comma-separated token lists
#[derive(Debug, Clone, PartialEq)]
pub struct TokenList {
    pub tokens: Vec<String>,
}

impl FromStr for TokenList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tokens: Vec<String> = s
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if tokens.is_empty() {
            return Err(Error::configuration("Token list cannot be empty"));
        }

        Ok(TokenList { tokens })
    }
}

/// Wrapper for parsing comma-separated sensor id lists
#[derive(Debug, Clone, PartialEq)]
pub struct SensorIdList {
    pub ids: Vec<usize>,
}

impl FromStr for SensorIdList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let ids = s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|id| {
                id.parse::<usize>().map_err(|_| {
                    Error::configuration(format!("Invalid sensor id '{}'", id))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if ids.is_empty() {
            return Err(Error::configuration("Sensor id list cannot be empty"));
        }

        Ok(SensorIdList { ids })
    }
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Validate arguments that clap cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        let input = match &self.command {
            Some(Commands::Convert(args)) => Some(&args.input),
            Some(Commands::PruneSensors(args)) => Some(&args.input),
            _ => None,
        };
        if let Some(input) = input {
            if !input.is_file() {
                return Err(Error::configuration(format!(
                    "Input file does not exist: {}",
                    input.display()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_token_list_parsing() {
        let result = TokenList::from_str("a,b, m ,n").unwrap();
        assert_eq!(result.tokens, vec!["a", "b", "m", "n"]);

        assert!(TokenList::from_str("").is_err());
        assert!(TokenList::from_str(",,").is_err());
    }

    #[test]
    fn test_sensor_id_list_parsing() {
        let result = SensorIdList::from_str("3, 0,12").unwrap();
        assert_eq!(result.ids, vec![3, 0, 12]);

        assert!(SensorIdList::from_str("1,-2").is_err());
        assert!(SensorIdList::from_str("one").is_err());
        assert!(SensorIdList::from_str(" , ").is_err());
    }

    #[test]
    fn test_parse_convert_command() {
        let args = Args::try_parse_from([
            "survey-data",
            "-vv",
            "convert",
            "in.dat",
            "out.dat",
            "--data-format",
            "a b rhoa",
            "--sensor-index",
            "a,b",
            "--from-one",
        ])
        .unwrap();

        assert_eq!(args.get_log_level(), "debug");
        match args.command {
            Some(Commands::Convert(convert)) => {
                assert_eq!(convert.input, PathBuf::from("in.dat"));
                assert_eq!(convert.data_format.as_deref(), Some("a b rhoa"));
                assert!(!convert.all);
                assert!(convert.load.from_one);
                assert_eq!(
                    convert.load.sensor_index.map(|list| list.tokens),
                    Some(vec!["a".to_string(), "b".to_string()])
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_all_conflicts_with_data_format() {
        let result = Args::try_parse_from([
            "survey-data",
            "convert",
            "in.dat",
            "out.dat",
            "--all",
            "--data-format",
            "a",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_prune_requires_ids() {
        let result = Args::try_parse_from(["survey-data", "prune-sensors", "in.dat", "out.dat"]);
        assert!(result.is_err());

        let args = Args::try_parse_from([
            "survey-data",
            "prune-sensors",
            "in.dat",
            "out.dat",
            "--ids",
            "1,2",
        ])
        .unwrap();
        match args.command {
            Some(Commands::PruneSensors(prune)) => assert_eq!(prune.ids.ids, vec![1, 2]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_log_level() {
        let mut args = Args::try_parse_from(["survey-data"]).unwrap();
        assert_eq!(args.get_log_level(), "warn");

        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");
        args.verbose = 5;
        assert_eq!(args.get_log_level(), "trace");

        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
    }

    #[test]
    fn test_validate_checks_paths() {
        let input = NamedTempFile::new().unwrap();
        let input_path = input.path().to_str().unwrap();

        let args =
            Args::try_parse_from(["survey-data", "convert", input_path, "out.dat"]).unwrap();
        assert!(args.validate().is_ok());

        let args = Args::try_parse_from(["survey-data", "convert", "/nonexistent/in.dat", "out.dat"])
            .unwrap();
        assert!(args.validate().is_err());

        let args = Args::try_parse_from([
            "survey-data",
            "--config",
            "/nonexistent/config.toml",
            "info",
            "x.dat",
        ])
        .unwrap();
        assert!(args.validate().is_err());
    }
}
