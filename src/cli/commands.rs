//! Command implementations for the survey data CLI
//!
//! This module contains the command execution logic, configuration layering
//! and console reporting for the CLI interface.

use crate::app::container::DataContainer;
use crate::app::services::data_format::LoadStats;
use crate::cli::args::{Args, Commands, ConvertArgs, InfoArgs, LoadOptions, PruneSensorsArgs};
use crate::config::ContainerConfig;
use crate::constants::SELECT_ALL;
use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main command runner
///
/// Sets up logging, loads the layered configuration and dispatches to the
/// selected subcommand.
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    match &args.command {
        Some(Commands::Info(info_args)) => run_info(info_args, config),
        Some(Commands::Convert(convert_args)) => run_convert(convert_args, config),
        Some(Commands::PruneSensors(prune_args)) => run_prune_sensors(prune_args, config),
        None => Ok(()),
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("survey_data={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using a layered approach (defaults -> file)
///
/// Command-specific overrides are applied by each command.
fn load_configuration(args: &Args) -> Result<ContainerConfig> {
    let default_config_path = if args.config_file.is_none() {
        ContainerConfig::default_config_path().ok()
    } else {
        None
    };

    let config_file = match &args.config_file {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_ref()
            .filter(|path| path.exists())
            .map(|path| path.as_path()),
    };

    let config = match config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            ContainerConfig::from_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?
        }
        None => {
            debug!("No config file found, using defaults");
            ContainerConfig::default()
        }
    };

    config.validate()?;
    Ok(config)
}

/// Apply load options from the command line to configuration
fn apply_cli_overrides(mut config: ContainerConfig, load: &LoadOptions) -> ContainerConfig {
    if let Some(list) = &load.sensor_index {
        for token in &list.tokens {
            if !config.sensor_index_tokens.contains(token) {
                config.sensor_index_tokens.push(token.clone());
            }
        }
    }
    if load.from_one {
        config.sensor_index_from_one = true;
    }
    if load.remove_invalid {
        config.remove_invalid_on_load = true;
    }
    config
}

/// Load one file into a fresh container
fn load_container(path: &Path, config: &ContainerConfig) -> Result<(DataContainer, LoadStats)> {
    let mut data = DataContainer::with_config(config.clone());
    let stats = data
        .load(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    Ok((data, stats))
}

/// Expand glob patterns into file paths
///
/// A pattern matching nothing is kept as a plain path so that the load
/// reports the missing file.
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let matches: Vec<PathBuf> = glob::glob(pattern)
            .with_context(|| format!("Invalid file pattern '{}'", pattern))?
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();

        if matches.is_empty() {
            paths.push(PathBuf::from(pattern));
        } else {
            paths.extend(matches);
        }
    }
    Ok(paths)
}

fn run_info(args: &InfoArgs, config: ContainerConfig) -> Result<()> {
    let config = apply_cli_overrides(config, &args.load);
    let paths = expand_patterns(&args.files)?;
    info!("Inspecting {} files", paths.len());

    for path in &paths {
        let (data, stats) = load_container(path, &config)?;
        println!("{}", path.display().to_string().bright_cyan().bold());
        for line in data.show_infos().lines() {
            println!("   {}", line);
        }
        print_load_report(&stats);
        println!();
    }
    Ok(())
}

fn run_convert(args: &ConvertArgs, config: ContainerConfig) -> Result<()> {
    let config = apply_cli_overrides(config, &args.load);
    let (data, stats) = load_container(&args.input, &config)?;
    print_load_report(&stats);

    let data_format = if args.all {
        SELECT_ALL.to_string()
    } else {
        args.data_format
            .clone()
            .unwrap_or_else(|| default_data_format(&data))
    };
    let sensor_format = args
        .sensor_format
        .clone()
        .unwrap_or_else(|| config.sensor_format.clone());

    let saved = data
        .save(&args.output, &data_format, &sensor_format)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    println!(
        "{} {} ({} sensors, {} data, {} columns)",
        "Written".bright_green().bold(),
        args.output.display(),
        saved.sensors,
        saved.records,
        saved.columns
    );
    Ok(())
}

fn run_prune_sensors(args: &PruneSensorsArgs, config: ContainerConfig) -> Result<()> {
    let config = apply_cli_overrides(config, &args.load);
    let (mut data, stats) = load_container(&args.input, &config)?;
    print_load_report(&stats);

    let sensor_count = data.sensor_count();
    if let Some(&bad) = args.ids.ids.iter().find(|&&id| id >= sensor_count) {
        anyhow::bail!(
            "Sensor id {} out of range, {} holds {} sensors",
            bad,
            args.input.display(),
            sensor_count
        );
    }

    let rows_before = data.size();
    let permutation = data.remove_sensor_idx(&args.ids.ids)?;
    println!(
        "{} {} sensors and {} rows, {} sensors remain",
        "Removed".bright_yellow().bold(),
        permutation.removed_count(),
        rows_before - data.size(),
        permutation.new_count()
    );

    let data_format = args
        .data_format
        .clone()
        .unwrap_or_else(|| default_data_format(&data));
    let sensor_format = args
        .sensor_format
        .clone()
        .unwrap_or_else(|| config.sensor_format.clone());
    let saved = data
        .save(&args.output, &data_format, &sensor_format)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    println!(
        "{} {} ({} sensors, {} data)",
        "Written".bright_green().bold(),
        args.output.display(),
        saved.sensors,
        saved.records
    );
    Ok(())
}

/// Column order read from the input, or every column if none was read
fn default_data_format(data: &DataContainer) -> String {
    if data.input_format().is_empty() {
        SELECT_ALL.to_string()
    } else {
        data.input_format().to_string()
    }
}

fn print_load_report(stats: &LoadStats) {
    println!(
        "   Loaded {} sensors ({} new), {} data, {} topography points",
        stats.sensors_declared, stats.sensors_created, stats.records, stats.topography_points
    );
    if stats.sensors_merged() > 0 {
        println!(
            "   {} {} duplicate sensors merged",
            "!".bright_yellow().bold(),
            stats.sensors_merged()
        );
    }
    if stats.invalid_records > 0 {
        let action = if stats.invalid_removed {
            "removed"
        } else {
            "flagged"
        };
        println!(
            "   {} {} invalid rows {}",
            "!".bright_yellow().bold(),
            stats.invalid_records,
            action
        );
    }
    if stats.warnings > 0 {
        println!(
            "   {} {} warnings, rerun with -v for details",
            "!".bright_yellow().bold(),
            stats.warnings
        );
    }
}
