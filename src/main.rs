use clap::Parser;
use colored::*;
use std::process;
use survey_data::cli::{args::Args, commands};

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("{} {:#}", "Error:".bright_red().bold(), error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Survey Data - sensor-based survey data files");
    println!("============================================");
    println!();
    println!("USAGE:");
    println!("    survey-data [OPTIONS] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    info            Print sensor, record and token summaries of files");
    println!("    convert         Write a file back with a chosen column order");
    println!("    prune-sensors   Remove sensors and every row referencing them");
    println!("    help            Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>   Configuration file (TOML)");
    println!("    -v, --verbose         Increase logging verbosity");
    println!("    -q, --quiet           Suppress output except errors");
    println!("    -h, --help            Show help information");
    println!("    -V, --version         Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Summarize all files of a survey line:");
    println!("    survey-data info 'line1/*.dat' --sensor-index a,b,m,n");
    println!();
    println!("    # Drop invalid rows and keep selected columns:");
    println!("    survey-data convert raw.dat clean.dat --remove-invalid \\");
    println!("                        --sensor-index a,b,m,n --data-format \"a b m n rhoa\"");
    println!();
    println!("    # Remove two broken electrodes:");
    println!("    survey-data prune-sensors raw.dat pruned.dat --sensor-index a,b,m,n --ids 4,17");
    println!();
    println!("For detailed help on any command, use:");
    println!("    survey-data <COMMAND> --help");
}
