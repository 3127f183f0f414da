mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::capital::WaccArgs;
use commands::sensitivity::GridArgs;
use commands::valuation::ValueArgs;

/// Five-period DCF valuation from the command line
#[derive(Parser)]
#[command(
    name = "dcfm",
    version,
    about = "Five-period DCF valuation with decimal precision",
    long_about = "Scenario-adjusted discounted-cash-flow valuation: five-year cash-flow \
                  projection, Gordon growth terminal value, CAPM-derived WACC, and a \
                  WACC x growth sensitivity grid of enterprise values."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Cost of equity (CAPM) and blended WACC from a capital structure
    Wacc(WaccArgs),
    /// Run the five-period DCF valuation
    Value(ValueArgs),
    /// WACC x growth sensitivity grid of enterprise values (in millions)
    Grid(GridArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Wacc(args) => commands::capital::run_wacc(args),
        Commands::Value(args) => commands::valuation::run_value(args),
        Commands::Grid(args) => commands::sensitivity::run_grid(args),
        Commands::Version => {
            println!("dcfm {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
