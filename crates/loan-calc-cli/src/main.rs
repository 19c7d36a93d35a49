mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::{CalculateArgs, PaymentArgs};

/// Loan amortisation calculations with decimal precision
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Loan amortisation calculations with decimal precision",
    long_about = "A CLI for computing loan amortisation schedules with decimal \
                  precision. Supports annuity and differentiated payment schemes, \
                  interest-free installment plans, one-off early repayments, and \
                  qualifying-income estimation."
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
    /// Compute the full payment schedule for a loan
    Calculate(CalculateArgs),
    /// Compute just the recurring annuity payment
    Payment(PaymentArgs),
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
        Commands::Calculate(args) => commands::loan::run_calculate(args),
        Commands::Payment(args) => commands::loan::run_payment(args),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
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
