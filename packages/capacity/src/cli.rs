//! Command-line interface for the capacity decoder.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;

use crate::config::DEFAULT_MASTER_SEED;
use crate::customer::{load_customers_file, CustomerSet};
use crate::error::Result;
use crate::services::{DecodeContext, SeedRepo};
use crate::yaml::{generate_yaml, save_yaml};

/// Factored capacity decoder - validate and inspect customer capacity documents.
#[derive(Parser)]
#[command(name = "factored-capacity")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a customers document and report what was loaded.
    Check {
        /// Customers XML file
        file: PathBuf,

        /// Master seed for the seed repository
        #[arg(short, long, default_value_t = DEFAULT_MASTER_SEED)]
        seed: u64,
    },

    /// Decode a customers document and write it out as YAML.
    Dump {
        /// Customers XML file
        file: PathBuf,

        /// Master seed for the seed repository
        #[arg(short, long, default_value_t = DEFAULT_MASTER_SEED)]
        seed: u64,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the CLI.
///
/// Returns `Ok(false)` when the document loaded but some customers were
/// rejected.
pub fn run() -> Result<bool> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file, seed } => check_command(&file, seed),
        Commands::Dump { file, seed, output } => dump_command(&file, seed, output.as_deref()),
    }
}

fn load(file: &Path, seed: u64) -> Result<CustomerSet> {
    let repo = SeedRepo::new(seed);
    load_customers_file(file, &DecodeContext::new(&repo))
}

/// Execute the check command.
fn check_command(file: &Path, seed: u64) -> Result<bool> {
    println!(
        "{} {} with seed {}",
        style("Checking").bold(),
        style(file.display()).cyan(),
        style(seed).green()
    );
    println!();

    let set = load(file, seed)?;

    for customer in &set.customers {
        println!(
            "  {} ({} bundles, {} capacities, {} substructures)",
            style(&customer.name).green(),
            customer.bundles.len(),
            customer.capacities().count(),
            customer
                .capacities()
                .map(|c| c.substructures().len())
                .sum::<usize>()
        );
    }
    println!();
    println!("  Customers: {}", set.customers.len());
    println!(
        "  Capacities: {}",
        set.customers
            .iter()
            .map(|c| c.capacities().count())
            .sum::<usize>()
    );

    if set.rejected.is_empty() {
        return Ok(true);
    }

    println!(
        "  Rejected: {}",
        style(set.rejected.len()).red().bold()
    );
    for rejected in &set.rejected {
        println!("    {}: {}", style(&rejected.name).red(), rejected.error);
    }
    Ok(false)
}

/// Execute the dump command.
fn dump_command(file: &Path, seed: u64, output: Option<&Path>) -> Result<bool> {
    let set = load(file, seed)?;

    match output {
        Some(path) => {
            save_yaml(&set, path)?;
            println!(
                "{} {}",
                style("Saved to:").green().bold(),
                path.display()
            );
        }
        None => print!("{}", generate_yaml(&set)?),
    }

    Ok(set.rejected.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::parse_from(["factored-capacity", "check", "customers.xml"]);

        let Commands::Check { file, seed } = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(file, PathBuf::from("customers.xml"));
        assert_eq!(seed, DEFAULT_MASTER_SEED);
    }

    #[test]
    fn test_cli_parse_dump_with_options() {
        let cli = Cli::parse_from([
            "factored-capacity",
            "dump",
            "customers.xml",
            "--seed",
            "7",
            "--output",
            "out.yaml",
        ]);

        let Commands::Dump { file, seed, output } = cli.command else {
            panic!("expected dump command");
        };
        assert_eq!(file, PathBuf::from("customers.xml"));
        assert_eq!(seed, 7);
        assert_eq!(output, Some(PathBuf::from("out.yaml")));
    }

    #[test]
    fn test_cli_rejects_non_numeric_seed() {
        let result = Cli::try_parse_from(["factored-capacity", "check", "c.xml", "--seed", "x"]);
        assert!(result.is_err());
    }
}
