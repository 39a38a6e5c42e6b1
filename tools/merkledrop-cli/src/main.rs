//! Merkledrop operator CLI
//!
//! Builds distribution lists and proof files offline and prints the execute
//! messages to submit to the merkledrop contract.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod claim;
mod create;
mod files;
mod verify;
mod withdraw;

#[derive(Parser, Debug)]
#[command(name = "merkledrop")]
#[command(author, version, about = "Merkle airdrop tooling", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a merkledrop from an address -> amount JSON file
    Create(create::Args),
    /// Print a claim message for one proof-file entry
    Claim(claim::Args),
    /// Print a withdraw message for an expired merkledrop
    Withdraw(withdraw::Args),
    /// Check a proof-file entry against a root
    Verify(verify::Args),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so stdout stays pipeable JSON
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = match cli.command {
        Commands::Create(args) => create::run(&args)?,
        Commands::Claim(args) => claim::run(&args)?,
        Commands::Withdraw(args) => withdraw::run(&args)?,
        Commands::Verify(args) => verify::run(&args)?,
    };

    println!("{output}");
    Ok(())
}
