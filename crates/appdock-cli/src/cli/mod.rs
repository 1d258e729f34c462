mod check;
mod show;

use crate::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "appdock")]
#[command(about = "Manifest tooling for sandboxed analysis applications", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check an application directory and report every manifest violation
    Check(check::CheckArgs),

    /// Load, validate and print the manifest as JSON
    Manifest(show::ManifestArgs),

    /// Print the resolved parameter values as JSON
    Params(show::ParamsArgs),
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Check(args) => check::execute(args),
            Commands::Manifest(args) => show::execute_manifest(args),
            Commands::Params(args) => show::execute_params(args),
        }
    }
}
