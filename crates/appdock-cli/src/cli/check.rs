use crate::Result;
use anyhow::bail;
use appdock_manifest::checker::{self, Severity};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// Application directory containing manifest.json
    #[arg(default_value = ".")]
    pub app_dir: PathBuf,

    /// Only report hard schema errors, skip layout advisories
    #[arg(long)]
    pub errors_only: bool,
}

pub fn execute(args: CheckArgs) -> Result<()> {
    let findings = checker::check_app_dir(&args.app_dir);

    let mut error_count = 0usize;
    for finding in &findings {
        match finding.severity {
            Severity::Error => {
                error_count += 1;
                eprintln!(
                    "  {} {}: {}",
                    "✗".red().bold(),
                    finding.location,
                    finding.message
                );
            }
            Severity::Advisory => {
                if !args.errors_only {
                    eprintln!(
                        "  {} {}: {}",
                        "warning:".yellow().bold(),
                        finding.location,
                        finding.message
                    );
                }
            }
        }
    }

    if error_count > 0 {
        bail!(
            "manifest check failed with {error_count} error(s) in {}",
            args.app_dir.display()
        );
    }

    eprintln!(
        "{} manifest in {} is valid",
        "✔".green().bold(),
        args.app_dir.display()
    );
    Ok(())
}
