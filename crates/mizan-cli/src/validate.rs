//! # Validate — load and validate the catalogue and engine config.
//!
//! Exits non-zero on any validation failure, so it can gate a catalogue
//! update in CI.

use anyhow::Result;
use clap::Args;

use crate::LoadOptions;

/// Arguments for `mizan validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also print per-domain framework counts.
    #[arg(long)]
    pub detail: bool,
}

/// Execute `mizan validate`.
pub fn run_validate(args: &ValidateArgs, opts: &LoadOptions) -> Result<u8> {
    let catalogue = opts.load_catalogue()?;
    opts.load_config()?;

    println!("taxonomy    {} ({} controls)", catalogue.taxonomy.version(), catalogue.taxonomy.len());
    println!(
        "frameworks  {} ({} obligations)",
        catalogue.registry.len(),
        catalogue.registry.obligation_count()
    );
    println!(
        "benchmarks  {} ({} distributions)",
        catalogue.benchmarks.version(),
        catalogue.benchmarks.distributions().len()
    );
    println!("knowledge   {}", catalogue.knowledge.version());
    if args.detail {
        for &domain in mizan_core::Domain::all() {
            println!(
                "  {:<24} {} frameworks",
                domain.as_str(),
                catalogue.registry.list_by_domain(domain).len()
            );
        }
    }
    println!("OK");
    Ok(0)
}
