//! # Frameworks — list the framework registry.

use anyhow::Result;
use clap::Args;

use mizan_core::Domain;
use mizan_pack::Framework;

use crate::LoadOptions;

/// Arguments for `mizan frameworks`.
#[derive(Args, Debug)]
pub struct FrameworksArgs {
    /// Only list frameworks tagged with this domain (`dt` is accepted).
    #[arg(long)]
    pub domain: Option<Domain>,
}

/// One listing line.
pub fn describe(fw: &Framework) -> String {
    format!(
        "  {:<18} {:<12} {:<24} {:<14} {} obligations",
        fw.id.as_str(),
        fw.version,
        fw.domain.as_str(),
        fw.authority,
        fw.obligations.len()
    )
}

/// Execute `mizan frameworks`.
pub fn run_frameworks(args: &FrameworksArgs, opts: &LoadOptions) -> Result<u8> {
    let catalogue = opts.load_catalogue()?;
    let frameworks: Vec<&Framework> = match args.domain {
        Some(domain) => catalogue.registry.list_by_domain(domain),
        None => catalogue.registry.iter().collect(),
    };
    for fw in &frameworks {
        println!("{}", describe(fw));
    }
    println!();
    println!("Total: {} frameworks", frameworks.len());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_includes_id_and_count() {
        let catalogue = LoadOptions::default().load_catalogue().unwrap();
        let ecc = catalogue
            .registry
            .get(&"KSA_NCA_ECC".parse().unwrap())
            .unwrap();
        let line = describe(ecc);
        assert!(line.contains("KSA_NCA_ECC"));
        assert!(line.contains("5 obligations"));
    }

    #[test]
    fn list_by_domain_runs() {
        let args = FrameworksArgs {
            domain: Some(Domain::DigitalTransformation),
        };
        assert_eq!(run_frameworks(&args, &LoadOptions::default()).unwrap(), 0);
    }
}
