//! # Brief — print the narrative brief for a profile.
//!
//! Emits the structured input the text-generation collaborator receives,
//! so a generator can be developed against real payloads.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use mizan_core::FrameworkId;
use mizan_engine::AssessmentRequest;

use crate::{emit, load_profile, render, LoadOptions, OutputFormat};

/// Arguments for `mizan brief`.
#[derive(Args, Debug)]
pub struct BriefArgs {
    /// Organization profile (YAML or JSON).
    #[arg(long)]
    pub profile: PathBuf,

    /// Framework to assess against. Repeat to select several.
    #[arg(long = "framework", required = true)]
    pub frameworks: Vec<FrameworkId>,
}

/// Execute `mizan brief`.
pub fn run_brief(args: &BriefArgs, opts: &LoadOptions) -> Result<u8> {
    let engine = opts.engine()?;
    let profile = load_profile(&args.profile)?;
    let report = engine.assess(&AssessmentRequest::new(profile, args.frameworks.iter().cloned()))?;
    emit(&render(&report.narrative_brief(), OutputFormat::Json)?, None)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_profile_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = BriefArgs {
            profile: dir.path().join("absent.yaml"),
            frameworks: vec![FrameworkId::new("KSA_NCA_ECC").unwrap()],
        };
        let err = run_brief(&args, &LoadOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read profile"));
    }
}
