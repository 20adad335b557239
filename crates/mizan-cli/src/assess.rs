//! # Assess — run an assessment from a profile file.
//!
//! ```bash
//! mizan assess --profile org.yaml --framework KSA_NCA_ECC --format yaml --out report.yaml
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mizan_core::FrameworkId;
use mizan_engine::AssessmentRequest;

use crate::{emit, load_profile, render, LoadOptions, OutputFormat};

/// Arguments for `mizan assess`.
#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Organization profile (YAML or JSON).
    #[arg(long)]
    pub profile: PathBuf,

    /// Framework to assess against. Repeat to select several.
    #[arg(long = "framework", required = true)]
    pub frameworks: Vec<FrameworkId>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write the report here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute `mizan assess`.
pub fn run_assess(args: &AssessArgs, opts: &LoadOptions) -> Result<u8> {
    let engine = opts.engine()?;
    let profile = load_profile(&args.profile)?;
    let request = AssessmentRequest::new(profile, args.frameworks.iter().cloned());
    let report = engine
        .assess(&request)
        .with_context(|| format!("assessment of {} failed", args.profile.display()))?;

    for annotation in &report.annotations {
        tracing::debug!(?annotation, "report annotation");
    }
    emit(&render(&report, args.format)?, args.out.as_deref())?;
    Ok(0)
}
