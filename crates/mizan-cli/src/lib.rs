//! # mizan-cli — Command-Line Front-End
//!
//! Provides the `mizan` binary. The CLI only loads files and prints
//! results; every computation happens in `mizan-engine`.
//!
//! ## Subcommands
//!
//! - `mizan assess` — run an assessment and print the report.
//! - `mizan frameworks` — list the framework registry.
//! - `mizan validate` — load and validate the catalogue and config.
//! - `mizan brief` — print the narrative brief for a profile.
//!
//! ```bash
//! mizan assess --profile org.yaml --framework KSA_NCA_ECC --framework KSA_NDMO
//! mizan frameworks --domain cyber
//! mizan --catalogue ./catalogue --config engine.yaml validate
//! ```

pub mod assess;
pub mod brief;
pub mod frameworks;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use mizan_core::OrganizationProfile;
use mizan_engine::{AssessmentEngine, EngineConfig};
use mizan_pack::Catalogue;

/// Where reference data and configuration come from.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Catalogue directory; the built-in catalogue when absent.
    pub catalogue: Option<PathBuf>,
    /// Engine config file; defaults when absent.
    pub config: Option<PathBuf>,
}

impl LoadOptions {
    /// Load the catalogue.
    pub fn load_catalogue(&self) -> Result<Catalogue> {
        match &self.catalogue {
            Some(dir) => Catalogue::load_dir(dir)
                .with_context(|| format!("failed to load catalogue from {}", dir.display())),
            None => Catalogue::builtin().context("built-in catalogue is invalid"),
        }
    }

    /// Load the engine configuration.
    pub fn load_config(&self) -> Result<EngineConfig> {
        match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display())),
            None => Ok(EngineConfig::default()),
        }
    }

    /// Build an engine from the catalogue and config.
    pub fn engine(&self) -> Result<AssessmentEngine> {
        let catalogue = self.load_catalogue()?;
        let config = self.load_config()?;
        AssessmentEngine::new(Arc::new(catalogue), config).context("failed to build engine")
    }
}

/// Read an organization profile from a YAML (or JSON) file.
pub fn load_profile(path: &Path) -> Result<OrganizationProfile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("failed to parse profile {}", path.display()))
}

/// Output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

/// Serialize `value` in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut s = serde_json::to_string_pretty(value).context("failed to serialize JSON")?;
            s.push('\n');
            Ok(s)
        }
        OutputFormat::Yaml => serde_yaml::to_string(value).context("failed to serialize YAML"),
    }
}

/// Write `text` to `out`, or stdout when `out` is `None`.
pub fn emit(text: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => print!("{text}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_builtin_catalogue() {
        let opts = LoadOptions::default();
        let catalogue = opts.load_catalogue().unwrap();
        assert!(!catalogue.registry.is_empty());
        assert_eq!(opts.load_config().unwrap(), EngineConfig::default());
        opts.engine().unwrap();
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let opts = LoadOptions {
            catalogue: None,
            config: Some(dir.path().join("absent.yaml")),
        };
        let err = opts.load_config().unwrap_err();
        assert!(format!("{err:#}").contains("absent.yaml"));
    }

    #[test]
    fn profile_accepts_bare_and_full_answers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("org.yaml");
        std::fs::write(
            &path,
            r#"
sector: Banking
size: Large
domains: [cyber]
control_evidence:
  GOV.01: 2
  RSK.03: { maturity: 4, references: [risk-register.xlsx] }
obligation_evidence:
  KSA_NCA_ECC/ECC-IAM-01: 1
"#,
        )
        .unwrap();
        let profile = load_profile(&path).unwrap();
        assert_eq!(profile.evidence_count(), 3);
        assert_eq!(profile.sector.as_str(), "Banking");
    }

    #[test]
    fn render_formats() {
        let value = serde_json::json!({ "a": 1 });
        assert_eq!(render(&value, OutputFormat::Json).unwrap(), "{\n  \"a\": 1\n}\n");
        assert_eq!(render(&value, OutputFormat::Yaml).unwrap(), "a: 1\n");
    }

    #[test]
    fn emit_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        emit("{}\n", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }
}
