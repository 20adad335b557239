//! # Catalogue
//!
//! Bundles the four read-only reference datasets the engine runs against:
//! control taxonomy, framework registry, benchmark dataset and risk
//! knowledge base. Loaded once, shared immutably across assessment runs.
//!
//! Beyond each component's own validation, the catalogue checks that every
//! control-id mapping hint in the registry names a control that exists in
//! the taxonomy; a dangling reference is a registry error, not a runtime
//! surprise.

use std::path::Path;

use crate::benchmark::BenchmarkDataset;
use crate::error::{PackResult, RegistryValidationError};
use crate::framework::MappingHint;
use crate::knowledge::RiskKnowledgeBase;
use crate::registry::FrameworkRegistry;
use crate::taxonomy::ControlTaxonomy;

const BUILTIN_TAXONOMY: &str = include_str!("../data/taxonomy.yaml");
const BUILTIN_FRAMEWORKS: &str = include_str!("../data/frameworks.yaml");
const BUILTIN_BENCHMARKS: &str = include_str!("../data/benchmarks.yaml");
const BUILTIN_KNOWLEDGE: &str = include_str!("../data/knowledge.yaml");

/// File names expected by [`Catalogue::load_dir`].
pub const TAXONOMY_FILE: &str = "taxonomy.yaml";
/// Framework registry file name.
pub const FRAMEWORKS_FILE: &str = "frameworks.yaml";
/// Benchmark dataset file name.
pub const BENCHMARKS_FILE: &str = "benchmarks.yaml";
/// Risk knowledge base file name.
pub const KNOWLEDGE_FILE: &str = "knowledge.yaml";

/// The validated reference data for an assessment run.
#[derive(Debug, Clone)]
pub struct Catalogue {
    /// Unified control taxonomy.
    pub taxonomy: ControlTaxonomy,
    /// Framework registry.
    pub registry: FrameworkRegistry,
    /// Industry benchmark dataset.
    pub benchmarks: BenchmarkDataset,
    /// Domain risk knowledge base.
    pub knowledge: RiskKnowledgeBase,
}

impl Catalogue {
    /// Assemble a catalogue, checking cross-references.
    pub fn new(
        taxonomy: ControlTaxonomy,
        registry: FrameworkRegistry,
        benchmarks: BenchmarkDataset,
        knowledge: RiskKnowledgeBase,
    ) -> PackResult<Self> {
        check_control_hints(&taxonomy, &registry)?;
        Ok(Self {
            taxonomy,
            registry,
            benchmarks,
            knowledge,
        })
    }

    /// The catalogue compiled into the binary.
    pub fn builtin() -> PackResult<Self> {
        let catalogue = Self::new(
            ControlTaxonomy::from_yaml_str(BUILTIN_TAXONOMY, Path::new("<builtin>/taxonomy.yaml"))?,
            FrameworkRegistry::from_yaml_str(
                BUILTIN_FRAMEWORKS,
                Path::new("<builtin>/frameworks.yaml"),
            )?,
            BenchmarkDataset::from_yaml_str(
                BUILTIN_BENCHMARKS,
                Path::new("<builtin>/benchmarks.yaml"),
            )?,
            RiskKnowledgeBase::from_yaml_str(
                BUILTIN_KNOWLEDGE,
                Path::new("<builtin>/knowledge.yaml"),
            )?,
        )?;
        tracing::debug!(
            controls = catalogue.taxonomy.len(),
            frameworks = catalogue.registry.len(),
            "built-in catalogue loaded"
        );
        Ok(catalogue)
    }

    /// Load a catalogue from a directory holding the four YAML files.
    pub fn load_dir(dir: &Path) -> PackResult<Self> {
        let catalogue = Self::new(
            ControlTaxonomy::load(&dir.join(TAXONOMY_FILE))?,
            FrameworkRegistry::load(&dir.join(FRAMEWORKS_FILE))?,
            BenchmarkDataset::load(&dir.join(BENCHMARKS_FILE))?,
            RiskKnowledgeBase::load(&dir.join(KNOWLEDGE_FILE))?,
        )?;
        tracing::info!(
            dir = %dir.display(),
            taxonomy = catalogue.taxonomy.version(),
            benchmarks = catalogue.benchmarks.version(),
            "catalogue loaded"
        );
        Ok(catalogue)
    }
}

fn check_control_hints(
    taxonomy: &ControlTaxonomy,
    registry: &FrameworkRegistry,
) -> Result<(), RegistryValidationError> {
    for fw in registry.iter() {
        for ob in &fw.obligations {
            for hint in &ob.mapping_hints {
                if let MappingHint::Control(id) = hint {
                    if !taxonomy.contains(id) {
                        return Err(RegistryValidationError::UnknownControl {
                            framework: fw.id.to_string(),
                            obligation: ob.id.to_string(),
                            control: id.to_string(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}
