//! # Framework Registry
//!
//! Immutable, validated table of [`Framework`]s loaded once at process
//! start. A registry holds exactly one version per framework identifier;
//! loading two definitions with the same identifier is a
//! [`RegistryValidationError::DuplicateFramework`].
//!
//! ## Security Invariant
//!
//! No assessment runs against an unvalidated registry. Construction is the
//! only validation point and there is no mutation API afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use mizan_core::{Domain, FrameworkId};

use crate::error::{PackResult, RegistryValidationError};
use crate::framework::{Framework, FrameworkDefinition};
use crate::parser;

#[derive(Debug, Deserialize)]
struct RegistryFile {
    frameworks: Vec<FrameworkDefinition>,
}

/// Validated framework catalogue.
#[derive(Debug, Clone, Default)]
pub struct FrameworkRegistry {
    frameworks: BTreeMap<FrameworkId, Framework>,
}

impl FrameworkRegistry {
    /// Build a registry from already-validated frameworks.
    pub fn new(frameworks: Vec<Framework>) -> Result<Self, RegistryValidationError> {
        let mut map: BTreeMap<FrameworkId, Framework> = BTreeMap::new();
        for fw in frameworks {
            if let Some(existing) = map.get(&fw.id) {
                return Err(RegistryValidationError::DuplicateFramework {
                    framework: fw.id.to_string(),
                    first: existing.version.clone(),
                    second: fw.version,
                });
            }
            map.insert(fw.id.clone(), fw);
        }
        Ok(Self { frameworks: map })
    }

    /// Validate raw definitions and build a registry.
    pub fn from_definitions(
        defs: Vec<FrameworkDefinition>,
    ) -> Result<Self, RegistryValidationError> {
        let frameworks = defs
            .into_iter()
            .map(Framework::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(frameworks)
    }

    /// Parse and validate a `frameworks:` document.
    pub fn from_yaml_str(text: &str, origin: &Path) -> PackResult<Self> {
        let file: RegistryFile = parser::parse_yaml(text, origin)?;
        Ok(Self::from_definitions(file.frameworks)?)
    }

    /// Load and validate a registry file.
    pub fn load(path: &Path) -> PackResult<Self> {
        let file: RegistryFile = parser::read_yaml_file(path)?;
        let registry = Self::from_definitions(file.frameworks)?;
        tracing::info!(
            path = %path.display(),
            frameworks = registry.len(),
            "framework registry loaded"
        );
        Ok(registry)
    }

    /// Look up a framework by identifier.
    pub fn get(&self, id: &FrameworkId) -> Option<&Framework> {
        self.frameworks.get(id)
    }

    /// Frameworks tagged with `domain`, in identifier order.
    pub fn list_by_domain(&self, domain: Domain) -> Vec<&Framework> {
        self.frameworks
            .values()
            .filter(|fw| fw.domain == domain)
            .collect()
    }

    /// All frameworks in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Framework> {
        self.frameworks.values()
    }

    /// Number of frameworks.
    pub fn len(&self) -> usize {
        self.frameworks.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
    }

    /// Total obligations across all frameworks.
    pub fn obligation_count(&self) -> usize {
        self.frameworks.values().map(|fw| fw.obligations.len()).sum()
    }
}
