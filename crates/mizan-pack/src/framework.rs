//! # Framework Definitions
//!
//! A [`Framework`] is an immutable, validated list of obligations issued by
//! one authority under one domain tag. Identity is `(id, version)`.
//!
//! Catalogue files are read into the raw [`FrameworkDefinition`] form and
//! converted with `TryFrom`, which is where registry validation happens:
//! identifier shapes, the domain tag, obligation uniqueness, the presence
//! of mapping hints and the range of declared targets. A failure names the
//! framework and obligation involved.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use mizan_core::{ControlId, Domain, FrameworkId, Maturity, ObligationId, ObligationRef};

use crate::error::RegistryValidationError;

// ---------------------------------------------------------------------------
// MappingHint
// ---------------------------------------------------------------------------

/// A hint telling the mapper where an obligation belongs.
///
/// Hints shaped like a control identifier (`GOV.01`) map exactly; every
/// other hint is a lowercase keyword matched against control keyword sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub enum MappingHint {
    /// Direct reference to a unified control.
    Control(ControlId),
    /// Keyword resolved through the taxonomy's keyword index.
    Keyword(String),
}

impl MappingHint {
    /// Classify a raw hint. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match ControlId::new(trimmed) {
            Ok(id) => Self::Control(id),
            Err(_) => Self::Keyword(trimmed.to_lowercase()),
        })
    }
}

impl From<MappingHint> for String {
    fn from(hint: MappingHint) -> String {
        match hint {
            MappingHint::Control(id) => id.into(),
            MappingHint::Keyword(kw) => kw,
        }
    }
}

impl std::fmt::Display for MappingHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Control(id) => write!(f, "{id}"),
            Self::Keyword(kw) => f.write_str(kw),
        }
    }
}

// ---------------------------------------------------------------------------
// Validated model
// ---------------------------------------------------------------------------

/// A single requirement owned by one framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Obligation {
    /// Identifier, unique within the owning framework.
    pub id: ObligationId,
    /// Requirement text.
    pub text: String,
    /// Lowercase semantic tags.
    pub tags: BTreeSet<String>,
    /// Evidence types an assessor would accept.
    pub evidence_types: Vec<String>,
    /// Mapping hints (at least one).
    pub mapping_hints: Vec<MappingHint>,
    /// Obligation-specific target maturity, if stricter than the framework's.
    pub target_maturity: Option<Maturity>,
}

/// An immutable framework definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Framework {
    /// Framework identifier.
    pub id: FrameworkId,
    /// Version pin.
    pub version: String,
    /// Display name.
    pub name: String,
    /// Issuing authority.
    pub authority: String,
    /// Domain tag.
    pub domain: Domain,
    /// Framework-wide target maturity, if the framework declares one.
    pub target_maturity: Option<Maturity>,
    /// Obligations in declaration order.
    pub obligations: Vec<Obligation>,
}

impl Framework {
    /// Look up one obligation.
    pub fn obligation(&self, id: &ObligationId) -> Option<&Obligation> {
        self.obligations.iter().find(|o| &o.id == id)
    }

    /// Fully qualified reference to one of this framework's obligations.
    pub fn reference(&self, obligation: &Obligation) -> ObligationRef {
        ObligationRef::new(self.id.clone(), obligation.id.clone())
    }

    /// Target this framework declares for `obligation`.
    ///
    /// The obligation's own target wins over the framework-wide default.
    pub fn declared_target(&self, obligation: &Obligation) -> Option<Maturity> {
        obligation.target_maturity.or(self.target_maturity)
    }
}

// ---------------------------------------------------------------------------
// Raw definitions
// ---------------------------------------------------------------------------

/// Framework as written in a catalogue file, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameworkDefinition {
    /// Framework identifier.
    pub id: String,
    /// Version pin.
    pub version: String,
    /// Display name; defaults to the identifier.
    #[serde(default)]
    pub name: Option<String>,
    /// Issuing authority.
    pub authority: String,
    /// Domain tag, validated against [`Domain`].
    pub domain: String,
    /// Framework-wide target maturity.
    #[serde(default)]
    pub target_maturity: Option<i64>,
    /// Obligations.
    #[serde(default)]
    pub obligations: Vec<ObligationDefinition>,
}

/// Obligation as written in a catalogue file, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ObligationDefinition {
    /// Obligation identifier.
    pub id: String,
    /// Requirement text.
    pub text: String,
    /// Semantic tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Acceptable evidence types.
    #[serde(default, alias = "evidence")]
    pub evidence_types: Vec<String>,
    /// Mapping hints.
    #[serde(default)]
    pub mapping_hints: Vec<String>,
    /// Obligation-specific target maturity.
    #[serde(default)]
    pub target_maturity: Option<i64>,
}

fn check_target(
    framework: &str,
    obligation: Option<&str>,
    raw: Option<i64>,
) -> Result<Option<Maturity>, RegistryValidationError> {
    raw.map(|value| {
        Maturity::try_from(value).map_err(|_| RegistryValidationError::InvalidTarget {
            framework: framework.to_string(),
            obligation: obligation.map(str::to_string),
            value,
        })
    })
    .transpose()
}

impl TryFrom<FrameworkDefinition> for Framework {
    type Error = RegistryValidationError;

    fn try_from(def: FrameworkDefinition) -> Result<Self, Self::Error> {
        let fw_name = def.id.clone();
        let id = FrameworkId::new(&def.id).map_err(|source| {
            RegistryValidationError::InvalidIdentifier {
                framework: fw_name.clone(),
                source,
            }
        })?;
        let domain: Domain =
            def.domain
                .parse()
                .map_err(|_| RegistryValidationError::UnknownDomain {
                    framework: fw_name.clone(),
                    domain: def.domain.clone(),
                })?;
        if def.obligations.is_empty() {
            return Err(RegistryValidationError::EmptyFramework { framework: fw_name });
        }
        let target_maturity = check_target(&fw_name, None, def.target_maturity)?;

        let mut seen = BTreeSet::new();
        let mut obligations = Vec::with_capacity(def.obligations.len());
        for ob in def.obligations {
            let ob_id = ObligationId::new(&ob.id).map_err(|source| {
                RegistryValidationError::InvalidIdentifier {
                    framework: fw_name.clone(),
                    source,
                }
            })?;
            if !seen.insert(ob_id.clone()) {
                return Err(RegistryValidationError::DuplicateObligation {
                    framework: fw_name,
                    obligation: ob.id,
                });
            }
            if ob.mapping_hints.is_empty() {
                return Err(RegistryValidationError::MissingMappingHints {
                    framework: fw_name,
                    obligation: ob.id,
                });
            }
            let mut mapping_hints = Vec::with_capacity(ob.mapping_hints.len());
            for raw in &ob.mapping_hints {
                let hint = MappingHint::parse(raw).ok_or_else(|| {
                    RegistryValidationError::BlankHint {
                        framework: fw_name.clone(),
                        obligation: ob.id.clone(),
                    }
                })?;
                if !mapping_hints.contains(&hint) {
                    mapping_hints.push(hint);
                }
            }
            let target = check_target(&fw_name, Some(&ob.id), ob.target_maturity)?;
            obligations.push(Obligation {
                id: ob_id,
                text: ob.text,
                tags: ob.tags.iter().map(|t| t.trim().to_lowercase()).collect(),
                evidence_types: ob.evidence_types,
                mapping_hints,
                target_maturity: target,
            });
        }

        Ok(Framework {
            name: def.name.unwrap_or_else(|| def.id.clone()),
            id,
            version: def.version,
            authority: def.authority,
            domain,
            target_maturity,
            obligations,
        })
    }
}
