//! # Organization Profile
//!
//! The caller-supplied description of the organization under assessment:
//! its sector and size tier (which select the benchmark segment and cost
//! band), the domains it wants assessed, and its self-reported evidence.
//!
//! Evidence may be reported against a unified control directly or
//! against a specific framework obligation. The engine reads the profile
//! and never mutates it.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::error::MizanError;
use crate::identity::{ControlId, ObligationRef};
use crate::maturity::Maturity;

/// Organization size tier. Selects benchmark segments and cost bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SizeTier {
    /// Up to ~50 staff.
    Small,
    /// ~50–250 staff.
    Medium,
    /// ~250–1000 staff.
    Large,
    /// Over ~1000 staff or multi-entity groups.
    Enterprise,
}

impl SizeTier {
    /// All tiers, smallest first.
    pub fn all() -> &'static [SizeTier] {
        &[Self::Small, Self::Medium, Self::Large, Self::Enterprise]
    }

    /// Lowercase identifier, matching serde.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Enterprise => "enterprise",
        }
    }
}

impl std::fmt::Display for SizeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeTier {
    type Err = MizanError;

    /// Case-insensitive parse (`Large`, `large`, `LARGE`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(MizanError::UnknownSizeTier(s.to_string())),
        }
    }
}

impl TryFrom<String> for SizeTier {
    type Error = MizanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Industry sector display name (e.g. "Banking").
///
/// Stored trimmed as written; benchmark lookups compare sectors
/// case-insensitively through [`Sector::matches`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sector(String);

impl Sector {
    /// Create a sector, rejecting blank names.
    pub fn new(name: impl AsRef<str>) -> Result<Self, MizanError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MizanError::EmptySector);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The sector name as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive sector equality.
    pub fn matches(&self, other: &Sector) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl TryFrom<String> for Sector {
    type Error = MizanError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sector> for String {
    fn from(s: Sector) -> String {
        s.0
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One self-reported evidence answer.
///
/// In profile files an answer may be written as a bare maturity number
/// (`GOV.01: 2`) or in full form with evidence references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EvidenceAnswerRepr")]
pub struct EvidenceAnswer {
    /// Self-reported maturity.
    pub maturity: Maturity,
    /// Free-text references to supporting evidence (documents, tickets, reports).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EvidenceAnswerRepr {
    Bare(Maturity),
    Full {
        maturity: Maturity,
        #[serde(default)]
        references: Vec<String>,
    },
}

impl From<EvidenceAnswerRepr> for EvidenceAnswer {
    fn from(repr: EvidenceAnswerRepr) -> Self {
        match repr {
            EvidenceAnswerRepr::Bare(maturity) => Self::new(maturity),
            EvidenceAnswerRepr::Full {
                maturity,
                references,
            } => Self {
                maturity,
                references,
            },
        }
    }
}

impl EvidenceAnswer {
    /// An answer with no supporting references.
    pub fn new(maturity: Maturity) -> Self {
        Self {
            maturity,
            references: Vec::new(),
        }
    }

    /// Attach supporting references.
    pub fn with_references<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references
            .extend(references.into_iter().map(Into::into));
        self
    }

    /// Whether at least one non-blank evidence reference is attached.
    pub fn is_substantiated(&self) -> bool {
        self.references.iter().any(|r| !r.trim().is_empty())
    }
}

/// The organization under assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    /// Industry sector.
    pub sector: Sector,
    /// Size tier.
    pub size: SizeTier,
    /// Domains selected for assessment. Empty means every domain.
    #[serde(default)]
    pub domains: BTreeSet<Domain>,
    /// Evidence reported directly against unified controls.
    #[serde(default)]
    pub control_evidence: BTreeMap<ControlId, EvidenceAnswer>,
    /// Evidence reported against specific framework obligations.
    #[serde(default)]
    pub obligation_evidence: BTreeMap<ObligationRef, EvidenceAnswer>,
}

impl OrganizationProfile {
    /// A profile with no selected domains and no evidence.
    pub fn new(sector: Sector, size: SizeTier) -> Self {
        Self {
            sector,
            size,
            domains: BTreeSet::new(),
            control_evidence: BTreeMap::new(),
            obligation_evidence: BTreeMap::new(),
        }
    }

    /// Whether any evidence answer was supplied.
    pub fn has_evidence(&self) -> bool {
        !self.control_evidence.is_empty() || !self.obligation_evidence.is_empty()
    }

    /// Total number of evidence answers.
    pub fn evidence_count(&self) -> usize {
        self.control_evidence.len() + self.obligation_evidence.len()
    }

    /// Whether `domain` is in the assessment scope.
    pub fn in_scope(&self, domain: Domain) -> bool {
        self.domains.is_empty() || self.domains.contains(&domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_tier_parse_is_case_insensitive() {
        assert_eq!("Large".parse::<SizeTier>().unwrap(), SizeTier::Large);
        assert_eq!(" ENTERPRISE ".parse::<SizeTier>().unwrap(), SizeTier::Enterprise);
        assert!("huge".parse::<SizeTier>().is_err());
    }

    #[test]
    fn sector_matching() {
        let a = Sector::new(" Banking ").unwrap();
        let b = Sector::new("banking").unwrap();
        assert_eq!(a.as_str(), "Banking");
        assert!(a.matches(&b));
        assert!(!a.matches(&Sector::new("Retail").unwrap()));
        assert!(Sector::new("   ").is_err());
    }

    #[test]
    fn profile_from_yaml_accepts_bare_and_full_answers() {
        let yaml = r#"
sector: Banking
size: large
domains: [cyber]
control_evidence:
  GOV.01: 2
  RSK.03:
    maturity: 4
    references: ["Risk register 2024"]
obligation_evidence:
  KSA_NCA_ECC/ECC-IAM-01: 1
"#;
        let profile: OrganizationProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.size, SizeTier::Large);
        assert!(profile.in_scope(Domain::Cyber));
        assert!(!profile.in_scope(Domain::Ai));
        let gov = &profile.control_evidence[&ControlId::new("GOV.01").unwrap()];
        assert_eq!(gov.maturity.value(), 2);
        assert!(!gov.is_substantiated());
        let rsk = &profile.control_evidence[&ControlId::new("RSK.03").unwrap()];
        assert!(rsk.is_substantiated());
        assert_eq!(profile.evidence_count(), 3);
    }

    #[test]
    fn profile_rejects_out_of_range_maturity() {
        let yaml = "sector: Banking\nsize: small\ncontrol_evidence:\n  GOV.01: 7\n";
        assert!(serde_yaml::from_str::<OrganizationProfile>(yaml).is_err());
    }

    #[test]
    fn empty_domain_selection_means_all() {
        let p = OrganizationProfile::new(Sector::new("Retail").unwrap(), SizeTier::Small);
        assert!(Domain::all().iter().all(|d| p.in_scope(*d)));
        assert!(!p.has_evidence());
    }
}
