//! # Risk Knowledge Base
//!
//! Static, per-domain reference data the risk prioritizer attaches to
//! risk entries: threat actors, impact categories, recommended
//! mitigations, key risk indicators and the domain's named risk
//! scenarios. Nothing here is computed; entries are attached by domain
//! (and by control family for targeted mitigations).

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use mizan_core::{ControlId, Domain};

use crate::error::{KnowledgeError, PackResult};
use crate::parser;

/// A key risk indicator with its tolerance and red-flag thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kri {
    /// Indicator name, e.g. "Mean Time to Detect (MTTD)".
    pub name: String,
    /// Target threshold, e.g. "< 4 hours".
    pub target: String,
    /// Red-flag threshold, e.g. "> 24 hours".
    pub red_flag: String,
}

/// A named scenario from the domain risk register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScenario {
    /// Scenario identifier, e.g. `CS-R01`.
    pub id: String,
    /// Scenario name.
    pub name: String,
    /// Likelihood on a 1–5 scale.
    pub likelihood: u8,
    /// Impact on a 1–5 scale.
    pub impact: u8,
    /// Risk category.
    #[serde(default)]
    pub category: String,
}

impl RiskScenario {
    /// Inherent risk score (likelihood × impact, 1–25).
    pub fn score(&self) -> u8 {
        self.likelihood * self.impact
    }
}

/// Knowledge for one domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainKnowledge {
    /// Threat actors relevant to the domain.
    #[serde(default)]
    pub threat_actors: Vec<String>,
    /// Impact categories (financial, regulatory, ...).
    #[serde(default)]
    pub impact_categories: Vec<String>,
    /// Domain-wide mitigations.
    #[serde(default)]
    pub mitigations: Vec<String>,
    /// Mitigations keyed by control family (`IAM`, `DATA`, ...).
    #[serde(default)]
    pub family_mitigations: BTreeMap<String, Vec<String>>,
    /// Key risk indicators.
    #[serde(default)]
    pub kris: Vec<Kri>,
    /// Named risk scenarios.
    #[serde(default)]
    pub scenarios: Vec<RiskScenario>,
}

impl DomainKnowledge {
    /// Mitigations for a control: its family's list when one exists,
    /// otherwise the domain-wide list.
    pub fn mitigations_for(&self, control: &ControlId) -> &[String] {
        self.family_mitigations
            .get(control.family())
            .map(Vec::as_slice)
            .unwrap_or(&self.mitigations)
    }
}

#[derive(Debug, Deserialize)]
struct KnowledgeFile {
    version: String,
    domains: BTreeMap<Domain, DomainKnowledge>,
}

/// Validated risk knowledge base.
#[derive(Debug, Clone, Default)]
pub struct RiskKnowledgeBase {
    version: String,
    domains: BTreeMap<Domain, DomainKnowledge>,
}

impl RiskKnowledgeBase {
    /// Build a knowledge base, validating scenario ranges and ids.
    pub fn new(
        version: impl Into<String>,
        domains: BTreeMap<Domain, DomainKnowledge>,
    ) -> Result<Self, KnowledgeError> {
        let mut ids = BTreeSet::new();
        for scenario in domains.values().flat_map(|k| &k.scenarios) {
            for (field, value) in [("likelihood", scenario.likelihood), ("impact", scenario.impact)] {
                if !(1..=5).contains(&value) {
                    return Err(KnowledgeError::ScenarioOutOfRange {
                        scenario: scenario.id.clone(),
                        field,
                        value,
                    });
                }
            }
            if !ids.insert(scenario.id.as_str()) {
                return Err(KnowledgeError::DuplicateScenario(scenario.id.clone()));
            }
        }
        Ok(Self {
            version: version.into(),
            domains,
        })
    }

    /// Parse and validate a knowledge document.
    pub fn from_yaml_str(text: &str, origin: &Path) -> PackResult<Self> {
        let file: KnowledgeFile = parser::parse_yaml(text, origin)?;
        Ok(Self::new(file.version, file.domains)?)
    }

    /// Load and validate a knowledge file.
    pub fn load(path: &Path) -> PackResult<Self> {
        let file: KnowledgeFile = parser::read_yaml_file(path)?;
        Ok(Self::new(file.version, file.domains)?)
    }

    /// Knowledge base version pin.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Knowledge for `domain`, if any was supplied.
    pub fn domain(&self, domain: Domain) -> Option<&DomainKnowledge> {
        self.domains.get(&domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
version: "RKB-test"
domains:
  cyber:
    threat_actors: ["Cybercrime groups (ransomware)"]
    impact_categories: [Financial, Regulatory]
    mitigations: ["Governance framework"]
    family_mitigations:
      IAM: ["Phishing-resistant MFA", "PAM"]
    kris:
      - { name: "Mean Time to Detect (MTTD)", target: "< 4 hours", red_flag: "> 24 hours" }
    scenarios:
      - { id: CS-R01, name: Ransomware Attack, likelihood: 4, impact: 5, category: Malware }
"#;

    #[test]
    fn parses_and_resolves_family_mitigations() {
        let kb = RiskKnowledgeBase::from_yaml_str(DOC, Path::new("inline")).unwrap();
        assert_eq!(kb.version(), "RKB-test");
        let cyber = kb.domain(Domain::Cyber).unwrap();
        assert_eq!(cyber.scenarios[0].score(), 20);
        let iam = ControlId::new("IAM.01").unwrap();
        assert_eq!(cyber.mitigations_for(&iam)[0], "Phishing-resistant MFA");
        let gov = ControlId::new("GOV.01").unwrap();
        assert_eq!(cyber.mitigations_for(&gov), ["Governance framework".to_string()]);
        assert!(kb.domain(Domain::Ai).is_none());
    }

    #[test]
    fn rejects_out_of_range_scenarios() {
        let bad = DOC.replace("likelihood: 4", "likelihood: 9");
        let err = RiskKnowledgeBase::from_yaml_str(&bad, Path::new("inline")).unwrap_err();
        assert!(err.to_string().contains("likelihood 9"));
    }
}
