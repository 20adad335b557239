//! # Unified Taxonomy Mapper
//!
//! Resolves every obligation of the selected frameworks onto the unified
//! control taxonomy and builds the [`ComplianceMatrix`]: for each control,
//! the set of `(framework, obligation)` pairs that reach it.
//!
//! Resolution is many-to-many. A control-id hint maps exactly; a keyword
//! hint maps to every control whose keyword set contains it. An obligation
//! none of whose hints resolve is collected as unmapped. The run continues
//! and the report flags reduced coverage.
//!
//! The matrix is a pure function of (taxonomy, selected frameworks):
//! ordered collections throughout, no randomness, no I/O.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use mizan_core::{ControlId, FrameworkId, ObligationRef};
use mizan_pack::{ControlTaxonomy, Framework, MappingHint, Obligation};

/// A selected framework, pinned by version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct FrameworkRef {
    /// Framework identifier.
    pub id: FrameworkId,
    /// Version pin.
    pub version: String,
}

/// Mapping from unified control to the obligations that resolve to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceMatrix {
    frameworks: Vec<FrameworkRef>,
    entries: BTreeMap<ControlId, BTreeSet<ObligationRef>>,
    unmapped: BTreeSet<ObligationRef>,
    obligation_count: usize,
}

/// Serializable summary of a [`ComplianceMatrix`] for the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixSummary {
    /// Frameworks the matrix was built from.
    pub frameworks: Vec<FrameworkRef>,
    /// Control → obligations.
    pub controls: BTreeMap<ControlId, BTreeSet<ObligationRef>>,
    /// Obligations in scope.
    pub obligations: usize,
    /// Obligations that resolved to at least one control.
    pub mapped: usize,
    /// Obligations with no resolvable hint.
    pub unmapped: Vec<ObligationRef>,
    /// `mapped / obligations`.
    pub coverage: f64,
}

impl ComplianceMatrix {
    /// Frameworks the matrix was built from.
    pub fn frameworks(&self) -> &[FrameworkRef] {
        &self.frameworks
    }

    /// Controls reached by at least one obligation, in id order.
    pub fn controls(&self) -> impl Iterator<Item = &ControlId> {
        self.entries.keys()
    }

    /// Obligations resolving to `control`.
    pub fn obligations_for(&self, control: &ControlId) -> Option<&BTreeSet<ObligationRef>> {
        self.entries.get(control)
    }

    /// Control → obligations pairs, in control order.
    pub fn iter(&self) -> impl Iterator<Item = (&ControlId, &BTreeSet<ObligationRef>)> {
        self.entries.iter()
    }

    /// Whether `obligation` appears under any control.
    pub fn is_mapped(&self, obligation: &ObligationRef) -> bool {
        self.entries.values().any(|obs| obs.contains(obligation))
    }

    /// Obligations with zero resolvable hints.
    pub fn unmapped(&self) -> impl Iterator<Item = &ObligationRef> {
        self.unmapped.iter()
    }

    /// Number of obligations considered.
    pub fn obligation_count(&self) -> usize {
        self.obligation_count
    }

    /// Number of distinct controls reached.
    pub fn control_count(&self) -> usize {
        self.entries.len()
    }

    /// Mapping coverage ratio: `1 - unmapped / obligations`. `1.0` when no
    /// obligations were considered.
    pub fn coverage(&self) -> f64 {
        if self.obligation_count == 0 {
            return 1.0;
        }
        1.0 - self.unmapped.len() as f64 / self.obligation_count as f64
    }

    /// Report summary.
    pub fn summary(&self) -> MatrixSummary {
        MatrixSummary {
            frameworks: self.frameworks.clone(),
            controls: self.entries.clone(),
            obligations: self.obligation_count,
            mapped: self.obligation_count - self.unmapped.len(),
            unmapped: self.unmapped.iter().cloned().collect(),
            coverage: self.coverage(),
        }
    }
}

/// Controls an obligation's hints resolve to.
pub fn resolve_obligation(taxonomy: &ControlTaxonomy, obligation: &Obligation) -> BTreeSet<ControlId> {
    let mut controls = BTreeSet::new();
    for hint in &obligation.mapping_hints {
        match hint {
            MappingHint::Control(id) => {
                if taxonomy.contains(id) {
                    controls.insert(id.clone());
                }
            }
            MappingHint::Keyword(keyword) => {
                controls.extend(taxonomy.by_keyword(keyword).map(|c| c.id.clone()));
            }
        }
    }
    controls
}

/// Build the compliance matrix for the selected frameworks.
pub fn build_matrix(taxonomy: &ControlTaxonomy, frameworks: &[&Framework]) -> ComplianceMatrix {
    let mut entries: BTreeMap<ControlId, BTreeSet<ObligationRef>> = BTreeMap::new();
    let mut unmapped = BTreeSet::new();
    let mut obligation_count = 0;

    for fw in frameworks {
        for obligation in &fw.obligations {
            obligation_count += 1;
            let reference = fw.reference(obligation);
            let controls = resolve_obligation(taxonomy, obligation);
            if controls.is_empty() {
                tracing::warn!(
                    obligation = %reference,
                    hints = obligation.mapping_hints.len(),
                    "obligation has no resolvable mapping hint"
                );
                unmapped.insert(reference);
                continue;
            }
            for control in controls {
                entries.entry(control).or_default().insert(reference.clone());
            }
        }
    }

    let mut refs: Vec<FrameworkRef> = frameworks
        .iter()
        .map(|fw| FrameworkRef {
            id: fw.id.clone(),
            version: fw.version.clone(),
        })
        .collect();
    refs.sort();
    refs.dedup();

    tracing::debug!(
        frameworks = refs.len(),
        obligations = obligation_count,
        controls = entries.len(),
        unmapped = unmapped.len(),
        "compliance matrix built"
    );

    ComplianceMatrix {
        frameworks: refs,
        entries,
        unmapped,
        obligation_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use mizan_pack::FrameworkRegistry;

    const TAXONOMY: &str = r#"
version: t
controls:
  - { id: GOV.01, label: Governance, domain: cyber, keywords: [governance, policy] }
  - { id: IAM.01, label: IAM, domain: cyber, keywords: [iam, access] }
  - { id: DATA.GOV.01, label: Data governance, domain: data, keywords: [stewardship, access] }
"#;

    const FRAMEWORKS: &str = r#"
frameworks:
  - id: FW_A
    version: "1"
    authority: A
    domain: cyber
    obligations:
      - { id: A-1, text: t, mapping_hints: [GOV.01] }
      - { id: A-2, text: t, mapping_hints: [access] }
      - { id: A-3, text: t, mapping_hints: [quantum] }
  - id: FW_B
    version: "2"
    authority: B
    domain: data
    obligations:
      - { id: B-1, text: t, mapping_hints: [policy, stewardship] }
"#;

    fn fixture() -> (ControlTaxonomy, FrameworkRegistry) {
        (
            ControlTaxonomy::from_yaml_str(TAXONOMY, Path::new("t")).unwrap(),
            FrameworkRegistry::from_yaml_str(FRAMEWORKS, Path::new("f")).unwrap(),
        )
    }

    fn cid(s: &str) -> ControlId {
        ControlId::new(s).unwrap()
    }

    fn oref(s: &str) -> ObligationRef {
        s.parse().unwrap()
    }

    #[test]
    fn many_to_many_resolution() {
        let (tax, reg) = fixture();
        let fws: Vec<_> = reg.iter().collect();
        let m = build_matrix(&tax, &fws);

        let iam = m.obligations_for(&cid("IAM.01")).unwrap();
        let data = m.obligations_for(&cid("DATA.GOV.01")).unwrap();
        assert!(iam.contains(&oref("FW_A/A-2")));
        assert!(data.contains(&oref("FW_A/A-2")));
        assert!(data.contains(&oref("FW_B/B-1")));
        let gov = m.obligations_for(&cid("GOV.01")).unwrap();
        assert_eq!(gov.len(), 2);
    }

    #[test]
    fn unresolvable_obligation_is_unmapped_and_absent() {
        let (tax, reg) = fixture();
        let fws: Vec<_> = reg.iter().collect();
        let m = build_matrix(&tax, &fws);
        let unmapped: Vec<_> = m.unmapped().cloned().collect();
        assert_eq!(unmapped, vec![oref("FW_A/A-3")]);
        assert!(!m.is_mapped(&oref("FW_A/A-3")));
        assert_eq!(m.obligation_count(), 4);
        assert!((m.coverage() - 0.75).abs() < 1e-9);

        let summary = m.summary();
        assert_eq!(summary.mapped, 3);
        assert_eq!(summary.frameworks.len(), 2);
    }

    #[test]
    fn deterministic_regardless_of_selection_order() {
        let (tax, reg) = fixture();
        let mut fws: Vec<_> = reg.iter().collect();
        let a = build_matrix(&tax, &fws);
        fws.reverse();
        let b = build_matrix(&tax, &fws);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_selection_has_full_coverage() {
        let (tax, _) = fixture();
        let m = build_matrix(&tax, &[]);
        assert_eq!(m.control_count(), 0);
        assert_eq!(m.coverage(), 1.0);
    }
}
