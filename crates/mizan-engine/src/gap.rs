//! # Gap Analyzer
//!
//! Computes, for every scored control, the shortfall between current and
//! target maturity, then aggregates per domain and overall.
//!
//! - Target = max(configured floor, highest target declared by any
//!   contributing framework or obligation).
//! - Gap = max(0, target − current), so always within 0..=5.
//! - Domain aggregates are unweighted means over the domain's controls.
//! - The overall gap is the control-count-weighted mean across domains
//!   actually in scope. A domain with no controls is absent, never zero.

use std::collections::BTreeMap;

use serde::Serialize;

use mizan_core::{ControlId, Domain, Maturity, ObligationRef};
use mizan_pack::Framework;

use crate::maturity::MaturityAssessment;
use crate::matrix::ComplianceMatrix;

/// Shortfall for one control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gap {
    /// The control.
    pub control: ControlId,
    /// Control domain.
    pub domain: Domain,
    /// Current maturity.
    pub current: Maturity,
    /// Target maturity.
    pub target: Maturity,
    /// `max(0, target - current)`.
    pub gap: u8,
    /// Obligations that reach this control.
    pub contributing: Vec<ObligationRef>,
}

/// Aggregate for one domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainGapSummary {
    /// Domain.
    pub domain: Domain,
    /// Number of in-scope controls.
    pub controls: usize,
    /// Mean current maturity.
    pub mean_current: f64,
    /// Mean target maturity.
    pub mean_target: f64,
    /// Mean gap (unweighted).
    pub mean_gap: f64,
    /// Sum of gap points.
    pub total_gap: u32,
}

/// Output of the gap analyzer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapAnalysis {
    /// Per-control gaps in control order, zero gaps included.
    pub gaps: Vec<Gap>,
    /// Per-domain aggregates in canonical domain order.
    pub domains: Vec<DomainGapSummary>,
    /// Control-weighted mean gap across in-scope domains; `None` when no
    /// control is in scope.
    pub overall_gap: Option<f64>,
}

impl GapAnalysis {
    /// Gap for one control.
    pub fn get(&self, control: &ControlId) -> Option<&Gap> {
        self.gaps.iter().find(|g| &g.control == control)
    }

    /// Aggregate for one domain.
    pub fn domain(&self, domain: Domain) -> Option<&DomainGapSummary> {
        self.domains.iter().find(|d| d.domain == domain)
    }

    /// Gaps with a non-zero shortfall.
    pub fn open(&self) -> impl Iterator<Item = &Gap> {
        self.gaps.iter().filter(|g| g.gap > 0)
    }
}

/// Effective target for a control.
pub fn target_for(
    floor: Maturity,
    contributing: &[ObligationRef],
    declared: &BTreeMap<ObligationRef, Maturity>,
) -> Maturity {
    contributing
        .iter()
        .filter_map(|r| declared.get(r).copied())
        .fold(floor, Maturity::max)
}

/// Targets each selected obligation declares, directly or via its framework.
pub fn declared_targets(frameworks: &[&Framework]) -> BTreeMap<ObligationRef, Maturity> {
    let mut out = BTreeMap::new();
    for fw in frameworks {
        for ob in &fw.obligations {
            if let Some(target) = fw.declared_target(ob) {
                out.insert(fw.reference(ob), target);
            }
        }
    }
    out
}

fn mean(sum: f64, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Compute gaps and aggregates.
pub fn analyze_gaps(
    assessment: &MaturityAssessment,
    matrix: &ComplianceMatrix,
    frameworks: &[&Framework],
    floor: Maturity,
) -> GapAnalysis {
    let declared = declared_targets(frameworks);

    let gaps: Vec<Gap> = assessment
        .iter()
        .map(|score| {
            let contributing: Vec<ObligationRef> = matrix
                .obligations_for(&score.control)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default();
            let target = target_for(floor, &contributing, &declared);
            Gap {
                control: score.control.clone(),
                domain: score.domain,
                current: score.current,
                target,
                gap: score.current.shortfall_to(target),
                contributing,
            }
        })
        .collect();

    let mut by_domain: BTreeMap<Domain, Vec<&Gap>> = BTreeMap::new();
    for gap in &gaps {
        by_domain.entry(gap.domain).or_default().push(gap);
    }

    let domains: Vec<DomainGapSummary> = by_domain
        .into_iter()
        .map(|(domain, items)| {
            let n = items.len();
            let total_gap: u32 = items.iter().map(|g| u32::from(g.gap)).sum();
            DomainGapSummary {
                domain,
                controls: n,
                mean_current: mean(items.iter().map(|g| f64::from(g.current.value())).sum(), n),
                mean_target: mean(items.iter().map(|g| f64::from(g.target.value())).sum(), n),
                mean_gap: mean(f64::from(total_gap), n),
                total_gap,
            }
        })
        .collect();

    let controls: usize = domains.iter().map(|d| d.controls).sum();
    let overall_gap = (controls > 0).then(|| {
        let weighted: f64 = domains.iter().map(|d| d.mean_gap * d.controls as f64).sum();
        weighted / controls as f64
    });

    tracing::debug!(
        controls,
        open = gaps.iter().filter(|g| g.gap > 0).count(),
        overall = overall_gap.unwrap_or(0.0),
        "gaps analyzed"
    );

    GapAnalysis {
        gaps,
        domains,
        overall_gap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use mizan_core::{EvidenceAnswer, OrganizationProfile, Sector, SizeTier};
    use mizan_pack::{ControlTaxonomy, FrameworkRegistry};
    use proptest::prelude::*;

    use crate::maturity::assess_maturity;
    use crate::matrix::build_matrix;

    const TAXONOMY: &str = r#"
version: t
controls:
  - { id: GOV.01, label: Governance, domain: cyber, keywords: [governance] }
  - { id: TPRM.01, label: Third party, domain: cyber, keywords: [third_party] }
  - { id: DATA.DQ.01, label: Quality, domain: data, keywords: [data_quality] }
"#;

    const FRAMEWORKS: &str = r#"
frameworks:
  - id: STRICT
    version: "1"
    authority: A
    domain: cyber
    target_maturity: 3
    obligations:
      - { id: S-1, text: t, mapping_hints: [governance], target_maturity: 4 }
      - { id: S-2, text: t, mapping_hints: [third_party] }
  - id: DATA
    version: "1"
    authority: B
    domain: data
    obligations:
      - { id: D-1, text: t, mapping_hints: [data_quality] }
"#;

    fn m(v: u8) -> Maturity {
        Maturity::new(v).unwrap()
    }

    fn cid(s: &str) -> ControlId {
        ControlId::new(s).unwrap()
    }

    fn run(evidence: &[(&str, u8)]) -> GapAnalysis {
        let tax = ControlTaxonomy::from_yaml_str(TAXONOMY, Path::new("t")).unwrap();
        let reg = FrameworkRegistry::from_yaml_str(FRAMEWORKS, Path::new("f")).unwrap();
        let fws: Vec<_> = reg.iter().collect();
        let matrix = build_matrix(&tax, &fws);
        let mut profile = OrganizationProfile::new(Sector::new("Energy").unwrap(), SizeTier::Small);
        for (id, v) in evidence {
            profile.control_evidence.insert(cid(id), EvidenceAnswer::new(m(*v)));
        }
        let assessment = assess_maturity(&matrix, &profile, &tax);
        analyze_gaps(&assessment, &matrix, &fws, Maturity::DEFINED)
    }

    #[test]
    fn stricter_obligation_target_wins() {
        let a = run(&[("GOV.01", 2), ("TPRM.01", 3), ("DATA.DQ.01", 5)]);
        let gov = a.get(&cid("GOV.01")).unwrap();
        assert_eq!(gov.target, m(4));
        assert_eq!(gov.gap, 2);
        let tprm = a.get(&cid("TPRM.01")).unwrap();
        assert_eq!(tprm.target, m(3));
        assert_eq!(tprm.gap, 0);
    }

    #[test]
    fn gap_clamped_at_zero() {
        let a = run(&[("DATA.DQ.01", 5)]);
        assert_eq!(a.get(&cid("DATA.DQ.01")).unwrap().gap, 0);
    }

    #[test]
    fn domain_means_and_weighted_overall() {
        let a = run(&[("GOV.01", 2), ("TPRM.01", 1), ("DATA.DQ.01", 3)]);
        let cyber = a.domain(Domain::Cyber).unwrap();
        assert_eq!(cyber.controls, 2);
        assert_eq!(cyber.total_gap, 4);
        assert!((cyber.mean_gap - 2.0).abs() < 1e-9);
        assert!((cyber.mean_current - 1.5).abs() < 1e-9);
        let data = a.domain(Domain::Data).unwrap();
        assert_eq!(data.total_gap, 0);
        // (2 controls × 2.0 + 1 control × 0.0) / 3
        assert!((a.overall_gap.unwrap() - 4.0 / 3.0).abs() < 1e-9);
        assert!(a.domain(Domain::Ai).is_none());
        assert_eq!(a.open().count(), 2);
    }

    #[test]
    fn no_controls_means_no_overall() {
        let a = analyze_gaps(
            &MaturityAssessment::default(),
            &build_matrix(
                &ControlTaxonomy::from_yaml_str(TAXONOMY, Path::new("t")).unwrap(),
                &[],
            ),
            &[],
            Maturity::DEFINED,
        );
        assert!(a.overall_gap.is_none());
        assert!(a.domains.is_empty());
    }

    proptest! {
        #[test]
        fn gap_is_bounded(current in 0u8..=5, target in 0u8..=5) {
            let g = m(current).shortfall_to(m(target));
            prop_assert!(g <= 5);
            prop_assert_eq!(g, target.saturating_sub(current));
        }

        #[test]
        fn target_never_below_floor(floor in 0u8..=5, declared in proptest::collection::vec(0u8..=5, 0..4)) {
            let refs: Vec<ObligationRef> = (0..declared.len())
                .map(|i| format!("FW/O-{i}").parse().unwrap())
                .collect();
            let map: BTreeMap<_, _> = refs.iter().cloned().zip(declared.iter().map(|v| m(*v))).collect();
            let t = target_for(m(floor), &refs, &map);
            prop_assert!(t >= m(floor));
            prop_assert!(declared.iter().all(|v| m(*v) <= t));
        }
    }
}
