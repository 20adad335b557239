//! # Maturity Assessor
//!
//! Scores current maturity (0–5) for every in-scope control of the
//! compliance matrix from the organization's evidence answers.
//!
//! Answers can arrive against the control itself or against any
//! obligation that resolves to it. When several answers reach one control
//! and disagree, the lowest wins: the worst reported state governs. A
//! control with no answer at all defaults to 0 and is marked incomplete.
//!
//! ## Conflict Policy
//!
//! Minimum-wins is a conservative choice. Every contributing answer is
//! kept on the [`MaturityScore`] so a reviewer can see what was overruled.

use std::collections::BTreeMap;

use serde::Serialize;

use mizan_core::{
    ControlId, Domain, EvidenceAnswer, Maturity, MaturityLevel, ObligationRef, OrganizationProfile,
};
use mizan_pack::ControlTaxonomy;

use crate::matrix::ComplianceMatrix;

/// Where a current maturity value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturitySource {
    /// At least one evidence answer reached the control.
    Explicit,
    /// No answer; defaulted to 0.
    Defaulted,
}

/// What an answer was reported against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOrigin {
    /// Reported directly against the unified control.
    Control,
    /// Reported against a framework obligation mapped to the control.
    Obligation(ObligationRef),
}

/// One evidence answer that contributed to a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedAnswer {
    /// Answer origin.
    pub origin: AnswerOrigin,
    /// Reported maturity.
    pub maturity: Maturity,
    /// Whether evidence references were attached.
    pub substantiated: bool,
}

/// Current maturity for one unified control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaturityScore {
    /// The control.
    pub control: ControlId,
    /// Control domain.
    pub domain: Domain,
    /// Current maturity after conflict resolution.
    pub current: Maturity,
    /// Named level of `current`.
    pub level: MaturityLevel,
    /// Explicit or defaulted.
    pub source: MaturitySource,
    /// `true` when the score rests on an explicit answer.
    pub complete: bool,
    /// Every answer that reached this control.
    pub reported: Vec<ReportedAnswer>,
    /// Whether contributing answers disagreed.
    pub conflict: bool,
    /// Whether any contributing answer cites evidence.
    pub substantiated: bool,
}

/// Maturity scores for every in-scope control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MaturityAssessment {
    scores: BTreeMap<ControlId, MaturityScore>,
}

impl MaturityAssessment {
    /// Score for one control.
    pub fn get(&self, control: &ControlId) -> Option<&MaturityScore> {
        self.scores.get(control)
    }

    /// All scores in control order.
    pub fn iter(&self) -> impl Iterator<Item = &MaturityScore> {
        self.scores.values()
    }

    /// Number of scored controls.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether no control is in scope.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Fraction of controls with an explicit answer. `0.0` with no controls.
    pub fn completeness(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let explicit = self.scores.values().filter(|s| s.complete).count();
        explicit as f64 / self.scores.len() as f64
    }
}

fn reported(origin: AnswerOrigin, answer: &EvidenceAnswer) -> ReportedAnswer {
    ReportedAnswer {
        origin,
        maturity: answer.maturity,
        substantiated: answer.is_substantiated(),
    }
}

/// Score every in-scope control of `matrix`.
///
/// Controls outside the profile's selected domains are skipped.
pub fn assess_maturity(
    matrix: &ComplianceMatrix,
    profile: &OrganizationProfile,
    taxonomy: &ControlTaxonomy,
) -> MaturityAssessment {
    let mut scores = BTreeMap::new();

    for (control_id, obligations) in matrix.iter() {
        let Some(control) = taxonomy.get(control_id) else {
            continue;
        };
        if !profile.in_scope(control.domain) {
            continue;
        }

        let mut answers = Vec::new();
        if let Some(answer) = profile.control_evidence.get(control_id) {
            answers.push(reported(AnswerOrigin::Control, answer));
        }
        for obligation in obligations {
            if let Some(answer) = profile.obligation_evidence.get(obligation) {
                answers.push(reported(AnswerOrigin::Obligation(obligation.clone()), answer));
            }
        }

        let current = answers
            .iter()
            .map(|a| a.maturity)
            .min()
            .unwrap_or(Maturity::ZERO);
        let conflict = answers.iter().any(|a| a.maturity != current);
        if conflict {
            tracing::debug!(
                control = %control_id,
                answers = answers.len(),
                resolved = current.value(),
                "conflicting maturity answers; minimum applied"
            );
        }
        let complete = !answers.is_empty();

        scores.insert(
            control_id.clone(),
            MaturityScore {
                control: control_id.clone(),
                domain: control.domain,
                current,
                level: current.level(),
                source: if complete {
                    MaturitySource::Explicit
                } else {
                    MaturitySource::Defaulted
                },
                complete,
                substantiated: answers.iter().any(|a| a.substantiated),
                conflict,
                reported: answers,
            },
        );
    }

    let assessment = MaturityAssessment { scores };
    tracing::debug!(
        controls = assessment.len(),
        completeness = assessment.completeness(),
        "maturity assessed"
    );
    assessment
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use mizan_core::{Sector, SizeTier};
    use mizan_pack::FrameworkRegistry;

    use crate::matrix::build_matrix;

    const TAXONOMY: &str = r#"
version: t
controls:
  - { id: GOV.01, label: Governance, domain: cyber, keywords: [governance] }
  - { id: LOG.01, label: Logging, domain: cyber, keywords: [logging] }
  - { id: DATA.DQ.01, label: Quality, domain: data, keywords: [data_quality] }
"#;

    const FRAMEWORKS: &str = r#"
frameworks:
  - id: FW
    version: "1"
    authority: A
    domain: cyber
    obligations:
      - { id: O-1, text: t, mapping_hints: [governance] }
      - { id: O-2, text: t, mapping_hints: [GOV.01] }
      - { id: O-3, text: t, mapping_hints: [logging] }
      - { id: O-4, text: t, mapping_hints: [data_quality] }
"#;

    fn run(profile: &OrganizationProfile) -> MaturityAssessment {
        let tax = ControlTaxonomy::from_yaml_str(TAXONOMY, Path::new("t")).unwrap();
        let reg = FrameworkRegistry::from_yaml_str(FRAMEWORKS, Path::new("f")).unwrap();
        let fws: Vec<_> = reg.iter().collect();
        let matrix = build_matrix(&tax, &fws);
        assess_maturity(&matrix, profile, &tax)
    }

    fn profile() -> OrganizationProfile {
        OrganizationProfile::new(Sector::new("Banking").unwrap(), SizeTier::Large)
    }

    fn m(v: u8) -> Maturity {
        Maturity::new(v).unwrap()
    }

    fn cid(s: &str) -> ControlId {
        ControlId::new(s).unwrap()
    }

    #[test]
    fn conflicting_obligation_answers_take_minimum() {
        let mut p = profile();
        p.obligation_evidence
            .insert("FW/O-1".parse().unwrap(), EvidenceAnswer::new(m(3)));
        p.obligation_evidence
            .insert("FW/O-2".parse().unwrap(), EvidenceAnswer::new(m(1)));
        let a = run(&p);
        let gov = a.get(&cid("GOV.01")).unwrap();
        assert_eq!(gov.current, m(1));
        assert!(gov.conflict);
        assert_eq!(gov.reported.len(), 2);
        assert_eq!(gov.source, MaturitySource::Explicit);
    }

    #[test]
    fn control_answer_joins_the_minimum() {
        let mut p = profile();
        p.control_evidence
            .insert(cid("GOV.01"), EvidenceAnswer::new(m(4)).with_references(["policy.pdf"]));
        p.obligation_evidence
            .insert("FW/O-1".parse().unwrap(), EvidenceAnswer::new(m(2)));
        let gov = run(&p).get(&cid("GOV.01")).cloned().unwrap();
        assert_eq!(gov.current, m(2));
        assert!(gov.substantiated);
        assert_eq!(gov.reported[0].origin, AnswerOrigin::Control);
    }

    #[test]
    fn missing_answer_defaults_to_zero_incomplete() {
        let mut p = profile();
        p.control_evidence.insert(cid("GOV.01"), EvidenceAnswer::new(m(3)));
        let a = run(&p);
        let log = a.get(&cid("LOG.01")).unwrap();
        assert_eq!(log.current, Maturity::ZERO);
        assert_eq!(log.level, MaturityLevel::NonExistent);
        assert!(!log.complete);
        assert_eq!(log.source, MaturitySource::Defaulted);
        assert!(!log.conflict);
        assert!((a.completeness() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_scope_domains_skipped() {
        let mut p = profile();
        p.domains.insert(Domain::Data);
        let a = run(&p);
        assert_eq!(a.len(), 1);
        assert!(a.get(&cid("DATA.DQ.01")).is_some());
    }

    #[test]
    fn agreeing_answers_are_not_a_conflict() {
        let mut p = profile();
        p.control_evidence.insert(cid("GOV.01"), EvidenceAnswer::new(m(2)));
        p.obligation_evidence
            .insert("FW/O-2".parse().unwrap(), EvidenceAnswer::new(m(2)));
        assert!(!run(&p).get(&cid("GOV.01")).unwrap().conflict);
    }
}
