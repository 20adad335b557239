//! End-to-end assessments against the built-in catalogue.

use std::sync::Arc;

use mizan_core::{ControlId, Domain, EvidenceAnswer, FrameworkId, Maturity, OrganizationProfile, Sector, SizeTier};
use mizan_engine::{
    Annotation, AssessmentEngine, AssessmentError, AssessmentRequest, EngineConfig,
    InvalidAssessmentRequest, ReportSection, UrgencyTier,
};
use mizan_pack::Catalogue;

fn engine() -> AssessmentEngine {
    let catalogue = Catalogue::builtin().expect("builtin catalogue is valid");
    AssessmentEngine::new(Arc::new(catalogue), EngineConfig::default()).unwrap()
}

fn cid(s: &str) -> ControlId {
    ControlId::new(s).unwrap()
}

fn fw(s: &str) -> FrameworkId {
    FrameworkId::new(s).unwrap()
}

fn m(v: u8) -> Maturity {
    Maturity::new(v).unwrap()
}

fn banking_large(evidence: &[(&str, u8)]) -> OrganizationProfile {
    let mut p = OrganizationProfile::new(Sector::new("Banking").unwrap(), SizeTier::Large);
    for (id, v) in evidence {
        p.control_evidence.insert(cid(id), EvidenceAnswer::new(m(*v)));
    }
    p
}

#[test]
fn banking_large_against_nca_ecc() {
    let request = AssessmentRequest::new(
        banking_large(&[("GOV.01", 2), ("RSK.03", 4)]),
        [fw("KSA_NCA_ECC")],
    );
    let report = engine().assess(&request).unwrap();

    let gov = report.gaps.get(&cid("GOV.01")).unwrap();
    assert_eq!(gov.target, m(3));
    assert_eq!(gov.gap, 1);
    assert_eq!(report.gaps.get(&cid("RSK.03")).unwrap().gap, 0);

    let gov_risk = report.risks.iter().find(|r| r.control == cid("GOV.01")).unwrap();
    assert_eq!(gov_risk.tier, UrgencyTier::LongTerm);
    assert!(gov_risk.severity < 2.0);
    assert!(!gov_risk.threat_actors.is_empty());
    assert!(!gov_risk.kris.is_empty());
    assert!(report.risks.iter().all(|r| r.control != cid("RSK.03")));
    assert!(report.risks.iter().all(|r| r.severity > 0.0));

    assert!(!report.benchmark_fallback);
    let cyber = &report.benchmarks.positions[0];
    assert_eq!(cyber.domain, Domain::Cyber);
    assert_eq!(cyber.segment, "Banking/large/cyber");

    assert!(report.matrix.unmapped.is_empty());
    assert_eq!(report.taxonomy_version, "UCT-2025.1");
    assert_eq!(report.benchmark_version, "BM-2025.1");
    assert!(report.cost.total.low > 0.0);
    assert!(report.cost.total.low <= report.cost.total.high);
    assert_eq!(report.cost.currency, "SAR");
}

#[test]
fn unanswered_controls_become_immediate_risks_first() {
    let request = AssessmentRequest::new(
        banking_large(&[("GOV.01", 2), ("RSK.03", 4)]),
        [fw("KSA_NCA_ECC")],
    );
    let report = engine().assess(&request).unwrap();
    let log = report.maturity.get(&cid("LOG.01")).unwrap();
    assert!(!log.complete);
    assert_eq!(report.risks[0].tier, UrgencyTier::Immediate);
    assert_eq!(report.risks.last().unwrap().control, cid("GOV.01"));
    assert!(report.confidence_inputs.evidence_completeness < 1.0);
}

#[test]
fn conflicting_obligation_answers_resolve_to_minimum() {
    let mut profile = banking_large(&[]);
    profile
        .obligation_evidence
        .insert("KSA_NCA_ECC/ECC-GOV-01".parse().unwrap(), EvidenceAnswer::new(m(3)));
    profile
        .obligation_evidence
        .insert("KSA_SAMA_CSF/SAMA-GOV-01".parse().unwrap(), EvidenceAnswer::new(m(1)));
    let report = engine()
        .assess(&AssessmentRequest::new(profile, [fw("KSA_NCA_ECC"), fw("KSA_SAMA_CSF")]))
        .unwrap();

    let gov = report.maturity.get(&cid("GOV.01")).unwrap();
    assert_eq!(gov.current, m(1));
    assert!(gov.conflict);
    assert!(report.annotations.contains(&Annotation::MaturityConflict {
        control: cid("GOV.01"),
        values: vec![m(3), m(1)],
        resolved: m(1),
    }));
    // SAMA-GOV-01 raises the target above the floor.
    assert_eq!(report.gaps.get(&cid("GOV.01")).unwrap().target, m(4));
}

#[test]
fn global_domain_has_no_benchmark() {
    let request = AssessmentRequest::new(
        banking_large(&[("GLB.ISMS.01", 2)]),
        [fw("ISO27001_2022")],
    );
    let report = engine().assess(&request).unwrap();
    assert!(report.benchmarks.unavailable.contains(&Domain::Global));
    assert!(report
        .annotations
        .iter()
        .any(|a| matches!(a, Annotation::BenchmarkUnavailable { domain: Domain::Global, .. })));
}

#[test]
fn sector_wide_fallback_is_flagged() {
    let mut profile = banking_large(&[("GOV.01", 3)]);
    profile.size = SizeTier::Small;
    let report = engine()
        .assess(&AssessmentRequest::new(profile, [fw("KSA_NCA_ECC")]))
        .unwrap();
    assert!(report.benchmark_fallback);
    let benchmarks = report.confidence_for(ReportSection::Benchmarks).unwrap().score;
    let gaps = report.confidence_for(ReportSection::Gaps).unwrap().score;
    assert!(benchmarks < gaps);
}

#[test]
fn domain_scope_limits_scoring_but_not_matrix() {
    let mut profile = banking_large(&[("DATA.GOV.01", 3)]);
    profile.domains.insert(Domain::Data);
    let report = engine()
        .assess(&AssessmentRequest::new(profile, [fw("KSA_NCA_ECC"), fw("KSA_NDMO")]))
        .unwrap();
    assert!(report.maturity.iter().all(|s| s.domain == Domain::Data));
    assert!(report.matrix.controls.contains_key(&cid("GOV.01")));
    assert!(report.gaps.domain(Domain::Cyber).is_none());
}

#[test]
fn invalid_requests_rejected() {
    let engine = engine();
    let bare = OrganizationProfile::new(Sector::new("Banking").unwrap(), SizeTier::Large);
    assert!(matches!(
        engine.assess(&AssessmentRequest::new(bare, [fw("KSA_NCA_ECC")])),
        Err(AssessmentError::Invalid(InvalidAssessmentRequest::NoEvidence))
    ));
    assert!(matches!(
        engine.assess(&AssessmentRequest::new(banking_large(&[("GOV.01", 1)]), Vec::new())),
        Err(AssessmentError::Invalid(InvalidAssessmentRequest::NoFrameworks))
    ));
}

#[test]
fn identical_requests_produce_identical_reports() {
    let engine = engine();
    let request = AssessmentRequest::new(
        banking_large(&[("GOV.01", 2), ("IAM.01", 1), ("DATA.GOV.01", 4)]),
        [fw("KSA_SAMA_CSF"), fw("KSA_NDMO"), fw("NIST_AI_RMF_1_0")],
    );
    let a = engine.assess(&request).unwrap();
    let b = engine.assess(&request).unwrap();
    assert_eq!(a.request_digest, b.request_digest);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn concurrent_runs_share_one_engine() {
    let engine = Arc::new(engine());
    let handles: Vec<_> = (0..4u8)
        .map(|v| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                let request = AssessmentRequest::new(banking_large(&[("GOV.01", v)]), [fw("KSA_NCA_ECC")]);
                engine.assess(&request).map(|r| r.gaps.get(&cid("GOV.01")).map(|g| g.gap))
            })
        })
        .collect();
    let gaps: Vec<_> = handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect();
    assert_eq!(gaps, vec![Some(3), Some(2), Some(1), Some(0)]);
}

#[test]
fn narrative_brief_lists_open_gaps_only() {
    let report = engine()
        .assess(&AssessmentRequest::new(
            banking_large(&[("GOV.01", 2), ("RSK.03", 4)]),
            [fw("KSA_NCA_ECC")],
        ))
        .unwrap();
    let brief = report.narrative_brief();
    assert_eq!(brief.sector.as_str(), "Banking");
    assert!(brief.controls.contains(&cid("RSK.03")));
    assert!(brief.gaps.iter().all(|g| g.gap > 0));
    assert!(brief.gaps.iter().all(|g| g.control != cid("RSK.03")));
    assert_eq!(brief.risks.len(), report.risks.len());
}
