//! # Confidence Scorer
//!
//! Rates each report section on a 0–100 scale from:
//!
//! - the evidence completeness ratio (controls with an explicit answer),
//! - the mapping coverage ratio (`1 − unmapped / obligations`),
//! - when generated text is attached to the section, the reliability the
//!   text-generation collaborator reported for it.
//!
//! ```text
//! score = 100 × (w_e·evidence + w_c·coverage + w_g·generated)
//!             / (w_e + w_c + w_g·[generated present])
//! ```
//!
//! The benchmark section is additionally multiplied by the fallback
//! penalty when any position came from a sector-wide distribution.
//! Confidence is informational; it never blocks report assembly.

use serde::{Deserialize, Serialize};

use crate::config::ConfidenceWeights;

/// A section of the assessment report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    /// Compliance matrix summary.
    Matrix,
    /// Maturity scores.
    Maturity,
    /// Gap analysis.
    Gaps,
    /// Risk register.
    Risks,
    /// Benchmark positions.
    Benchmarks,
    /// Cost estimate.
    Cost,
    /// Generated narrative.
    Narrative,
}

impl ReportSection {
    /// Every section in report order.
    pub fn all() -> &'static [ReportSection] {
        &[
            Self::Matrix,
            Self::Maturity,
            Self::Gaps,
            Self::Risks,
            Self::Benchmarks,
            Self::Cost,
            Self::Narrative,
        ]
    }

    /// Snake-case name, matching serde.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matrix => "matrix",
            Self::Maturity => "maturity",
            Self::Gaps => "gaps",
            Self::Risks => "risks",
            Self::Benchmarks => "benchmarks",
            Self::Cost => "cost",
            Self::Narrative => "narrative",
        }
    }
}

impl std::fmt::Display for ReportSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run-wide inputs shared by every section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInputs {
    /// Fraction of in-scope controls with an explicit answer.
    pub evidence_completeness: f64,
    /// Fraction of obligations that resolved to a control.
    pub mapping_coverage: f64,
    /// Whether any benchmark position used a fallback distribution.
    pub benchmark_fallback: bool,
}

/// Confidence for one section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectionConfidence {
    /// Section.
    pub section: ReportSection,
    /// Score in 0..=100.
    pub score: f64,
    /// Collaborator-reported reliability, when generated text is attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_reliability: Option<f64>,
}

fn ratio(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Weighted-average confidence on the 0–100 scale.
pub fn confidence_score(
    weights: &ConfidenceWeights,
    evidence: f64,
    coverage: f64,
    generated: Option<f64>,
) -> f64 {
    let mut numerator = weights.evidence * ratio(evidence) + weights.coverage * ratio(coverage);
    let mut denominator = weights.evidence + weights.coverage;
    if let Some(g) = generated {
        numerator += weights.generated * ratio(g);
        denominator += weights.generated;
    }
    if denominator <= 0.0 {
        return 0.0;
    }
    (100.0 * numerator / denominator).clamp(0.0, 100.0)
}

/// Score one section.
pub fn score_section(
    section: ReportSection,
    inputs: &ConfidenceInputs,
    generated: Option<f64>,
    weights: &ConfidenceWeights,
) -> SectionConfidence {
    let generated = generated.map(ratio);
    let mut score = confidence_score(
        weights,
        inputs.evidence_completeness,
        inputs.mapping_coverage,
        generated,
    );
    if section == ReportSection::Benchmarks && inputs.benchmark_fallback {
        score *= weights.fallback_penalty;
    }
    SectionConfidence {
        section,
        score,
        generated_reliability: generated,
    }
}

/// Score every section with no generated text attached.
pub fn score_sections(inputs: &ConfidenceInputs, weights: &ConfidenceWeights) -> Vec<SectionConfidence> {
    ReportSection::all()
        .iter()
        .map(|&section| score_section(section, inputs, None, weights))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn inputs(evidence: f64, coverage: f64, fallback: bool) -> ConfidenceInputs {
        ConfidenceInputs {
            evidence_completeness: evidence,
            mapping_coverage: coverage,
            benchmark_fallback: fallback,
        }
    }

    #[test]
    fn full_evidence_and_coverage_is_one_hundred() {
        let w = ConfidenceWeights::default();
        assert!((confidence_score(&w, 1.0, 1.0, None) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_average_without_generated_text() {
        let w = ConfidenceWeights::default();
        // (0.5 × 0.5 + 0.3 × 1.0) / 0.8 = 0.6875
        assert!((confidence_score(&w, 0.5, 1.0, None) - 68.75).abs() < 1e-9);
    }

    #[test]
    fn generated_reliability_joins_the_average() {
        let w = ConfidenceWeights::default();
        // (0.5 × 1 + 0.3 × 1 + 0.2 × 0) / 1.0
        assert!((confidence_score(&w, 1.0, 1.0, Some(0.0)) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn benchmark_penalty_only_applies_to_benchmarks() {
        let w = ConfidenceWeights::default();
        let sections = score_sections(&inputs(1.0, 1.0, true), &w);
        assert_eq!(sections.len(), ReportSection::all().len());
        for s in &sections {
            if s.section == ReportSection::Benchmarks {
                assert!((s.score - 85.0).abs() < 1e-9);
            } else {
                assert!((s.score - 100.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn out_of_range_reliability_is_clamped() {
        let w = ConfidenceWeights::default();
        let s = score_section(ReportSection::Narrative, &inputs(1.0, 1.0, false), Some(1.7), &w);
        assert_eq!(s.generated_reliability, Some(1.0));
        assert!((s.score - 100.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn monotonic_in_evidence_completeness(
            a in 0.0f64..=1.0,
            b in 0.0f64..=1.0,
            coverage in 0.0f64..=1.0,
            generated in proptest::option::of(0.0f64..=1.0),
        ) {
            let w = ConfidenceWeights::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let s_lo = confidence_score(&w, lo, coverage, generated);
            let s_hi = confidence_score(&w, hi, coverage, generated);
            prop_assert!(s_lo <= s_hi + 1e-9);
            prop_assert!((0.0..=100.0).contains(&s_hi));
        }
    }
}
