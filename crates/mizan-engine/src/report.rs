//! # Assessment Report
//!
//! The immutable value an assessment run returns. It carries every stage's
//! output together with the catalogue versions used, the request digest,
//! per-section confidence, and the non-fatal annotations collected during
//! the run.
//!
//! ## Annotations
//!
//! Degraded-precision conditions never abort a run. They are recorded as
//! [`Annotation`]s so a caller always receives a best-effort result:
//! unmapped obligations, benchmark fallbacks, missing benchmark data,
//! conflicting maturity answers, and unsubstantiated claims.

use serde::Serialize;

use mizan_core::{ContentDigest, ControlId, Domain, Maturity, ObligationRef, Sector, SizeTier};

use crate::benchmark::BenchmarkComparison;
use crate::confidence::{score_section, ConfidenceInputs, ReportSection, SectionConfidence};
use crate::config::ConfidenceWeights;
use crate::cost::CostEstimate;
use crate::gap::GapAnalysis;
use crate::matrix::{FrameworkRef, MatrixSummary};
use crate::maturity::MaturityAssessment;
use crate::risk::{RiskEntry, UrgencyTier};

// ---------------------------------------------------------------------------
// Annotations
// ---------------------------------------------------------------------------

/// A non-fatal condition surfaced in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// An obligation with no resolvable mapping hint.
    UnmappedObligation {
        /// The obligation.
        obligation: ObligationRef,
    },
    /// A benchmark position taken from the sector-wide distribution.
    BenchmarkFallback {
        /// Domain.
        domain: Domain,
        /// Segment actually used.
        segment: String,
    },
    /// No benchmark data for the organization's sector in a domain.
    BenchmarkUnavailable {
        /// Domain.
        domain: Domain,
        /// Sector looked up.
        sector: Sector,
    },
    /// Answers reaching one control disagreed; the minimum was applied.
    MaturityConflict {
        /// Control.
        control: ControlId,
        /// Every reported value, in report order.
        values: Vec<Maturity>,
        /// Value applied.
        resolved: Maturity,
    },
    /// A claim at or above target with no evidence reference.
    UnsubstantiatedClaim {
        /// Control.
        control: ControlId,
        /// Claimed maturity.
        maturity: Maturity,
        /// Target for the control.
        target: Maturity,
    },
}

// ---------------------------------------------------------------------------
// Generated text
// ---------------------------------------------------------------------------

/// Prose returned by the text-generation collaborator for one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedText {
    /// Section the text belongs to.
    pub section: ReportSection,
    /// The prose, opaque to the engine.
    pub text: String,
    /// Self-reported reliability in 0..=1.
    pub reliability: f64,
}

// ---------------------------------------------------------------------------
// Narrative brief
// ---------------------------------------------------------------------------

/// A non-zero gap as handed to the text generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BriefGap {
    /// Control.
    pub control: ControlId,
    /// Domain.
    pub domain: Domain,
    /// Current maturity.
    pub current: Maturity,
    /// Target maturity.
    pub target: Maturity,
    /// Gap points.
    pub gap: u8,
}

/// A risk entry as handed to the text generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BriefRisk {
    /// Risk id.
    pub id: String,
    /// Control.
    pub control: ControlId,
    /// Control label.
    pub label: String,
    /// Domain.
    pub domain: Domain,
    /// Severity.
    pub severity: f64,
    /// Urgency tier.
    pub tier: UrgencyTier,
    /// Threat actors.
    pub threat_actors: Vec<String>,
    /// Recommended mitigations.
    pub mitigations: Vec<String>,
}

/// Structured input for the text-generation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeBrief {
    /// Organization sector.
    pub sector: Sector,
    /// Organization size tier.
    pub size: SizeTier,
    /// Selected frameworks.
    pub frameworks: Vec<FrameworkRef>,
    /// In-scope controls.
    pub controls: Vec<ControlId>,
    /// Non-zero gaps.
    pub gaps: Vec<BriefGap>,
    /// Ranked risks.
    pub risks: Vec<BriefRisk>,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Result of one assessment run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentReport {
    /// Fingerprint of the request this report answers.
    pub request_digest: ContentDigest,
    /// Organization sector.
    pub sector: Sector,
    /// Organization size tier.
    pub size: SizeTier,
    /// Selected frameworks.
    pub frameworks: Vec<FrameworkRef>,
    /// Control taxonomy version.
    pub taxonomy_version: String,
    /// Benchmark dataset version.
    pub benchmark_version: String,
    /// Compliance matrix summary.
    pub matrix: MatrixSummary,
    /// Maturity per in-scope control.
    pub maturity: MaturityAssessment,
    /// Gap analysis.
    pub gaps: GapAnalysis,
    /// Ranked risk register.
    pub risks: Vec<RiskEntry>,
    /// Benchmark positions.
    pub benchmarks: BenchmarkComparison,
    /// Whether any benchmark position used a fallback distribution.
    pub benchmark_fallback: bool,
    /// Remediation estimate.
    pub cost: CostEstimate,
    /// Inputs shared by every confidence score.
    pub confidence_inputs: ConfidenceInputs,
    /// Confidence per section.
    pub confidence: Vec<SectionConfidence>,
    /// Generated text attached after assembly.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub generated: Vec<GeneratedText>,
    /// Non-fatal conditions.
    pub annotations: Vec<Annotation>,
}

impl AssessmentReport {
    /// Confidence for one section.
    pub fn confidence_for(&self, section: ReportSection) -> Option<&SectionConfidence> {
        self.confidence.iter().find(|c| c.section == section)
    }

    /// Generated text attached to one section.
    pub fn generated_for(&self, section: ReportSection) -> Option<&GeneratedText> {
        self.generated.iter().find(|g| g.section == section)
    }

    /// Attach generated text to a section and rescore that section only.
    ///
    /// A reliability outside 0..=1 is clamped; NaN counts as 0. Text already
    /// attached to the section is replaced.
    pub fn with_generated_text(mut self, mut text: GeneratedText, weights: &ConfidenceWeights) -> Self {
        let reported = text.reliability;
        text.reliability = if reported.is_nan() {
            0.0
        } else {
            reported.clamp(0.0, 1.0)
        };
        if text.reliability != reported {
            tracing::warn!(
                section = %text.section,
                reported,
                applied = text.reliability,
                "generated-text reliability outside 0..=1; clamped"
            );
        }

        let rescored = score_section(
            text.section,
            &self.confidence_inputs,
            Some(text.reliability),
            weights,
        );
        match self.confidence.iter_mut().find(|c| c.section == text.section) {
            Some(slot) => *slot = rescored,
            None => self.confidence.push(rescored),
        }
        self.generated.retain(|g| g.section != text.section);
        self.generated.push(text);
        self
    }

    /// Structured summary handed to the text-generation collaborator.
    pub fn narrative_brief(&self) -> NarrativeBrief {
        NarrativeBrief {
            sector: self.sector.clone(),
            size: self.size,
            frameworks: self.frameworks.clone(),
            controls: self.maturity.iter().map(|s| s.control.clone()).collect(),
            gaps: self
                .gaps
                .open()
                .map(|g| BriefGap {
                    control: g.control.clone(),
                    domain: g.domain,
                    current: g.current,
                    target: g.target,
                    gap: g.gap,
                })
                .collect(),
            risks: self
                .risks
                .iter()
                .map(|r| BriefRisk {
                    id: r.id.clone(),
                    control: r.control.clone(),
                    label: r.label.clone(),
                    domain: r.domain,
                    severity: r.severity,
                    tier: r.tier,
                    threat_actors: r.threat_actors.clone(),
                    mitigations: r.mitigations.clone(),
                })
                .collect(),
        }
    }
}
