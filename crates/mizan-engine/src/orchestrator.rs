//! # Assessment Orchestrator
//!
//! Composes the engine stages into one [`AssessmentReport`]:
//!
//! ```text
//! Registry → Mapper → Maturity → Gaps → Risks → Benchmarks → Cost → Confidence
//! ```
//!
//! Requests are validated before any computation: the framework selection
//! must be non-empty and resolvable, and the profile must carry at least
//! one evidence answer. Everything after validation is a pure function of
//! (request, catalogue, config). The engine holds no mutable state, so one
//! [`AssessmentEngine`] can serve concurrent runs from many threads.
//!
//! ## Text Generation
//!
//! Narrative prose comes from an external collaborator behind the
//! [`NarrativeSource`] trait. The engine hands it a [`NarrativeBrief`] and
//! only aggregates the reliability it reports; the prose itself is opaque.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use mizan_core::{
    sha256_digest, CanonicalBytes, CanonicalizationError, FrameworkId, OrganizationProfile,
};
use mizan_pack::{Catalogue, Framework};

use crate::benchmark::compare;
use crate::confidence::{score_sections, ConfidenceInputs, ReportSection};
use crate::config::{ConfigError, EngineConfig};
use crate::cost::estimate;
use crate::gap::{analyze_gaps, GapAnalysis};
use crate::matrix::build_matrix;
use crate::maturity::{assess_maturity, MaturityAssessment, MaturitySource};
use crate::report::{Annotation, AssessmentReport, GeneratedText, NarrativeBrief};
use crate::risk::prioritize;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Caller input rejected before any computation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidAssessmentRequest {
    /// No framework selected.
    #[error("at least one framework must be selected")]
    NoFrameworks,

    /// The profile carries no evidence answer.
    #[error("organization profile has no evidence answers")]
    NoEvidence,

    /// A selected framework is not in the registry.
    #[error("unknown framework: {0}")]
    UnknownFramework(FrameworkId),
}

/// Failure of an assessment run.
#[derive(Error, Debug)]
pub enum AssessmentError {
    /// Bad caller input.
    #[error("invalid assessment request: {0}")]
    Invalid(#[from] InvalidAssessmentRequest),

    /// Engine configuration rejected.
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),

    /// The request could not be fingerprinted.
    #[error("request canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// The text-generation collaborator failed.
    #[error("narrative generation failed for section {section}: {source}")]
    Narrative {
        /// Section being generated.
        section: ReportSection,
        /// Collaborator error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// An organization profile plus a framework selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    /// The organization under assessment.
    pub profile: OrganizationProfile,
    /// Selected framework identifiers.
    pub frameworks: Vec<FrameworkId>,
}

impl AssessmentRequest {
    /// Construct a request.
    pub fn new(profile: OrganizationProfile, frameworks: impl IntoIterator<Item = FrameworkId>) -> Self {
        Self {
            profile,
            frameworks: frameworks.into_iter().collect(),
        }
    }

    /// Selected frameworks, sorted and deduplicated.
    pub fn selection(&self) -> BTreeSet<&FrameworkId> {
        self.frameworks.iter().collect()
    }
}

/// Fingerprint view of a request: selection order and duplicates do not
/// change the digest.
#[derive(Serialize)]
struct RequestFingerprint<'a> {
    profile: &'a OrganizationProfile,
    frameworks: BTreeSet<&'a FrameworkId>,
}

// ---------------------------------------------------------------------------
// Text generation seam
// ---------------------------------------------------------------------------

/// Prose plus the collaborator's own reliability estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeOutput {
    /// Generated prose.
    pub text: String,
    /// Self-reported reliability, expected in 0..=1.
    pub reliability: f64,
}

/// An external text generator.
///
/// Implementations own the wire format and any retry or timeout policy;
/// the engine only sees the returned output.
pub trait NarrativeSource {
    /// Collaborator error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate prose for one report section.
    fn generate(&self, section: ReportSection, brief: &NarrativeBrief) -> Result<NarrativeOutput, Self::Error>;
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// A validated catalogue and configuration, ready to run assessments.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    catalogue: Arc<Catalogue>,
    config: EngineConfig,
}

impl AssessmentEngine {
    /// Build an engine. The configuration is validated here, once.
    pub fn new(catalogue: Arc<Catalogue>, config: EngineConfig) -> Result<Self, AssessmentError> {
        config.validate()?;
        Ok(Self { catalogue, config })
    }

    /// The catalogue in use.
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn resolve<'a>(&'a self, request: &AssessmentRequest) -> Result<Vec<&'a Framework>, InvalidAssessmentRequest> {
        if request.frameworks.is_empty() {
            return Err(InvalidAssessmentRequest::NoFrameworks);
        }
        if !request.profile.has_evidence() {
            return Err(InvalidAssessmentRequest::NoEvidence);
        }
        request
            .selection()
            .into_iter()
            .map(|id| {
                self.catalogue
                    .registry
                    .get(id)
                    .ok_or_else(|| InvalidAssessmentRequest::UnknownFramework(id.clone()))
            })
            .collect()
    }

    /// Run one assessment.
    pub fn assess(&self, request: &AssessmentRequest) -> Result<AssessmentReport, AssessmentError> {
        let frameworks = self.resolve(request)?;
        let request_digest = sha256_digest(&CanonicalBytes::new(&RequestFingerprint {
            profile: &request.profile,
            frameworks: request.selection(),
        })?);
        let profile = &request.profile;
        let catalogue = &*self.catalogue;

        let matrix = build_matrix(&catalogue.taxonomy, &frameworks);
        let maturity = assess_maturity(&matrix, profile, &catalogue.taxonomy);
        let gaps = analyze_gaps(&maturity, &matrix, &frameworks, self.config.target_floor);
        let risks = prioritize(&gaps, &catalogue.taxonomy, &catalogue.knowledge, &self.config);
        let benchmarks = compare(&gaps, profile, &catalogue.benchmarks);
        let cost = estimate(&gaps, &risks, profile.size, &self.config);

        let confidence_inputs = ConfidenceInputs {
            evidence_completeness: maturity.completeness(),
            mapping_coverage: matrix.coverage(),
            benchmark_fallback: benchmarks.fallback(),
        };
        let confidence = score_sections(&confidence_inputs, &self.config.confidence);

        let mut annotations: Vec<Annotation> = matrix
            .unmapped()
            .map(|obligation| Annotation::UnmappedObligation {
                obligation: obligation.clone(),
            })
            .collect();
        annotations.extend(maturity_annotations(&maturity, &gaps));
        for position in benchmarks.positions.iter().filter(|p| p.fallback) {
            annotations.push(Annotation::BenchmarkFallback {
                domain: position.domain,
                segment: position.segment.clone(),
            });
        }
        for &domain in &benchmarks.unavailable {
            annotations.push(Annotation::BenchmarkUnavailable {
                domain,
                sector: profile.sector.clone(),
            });
        }

        tracing::info!(
            digest = %request_digest,
            frameworks = frameworks.len(),
            controls = maturity.len(),
            risks = risks.len(),
            annotations = annotations.len(),
            "assessment complete"
        );

        Ok(AssessmentReport {
            request_digest,
            sector: profile.sector.clone(),
            size: profile.size,
            frameworks: matrix.frameworks().to_vec(),
            taxonomy_version: catalogue.taxonomy.version().to_string(),
            benchmark_version: catalogue.benchmarks.version().to_string(),
            matrix: matrix.summary(),
            maturity,
            gaps,
            risks,
            benchmark_fallback: confidence_inputs.benchmark_fallback,
            benchmarks,
            cost,
            confidence_inputs,
            confidence,
            generated: Vec::new(),
            annotations,
        })
    }

    /// Ask `source` for prose on each of `sections` and attach it.
    ///
    /// The first collaborator failure aborts and is returned; the report
    /// passed in is consumed either way.
    pub fn narrate<S: NarrativeSource>(
        &self,
        mut report: AssessmentReport,
        source: &S,
        sections: &[ReportSection],
    ) -> Result<AssessmentReport, AssessmentError> {
        let brief = report.narrative_brief();
        for &section in sections {
            let output = source
                .generate(section, &brief)
                .map_err(|e| AssessmentError::Narrative {
                    section,
                    source: Box::new(e),
                })?;
            tracing::debug!(section = %section, reliability = output.reliability, "narrative attached");
            report = report.with_generated_text(
                GeneratedText {
                    section,
                    text: output.text,
                    reliability: output.reliability,
                },
                &self.config.confidence,
            );
        }
        Ok(report)
    }
}

/// Conflict and unsubstantiated-claim annotations, in control order.
fn maturity_annotations(maturity: &MaturityAssessment, gaps: &GapAnalysis) -> Vec<Annotation> {
    let mut out = Vec::new();
    for score in maturity.iter() {
        if score.conflict {
            out.push(Annotation::MaturityConflict {
                control: score.control.clone(),
                values: score.reported.iter().map(|a| a.maturity).collect(),
                resolved: score.current,
            });
        }
        let Some(gap) = gaps.get(&score.control) else {
            continue;
        };
        if score.source == MaturitySource::Explicit && !score.substantiated && score.current >= gap.target {
            out.push(Annotation::UnsubstantiatedClaim {
                control: score.control.clone(),
                maturity: score.current,
                target: gap.target,
            });
        }
    }
    out
}
