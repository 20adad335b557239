//! # mizan-engine — Compliance Assessment & Gap Analysis
//!
//! Takes an organization profile and a framework selection, runs it
//! against a validated [`mizan_pack::Catalogue`], and returns an
//! [`AssessmentReport`].
//!
//! ## Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Map obligations onto unified controls | [`matrix`] |
//! | Score current maturity per control | [`maturity`] |
//! | Compute gaps against target | [`gap`] |
//! | Rank risks by urgency | [`risk`] |
//! | Position against industry benchmarks | [`benchmark`] |
//! | Estimate remediation cost and duration | [`cost`] |
//! | Score per-section confidence | [`confidence`] |
//! | Compose the report | [`orchestrator`], [`report`] |
//!
//! Every tunable lives in [`EngineConfig`].
//!
//! ## Determinism
//!
//! Each run is a pure function of (request, catalogue, config). Ordered
//! collections are used throughout, so identical input yields byte-identical
//! serialized output.

pub mod benchmark;
pub mod confidence;
pub mod config;
pub mod cost;
pub mod gap;
pub mod matrix;
pub mod maturity;
pub mod orchestrator;
pub mod report;
pub mod risk;

pub use benchmark::{compare, percentile_rank, BenchmarkComparison, BenchmarkLabel, BenchmarkPosition};
pub use confidence::{
    confidence_score, score_section, score_sections, ConfidenceInputs, ReportSection,
    SectionConfidence,
};
pub use config::{Band, ConfidenceWeights, ConfigError, CostTable, EngineConfig, UrgencyThresholds};
pub use cost::{estimate, CostEstimate, CostRange, DomainCost, DurationRange};
pub use gap::{analyze_gaps, DomainGapSummary, Gap, GapAnalysis};
pub use matrix::{build_matrix, resolve_obligation, ComplianceMatrix, FrameworkRef, MatrixSummary};
pub use maturity::{
    assess_maturity, AnswerOrigin, MaturityAssessment, MaturityScore, MaturitySource,
    ReportedAnswer,
};
pub use orchestrator::{
    AssessmentEngine, AssessmentError, AssessmentRequest, InvalidAssessmentRequest,
    NarrativeOutput, NarrativeSource,
};
pub use report::{
    Annotation, AssessmentReport, BriefGap, BriefRisk, GeneratedText, NarrativeBrief,
};
pub use risk::{prioritize, RiskEntry, UrgencyTier};
