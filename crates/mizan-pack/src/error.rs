//! # Pack Errors
//!
//! Every catalogue load or validation failure is fatal: the engine will
//! not run against a malformed registry. Each variant identifies the
//! framework, obligation, control or file at fault.

use std::path::PathBuf;

use mizan_core::{Domain, MizanError};
use thiserror::Error;

/// Malformed framework data. Blocks startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryValidationError {
    /// Framework declares a domain tag outside the enumerated set.
    #[error("framework {framework}: unknown domain tag {domain:?}")]
    UnknownDomain {
        /// Offending framework.
        framework: String,
        /// The rejected tag.
        domain: String,
    },

    /// Two obligations in one framework share an identifier.
    #[error("framework {framework}: duplicate obligation id {obligation}")]
    DuplicateObligation {
        /// Offending framework.
        framework: String,
        /// Repeated obligation id.
        obligation: String,
    },

    /// Obligation carries no mapping hints.
    #[error("framework {framework}: obligation {obligation} has no mapping hints")]
    MissingMappingHints {
        /// Offending framework.
        framework: String,
        /// Obligation without hints.
        obligation: String,
    },

    /// Framework identifier appears twice in one registry.
    #[error("duplicate framework id {framework} (versions {first} and {second})")]
    DuplicateFramework {
        /// Repeated framework id.
        framework: String,
        /// Version already registered.
        first: String,
        /// Version that collided.
        second: String,
    },

    /// Framework has no obligations.
    #[error("framework {framework} declares no obligations")]
    EmptyFramework {
        /// Offending framework.
        framework: String,
    },

    /// Framework or obligation identifier failed its shape check.
    #[error("framework {framework}: {source}")]
    InvalidIdentifier {
        /// Framework being loaded (raw text if its own id is the bad one).
        framework: String,
        /// Underlying identifier error.
        #[source]
        source: MizanError,
    },

    /// Declared target maturity is outside the 0..=5 scale.
    #[error("framework {framework}: target maturity {value} outside 0..=5 (obligation: {obligation:?})")]
    InvalidTarget {
        /// Offending framework.
        framework: String,
        /// Obligation declaring the target, if not framework-wide.
        obligation: Option<String>,
        /// Rejected value.
        value: i64,
    },

    /// A control-id mapping hint names a control absent from the taxonomy.
    #[error("framework {framework}: obligation {obligation} references unknown control {control}")]
    UnknownControl {
        /// Offending framework.
        framework: String,
        /// Obligation carrying the hint.
        obligation: String,
        /// The missing control id.
        control: String,
    },

    /// A mapping hint is blank.
    #[error("framework {framework}: obligation {obligation} has a blank mapping hint")]
    BlankHint {
        /// Offending framework.
        framework: String,
        /// Obligation carrying the blank hint.
        obligation: String,
    },
}

/// Malformed control taxonomy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    /// Two controls share an identifier.
    #[error("duplicate unified control {0}")]
    DuplicateControl(String),

    /// Control declares no keywords.
    #[error("unified control {0} has no keywords")]
    NoKeywords(String),

    /// Keyword is blank or not lowercase.
    #[error("unified control {control}: keyword {keyword:?} must be non-empty lowercase")]
    InvalidKeyword {
        /// Offending control.
        control: String,
        /// Rejected keyword.
        keyword: String,
    },
}

/// Malformed benchmark dataset.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BenchmarkError {
    /// Distribution has no sample points.
    #[error("benchmark {sector}/{domain}: empty sample set")]
    EmptySamples {
        /// Segment sector.
        sector: String,
        /// Segment domain.
        domain: Domain,
    },

    /// Value outside the 0–100 scale or not finite.
    #[error("benchmark {sector}/{domain}: value {value} outside 0..=100")]
    OutOfScale {
        /// Segment sector.
        sector: String,
        /// Segment domain.
        domain: Domain,
        /// Rejected value.
        value: f64,
    },

    /// Quartiles are not ordered p25 ≤ p50 ≤ p75.
    #[error("benchmark {sector}/{domain}: quartiles must satisfy p25 <= p50 <= p75")]
    UnorderedQuartiles {
        /// Segment sector.
        sector: String,
        /// Segment domain.
        domain: Domain,
    },

    /// Distribution declares neither or both of `samples` and `quartiles`.
    #[error("benchmark {sector}/{domain}: exactly one of samples or quartiles is required")]
    AmbiguousShape {
        /// Segment sector.
        sector: String,
        /// Segment domain.
        domain: Domain,
    },

    /// Two distributions cover the same segment.
    #[error("benchmark segment {0} defined twice")]
    DuplicateSegment(String),
}

/// Malformed risk knowledge base.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeError {
    /// Scenario likelihood or impact outside 1..=5.
    #[error("risk scenario {scenario}: {field} {value} outside 1..=5")]
    ScenarioOutOfRange {
        /// Scenario identifier.
        scenario: String,
        /// `likelihood` or `impact`.
        field: &'static str,
        /// Rejected value.
        value: u8,
    },

    /// Two scenarios share an identifier.
    #[error("duplicate risk scenario id {0}")]
    DuplicateScenario(String),
}

/// Top-level error for catalogue loading.
#[derive(Error, Debug)]
pub enum PackError {
    /// Framework registry failed validation.
    #[error("registry validation failed: {0}")]
    Registry(#[from] RegistryValidationError),

    /// Control taxonomy failed validation.
    #[error("taxonomy validation failed: {0}")]
    Taxonomy(#[from] TaxonomyError),

    /// Benchmark dataset failed validation.
    #[error("benchmark validation failed: {0}")]
    Benchmark(#[from] BenchmarkError),

    /// Risk knowledge base failed validation.
    #[error("knowledge base validation failed: {0}")]
    Knowledge(#[from] KnowledgeError),

    /// Catalogue file could not be parsed.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// File being parsed (or an embedded resource name).
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Catalogue file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for pack operations.
pub type PackResult<T> = Result<T, PackError>;
