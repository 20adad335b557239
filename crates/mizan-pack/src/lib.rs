//! # mizan-pack — Reference Catalogue
//!
//! Loads and validates the read-only reference data the assessment engine
//! runs against:
//!
//! - **Taxonomy** ([`taxonomy`]): the closed registry of unified controls
//!   every obligation is normalized onto.
//! - **Frameworks** ([`framework`], [`registry`]): validated framework
//!   definitions with obligations and mapping hints.
//! - **Benchmarks** ([`benchmark`]): sector/size-segmented maturity
//!   distributions.
//! - **Knowledge** ([`knowledge`]): per-domain threat actors, impact
//!   categories, mitigations, KRIs and risk scenarios.
//!
//! [`Catalogue`] bundles all four. Validation failures are fatal; the
//! engine never runs against a partially valid catalogue.

pub mod benchmark;
pub mod catalogue;
pub mod error;
pub mod framework;
pub mod knowledge;
mod parser;
pub mod registry;
pub mod taxonomy;

pub use benchmark::{
    BenchmarkDataset, BenchmarkDistribution, BenchmarkLookup, DistributionDefinition,
    DistributionShape, Quartiles,
};
pub use catalogue::Catalogue;
pub use error::{
    BenchmarkError, KnowledgeError, PackError, PackResult, RegistryValidationError, TaxonomyError,
};
pub use framework::{Framework, FrameworkDefinition, MappingHint, Obligation, ObligationDefinition};
pub use knowledge::{DomainKnowledge, Kri, RiskKnowledgeBase, RiskScenario};
pub use registry::FrameworkRegistry;
pub use taxonomy::{ControlTaxonomy, UnifiedControl};
