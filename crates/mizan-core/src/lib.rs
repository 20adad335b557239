//! # mizan-core — Foundational Types for the Assessment Engine
//!
//! Leaf crate of the Mizan workspace. Defines the vocabulary every other
//! crate speaks: the domain tags frameworks are grouped under, identifier
//! newtypes for frameworks, obligations and unified controls, the 0–5
//! CMMI maturity scale, and the organization profile a caller submits
//! for assessment.
//!
//! ## Key Design Principles
//!
//! 1. **Single `Domain` enum.** One definition, five variants, exhaustive
//!    `match` everywhere. Domain weights, benchmark segments and risk
//!    knowledge are all keyed by it.
//!
//! 2. **Newtype identifiers.** `FrameworkId`, `ObligationId` and `ControlId`
//!    are validated at construction and deserialization. A control id can
//!    never be passed where an obligation id is expected.
//!
//! 3. **`Maturity` is range-checked.** Values outside 0..=5 are rejected at
//!    the boundary, so downstream arithmetic never has to clamp inputs.
//!
//! 4. **Canonical fingerprints.** Request digests flow through
//!    `CanonicalBytes::new()` (RFC 8785 JCS) and SHA-256, so identical
//!    assessment requests always carry identical digests.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mizan-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod domain;
pub mod error;
pub mod identity;
pub mod maturity;
pub mod profile;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest};
pub use domain::{Domain, DOMAIN_COUNT};
pub use error::{CanonicalizationError, MizanError};
pub use identity::{ControlId, FrameworkId, ObligationId, ObligationRef};
pub use maturity::{Maturity, MaturityLevel};
pub use profile::{EvidenceAnswer, OrganizationProfile, Sector, SizeTier};
