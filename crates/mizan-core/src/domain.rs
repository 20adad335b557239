//! # Domain — Single Source of Truth
//!
//! Defines the `Domain` enum: the fixed set of domain tags a framework may
//! carry. This is the ONE definition used across the workspace; domain
//! impact weights, benchmark segments and the risk knowledge base are all
//! keyed by it, and every `match` on it is exhaustive.
//!
//! Frameworks of different "shapes" (cyber controls, AI-governance
//! principles, data-management standards) are not modelled as subtypes.
//! They share one obligation record and differ only by this tag.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::MizanError;

/// Domain tag attached to every framework and unified control.
///
/// | Domain | Example frameworks |
/// |--------|--------------------|
/// | Cyber | NCA ECC, SAMA CSF, NCA CCC |
/// | Data | NDMO, GDPR |
/// | Ai | NIST AI RMF, EU AI Act |
/// | DigitalTransformation | COBIT 2019, DGA policy |
/// | Global | ISO 27001, NIST CSF 2.0 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    /// Cybersecurity controls.
    Cyber,
    /// Data management and privacy.
    Data,
    /// AI governance.
    Ai,
    /// Digital transformation and IT governance.
    #[serde(alias = "dt")]
    DigitalTransformation,
    /// Cross-sector international standards.
    Global,
}

/// Total number of domains.
pub const DOMAIN_COUNT: usize = 5;

impl Domain {
    /// Returns all domains in canonical order.
    pub fn all() -> &'static [Domain] {
        &[
            Self::Cyber,
            Self::Data,
            Self::Ai,
            Self::DigitalTransformation,
            Self::Global,
        ]
    }

    /// Returns the kebab-case identifier for this domain.
    ///
    /// Matches the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cyber => "cyber",
            Self::Data => "data",
            Self::Ai => "ai",
            Self::DigitalTransformation => "digital-transformation",
            Self::Global => "global",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cyber => "Cyber Security",
            Self::Data => "Data Management",
            Self::Ai => "Artificial Intelligence",
            Self::DigitalTransformation => "Digital Transformation",
            Self::Global => "Global Standards",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = MizanError;

    /// Parse a domain from its kebab-case identifier.
    ///
    /// Also accepts the short code `dt` for digital transformation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cyber" => Ok(Self::Cyber),
            "data" => Ok(Self::Data),
            "ai" => Ok(Self::Ai),
            "digital-transformation" | "dt" => Ok(Self::DigitalTransformation),
            "global" => Ok(Self::Global),
            other => Err(MizanError::UnknownDomain(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_domains_count() {
        assert_eq!(Domain::all().len(), DOMAIN_COUNT);
    }

    #[test]
    fn all_domains_unique() {
        let mut seen = std::collections::HashSet::new();
        for d in Domain::all() {
            assert!(seen.insert(d), "Duplicate domain: {d}");
        }
    }

    #[test]
    fn as_str_parses_back() {
        for domain in Domain::all() {
            let parsed: Domain = domain.as_str().parse().unwrap();
            assert_eq!(*domain, parsed);
        }
    }

    #[test]
    fn short_code_alias() {
        assert_eq!("dt".parse::<Domain>().unwrap(), Domain::DigitalTransformation);
        let d: Domain = serde_json::from_str("\"dt\"").unwrap();
        assert_eq!(d, Domain::DigitalTransformation);
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert!("finance".parse::<Domain>().is_err());
        assert!("Cyber".parse::<Domain>().is_err());
        assert!("".parse::<Domain>().is_err());
    }

    #[test]
    fn serde_format_matches_as_str() {
        for domain in Domain::all() {
            let json = serde_json::to_string(domain).unwrap();
            assert_eq!(json, format!("\"{}\"", domain.as_str()));
        }
    }
}
