//! # Engine Configuration
//!
//! Every tunable the engine consumes lives in one explicit structure:
//! the maturity target floor, per-domain impact weights, urgency tier
//! thresholds, the remediation cost and duration tables, and the
//! confidence weights. Defaults are documented below; a YAML file may
//! override any subset of them.
//!
//! Configuration is validated once, before the engine accepts it. The
//! engine never substitutes silent defaults for an invalid value.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use mizan_core::{Domain, Maturity, SizeTier};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Invalid engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A domain has no impact weight.
    #[error("no impact weight configured for domain {0}")]
    MissingWeight(Domain),

    /// An impact weight is not a positive finite number.
    #[error("impact weight for domain {domain} must be positive, got {value}")]
    InvalidWeight {
        /// Domain.
        domain: Domain,
        /// Rejected weight.
        value: f64,
    },

    /// Urgency thresholds are not ordered `0 < short_term < immediate`.
    #[error("urgency thresholds must satisfy 0 < short_term ({short_term}) < immediate ({immediate})")]
    InvalidThresholds {
        /// Immediate-tier lower bound.
        immediate: f64,
        /// Short-term lower bound.
        short_term: f64,
    },

    /// A size tier is missing from a cost or duration table.
    #[error("{table} table has no entry for size tier {tier}")]
    MissingBand {
        /// Table name.
        table: &'static str,
        /// Missing tier.
        tier: SizeTier,
    },

    /// A band is negative, non-finite or inverted.
    #[error("{table} band for {tier} must satisfy 0 <= low ({low}) <= high ({high})")]
    InvalidBand {
        /// Table name.
        table: &'static str,
        /// Tier.
        tier: SizeTier,
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
    },

    /// The immediate-tier surcharge does not exceed 1.
    #[error("immediate_surcharge must be greater than 1, got {0}")]
    InvalidSurcharge(f64),

    /// Confidence weights are negative or all zero.
    #[error("confidence weights must be non-negative with evidence + coverage > 0")]
    InvalidConfidenceWeights,

    /// Fallback penalty outside (0, 1].
    #[error("fallback_penalty must be in (0, 1], got {0}")]
    InvalidPenalty(f64),

    /// Configuration file could not be parsed.
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        /// Config file.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Config file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// A low/high range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Lower bound.
    pub low: f64,
    /// Upper bound.
    pub high: f64,
}

impl Band {
    /// Construct a band.
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && 0.0 <= self.low && self.low <= self.high
    }
}

/// Severity lower bounds for the urgency tiers.
///
/// `severity >= immediate` is Immediate, `short_term <= severity < immediate`
/// is Short-term, `0 < severity < short_term` is Long-term and a zero
/// severity produces no risk entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyThresholds {
    /// Immediate-tier lower bound.
    pub immediate: f64,
    /// Short-term lower bound.
    pub short_term: f64,
}

impl Default for UrgencyThresholds {
    fn default() -> Self {
        Self {
            immediate: 4.0,
            short_term: 2.0,
        }
    }
}

/// Remediation cost and duration tables keyed by size tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostTable {
    /// Currency code for cost figures.
    pub currency: String,
    /// Cost per gap point.
    pub unit_cost: BTreeMap<SizeTier, Band>,
    /// Calendar weeks per gap point.
    pub weeks_per_point: BTreeMap<SizeTier, Band>,
    /// Multiplier (> 1) applied to gap points behind Immediate-tier risks.
    pub immediate_surcharge: f64,
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            currency: "SAR".to_string(),
            unit_cost: BTreeMap::from([
                (SizeTier::Small, Band::new(8_000.0, 20_000.0)),
                (SizeTier::Medium, Band::new(20_000.0, 45_000.0)),
                (SizeTier::Large, Band::new(45_000.0, 110_000.0)),
                (SizeTier::Enterprise, Band::new(110_000.0, 280_000.0)),
            ]),
            weeks_per_point: BTreeMap::from([
                (SizeTier::Small, Band::new(0.5, 1.0)),
                (SizeTier::Medium, Band::new(0.75, 1.5)),
                (SizeTier::Large, Band::new(1.0, 2.0)),
                (SizeTier::Enterprise, Band::new(1.5, 3.0)),
            ]),
            immediate_surcharge: 1.5,
        }
    }
}

/// Weights of the confidence score inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    /// Weight of the evidence completeness ratio.
    pub evidence: f64,
    /// Weight of the mapping coverage ratio.
    pub coverage: f64,
    /// Weight of the collaborator-reported reliability, when text is attached.
    pub generated: f64,
    /// Multiplier applied to the benchmark section when a fallback was used.
    pub fallback_penalty: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            evidence: 0.5,
            coverage: 0.3,
            generated: 0.2,
            fallback_penalty: 0.85,
        }
    }
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

fn default_weights() -> BTreeMap<Domain, f64> {
    BTreeMap::from([
        (Domain::Cyber, 1.5),
        (Domain::Data, 1.3),
        (Domain::Ai, 1.2),
        (Domain::Global, 1.0),
        (Domain::DigitalTransformation, 0.8),
    ])
}

/// The engine's complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Minimum target maturity for every control.
    pub target_floor: Maturity,
    /// Impact weight per domain.
    pub domain_weights: BTreeMap<Domain, f64>,
    /// Urgency tier thresholds.
    pub urgency: UrgencyThresholds,
    /// Cost and duration tables.
    pub cost: CostTable,
    /// Confidence weights.
    pub confidence: ConfidenceWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_floor: Maturity::DEFINED,
            domain_weights: default_weights(),
            urgency: UrgencyThresholds::default(),
            cost: CostTable::default(),
            confidence: ConfidenceWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document. Absent keys keep their defaults.
    pub fn from_yaml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text, path)?;
        tracing::info!(path = %path.display(), "engine config loaded");
        Ok(config)
    }

    /// Check every invariant the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for &domain in Domain::all() {
            match self.domain_weights.get(&domain) {
                None => return Err(ConfigError::MissingWeight(domain)),
                Some(&value) if !(value.is_finite() && value > 0.0) => {
                    return Err(ConfigError::InvalidWeight { domain, value })
                }
                Some(_) => {}
            }
        }

        let UrgencyThresholds {
            immediate,
            short_term,
        } = self.urgency;
        if !(short_term > 0.0 && short_term < immediate && immediate.is_finite()) {
            return Err(ConfigError::InvalidThresholds {
                immediate,
                short_term,
            });
        }

        for (table, bands) in [
            ("unit_cost", &self.cost.unit_cost),
            ("weeks_per_point", &self.cost.weeks_per_point),
        ] {
            for &tier in SizeTier::all() {
                let band = bands
                    .get(&tier)
                    .ok_or(ConfigError::MissingBand { table, tier })?;
                if !band.is_valid() {
                    return Err(ConfigError::InvalidBand {
                        table,
                        tier,
                        low: band.low,
                        high: band.high,
                    });
                }
            }
        }
        let surcharge = self.cost.immediate_surcharge;
        if !(surcharge.is_finite() && surcharge > 1.0) {
            return Err(ConfigError::InvalidSurcharge(surcharge));
        }

        let w = self.confidence;
        let non_negative = [w.evidence, w.coverage, w.generated]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0);
        if !non_negative || w.evidence + w.coverage <= 0.0 {
            return Err(ConfigError::InvalidConfidenceWeights);
        }
        if !(w.fallback_penalty > 0.0 && w.fallback_penalty <= 1.0) {
            return Err(ConfigError::InvalidPenalty(w.fallback_penalty));
        }
        Ok(())
    }

    /// Impact weight for `domain`.
    pub fn weight(&self, domain: Domain) -> f64 {
        self.domain_weights.get(&domain).copied().unwrap_or(1.0)
    }

    /// Cost-per-point band for a size tier.
    pub fn unit_cost(&self, tier: SizeTier) -> Band {
        self.cost
            .unit_cost
            .get(&tier)
            .copied()
            .unwrap_or(Band::new(0.0, 0.0))
    }

    /// Weeks-per-point band for a size tier.
    pub fn weeks_per_point(&self, tier: SizeTier) -> Band {
        self.cost
            .weeks_per_point
            .get(&tier)
            .copied()
            .unwrap_or(Band::new(0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.target_floor, Maturity::DEFINED);
        assert!(config.weight(Domain::Cyber) > config.weight(Domain::DigitalTransformation));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "target_floor: 4\ndomain_weights:\n  cyber: 2.0\n  data: 1.3\n  ai: 1.2\n  dt: 0.8\n  global: 1.0\n";
        let config = EngineConfig::from_yaml_str(yaml, Path::new("inline")).unwrap();
        assert_eq!(config.target_floor.value(), 4);
        assert_eq!(config.weight(Domain::Cyber), 2.0);
        assert_eq!(config.urgency, UrgencyThresholds::default());
        assert_eq!(config.cost.currency, "SAR");
    }

    #[test]
    fn missing_weight_rejected() {
        let yaml = "domain_weights:\n  cyber: 1.5\n";
        let err = EngineConfig::from_yaml_str(yaml, Path::new("inline")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingWeight(Domain::Data)));
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let mut config = EngineConfig::default();
        config.urgency = UrgencyThresholds {
            immediate: 2.0,
            short_term: 3.0,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn surcharge_must_exceed_one() {
        let mut config = EngineConfig::default();
        config.cost.immediate_surcharge = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSurcharge(_))
        ));
    }

    #[test]
    fn inverted_band_rejected() {
        let mut config = EngineConfig::default();
        config
            .cost
            .unit_cost
            .insert(SizeTier::Small, Band::new(10.0, 5.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBand { table: "unit_cost", .. })
        ));
    }

    #[test]
    fn unknown_keys_and_bad_floor_rejected() {
        assert!(EngineConfig::from_yaml_str("colour: red\n", Path::new("x")).is_err());
        assert!(EngineConfig::from_yaml_str("target_floor: 6\n", Path::new("x")).is_err());
    }

    #[test]
    fn penalty_range_checked() {
        let mut config = EngineConfig::default();
        config.confidence.fallback_penalty = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPenalty(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");
        std::fs::write(&path, "urgency:\n  immediate: 5.0\n  short_term: 2.5\n").unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.urgency.immediate, 5.0);
        assert!(matches!(
            EngineConfig::load(&dir.path().join("missing.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
