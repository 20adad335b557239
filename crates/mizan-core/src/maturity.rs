//! # Maturity Scale
//!
//! CMMI-style capability scale used for both self-reported and target
//! maturity. `Maturity` is an integer in 0..=5, validated at construction
//! and on deserialization; `MaturityLevel` gives each point its label.
//!
//! ```text
//! 0 NonExistent   no capability in place
//! 1 Initial       ad-hoc, reactive
//! 2 Developing    basic, inconsistently applied
//! 3 Defined       documented and standardized
//! 4 Managed       measured and monitored
//! 5 Optimizing    continuously improved
//! ```

use serde::{Deserialize, Serialize};

use crate::error::MizanError;

/// A maturity value on the 0..=5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Maturity(u8);

impl Maturity {
    /// Lowest point on the scale.
    pub const ZERO: Maturity = Maturity(0);
    /// Baseline "Defined" level used as the default target floor.
    pub const DEFINED: Maturity = Maturity(3);
    /// Highest point on the scale.
    pub const MAX: Maturity = Maturity(5);

    /// Create a maturity value, rejecting anything above 5.
    pub fn new(value: u8) -> Result<Self, MizanError> {
        if value > Self::MAX.0 {
            return Err(MizanError::MaturityOutOfRange(i64::from(value)));
        }
        Ok(Self(value))
    }

    /// The raw scale value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// The value as a percentage of the top of the scale.
    pub fn as_percent(self) -> f64 {
        Self::percent_of_scale(f64::from(self.0))
    }

    /// Convert a (possibly fractional) mean maturity to the 0–100 scale.
    pub fn percent_of_scale(mean: f64) -> f64 {
        (mean / f64::from(Self::MAX.0) * 100.0).clamp(0.0, 100.0)
    }

    /// Shortfall from `self` up to `target`, clamped at zero.
    pub fn shortfall_to(self, target: Maturity) -> u8 {
        target.0.saturating_sub(self.0)
    }

    /// The label for this point on the scale.
    pub fn level(self) -> MaturityLevel {
        match self.0 {
            0 => MaturityLevel::NonExistent,
            1 => MaturityLevel::Initial,
            2 => MaturityLevel::Developing,
            3 => MaturityLevel::Defined,
            4 => MaturityLevel::Managed,
            _ => MaturityLevel::Optimizing,
        }
    }
}

impl TryFrom<i64> for Maturity {
    type Error = MizanError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX.0)
            .map(Self)
            .ok_or(MizanError::MaturityOutOfRange(value))
    }
}

impl From<Maturity> for u8 {
    fn from(m: Maturity) -> u8 {
        m.0
    }
}

impl std::fmt::Display for Maturity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

/// Named CMMI levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLevel {
    /// No capability in place.
    NonExistent,
    /// Ad-hoc, reactive processes.
    Initial,
    /// Basic processes defined but inconsistent.
    Developing,
    /// Standardized processes across the organization.
    Defined,
    /// Measured and controlled processes.
    Managed,
    /// Continuous improvement culture.
    Optimizing,
}

impl MaturityLevel {
    /// Band a 0–100 percentage score onto a level.
    ///
    /// Bands: ≤20 Initial, ≤40 Developing, ≤60 Defined, ≤80 Managed,
    /// otherwise Optimizing. A score of exactly zero is `NonExistent`.
    pub fn from_percent(score: f64) -> Self {
        if score <= 0.0 {
            Self::NonExistent
        } else if score <= 20.0 {
            Self::Initial
        } else if score <= 40.0 {
            Self::Developing
        } else if score <= 60.0 {
            Self::Defined
        } else if score <= 80.0 {
            Self::Managed
        } else {
            Self::Optimizing
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::NonExistent => "Non-existent",
            Self::Initial => "Initial",
            Self::Developing => "Developing",
            Self::Defined => "Defined",
            Self::Managed => "Managed",
            Self::Optimizing => "Optimizing",
        }
    }
}

impl std::fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
