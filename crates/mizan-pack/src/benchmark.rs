//! # Industry Benchmark Dataset
//!
//! Sourced, versioned maturity distributions segmented by sector, size
//! tier and domain, on the 0–100 scale. Read-only reference data.
//!
//! A distribution is published either as raw sample scores or as the
//! quartile summary (p25/p50/p75) most industry surveys report. A
//! distribution without a size tier is the sector-wide aggregate used
//! when no exact (sector, size) segment exists.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use mizan_core::{Domain, Sector, SizeTier};

use crate::error::{BenchmarkError, PackResult};
use crate::parser;

/// Published quartile summary of a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    /// 25th percentile (bottom quartile boundary).
    pub p25: f64,
    /// Median.
    pub p50: f64,
    /// 75th percentile (top quartile boundary).
    pub p75: f64,
}

/// Shape of one benchmark distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionShape {
    /// Individual organization scores, sorted ascending.
    Samples(Vec<f64>),
    /// Quartile summary.
    Quartiles(Quartiles),
}

impl DistributionShape {
    /// Median of the distribution.
    pub fn median(&self) -> f64 {
        match self {
            Self::Quartiles(q) => q.p50,
            Self::Samples(s) => quantile(s, 0.5),
        }
    }

    /// Top-quartile boundary (75th percentile) of the distribution.
    pub fn top_quartile(&self) -> f64 {
        match self {
            Self::Quartiles(q) => q.p75,
            Self::Samples(s) => quantile(s, 0.75),
        }
    }
}

/// Linearly interpolated quantile of sorted samples; 0 when empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return 0.0;
    };
    let pos = q * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// One segment's distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkDistribution {
    /// Sector.
    pub sector: Sector,
    /// Size tier; `None` for the sector-wide aggregate.
    pub size: Option<SizeTier>,
    /// Domain.
    pub domain: Domain,
    /// Score distribution.
    pub shape: DistributionShape,
}

impl BenchmarkDistribution {
    /// `Sector/size/domain` label, `*` for the sector-wide size.
    pub fn segment(&self) -> String {
        segment_label(&self.sector, self.size, self.domain)
    }
}

fn segment_label(sector: &Sector, size: Option<SizeTier>, domain: Domain) -> String {
    let size = size.map_or("*", |s| s.as_str());
    format!("{sector}/{size}/{domain}")
}

/// Raw distribution as written in the dataset file.
#[derive(Debug, Clone, Deserialize)]
pub struct DistributionDefinition {
    /// Sector.
    pub sector: Sector,
    /// Size tier; omit for the sector-wide aggregate.
    #[serde(default)]
    pub size: Option<SizeTier>,
    /// Domain.
    pub domain: Domain,
    /// Raw sample scores.
    #[serde(default)]
    pub samples: Option<Vec<f64>>,
    /// Quartile summary.
    #[serde(default)]
    pub quartiles: Option<Quartiles>,
}

impl TryFrom<DistributionDefinition> for BenchmarkDistribution {
    type Error = BenchmarkError;

    fn try_from(def: DistributionDefinition) -> Result<Self, Self::Error> {
        let sector_name = def.sector.to_string();
        let domain = def.domain;
        let check = |value: f64| {
            if value.is_finite() && (0.0..=100.0).contains(&value) {
                Ok(())
            } else {
                Err(BenchmarkError::OutOfScale {
                    sector: sector_name.clone(),
                    domain,
                    value,
                })
            }
        };

        let shape = match (def.samples, def.quartiles) {
            (Some(mut samples), None) => {
                if samples.is_empty() {
                    return Err(BenchmarkError::EmptySamples {
                        sector: sector_name,
                        domain,
                    });
                }
                for &v in &samples {
                    check(v)?;
                }
                samples.sort_by(f64::total_cmp);
                DistributionShape::Samples(samples)
            }
            (None, Some(q)) => {
                check(q.p25)?;
                check(q.p50)?;
                check(q.p75)?;
                if !(q.p25 <= q.p50 && q.p50 <= q.p75) {
                    return Err(BenchmarkError::UnorderedQuartiles {
                        sector: sector_name,
                        domain,
                    });
                }
                DistributionShape::Quartiles(q)
            }
            _ => {
                return Err(BenchmarkError::AmbiguousShape {
                    sector: sector_name,
                    domain,
                })
            }
        };

        Ok(Self {
            sector: def.sector,
            size: def.size,
            domain,
            shape,
        })
    }
}

/// Result of a segment lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BenchmarkLookup<'a> {
    /// Exact (sector, size, domain) segment.
    Exact(&'a BenchmarkDistribution),
    /// Sector-wide aggregate for the domain; precision is degraded.
    SectorFallback(&'a BenchmarkDistribution),
    /// No data for this sector and domain.
    Unavailable,
}

impl<'a> BenchmarkLookup<'a> {
    /// The distribution found, if any.
    pub fn distribution(&self) -> Option<&'a BenchmarkDistribution> {
        match self {
            Self::Exact(d) | Self::SectorFallback(d) => Some(d),
            Self::Unavailable => None,
        }
    }

    /// Whether the sector-wide fallback was used.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::SectorFallback(_))
    }
}

#[derive(Debug, Deserialize)]
struct DatasetFile {
    version: String,
    #[serde(default)]
    source: String,
    distributions: Vec<DistributionDefinition>,
}

/// Validated benchmark dataset.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkDataset {
    version: String,
    source: String,
    distributions: Vec<BenchmarkDistribution>,
}

impl BenchmarkDataset {
    /// Build a dataset, rejecting duplicate segments.
    pub fn new(
        version: impl Into<String>,
        source: impl Into<String>,
        distributions: Vec<BenchmarkDistribution>,
    ) -> Result<Self, BenchmarkError> {
        let mut seen = BTreeSet::new();
        for d in &distributions {
            let key = (d.sector.as_str().to_lowercase(), d.size, d.domain);
            if !seen.insert(key) {
                return Err(BenchmarkError::DuplicateSegment(d.segment()));
            }
        }
        Ok(Self {
            version: version.into(),
            source: source.into(),
            distributions,
        })
    }

    /// Parse and validate a dataset document.
    pub fn from_yaml_str(text: &str, origin: &Path) -> PackResult<Self> {
        let file: DatasetFile = parser::parse_yaml(text, origin)?;
        Self::from_file(file)
    }

    /// Load and validate a dataset file.
    pub fn load(path: &Path) -> PackResult<Self> {
        let file: DatasetFile = parser::read_yaml_file(path)?;
        Self::from_file(file)
    }

    fn from_file(file: DatasetFile) -> PackResult<Self> {
        let distributions = file
            .distributions
            .into_iter()
            .map(BenchmarkDistribution::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(file.version, file.source, distributions)?)
    }

    /// Dataset version pin.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Citation for the underlying survey data.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// All distributions.
    pub fn distributions(&self) -> &[BenchmarkDistribution] {
        &self.distributions
    }

    /// Find the distribution for a segment.
    ///
    /// Tries the exact (sector, size) segment first, then the sector-wide
    /// aggregate. Never substitutes another sector.
    pub fn lookup(&self, sector: &Sector, size: SizeTier, domain: Domain) -> BenchmarkLookup<'_> {
        let same_sector = |d: &&BenchmarkDistribution| d.domain == domain && d.sector.matches(sector);
        if let Some(d) = self
            .distributions
            .iter()
            .filter(same_sector)
            .find(|d| d.size == Some(size))
        {
            return BenchmarkLookup::Exact(d);
        }
        match self
            .distributions
            .iter()
            .filter(same_sector)
            .find(|d| d.size.is_none())
        {
            Some(d) => BenchmarkLookup::SectorFallback(d),
            None => BenchmarkLookup::Unavailable,
        }
    }
}
