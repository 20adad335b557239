//! # Benchmark Comparator
//!
//! Positions the organization's per-domain score against the industry
//! distribution for its (sector, size tier) segment.
//!
//! The organization score for a domain is its mean current maturity on the
//! 0–100 scale. Percentile rank is piecewise-linear interpolation through
//! rank anchors:
//!
//! - **samples**: each distinct value sits at its mid-rank
//!   `100 × (below + 0.5 × equal) / n` (ties averaged).
//! - **quartiles**: anchors (p25, 25), (p50, 50), (p75, 75).
//!
//! The scale ends (0, 0) and (100, 100) bracket the anchors only where the
//! first or last anchor lies strictly inside the scale. A real rank at 0 or
//! 100 is never averaged with a bracket.
//!
//! When no exact segment exists the sector-wide distribution is used and
//! the position is flagged as a fallback. Another sector is never
//! substituted; a sector with no data yields no position.

use serde::Serialize;

use mizan_core::{Domain, Maturity, MaturityLevel, OrganizationProfile};
use mizan_pack::{BenchmarkDataset, DistributionShape};

use crate::gap::GapAnalysis;

/// Qualitative position relative to peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BenchmarkLabel {
    /// Percentile below 33.
    Lagging,
    /// Percentile 33 to 66.
    AtPar,
    /// Percentile above 66.
    Leading,
}

impl BenchmarkLabel {
    /// Label for a percentile.
    pub fn from_percentile(percentile: f64) -> Self {
        if percentile < 33.0 {
            Self::Lagging
        } else if percentile <= 66.0 {
            Self::AtPar
        } else {
            Self::Leading
        }
    }
}

/// The organization's position in one domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkPosition {
    /// Domain.
    pub domain: Domain,
    /// Segment used, e.g. `Banking/large/cyber`.
    pub segment: String,
    /// Organization score on the 0–100 scale.
    pub score: f64,
    /// Maturity level the score bands onto.
    pub maturity_level: MaturityLevel,
    /// Segment median.
    pub median: f64,
    /// Segment top-quartile boundary.
    pub top_quartile: f64,
    /// `median - score`; negative when ahead of the median.
    pub gap_to_median: f64,
    /// `top_quartile - score`; negative when inside the top quartile.
    pub gap_to_top_quartile: f64,
    /// Percentile rank in 0..=100.
    pub percentile: f64,
    /// Qualitative label.
    pub label: BenchmarkLabel,
    /// Whether the sector-wide distribution was used.
    pub fallback: bool,
}

/// Output of the benchmark comparator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BenchmarkComparison {
    /// Positions in domain order.
    pub positions: Vec<BenchmarkPosition>,
    /// In-scope domains with no data for the organization's sector.
    pub unavailable: Vec<Domain>,
}

impl BenchmarkComparison {
    /// Whether any position used the sector-wide fallback.
    pub fn fallback(&self) -> bool {
        self.positions.iter().any(|p| p.fallback)
    }
}

fn interpolate(anchors: &[(f64, f64)], x: f64) -> f64 {
    let Some(&(first_x, first_y)) = anchors.first() else {
        return 0.0;
    };
    if x <= first_x {
        return first_y;
    }
    for pair in anchors.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x <= x1 {
            if x1 == x0 {
                return y1;
            }
            return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
        }
    }
    anchors.last().map_or(0.0, |&(_, y)| y)
}

/// Merge anchors sharing an x coordinate by averaging their y values.
fn merge_anchors(points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    let mut merged: Vec<(f64, f64, usize)> = Vec::with_capacity(points.len());
    for (x, y) in points {
        match merged.last_mut() {
            Some((lx, ly, n)) if *lx == x => {
                *ly += y;
                *n += 1;
            }
            _ => merged.push((x, y, 1)),
        }
    }
    merged
        .into_iter()
        .map(|(x, y, n)| (x, y / n as f64))
        .collect()
}

/// Add the (0, 0) and (100, 100) scale ends where no real anchor sits.
fn bracket(mut anchors: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    if anchors.first().is_some_and(|&(x, _)| x > 0.0) {
        anchors.insert(0, (0.0, 0.0));
    }
    if anchors.last().is_some_and(|&(x, _)| x < 100.0) {
        anchors.push((100.0, 100.0));
    }
    anchors
}

fn sample_anchors(samples: &[f64]) -> Vec<(f64, f64)> {
    let n = samples.len() as f64;
    let mut points = Vec::new();
    let mut i = 0;
    while i < samples.len() {
        let value = samples[i];
        let equal = samples[i..].iter().take_while(|&&v| v == value).count();
        points.push((value, 100.0 * (i as f64 + 0.5 * equal as f64) / n));
        i += equal;
    }
    bracket(points)
}

/// Percentile rank of `score` within a distribution, clamped to 0..=100.
pub fn percentile_rank(shape: &DistributionShape, score: f64) -> f64 {
    let anchors = match shape {
        DistributionShape::Samples(samples) if samples.is_empty() => return 0.0,
        DistributionShape::Samples(samples) => sample_anchors(samples),
        DistributionShape::Quartiles(q) => {
            bracket(merge_anchors(vec![(q.p25, 25.0), (q.p50, 50.0), (q.p75, 75.0)]))
        }
    };
    interpolate(&anchors, score.clamp(0.0, 100.0)).clamp(0.0, 100.0)
}

/// Position the organization in every in-scope domain.
pub fn compare(
    gaps: &GapAnalysis,
    profile: &OrganizationProfile,
    dataset: &BenchmarkDataset,
) -> BenchmarkComparison {
    let mut comparison = BenchmarkComparison::default();

    for summary in &gaps.domains {
        let lookup = dataset.lookup(&profile.sector, profile.size, summary.domain);
        let Some(distribution) = lookup.distribution() else {
            tracing::warn!(
                sector = %profile.sector,
                domain = %summary.domain,
                "no benchmark distribution for sector"
            );
            comparison.unavailable.push(summary.domain);
            continue;
        };
        let fallback = lookup.is_fallback();
        if fallback {
            tracing::warn!(
                sector = %profile.sector,
                size = %profile.size,
                domain = %summary.domain,
                "no size-specific benchmark; using sector-wide distribution"
            );
        }

        let score = Maturity::percent_of_scale(summary.mean_current);
        let percentile = percentile_rank(&distribution.shape, score);
        let median = distribution.shape.median();
        let top_quartile = distribution.shape.top_quartile();
        comparison.positions.push(BenchmarkPosition {
            domain: summary.domain,
            segment: distribution.segment(),
            score,
            maturity_level: MaturityLevel::from_percent(score),
            median,
            top_quartile,
            gap_to_median: median - score,
            gap_to_top_quartile: top_quartile - score,
            percentile,
            label: BenchmarkLabel::from_percentile(percentile),
            fallback,
        });
    }

    comparison
}
