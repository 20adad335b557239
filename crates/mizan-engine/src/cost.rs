//! # Cost Estimator
//!
//! Estimates remediation cost and duration per domain from gap points and
//! the organization's size tier. Output is always a range, never a point
//! estimate.
//!
//! Gap points behind an Immediate-tier risk are billed at the configured
//! surcharge; urgent remediation costs more than planned remediation.
//! Domains are assumed to remediate in parallel, so overall duration is
//! the longest domain while overall cost is the sum.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use mizan_core::{ControlId, Domain, SizeTier};

use crate::config::EngineConfig;
use crate::gap::GapAnalysis;
use crate::risk::{RiskEntry, UrgencyTier};

/// Cost range in the configured currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostRange {
    /// Lower estimate.
    pub low: f64,
    /// Upper estimate.
    pub high: f64,
}

/// Duration range in calendar weeks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DurationRange {
    /// Lower estimate.
    pub low_weeks: f64,
    /// Upper estimate.
    pub high_weeks: f64,
}

/// Estimate for one domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainCost {
    /// Domain.
    pub domain: Domain,
    /// Total gap points.
    pub gap_points: u32,
    /// Gap points billed at the Immediate surcharge.
    pub surcharged_points: u32,
    /// Cost range.
    pub cost: CostRange,
    /// Duration range.
    pub duration: DurationRange,
}

/// Remediation estimate for the whole assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    /// Currency code.
    pub currency: String,
    /// Size tier the bands were taken from.
    pub size: SizeTier,
    /// Per-domain estimates in domain order; domains without open gaps are
    /// omitted.
    pub domains: Vec<DomainCost>,
    /// Sum over domains.
    pub total: CostRange,
    /// Longest domain.
    pub duration: DurationRange,
}

fn round_weeks(w: f64) -> f64 {
    (w * 10.0).round() / 10.0
}

/// Estimate remediation cost and duration.
pub fn estimate(
    gaps: &GapAnalysis,
    risks: &[RiskEntry],
    size: SizeTier,
    config: &EngineConfig,
) -> CostEstimate {
    let immediate: BTreeSet<&ControlId> = risks
        .iter()
        .filter(|r| r.tier == UrgencyTier::Immediate)
        .flat_map(|r| r.derived_from.iter())
        .collect();

    let mut points: BTreeMap<Domain, (u32, u32)> = BTreeMap::new();
    for gap in gaps.open() {
        let entry = points.entry(gap.domain).or_default();
        entry.0 += u32::from(gap.gap);
        if immediate.contains(&gap.control) {
            entry.1 += u32::from(gap.gap);
        }
    }

    let unit = config.unit_cost(size);
    let weeks = config.weeks_per_point(size);
    let surcharge = config.cost.immediate_surcharge;

    let domains: Vec<DomainCost> = points
        .into_iter()
        .map(|(domain, (gap_points, surcharged_points))| {
            let plain = f64::from(gap_points - surcharged_points);
            let billed = plain + f64::from(surcharged_points) * surcharge;
            DomainCost {
                domain,
                gap_points,
                surcharged_points,
                cost: CostRange {
                    low: (unit.low * billed).round(),
                    high: (unit.high * billed).round(),
                },
                duration: DurationRange {
                    low_weeks: round_weeks(weeks.low * f64::from(gap_points)),
                    high_weeks: round_weeks(weeks.high * f64::from(gap_points)),
                },
            }
        })
        .collect();

    let total = domains.iter().fold(CostRange::default(), |acc, d| CostRange {
        low: acc.low + d.cost.low,
        high: acc.high + d.cost.high,
    });
    let duration = domains
        .iter()
        .fold(DurationRange::default(), |acc, d| DurationRange {
            low_weeks: acc.low_weeks.max(d.duration.low_weeks),
            high_weeks: acc.high_weeks.max(d.duration.high_weeks),
        });

    tracing::debug!(
        size = %size,
        low = total.low,
        high = total.high,
        weeks = duration.high_weeks,
        "remediation cost estimated"
    );

    CostEstimate {
        currency: config.cost.currency.clone(),
        size,
        domains,
        total,
        duration,
    }
}
