//! # Risk Prioritizer
//!
//! Turns open gaps into ranked [`RiskEntry`] values.
//!
//! Severity is the gap magnitude times the domain's impact weight. The
//! urgency tier follows the configured thresholds; a zero severity never
//! produces an entry. Threat actors, impact categories, mitigations, KRIs
//! and scenarios are attached from the knowledge base by domain. None of
//! them are computed.
//!
//! Entries are sorted by (tier, severity descending, domain, control) so
//! identical input always yields identical ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use mizan_core::{ControlId, Domain};
use mizan_pack::{ControlTaxonomy, Kri, RiskKnowledgeBase, RiskScenario};

use crate::config::{EngineConfig, UrgencyThresholds};
use crate::gap::GapAnalysis;

/// Handling priority of a risk. Orders most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UrgencyTier {
    /// Remediate now.
    Immediate,
    /// Remediate within the current planning cycle.
    ShortTerm,
    /// Schedule on the roadmap.
    LongTerm,
}

impl UrgencyTier {
    /// All tiers, most urgent first.
    pub fn all() -> &'static [UrgencyTier] {
        &[Self::Immediate, Self::ShortTerm, Self::LongTerm]
    }

    /// Kebab-case identifier, matching serde.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::ShortTerm => "short-term",
            Self::LongTerm => "long-term",
        }
    }
}

impl std::fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slack applied at tier boundaries so products like `5 × 0.8` land on
/// the threshold they equal.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

impl UrgencyThresholds {
    /// Tier for a severity; `None` when the severity is zero.
    pub fn classify(&self, severity: f64) -> Option<UrgencyTier> {
        if severity.is_nan() || severity <= 0.0 {
            None
        } else if severity >= self.immediate - BOUNDARY_TOLERANCE {
            Some(UrgencyTier::Immediate)
        } else if severity >= self.short_term - BOUNDARY_TOLERANCE {
            Some(UrgencyTier::ShortTerm)
        } else {
            Some(UrgencyTier::LongTerm)
        }
    }
}

/// One ranked risk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskEntry {
    /// `RISK-<control>`.
    pub id: String,
    /// Control whose gap drives the risk.
    pub control: ControlId,
    /// Control label.
    pub label: String,
    /// Domain shared by every derived gap.
    pub domain: Domain,
    /// Gaps this entry derives from (all in `domain`).
    pub derived_from: Vec<ControlId>,
    /// Gap points.
    pub gap: u8,
    /// `gap × domain weight`.
    pub severity: f64,
    /// Urgency tier.
    pub tier: UrgencyTier,
    /// Threat actors for the domain.
    pub threat_actors: Vec<String>,
    /// Impact categories for the domain.
    pub impact_categories: Vec<String>,
    /// Recommended mitigations.
    pub mitigations: Vec<String>,
    /// Key risk indicators to monitor.
    pub kris: Vec<Kri>,
    /// Named scenarios from the domain risk register, highest score first.
    pub scenarios: Vec<RiskScenario>,
}

/// Gap magnitude times impact weight. Any open gap under a positive weight
/// has a positive severity.
pub fn severity(gap: u8, weight: f64) -> f64 {
    f64::from(gap) * weight
}

/// Total order used for the risk register.
pub fn risk_order(a: &RiskEntry, b: &RiskEntry) -> Ordering {
    a.tier
        .cmp(&b.tier)
        .then_with(|| b.severity.total_cmp(&a.severity))
        .then_with(|| a.domain.as_str().cmp(b.domain.as_str()))
        .then_with(|| a.control.cmp(&b.control))
}

/// Build and rank risk entries for every open gap.
pub fn prioritize(
    gaps: &GapAnalysis,
    taxonomy: &ControlTaxonomy,
    knowledge: &RiskKnowledgeBase,
    config: &EngineConfig,
) -> Vec<RiskEntry> {
    let mut entries: Vec<RiskEntry> = gaps
        .open()
        .filter_map(|gap| {
            let severity = severity(gap.gap, config.weight(gap.domain));
            let tier = config.urgency.classify(severity)?;
            let kb = knowledge.domain(gap.domain);
            let mut scenarios: Vec<RiskScenario> =
                kb.map(|k| k.scenarios.clone()).unwrap_or_default();
            scenarios.sort_by(|a, b| b.score().cmp(&a.score()).then_with(|| a.id.cmp(&b.id)));
            Some(RiskEntry {
                id: format!("RISK-{}", gap.control),
                label: taxonomy
                    .get(&gap.control)
                    .map(|c| c.label.clone())
                    .unwrap_or_default(),
                control: gap.control.clone(),
                domain: gap.domain,
                derived_from: vec![gap.control.clone()],
                gap: gap.gap,
                severity,
                tier,
                threat_actors: kb.map(|k| k.threat_actors.clone()).unwrap_or_default(),
                impact_categories: kb.map(|k| k.impact_categories.clone()).unwrap_or_default(),
                mitigations: kb
                    .map(|k| k.mitigations_for(&gap.control).to_vec())
                    .unwrap_or_default(),
                kris: kb.map(|k| k.kris.clone()).unwrap_or_default(),
                scenarios,
            })
        })
        .collect();
    entries.sort_by(risk_order);

    tracing::debug!(
        risks = entries.len(),
        immediate = entries.iter().filter(|e| e.tier == UrgencyTier::Immediate).count(),
        "risks prioritized"
    );
    entries
}
