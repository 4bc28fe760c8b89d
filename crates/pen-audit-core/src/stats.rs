use crate::feature::Feature;
use crate::types::{FeatureStatus, Tier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// TierStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierStats {
    pub total: usize,
    pub done: usize,
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Aggregates derived from the feature map. Recomputed on every save and
/// merge; never edited by hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub open: usize,
    #[serde(default)]
    pub implemented: usize,
    #[serde(default)]
    pub deferred: usize,
    #[serde(default)]
    pub out_of_scope: usize,
    #[serde(default)]
    pub removed_from_design: usize,
    /// implemented / total as a percentage, one decimal.
    #[serde(default)]
    pub pct: f64,
    #[serde(default)]
    pub by_tier: BTreeMap<u8, TierStats>,
    /// Completion weighted by tier effort, one decimal.
    #[serde(default)]
    pub effort_score: f64,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round1(part as f64 / whole as f64 * 100.0)
    }
}

impl Stats {
    pub fn compute<'a>(features: impl IntoIterator<Item = &'a Feature>) -> Self {
        let mut stats = Stats::default();
        let mut total_effort = 0u64;
        let mut done_effort = 0u64;

        for f in features {
            stats.total += 1;
            let weight = u64::from(f.tier.effort_weight());
            total_effort += weight;

            let tier = stats.by_tier.entry(f.tier.number()).or_default();
            tier.total += 1;

            match f.status {
                FeatureStatus::Open => stats.open += 1,
                FeatureStatus::Implemented => {
                    stats.implemented += 1;
                    tier.done += 1;
                    done_effort += weight;
                }
                FeatureStatus::Deferred => stats.deferred += 1,
                FeatureStatus::OutOfScope => stats.out_of_scope += 1,
                FeatureStatus::RemovedFromDesign => stats.removed_from_design += 1,
            }
        }

        stats.pct = percent(stats.implemented as u64, stats.total as u64);
        stats.effort_score = percent(done_effort, total_effort);
        stats
    }

    pub fn count(&self, status: FeatureStatus) -> usize {
        match status {
            FeatureStatus::Open => self.open,
            FeatureStatus::Implemented => self.implemented,
            FeatureStatus::Deferred => self.deferred,
            FeatureStatus::OutOfScope => self.out_of_scope,
            FeatureStatus::RemovedFromDesign => self.removed_from_design,
        }
    }

    pub fn tier(&self, tier: Tier) -> TierStats {
        self.by_tier
            .get(&tier.number())
            .copied()
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
