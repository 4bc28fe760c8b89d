use crate::types::Tier;
use std::collections::BTreeMap;

/// Keyword hits per feature label for one screen subtree, e.g. `{"forms": 2}`.
pub type FeatureCounts = BTreeMap<String, usize>;

// ---------------------------------------------------------------------------
// TierRule
// ---------------------------------------------------------------------------

/// A tier is assigned when any of its indicator labels has a non-zero count.
pub struct TierRule {
    pub tier: Tier,
    pub indicators: &'static [&'static str],
}

/// Evaluated top-down; the first rule with a hit wins regardless of counts.
/// Device-dependent work outranks interactivity, which outranks plain CRUD.
pub const TIER_RULES: &[TierRule] = &[
    TierRule {
        tier: Tier::Advanced,
        indicators: &[
            "camera",
            "scanner",
            "map",
            "video",
            "realtime",
            "animation",
            "device_api",
        ],
    },
    TierRule {
        tier: Tier::Complex,
        indicators: &["charts", "timers", "builders", "drag_drop", "swipe"],
    },
    TierRule {
        tier: Tier::Standard,
        indicators: &[
            "forms",
            "lists",
            "cards",
            "crud",
            "detail_view",
            "modals",
            "tabs",
        ],
    },
];

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

pub fn classify_tier(counts: &FeatureCounts) -> Tier {
    for rule in TIER_RULES {
        let hit = rule
            .indicators
            .iter()
            .any(|label| counts.get(*label).copied().unwrap_or(0) > 0);
        if hit {
            return rule.tier;
        }
    }
    Tier::Static
}
