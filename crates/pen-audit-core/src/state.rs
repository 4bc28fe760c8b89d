use crate::error::{PenAuditError, Result};
use crate::feature::Feature;
use crate::paths;
use crate::stats::Stats;
use crate::types::{FeatureStatus, Tier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

pub const CURRENT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// ScanDiff
// ---------------------------------------------------------------------------

/// What a merge changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanDiff {
    /// Features inserted for the first time.
    pub new: usize,
    /// Open features that moved to removed_from_design.
    pub removed: usize,
    /// Distinct feature ids in the fresh scan.
    pub total: usize,
}

/// Result of [`State::merge_scan`]: the next state and the diff that led to it.
#[derive(Debug, Clone)]
pub struct Merged {
    pub state: State,
    pub diff: ScanDiff,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub last_scan: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scan_count: u32,
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default, deserialize_with = "lenient_features")]
    pub features: BTreeMap<String, Feature>,
    #[serde(default)]
    pub stats: Stats,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

/// One damaged entry must not cost the whole state: entries are repaired
/// where possible and dropped with a warning otherwise.
fn lenient_features<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<BTreeMap<String, Feature>, D::Error> {
    let raw = Option::<BTreeMap<String, Value>>::deserialize(d)?.unwrap_or_default();
    let mut features = BTreeMap::new();
    for (key, value) in raw {
        match Feature::from_stored(&key, value) {
            Some(feature) => {
                features.insert(key, feature);
            }
            None => tracing::warn!(id = %key, "dropping unreadable feature entry"),
        }
    }
    Ok(features)
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub fn new() -> Self {
        Self {
            version: CURRENT_VERSION,
            created: Utc::now(),
            last_scan: None,
            scan_count: 0,
            source_file: None,
            features: BTreeMap::new(),
            stats: Stats::default(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Load state from `path`. Never fails: a missing file gives a fresh
    /// state, a corrupt one falls back to the backup and then to a fresh state.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::new();
        }

        let err = match Self::read(path) {
            Ok(state) => return state,
            Err(e) => e,
        };

        let backup = paths::backup_path(path);
        if backup.exists() {
            match Self::read(&backup) {
                Ok(state) => {
                    tracing::warn!(
                        "state file {} unreadable ({err}); restored from {}",
                        path.display(),
                        backup.display()
                    );
                    return state;
                }
                Err(e) => tracing::debug!("backup {} unreadable: {e}", backup.display()),
            }
        }

        tracing::warn!(
            "state file {} corrupted ({err}); starting fresh",
            path.display()
        );
        Self::new()
    }

    fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let mut state: State = serde_json::from_str(&data)?;
        state.recompute_stats();
        Ok(state)
    }

    /// Recompute stats and write atomically, keeping the previous file as a
    /// backup. Fails only when neither the atomic nor the direct write works.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.recompute_stats();
        let mut data = serde_json::to_string_pretty(self)?;
        data.push('\n');
        crate::io::durable_write(path, data.as_bytes(), Some(&paths::backup_path(path)))
    }

    pub fn recompute_stats(&mut self) {
        self.stats = Stats::compute(self.features.values());
    }

    // ---------------------------------------------------------------------------
    // Reconciliation
    // ---------------------------------------------------------------------------

    /// Reconcile a fresh scan against this state, returning the next state.
    ///
    /// Known ids keep their status and first-seen time; tier, summary, detail
    /// and last-seen are refreshed. Unknown ids are inserted as open. Open
    /// features missing from the scan become removed_from_design; any other
    /// status is left alone. A removed feature that shows up again is
    /// treated as known, so it stays removed until someone resolves it.
    pub fn merge_scan(&self, fresh: Vec<Feature>, source: &str) -> Merged {
        let now = Utc::now();
        let mut next = self.clone();
        next.last_scan = Some(now);
        next.scan_count += 1;
        if !source.is_empty() {
            next.source_file = Some(source.to_string());
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut diff = ScanDiff::default();

        for mut feature in fresh {
            seen.insert(feature.id.clone());
            match next.features.get_mut(&feature.id) {
                Some(existing) => {
                    existing.tier = feature.tier;
                    existing.summary = feature.summary;
                    existing.detail = feature.detail;
                    existing.last_seen = now;
                }
                None => {
                    feature.status = FeatureStatus::Open;
                    next.features.insert(feature.id.clone(), feature);
                    diff.new += 1;
                }
            }
        }

        for (id, feature) in next.features.iter_mut() {
            if !seen.contains(id) && feature.is_open() {
                feature.status = FeatureStatus::RemovedFromDesign;
                diff.removed += 1;
            }
        }

        diff.total = seen.len();
        next.recompute_stats();
        tracing::debug!(
            "merged scan #{}: {} new, {} removed, {} total",
            next.scan_count,
            diff.new,
            diff.removed,
            diff.total
        );
        Merged { state: next, diff }
    }

    /// Set `status` on every open feature whose id equals `pattern`, whose
    /// node id equals `pattern`, or whose id contains `pattern`. A shared
    /// prefix such as `screen::abc` resolves a whole group at once.
    ///
    /// Returns the ids that changed.
    pub fn resolve(&mut self, pattern: &str, status: FeatureStatus) -> Result<Vec<String>> {
        if !status.is_resolution() {
            return Err(PenAuditError::NotAResolution(status.to_string()));
        }

        let mut resolved = Vec::new();
        for (id, feature) in self.features.iter_mut() {
            if !feature.is_open() {
                continue;
            }
            if id == pattern || feature.screen_id == pattern || id.contains(pattern) {
                feature.status = status;
                resolved.push(id.clone());
            }
        }
        self.recompute_stats();
        Ok(resolved)
    }

    // ---------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------

    /// Features with `status` (all when `None`) matching `pattern` (all when
    /// `None`), ordered by tier then detector.
    pub fn filter(&self, status: Option<FeatureStatus>, pattern: Option<&str>) -> Vec<&Feature> {
        let mut out: Vec<&Feature> = self
            .features
            .values()
            .filter(|f| status.map_or(true, |s| f.status == s))
            .filter(|f| pattern.map_or(true, |p| f.matches_query(p)))
            .collect();
        out.sort_by(|a, b| (a.tier, &a.detector).cmp(&(b.tier, &b.detector)));
        out
    }

    /// Cheapest open work first: by tier, then detector, then name.
    pub fn next_open(&self, tier: Option<Tier>, count: usize) -> Vec<&Feature> {
        let mut open: Vec<&Feature> = self
            .features
            .values()
            .filter(|f| f.is_open())
            .filter(|f| tier.map_or(true, |t| f.tier == t))
            .collect();
        open.sort_by(|a, b| {
            (a.tier, &a.detector, &a.name).cmp(&(b.tier, &b.detector, &b.name))
        });
        open.truncate(count);
        open
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
