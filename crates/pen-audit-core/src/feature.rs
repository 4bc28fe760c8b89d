use crate::types::{Category, FeatureStatus, Tier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Detector-specific structured data attached to a feature.
pub type Detail = Map<String, Value>;

/// `detector::node_id::name`, or `detector::node_id` when there is no name.
pub fn feature_id(detector: &str, node_id: &str, name: &str) -> String {
    if name.is_empty() {
        format!("{detector}::{node_id}")
    } else {
        format!("{detector}::{node_id}::{name}")
    }
}

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub detector: String,
    /// Id of the design node the feature was detected on.
    pub screen_id: String,
    #[serde(default)]
    pub name: String,
    pub category: Category,
    #[serde(default = "default_tier", deserialize_with = "lenient_tier")]
    pub tier: Tier,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub detail: Detail,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: FeatureStatus,
    #[serde(default = "Utc::now")]
    pub first_seen: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub last_seen: DateTime<Utc>,
}

fn default_tier() -> Tier {
    Tier::Standard
}

/// Missing, non-numeric or out-of-range tiers read as Standard.
fn lenient_tier<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Tier, D::Error> {
    let value = Value::deserialize(d)?;
    let number = value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()));
    Ok(number
        .and_then(|n| u8::try_from(n).ok())
        .and_then(|n| Tier::try_from(n).ok())
        .unwrap_or_else(default_tier))
}

/// Unknown status strings read as open.
fn lenient_status<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<FeatureStatus, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(value
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default())
}

impl Feature {
    /// A freshly detected, open feature with its stable id derived.
    pub fn detected(
        detector: &str,
        screen_id: &str,
        name: impl Into<String>,
        category: Category,
        tier: Tier,
        summary: impl Into<String>,
        detail: Detail,
    ) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: feature_id(detector, screen_id, &name),
            detector: detector.to_string(),
            screen_id: screen_id.to_string(),
            name,
            category,
            tier,
            summary: summary.into(),
            detail,
            status: FeatureStatus::Open,
            first_seen: now,
            last_seen: now,
        }
    }

    /// Rebuild a feature from its stored map entry. Identity fields missing
    /// from the entry are recovered from the `detector::node::name` key and
    /// a missing category from the detector name. `None` when the entry
    /// cannot be repaired.
    pub fn from_stored(key: &str, mut value: Value) -> Option<Self> {
        let obj = value.as_object_mut()?;
        let mut parts = key.splitn(3, "::");
        let detector = parts.next().unwrap_or_default();
        let node_id = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();

        obj.entry("id").or_insert_with(|| Value::from(key));
        obj.entry("detector").or_insert_with(|| Value::from(detector));
        obj.entry("screen_id").or_insert_with(|| Value::from(node_id));
        obj.entry("name").or_insert_with(|| Value::from(name));
        if !obj.contains_key("category") {
            let stored = obj.get("detector").and_then(Value::as_str).unwrap_or(detector);
            let category = Category::parse(stored)?;
            obj.insert("category".to_string(), Value::from(category.as_str()));
        }
        serde_json::from_value(value).ok()
    }

    pub fn is_open(&self) -> bool {
        self.status == FeatureStatus::Open
    }

    /// Screen name recorded by per-screen detectors, if any.
    pub fn screen_name(&self) -> Option<&str> {
        self.detail.get("screen_name").and_then(Value::as_str)
    }

    /// Case-insensitive match against detector, name, node id, id and summary.
    pub fn matches_query(&self, pattern: &str) -> bool {
        let pat = pattern.to_lowercase();
        [
            self.detector.as_str(),
            self.name.as_str(),
            self.screen_id.as_str(),
            self.id.as_str(),
            self.summary.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&pat))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
