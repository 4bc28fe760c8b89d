use crate::error::PenAuditError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// FeatureStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    #[default]
    Open,
    Implemented,
    Deferred,
    OutOfScope,
    RemovedFromDesign,
}

impl FeatureStatus {
    pub fn all() -> &'static [FeatureStatus] {
        &[
            FeatureStatus::Open,
            FeatureStatus::Implemented,
            FeatureStatus::Deferred,
            FeatureStatus::OutOfScope,
            FeatureStatus::RemovedFromDesign,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureStatus::Open => "open",
            FeatureStatus::Implemented => "implemented",
            FeatureStatus::Deferred => "deferred",
            FeatureStatus::OutOfScope => "out_of_scope",
            FeatureStatus::RemovedFromDesign => "removed_from_design",
        }
    }

    /// Statuses a human (or the codebase matcher) may assign to an open feature.
    pub fn is_resolution(self) -> bool {
        matches!(
            self,
            FeatureStatus::Implemented | FeatureStatus::Deferred | FeatureStatus::OutOfScope
        )
    }
}

impl fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureStatus {
    type Err = PenAuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(FeatureStatus::Open),
            "implemented" => Ok(FeatureStatus::Implemented),
            "deferred" => Ok(FeatureStatus::Deferred),
            "out_of_scope" => Ok(FeatureStatus::OutOfScope),
            "removed_from_design" => Ok(FeatureStatus::RemovedFromDesign),
            _ => Err(PenAuditError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Screen,
    Component,
    Navigation,
    Form,
    DataDisplay,
    Interactive,
    Crud,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Screen => "screen",
            Category::Component => "component",
            Category::Navigation => "navigation",
            Category::Form => "form",
            Category::DataDisplay => "data_display",
            Category::Interactive => "interactive",
            Category::Crud => "crud",
        }
    }

    /// Category for a snake_case name. Each detector names the category it emits.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "screen" => Some(Category::Screen),
            "component" => Some(Category::Component),
            "navigation" => Some(Category::Navigation),
            "form" => Some(Category::Form),
            "data_display" => Some(Category::DataDisplay),
            "interactive" => Some(Category::Interactive),
            "crud" => Some(Category::Crud),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Implementation complexity, serialized as the bare integer 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    Static = 1,
    Standard = 2,
    Complex = 3,
    Advanced = 4,
}

impl Tier {
    pub fn all() -> &'static [Tier] {
        &[Tier::Static, Tier::Standard, Tier::Complex, Tier::Advanced]
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Static => "Static",
            Tier::Standard => "Standard",
            Tier::Complex => "Complex",
            Tier::Advanced => "Advanced",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Tier::Static => "Static pages, auto-scaffold",
            Tier::Standard => "Standard CRUD screens",
            Tier::Complex => "Complex interactive features",
            Tier::Advanced => "Advanced (real-time, device APIs)",
        }
    }

    /// Relative implementation effort used for weighted completion.
    pub fn effort_weight(self) -> u32 {
        match self {
            Tier::Static => 1,
            Tier::Standard => 2,
            Tier::Complex => 4,
            Tier::Advanced => 8,
        }
    }
}

impl TryFrom<u8> for Tier {
    type Error = PenAuditError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Tier::Static),
            2 => Ok(Tier::Standard),
            3 => Ok(Tier::Complex),
            4 => Ok(Tier::Advanced),
            _ => Err(PenAuditError::InvalidTier(n)),
        }
    }
}

impl From<Tier> for u8 {
    fn from(t: Tier) -> u8 {
        t.number()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.number())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_and_display() {
        for &s in FeatureStatus::all() {
            let parsed: FeatureStatus = s.as_str().parse().unwrap();
            assert_eq!(parsed, s);
        }
        assert!("done".parse::<FeatureStatus>().is_err());
    }

    #[test]
    fn only_three_statuses_resolve() {
        let resolutions: Vec<_> = FeatureStatus::all()
            .iter()
            .filter(|s| s.is_resolution())
            .collect();
        assert_eq!(
            resolutions,
            vec![
                &FeatureStatus::Implemented,
                &FeatureStatus::Deferred,
                &FeatureStatus::OutOfScope
            ]
        );
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&FeatureStatus::RemovedFromDesign).unwrap();
        assert_eq!(json, "\"removed_from_design\"");
    }

    #[test]
    fn tier_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Tier::Complex).unwrap(), "3");
        let t: Tier = serde_json::from_str("4").unwrap();
        assert_eq!(t, Tier::Advanced);
        assert!(serde_json::from_str::<Tier>("5").is_err());
    }

    #[test]
    fn tier_weights_double() {
        let weights: Vec<u32> = Tier::all().iter().map(|t| t.effort_weight()).collect();
        assert_eq!(weights, vec![1, 2, 4, 8]);
    }

    #[test]
    fn category_wire_names() {
        assert_eq!(
            serde_json::to_string(&Category::DataDisplay).unwrap(),
            "\"data_display\""
        );
        assert_eq!(Category::Crud.to_string(), "crud");
        assert_eq!(Category::parse("data_display"), Some(Category::DataDisplay));
        assert_eq!(Category::parse("widget"), None);
    }
}
