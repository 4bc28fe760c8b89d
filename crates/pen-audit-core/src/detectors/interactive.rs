use super::{contains_any, into_detail, normalize_name, Detector};
use crate::feature::Feature;
use crate::node::Document;
use crate::types::{Category, Tier};
use serde_json::json;

const INTERACTION_PATTERNS: &[(&str, Tier, &[&str])] = &[
    (
        "tabs",
        Tier::Standard,
        &["tab", "segment", "tab_bar", "segmented_control"],
    ),
    (
        "modals",
        Tier::Standard,
        &["modal", "dialog", "sheet", "bottom_sheet", "overlay", "popup", "alert"],
    ),
    (
        "accordions",
        Tier::Standard,
        &["accordion", "expandable", "collapsible", "dropdown_section"],
    ),
    (
        "swipe",
        Tier::Complex,
        &["swipe", "swipeable", "slide_action", "dismiss"],
    ),
    (
        "drag_drop",
        Tier::Complex,
        &["drag", "reorder", "sortable", "draggable"],
    ),
];

/// One feature per (screen, interaction pattern) pair.
pub struct InteractiveDetector;

impl Detector for InteractiveDetector {
    fn name(&self) -> &'static str {
        "interactive"
    }

    fn detect(&self, doc: &Document) -> Vec<Feature> {
        let mut features = Vec::new();

        for screen in doc.screens() {
            let mut found: Vec<Vec<&str>> = vec![Vec::new(); INTERACTION_PATTERNS.len()];
            for node in screen.walk().filter(|n| !n.name.is_empty()) {
                let name = normalize_name(&node.name);
                for (i, (_, _, keywords)) in INTERACTION_PATTERNS.iter().enumerate() {
                    if contains_any(&name, keywords) {
                        found[i].push(&node.name);
                    }
                }
            }

            for (&(pattern, tier, _), instances) in INTERACTION_PATTERNS.iter().zip(found) {
                if instances.is_empty() {
                    continue;
                }
                features.push(Feature::detected(
                    self.name(),
                    &screen.id,
                    format!("{}::{pattern}", screen.name),
                    Category::Interactive,
                    tier,
                    format!(
                        "Interactive: {pattern} in {} ({} elements)",
                        screen.name,
                        instances.len()
                    ),
                    into_detail(json!({
                        "pattern": pattern,
                        "instances": instances,
                        "screen_name": screen.name,
                    })),
                ));
            }
        }

        features
    }
}
