use super::{contains_any, into_detail, normalize_name, Detector};
use crate::feature::Feature;
use crate::node::Document;
use crate::types::{Category, Tier};
use serde_json::json;
use std::collections::BTreeMap;

/// Checked in order; a node counts toward the first pattern it matches.
const NAV_PATTERNS: &[(&str, &[&str])] = &[
    (
        "tab_bar",
        &["tabbar", "tab_bar", "bottom_nav", "bottomnav", "navigation_bar", "navbar"],
    ),
    ("sidebar", &["sidebar", "side_nav", "sidenav", "drawer", "nav_drawer"]),
    (
        "back_button",
        &["back", "back_button", "back_arrow", "chevron_left", "arrow_left"],
    ),
    (
        "header",
        &["header", "topbar", "top_bar", "app_bar", "appbar", "screen_header"],
    ),
    ("breadcrumb", &["breadcrumb", "bread_crumb"]),
];

fn match_nav_pattern(name: &str) -> Option<&'static str> {
    let name = normalize_name(name);
    NAV_PATTERNS
        .iter()
        .find(|(_, keywords)| contains_any(&name, keywords))
        .map(|(pattern, _)| *pattern)
}

/// One feature per (screen, navigation pattern) pair.
pub struct NavigationDetector;

impl Detector for NavigationDetector {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn detect(&self, doc: &Document) -> Vec<Feature> {
        let mut features = Vec::new();

        for screen in doc.screens() {
            let mut found: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
            for node in screen.walk().filter(|n| !n.name.is_empty()) {
                if let Some(pattern) = match_nav_pattern(&node.name) {
                    found.entry(pattern).or_default().push(&node.name);
                }
            }

            for (pattern, instances) in found {
                let tier = if matches!(pattern, "header" | "back_button") {
                    Tier::Static
                } else {
                    Tier::Standard
                };
                features.push(Feature::detected(
                    self.name(),
                    &screen.id,
                    format!("{}::{pattern}", screen.name),
                    Category::Navigation,
                    tier,
                    format!(
                        "Nav: {pattern} in {} ({} elements)",
                        screen.name,
                        instances.len()
                    ),
                    into_detail(json!({
                        "pattern_type": pattern,
                        "instances": instances,
                        "screen_name": screen.name,
                    })),
                ));
            }
        }

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::tests::sample_doc;

    #[test]
    fn finds_headers_and_back_buttons() {
        let features = NavigationDetector.detect(&sample_doc());
        let patterns: Vec<_> = features
            .iter()
            .map(|f| f.detail["pattern_type"].as_str().unwrap())
            .collect();
        assert!(patterns.contains(&"header"));
        assert!(patterns.contains(&"back_button"));
        // Food Log, Barcode Scanner and Settings each have a header.
        assert_eq!(patterns.iter().filter(|p| **p == "header").count(), 3);
    }

    #[test]
    fn first_matching_pattern_wins() {
        assert_eq!(match_nav_pattern("Tab Bar"), Some("tab_bar"));
        assert_eq!(match_nav_pattern("back-arrow"), Some("back_button"));
        assert_eq!(match_nav_pattern("App Bar"), Some("header"));
        assert_eq!(match_nav_pattern("Nav Drawer"), Some("sidebar"));
        assert_eq!(match_nav_pattern("hero image"), None);
    }

    #[test]
    fn tiers_by_pattern() {
        let doc = Document::from_value(&json!({
            "id": "root",
            "children": [{"id": "home", "type": "frame", "name": "Home", "children": [
                {"id": "n1", "type": "frame", "name": "bottom-nav"},
                {"id": "n2", "type": "frame", "name": "Header"},
                {"id": "n3", "type": "frame", "name": "breadcrumb trail"}
            ]}]
        }));
        let features = NavigationDetector.detect(&doc);
        let tier_of = |p: &str| {
            features
                .iter()
                .find(|f| f.detail["pattern_type"] == json!(p))
                .unwrap()
                .tier
        };
        assert_eq!(tier_of("tab_bar"), Tier::Standard);
        assert_eq!(tier_of("header"), Tier::Static);
        assert_eq!(tier_of("breadcrumb"), Tier::Standard);
        assert!(features.iter().all(|f| f.category == Category::Navigation));
        assert!(features.iter().any(|f| f.id == "navigation::home::Home::tab_bar"));
    }
}
