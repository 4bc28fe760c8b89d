use super::{contains_any, into_detail, normalize_name, Detector};
use crate::feature::Feature;
use crate::node::Document;
use crate::types::{Category, Tier};
use serde_json::json;

struct DisplayPattern {
    pattern: &'static str,
    /// Suffix of the feature name, e.g. `Home::lists`.
    plural: &'static str,
    label: &'static str,
    tier: Tier,
    keywords: &'static [&'static str],
}

const DISPLAY_PATTERNS: &[DisplayPattern] = &[
    DisplayPattern {
        pattern: "list",
        plural: "lists",
        label: "Lists",
        tier: Tier::Standard,
        keywords: &["list", "row", "item", "cell", "feed", "timeline"],
    },
    DisplayPattern {
        pattern: "card",
        plural: "cards",
        label: "Cards",
        tier: Tier::Standard,
        keywords: &["card", "tile", "panel", "widget", "stat_card", "info_card"],
    },
    DisplayPattern {
        pattern: "chart",
        plural: "charts",
        label: "Charts",
        tier: Tier::Complex,
        keywords: &[
            "chart",
            "graph",
            "ring",
            "donut",
            "progress",
            "sparkline",
            "bar_chart",
            "line_chart",
            "pie",
            "gauge",
            "meter",
        ],
    },
    DisplayPattern {
        pattern: "table",
        plural: "tables",
        label: "Tables",
        tier: Tier::Complex,
        keywords: &["table", "grid", "spreadsheet", "data_grid"],
    },
];

/// One feature per (screen, display pattern) pair: lists, cards, charts, tables.
pub struct DataDisplayDetector;

impl Detector for DataDisplayDetector {
    fn name(&self) -> &'static str {
        "data_display"
    }

    fn detect(&self, doc: &Document) -> Vec<Feature> {
        let mut features = Vec::new();

        for screen in doc.screens() {
            let mut found: Vec<Vec<&str>> = vec![Vec::new(); DISPLAY_PATTERNS.len()];
            for node in screen.walk().filter(|n| !n.name.is_empty()) {
                let name = normalize_name(&node.name);
                for (i, p) in DISPLAY_PATTERNS.iter().enumerate() {
                    if contains_any(&name, p.keywords) {
                        found[i].push(&node.name);
                    }
                }
            }

            for (p, instances) in DISPLAY_PATTERNS.iter().zip(found) {
                if instances.is_empty() {
                    continue;
                }
                features.push(Feature::detected(
                    self.name(),
                    &screen.id,
                    format!("{}::{}", screen.name, p.plural),
                    Category::DataDisplay,
                    p.tier,
                    format!("{}: {} in {}", p.label, instances.len(), screen.name),
                    into_detail(json!({
                        "pattern": p.pattern,
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
    fn food_log_has_lists_and_chart() {
        let features = DataDisplayDetector.detect(&sample_doc());
        let patterns: Vec<_> = features
            .iter()
            .map(|f| f.detail["pattern"].as_str().unwrap())
            .collect();
        assert!(patterns.contains(&"list"));
        assert!(patterns.contains(&"chart"));

        let lists = features
            .iter()
            .find(|f| f.name == "Food Log::lists")
            .unwrap();
        assert_eq!(lists.tier, Tier::Standard);
        // mealList plus the three meal rows
        assert_eq!(lists.summary, "Lists: 4 in Food Log");

        let charts = features
            .iter()
            .find(|f| f.name == "Food Log::charts")
            .unwrap();
        assert_eq!(charts.tier, Tier::Complex);
    }

    #[test]
    fn one_node_can_hit_several_patterns() {
        let doc = Document::from_value(&json!({
            "id": "root",
            "children": [{"id": "d", "type": "frame", "name": "Dashboard", "children": [
                {"id": "x", "type": "frame", "name": "chart card"}
            ]}]
        }));
        let features = DataDisplayDetector.detect(&doc);
        let plurals: Vec<_> = features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(plurals, vec!["Dashboard::cards", "Dashboard::charts"]);
    }

    #[test]
    fn tables_are_complex() {
        let doc = Document::from_value(&json!({
            "id": "root",
            "children": [{"id": "r", "type": "frame", "name": "Reports", "children": [
                {"id": "g", "type": "frame", "name": "Data-Grid"}
            ]}]
        }));
        let features = DataDisplayDetector.detect(&doc);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].tier, Tier::Complex);
        assert_eq!(features[0].detail["pattern"], json!("table"));
    }
}
