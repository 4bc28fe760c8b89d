use super::{into_detail, Detector};
use crate::feature::Feature;
use crate::node::{Document, PropValue};
use crate::types::{Category, Tier};
use serde_json::json;
use std::collections::BTreeMap;

/// Reports every reusable component with how often screens instantiate it.
///
/// Usage has to be tallied over all screens before any component is
/// emitted, so unlike the per-screen detectors this one needs the whole
/// document up front.
pub struct ComponentDetector;

#[derive(Default)]
struct Usage<'a> {
    count: usize,
    screens: Vec<&'a str>,
}

impl Detector for ComponentDetector {
    fn name(&self) -> &'static str {
        "component"
    }

    fn detect(&self, doc: &Document) -> Vec<Feature> {
        let mut usage: BTreeMap<&str, Usage> = BTreeMap::new();
        for screen in doc.screens() {
            for node in screen.walk().filter(|n| n.is_instance()) {
                let Some(target) = node.property("ref").and_then(PropValue::as_str) else {
                    continue;
                };
                if target.is_empty() {
                    continue;
                }
                let entry = usage.entry(target).or_default();
                entry.count += 1;
                if !screen.name.is_empty() && !entry.screens.contains(&screen.name.as_str()) {
                    entry.screens.push(&screen.name);
                }
            }
        }

        doc.components()
            .into_iter()
            .map(|comp| {
                let label = if comp.name.is_empty() {
                    comp.id.as_str()
                } else {
                    comp.name.as_str()
                };
                let (count, screens) = usage
                    .get(comp.id.as_str())
                    .map(|u| (u.count, u.screens.clone()))
                    .unwrap_or_default();

                Feature::detected(
                    self.name(),
                    &comp.id,
                    label,
                    Category::Component,
                    Tier::Static,
                    format!(
                        "Component: {label} (used {count}x across {} screens)",
                        screens.len()
                    ),
                    into_detail(json!({
                        "usage_count": count,
                        "screens_used": screens,
                        "child_count": comp.descendant_count(),
                        "node_types": comp.count_by_type(),
                    })),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::tests::sample_doc;

    #[test]
    fn reports_component_with_usage() {
        let features = ComponentDetector.detect(&sample_doc());
        assert_eq!(features.len(), 1);
        let f = &features[0];
        assert_eq!(f.name, "SearchBar");
        assert_eq!(f.tier, Tier::Static);
        assert_eq!(f.detail["usage_count"], json!(1));
        assert_eq!(f.detail["screens_used"], json!(["Food Log"]));
        assert_eq!(f.summary, "Component: SearchBar (used 1x across 1 screens)");
    }

    #[test]
    fn screens_deduplicated_but_uses_counted() {
        let doc = Document::from_value(&json!({
            "id": "root",
            "children": [
                {"id": "a", "type": "frame", "name": "Inbox", "children": [
                    {"id": "r1", "type": "ref", "ref": "chip"},
                    {"id": "r2", "type": "ref", "ref": "chip"}
                ]},
                {"id": "b", "type": "frame", "name": "Archive", "children": [
                    {"id": "r3", "type": "ref", "ref": "chip"},
                    {"id": "r4", "type": "ref"}
                ]},
                {"id": "chip", "type": "frame", "name": "Chip", "reusable": true},
                {"id": "unused", "type": "frame", "reusable": true}
            ]
        }));
        let features = ComponentDetector.detect(&doc);
        let chip = features.iter().find(|f| f.screen_id == "chip").unwrap();
        assert_eq!(chip.detail["usage_count"], json!(3));
        assert_eq!(chip.detail["screens_used"], json!(["Inbox", "Archive"]));

        let unused = features.iter().find(|f| f.screen_id == "unused").unwrap();
        assert_eq!(unused.name, "unused");
        assert_eq!(unused.detail["usage_count"], json!(0));
    }

    #[test]
    fn nested_reusable_nodes_are_components() {
        let doc = Document::from_value(&json!({
            "id": "root",
            "children": [
                {"id": "lib", "type": "frame", "name": "Components", "children": [
                    {"id": "btn", "type": "frame", "name": "Button", "reusable": true}
                ]}
            ]
        }));
        let features = ComponentDetector.detect(&doc);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].id, "component::btn::Button");
    }
}
