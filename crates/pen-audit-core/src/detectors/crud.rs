use super::{contains_any, into_detail, normalize_name, Detector};
use crate::feature::Feature;
use crate::node::Document;
use crate::types::{Category, Tier};
use serde_json::json;
use std::collections::BTreeMap;

const NAME_SIGNALS: &[(&str, &[&str])] = &[
    ("create", &["add", "create", "new", "plus", "compose"]),
    ("edit", &["edit", "modify", "update", "pencil", "pen"]),
    ("delete", &["delete", "remove", "trash", "bin", "discard"]),
    ("detail", &["detail", "view", "info", "profile", "preview"]),
    (
        "empty_state",
        &["empty", "no_data", "no_items", "placeholder", "zero_state", "blank"],
    ),
];

const TEXT_SIGNALS: &[(&str, &[&str])] = &[
    ("create", &["add ", "create ", "new "]),
    (
        "empty_state",
        &["no items", "nothing here", "get started", "empty"],
    ),
];

const TEXT_PREVIEW_CHARS: usize = 30;

/// One feature per screen showing any create, edit, delete, detail or
/// empty-state signal in node names or visible text.
pub struct CrudDetector;

impl Detector for CrudDetector {
    fn name(&self) -> &'static str {
        "crud"
    }

    fn detect(&self, doc: &Document) -> Vec<Feature> {
        let mut features = Vec::new();

        for screen in doc.screens() {
            let mut ops: BTreeMap<&str, Vec<String>> = BTreeMap::new();

            for node in screen.walk().filter(|n| !n.name.is_empty()) {
                let name = normalize_name(&node.name);
                for (op, keywords) in NAME_SIGNALS {
                    if contains_any(&name, keywords) {
                        ops.entry(*op).or_default().push(node.name.clone());
                    }
                }
            }

            for text in screen.text_content() {
                let lower = text.to_lowercase();
                let preview: String = text.chars().take(TEXT_PREVIEW_CHARS).collect();
                for (op, phrases) in TEXT_SIGNALS {
                    if contains_any(&lower, phrases) {
                        ops.entry(*op).or_default().push(format!("text: {preview}"));
                    }
                }
            }

            if ops.is_empty() {
                continue;
            }

            let ops_summary = ops
                .iter()
                .map(|(op, hits)| format!("{op}({})", hits.len()))
                .collect::<Vec<_>>()
                .join(", ");

            features.push(Feature::detected(
                self.name(),
                &screen.id,
                format!("{}::crud", screen.name),
                Category::Crud,
                Tier::Standard,
                format!("CRUD: {ops_summary} in {}", screen.name),
                into_detail(json!({
                    "operations": ops,
                    "screen_name": screen.name,
                })),
            ));
        }

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::tests::sample_doc;

    #[test]
    fn food_log_has_create() {
        let features = CrudDetector.detect(&sample_doc());
        let food_log = features
            .iter()
            .find(|f| f.screen_name() == Some("Food Log"))
            .unwrap();
        let create = food_log.detail["operations"]["create"].as_array().unwrap();
        assert!(create.contains(&json!("addFoodButton")));
        assert!(create.contains(&json!("text: Add Food")));
        assert_eq!(food_log.tier, Tier::Standard);
        assert_eq!(food_log.id, "crud::food_log::Food Log::crud");
    }

    #[test]
    fn empty_state_from_text() {
        let doc = Document::from_value(&json!({
            "id": "root",
            "children": [{"id": "lists", "type": "frame", "name": "Lists", "children": [
                {"id": "t", "type": "text", "content": "Nothing here yet, tap the button to get started with your first shopping list"}
            ]}]
        }));
        let f = &CrudDetector.detect(&doc)[0];
        let hits = f.detail["operations"]["empty_state"].as_array().unwrap();
        assert_eq!(hits, &vec![json!("text: Nothing here yet, tap the butt")]);
        assert_eq!(f.summary, "CRUD: empty_state(1) in Lists");
    }

    #[test]
    fn quiet_screen_has_no_crud() {
        let doc = Document::from_value(&json!({
            "id": "root",
            "children": [{"id": "about", "type": "frame", "name": "About", "children": [
                {"id": "t", "type": "text", "content": "Version 2.1"}
            ]}]
        }));
        assert!(CrudDetector.detect(&doc).is_empty());
    }
}
