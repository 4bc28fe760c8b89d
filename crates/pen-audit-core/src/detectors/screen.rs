use super::{contains_any, into_detail, Detector};
use crate::feature::Feature;
use crate::node::{Document, Node, NodeKind, PropValue};
use crate::tier::{classify_tier, FeatureCounts};
use crate::types::Category;
use serde_json::{json, Value};

/// Top-level frame names that hold the design system rather than a screen.
const SYSTEM_NAMES: &[&str] = &[
    "design system",
    "components",
    "symbols",
    "tokens",
    "colors",
    "typography",
    "icons",
    "library",
    "assets",
    "styles",
];

/// One feature per top-level, non-reusable frame, tiered by what it contains.
pub struct ScreenDetector;

impl Detector for ScreenDetector {
    fn name(&self) -> &'static str {
        "screen"
    }

    fn detect(&self, doc: &Document) -> Vec<Feature> {
        let mut features = Vec::new();

        for screen in &doc.root.children {
            if screen.kind != NodeKind::Frame || screen.reusable {
                continue;
            }
            if !screen.name.is_empty() && SYSTEM_NAMES.contains(&screen.name.to_lowercase().as_str())
            {
                continue;
            }

            let platform = detect_platform(screen);
            let counts = count_features(screen);
            let tier = classify_tier(&counts);
            let label = if screen.name.is_empty() {
                screen.id.as_str()
            } else {
                screen.name.as_str()
            };
            let heading = screen
                .text_content()
                .first()
                .map(|s| s.to_string())
                .unwrap_or_else(|| screen.name.clone());

            features.push(Feature::detected(
                self.name(),
                &screen.id,
                label,
                Category::Screen,
                tier,
                format!("Screen: {label} ({platform}, {tier})"),
                into_detail(json!({
                    "platform": platform,
                    "width": prop_json(screen, "width"),
                    "height": prop_json(screen, "height"),
                    "heading": heading,
                    "child_count": screen.descendant_count(),
                    "depth": screen.depth(),
                    "feature_counts": counts,
                    "node_types": screen.count_by_type(),
                })),
            ));
        }

        features
    }
}

fn prop_json(node: &Node, key: &str) -> Value {
    node.property(key).map(Value::from).unwrap_or(Value::Null)
}

/// Target platform guessed from the frame width.
pub(crate) fn detect_platform(node: &Node) -> &'static str {
    let Some(w) = node.property("width").and_then(PropValue::as_f64) else {
        return "unknown";
    };
    if (320.0..430.0).contains(&w) {
        "mobile"
    } else if (700.0..850.0).contains(&w) {
        "tablet"
    } else if w >= 1200.0 {
        "desktop"
    } else {
        "unknown"
    }
}

fn bump(counts: &mut FeatureCounts, label: &str) {
    *counts.entry(label.to_string()).or_insert(0) += 1;
}

/// Keyword hits across the screen subtree, fed to the tier classifier.
pub(crate) fn count_features(screen: &Node) -> FeatureCounts {
    let mut counts = FeatureCounts::new();
    let types = screen.count_by_type();
    counts.insert(
        "text_nodes".to_string(),
        types.get("text").copied().unwrap_or(0),
    );
    counts.insert(
        "ref_nodes".to_string(),
        types.get("ref").copied().unwrap_or(0),
    );

    for n in screen.walk() {
        let name = n.name.to_lowercase();
        // Frames also contribute their text so "Add item" labels count as CRUD.
        let combined = if n.kind == NodeKind::Frame {
            format!("{name} {}", n.text_content().join(" ").to_lowercase())
        } else {
            format!("{name} ")
        };

        if contains_any(&name, &["input", "field", "text_field", "search", "form"]) {
            bump(&mut counts, "forms");
        }
        if contains_any(&name, &["list", "row", "item", "cell"]) {
            bump(&mut counts, "lists");
        }
        if name.contains("card") {
            bump(&mut counts, "cards");
        }
        if contains_any(&name, &["chart", "graph", "ring", "progress", "donut"]) {
            bump(&mut counts, "charts");
        }
        if contains_any(&name, &["tab", "segment"]) {
            bump(&mut counts, "tabs");
        }
        if contains_any(&name, &["modal", "sheet", "dialog", "overlay", "popup"]) {
            bump(&mut counts, "modals");
        }
        if contains_any(&name, &["camera", "scanner", "barcode", "qr"]) {
            bump(&mut counts, "camera");
            bump(&mut counts, "scanner");
        }
        if contains_any(&name, &["timer", "stopwatch", "countdown"]) {
            bump(&mut counts, "timers");
        }
        if name.contains("map") {
            bump(&mut counts, "map");
        }
        if contains_any(&combined, &["add", "create", "new", "edit", "delete", "remove"]) {
            bump(&mut counts, "crud");
        }
        if contains_any(&name, &["drag", "reorder", "sortable"]) {
            bump(&mut counts, "drag_drop");
        }
        if name.contains("builder") {
            bump(&mut counts, "builders");
        }
    }

    counts
}
