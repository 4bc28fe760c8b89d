use super::{contains_any, into_detail, normalize_name, Detector};
use crate::feature::Feature;
use crate::node::Document;
use crate::types::{Category, Tier};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeSet;

const INPUT_PATTERNS: &[&str] = &[
    "input",
    "field",
    "text_field",
    "textfield",
    "textarea",
    "search",
    "searchbar",
    "search_bar",
    "select",
    "dropdown",
    "picker",
    "combo",
    "toggle",
    "switch",
    "checkbox",
    "check_box",
    "slider",
    "range",
    "radio",
    "radio_button",
    "date",
    "datepicker",
    "date_picker",
    "time_picker",
    "stepper",
    "number_input",
    "password",
    "email",
];

const BUTTON_PATTERNS: &[&str] = &[
    "button",
    "btn",
    "cta",
    "submit",
    "save",
    "cancel",
    "confirm",
    "action",
    "primary_button",
    "secondary_button",
];

/// Beyond this many inputs a form is tiered as complex.
const SIMPLE_FORM_MAX_INPUTS: usize = 5;

/// Kind of control an input-like node most likely is.
pub(crate) fn classify_input(name: &str) -> &'static str {
    let name = normalize_name(name);
    if contains_any(&name, &["toggle", "switch"]) {
        "toggle"
    } else if contains_any(&name, &["slider", "range"]) {
        "slider"
    } else if contains_any(&name, &["select", "dropdown", "picker", "combo"]) {
        "select"
    } else if contains_any(&name, &["checkbox", "check_box", "radio"]) {
        "checkbox"
    } else if name.contains("search") {
        "search"
    } else if contains_any(&name, &["date", "time"]) {
        "date"
    } else if name.contains("textarea") {
        "textarea"
    } else if contains_any(&name, &["stepper", "number"]) {
        "number"
    } else {
        "text"
    }
}

#[derive(Serialize)]
struct Input<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    node_id: &'a str,
}

/// One feature per screen holding at least one input-like node.
pub struct FormDetector;

impl Detector for FormDetector {
    fn name(&self) -> &'static str {
        "form"
    }

    fn detect(&self, doc: &Document) -> Vec<Feature> {
        let mut features = Vec::new();

        for screen in doc.screens() {
            let mut inputs = Vec::new();
            let mut buttons = Vec::new();

            for node in screen.walk().filter(|n| !n.name.is_empty()) {
                let name = normalize_name(&node.name);
                if contains_any(&name, INPUT_PATTERNS) {
                    inputs.push(Input {
                        name: &node.name,
                        kind: classify_input(&node.name),
                        node_id: &node.id,
                    });
                }
                if contains_any(&name, BUTTON_PATTERNS) {
                    buttons.push(node.name.as_str());
                }
            }

            if inputs.is_empty() {
                continue;
            }

            let tier = if inputs.len() <= SIMPLE_FORM_MAX_INPUTS {
                Tier::Standard
            } else {
                Tier::Complex
            };
            let preview: Vec<_> = inputs.iter().take(5).map(|i| i.kind).collect();
            let kinds: BTreeSet<_> = inputs.iter().map(|i| i.kind).collect();

            features.push(Feature::detected(
                self.name(),
                &screen.id,
                format!("{}::form", screen.name),
                Category::Form,
                tier,
                format!(
                    "Form: {} inputs in {} ({})",
                    inputs.len(),
                    screen.name,
                    preview.join(", ")
                ),
                into_detail(json!({
                    "input_count": inputs.len(),
                    "input_types": kinds,
                    "inputs": inputs,
                    "buttons": buttons,
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

    fn screen_with(names: &[&str]) -> Document {
        let children: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, n)| json!({"id": format!("n{i}"), "type": "frame", "name": n}))
            .collect();
        Document::from_value(&json!({
            "id": "root",
            "children": [{"id": "signup", "type": "frame", "name": "Sign Up", "children": children}]
        }))
    }

    #[test]
    fn classify_input_kinds() {
        assert_eq!(classify_input("Dark Mode Toggle"), "toggle");
        assert_eq!(classify_input("volume-slider"), "slider");
        assert_eq!(classify_input("Country Dropdown"), "select");
        assert_eq!(classify_input("terms_checkbox"), "checkbox");
        assert_eq!(classify_input("SearchBar"), "search");
        assert_eq!(classify_input("birth date"), "date");
        assert_eq!(classify_input("bio textarea"), "textarea");
        assert_eq!(classify_input("qty stepper"), "number");
        assert_eq!(classify_input("email input"), "text");
    }

    #[test]
    fn small_form_is_standard() {
        let doc = screen_with(&["email input", "password field", "Submit Button"]);
        let features = FormDetector.detect(&doc);
        assert_eq!(features.len(), 1);
        let f = &features[0];
        assert_eq!(f.tier, Tier::Standard);
        assert_eq!(f.id, "form::signup::Sign Up::form");
        assert_eq!(f.detail["input_count"], json!(2));
        assert_eq!(f.detail["buttons"], json!(["Submit Button"]));
        assert_eq!(f.summary, "Form: 2 inputs in Sign Up (text, text)");
    }

    #[test]
    fn large_form_is_complex() {
        let doc = screen_with(&[
            "first name field",
            "last name field",
            "email input",
            "phone input",
            "country picker",
            "birth date",
        ]);
        let f = &FormDetector.detect(&doc)[0];
        assert_eq!(f.tier, Tier::Complex);
        assert_eq!(f.detail["input_types"], json!(["date", "select", "text"]));
    }

    #[test]
    fn no_inputs_no_feature() {
        let doc = screen_with(&["hero image", "Get Started Button"]);
        assert!(FormDetector.detect(&doc).is_empty());
    }
}
