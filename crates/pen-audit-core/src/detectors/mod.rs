//! UI pattern detectors.
//!
//! Each detector is stateless and independent: it takes a whole document and
//! returns the features it recognises. Detectors may look at the same nodes;
//! the feature id is namespaced by detector name so their output never
//! collides.

mod component;
mod crud;
mod data_display;
mod form;
mod interactive;
mod navigation;
mod screen;

pub use component::ComponentDetector;
pub use crud::CrudDetector;
pub use data_display::DataDisplayDetector;
pub use form::FormDetector;
pub use interactive::InteractiveDetector;
pub use navigation::NavigationDetector;
pub use screen::ScreenDetector;

use crate::feature::{Detail, Feature};
use crate::node::Document;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

pub trait Detector {
    fn name(&self) -> &'static str;
    fn detect(&self, doc: &Document) -> Vec<Feature>;
}

/// Every detector, in the order their output is concatenated.
pub fn all_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(ScreenDetector),
        Box::new(ComponentDetector),
        Box::new(NavigationDetector),
        Box::new(FormDetector),
        Box::new(DataDisplayDetector),
        Box::new(InteractiveDetector),
        Box::new(CrudDetector),
    ]
}

pub fn run_all_detectors(doc: &Document) -> Vec<Feature> {
    let mut features = Vec::new();
    for detector in all_detectors() {
        let found = detector.detect(doc);
        tracing::debug!("{}: {} features", detector.name(), found.len());
        features.extend(found);
    }
    features
}

// ---------------------------------------------------------------------------
// Shared matching helpers
// ---------------------------------------------------------------------------

/// Lowercase, with spaces and hyphens turned into underscores.
pub(crate) fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace([' ', '-'], "_")
}

pub(crate) fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

pub(crate) fn into_detail(value: Value) -> Detail {
    match value {
        Value::Object(map) => map,
        _ => Detail::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
