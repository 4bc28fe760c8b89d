//! In-memory model of an exported design document.
//!
//! Exports from the design tool are not schema-validated, so parsing never
//! fails on shape: missing or mistyped fields fall back to defaults and any
//! key the model does not know is kept verbatim in the node's property bag.

use crate::error::{PenAuditError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    #[default]
    Frame,
    Text,
    Ellipse,
    Rectangle,
    /// Instance of a reusable component.
    Ref,
    Path,
    Image,
    IconFont,
    Line,
    Polygon,
    Connection,
    Note,
    Group,
    /// A type string this model does not know, kept as written.
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Frame => "frame",
            NodeKind::Text => "text",
            NodeKind::Ellipse => "ellipse",
            NodeKind::Rectangle => "rectangle",
            NodeKind::Ref => "ref",
            NodeKind::Path => "path",
            NodeKind::Image => "image",
            NodeKind::IconFont => "icon_font",
            NodeKind::Line => "line",
            NodeKind::Polygon => "polygon",
            NodeKind::Connection => "connection",
            NodeKind::Note => "note",
            NodeKind::Group => "group",
            NodeKind::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "frame" => NodeKind::Frame,
            "text" => NodeKind::Text,
            "ellipse" => NodeKind::Ellipse,
            "rectangle" => NodeKind::Rectangle,
            "ref" => NodeKind::Ref,
            "path" => NodeKind::Path,
            "image" => NodeKind::Image,
            "icon_font" => NodeKind::IconFont,
            "line" => NodeKind::Line,
            "polygon" => NodeKind::Polygon,
            "connection" => NodeKind::Connection,
            "note" => NodeKind::Note,
            "group" => NodeKind::Group,
            other => NodeKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PropValue
// ---------------------------------------------------------------------------

/// Value held in a node's property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<PropValue>),
    Map(BTreeMap<String, PropValue>),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&Value> for PropValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => PropValue::Null,
            Value::Bool(b) => PropValue::Bool(*b),
            Value::Number(n) => PropValue::Number(n.as_f64().unwrap_or_default()),
            Value::String(s) => PropValue::Text(s.clone()),
            Value::Array(items) => PropValue::List(items.iter().map(PropValue::from).collect()),
            Value::Object(map) => PropValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), PropValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&PropValue> for Value {
    fn from(v: &PropValue) -> Self {
        match v {
            PropValue::Null => Value::Null,
            PropValue::Bool(b) => Value::Bool(*b),
            PropValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PropValue::Text(s) => Value::String(s.clone()),
            PropValue::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            PropValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

const RESERVED_KEYS: &[&str] = &["id", "type", "name", "children", "reusable"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    /// Empty when the export carries no name.
    pub name: String,
    pub children: Vec<Node>,
    pub properties: BTreeMap<String, PropValue>,
    pub reusable: bool,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a node from an untyped export object.
    ///
    /// Non-object input yields an empty frame; non-object children are
    /// skipped and a non-array `children` field counts as no children.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Node::default();
        };

        let children = match obj.get("children") {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|c| c.is_object())
                .map(Node::from_value)
                .collect(),
            _ => Vec::new(),
        };

        let id = match obj.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        let kind = obj
            .get("type")
            .and_then(Value::as_str)
            .map(NodeKind::parse)
            .unwrap_or_default();
        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let reusable = obj
            .get("reusable")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let properties = obj
            .iter()
            .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), PropValue::from(v)))
            .collect();

        Self {
            id,
            kind,
            name,
            children,
            properties,
            reusable,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: PropValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn property(&self, key: &str) -> Option<&PropValue> {
        self.properties.get(key)
    }

    pub fn is_screen(&self) -> bool {
        self.kind == NodeKind::Frame && !self.reusable
    }

    pub fn is_instance(&self) -> bool {
        self.kind == NodeKind::Ref
    }

    /// Depth-first pre-order traversal: self, then each child's walk in order.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    pub fn find_by_type(&self, kind: &NodeKind) -> Vec<&Node> {
        self.walk().filter(|n| &n.kind == kind).collect()
    }

    /// Case-insensitive substring match on node names.
    pub fn find_by_name(&self, pattern: &str) -> Vec<&Node> {
        let pattern = pattern.to_lowercase();
        self.walk()
            .filter(|n| n.name.to_lowercase().contains(&pattern))
            .collect()
    }

    /// Non-empty `content` strings of text nodes in the subtree, in walk order.
    pub fn text_content(&self) -> Vec<&str> {
        self.walk()
            .filter(|n| n.kind == NodeKind::Text)
            .filter_map(|n| n.property("content").and_then(PropValue::as_str))
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn count_by_type(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for n in self.walk() {
            *counts.entry(n.kind.as_str().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of descendants, excluding self.
    pub fn descendant_count(&self) -> usize {
        self.walk().count() - 1
    }

    /// 0 for a leaf, otherwise 1 + the deepest child.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.depth())
            .max()
            .unwrap_or(0)
    }
}

/// Iterator returned by [`Node::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub root: Node,
    /// Where the export came from, usually a file path.
    pub source: String,
}

impl Document {
    pub fn new(root: Node, source: impl Into<String>) -> Self {
        Self {
            root,
            source: source.into(),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        Self::new(Node::from_value(value), "")
    }

    /// Load a decrypted JSON export. A missing file or invalid JSON is an
    /// error; a valid JSON value of any shape is accepted.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PenAuditError::DocumentNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&data)?;
        Ok(Self::new(
            Node::from_value(&value),
            path.display().to_string(),
        ))
    }

    /// The root's direct frame children that are not reusable.
    pub fn screens(&self) -> Vec<&Node> {
        self.root.children.iter().filter(|c| c.is_screen()).collect()
    }

    /// Every reusable node anywhere in the tree.
    pub fn components(&self) -> Vec<&Node> {
        self.root.walk().filter(|n| n.reusable).collect()
    }

    /// Every component instance anywhere in the tree.
    pub fn instances(&self) -> Vec<&Node> {
        self.root.walk().filter(|n| n.is_instance()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
