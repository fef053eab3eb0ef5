use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::mode::RenderMode;

/// The declarative chart description produced by the editor.
///
/// The tree is carried through the workbench unexamined. Every edit replaces
/// it wholesale; nothing here diffs or validates its contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Specification(Value);

impl Specification {
    pub fn new(tree: Value) -> Self {
        Self(tree)
    }

    pub fn tree(&self) -> &Value {
        &self.0
    }

    pub fn into_tree(self) -> Value {
        self.0
    }

    /// Fold render-mode options that live inside the specification.
    ///
    /// With the decal pattern enabled, the root object gains
    /// `aria.enabled = true` and `aria.decal.show = true`, merged into any
    /// `aria` object already present. Non-object roots pass through as-is.
    pub fn folded(&self, mode: &RenderMode) -> Specification {
        if !mode.decal_pattern_enabled {
            return self.clone();
        }

        let mut tree = self.0.clone();
        if let Value::Object(root) = &mut tree {
            let aria = root.entry("aria").or_insert(Value::Null);
            ensure_object(aria);
            aria["enabled"] = Value::Bool(true);
            let decal = &mut aria["decal"];
            ensure_object(decal);
            decal["show"] = Value::Bool(true);
        }
        Specification(tree)
    }

    // ── Serialization ────────────────────────────────────────────────

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.0)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self)
    }
}

impl From<Value> for Specification {
    fn from(tree: Value) -> Self {
        Self(tree)
    }
}

fn ensure_object(value: &mut Value) {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
}
