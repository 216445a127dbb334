//! Component model: the UI element descriptors a step renders.
//!
//! A step owns an ordered list of `Component`s. Containers (`BLOCK`, `FORM`)
//! hold a nested `components` list, so a step's view is a tree. Every field
//! besides `id`, `type` and `components` is kept in an open property bag so
//! that descriptors round-trip through the canvas untouched.

#[cfg(test)]
#[path = "component_test.rs"]
mod component_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::{INPUT_KIND_SUFFIX, KIND_ACTION, is_container_kind};

/// Identifier of a component. Unique across the whole tree, not just siblings.
pub type ComponentId = String;

/// A UI element descriptor as stored in step metadata and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Tree-wide unique identifier.
    pub id: ComponentId,
    /// Discriminator (`TEXT`, `BLOCK`, `TEXT_INPUT`, `ACTION`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Nested children. Present only on containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<Component>>,
    /// Remaining descriptor fields (label, variant, ref, required, ...).
    #[serde(flatten)]
    pub props: Map<String, Value>,
}

impl Component {
    /// Create a leaf component with no properties.
    #[must_use]
    pub fn new(id: impl Into<ComponentId>, kind: impl Into<String>) -> Self {
        Self { id: id.into(), kind: kind.into(), components: None, props: Map::new() }
    }

    /// Create a container holding `children`.
    #[must_use]
    pub fn container(id: impl Into<ComponentId>, kind: impl Into<String>, children: Vec<Component>) -> Self {
        Self { id: id.into(), kind: kind.into(), components: Some(children), props: Map::new() }
    }

    /// Set a single property, replacing any previous value.
    #[must_use]
    pub fn with_prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key.to_owned(), value.into());
        self
    }

    /// Children in display order; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Component] {
        self.components.as_deref().unwrap_or_default()
    }

    /// Whether this component can hold nested children.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.components.is_some() || is_container_kind(&self.kind)
    }

    #[must_use]
    pub fn is_action(&self) -> bool {
        self.kind == KIND_ACTION
    }

    #[must_use]
    pub fn is_input(&self) -> bool {
        self.kind.ends_with(INPUT_KIND_SUFFIX)
    }

    /// Typed view over the property bag.
    #[must_use]
    pub fn props(&self) -> Props<'_> {
        Props::new(&self.props)
    }
}

/// Typed access to common descriptor fields.
pub struct Props<'a> {
    value: &'a Map<String, Value>,
}

impl<'a> Props<'a> {
    #[must_use]
    pub fn new(value: &'a Map<String, Value>) -> Self {
        Self { value }
    }

    /// Display label (usually an i18n template). Empty string when absent.
    #[must_use]
    pub fn label(&self) -> &str {
        self.str_field("label")
    }

    /// Input binding name. Empty string when absent.
    #[must_use]
    pub fn reference(&self) -> &str {
        self.str_field("ref")
    }

    /// Event emitted by actions (`SUBMIT`, `TRIGGER`, ...). Empty string when absent.
    #[must_use]
    pub fn event_type(&self) -> &str {
        self.str_field("eventType")
    }

    /// Whether an input must be filled. Defaults to `false`.
    #[must_use]
    pub fn required(&self) -> bool {
        self.value
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn str_field(&self, key: &str) -> &'a str {
        self.value.get(key).and_then(Value::as_str).unwrap_or("")
    }
}
