//! Descriptors handed over by the drag-drop layer on release.

use serde::{Deserialize, Serialize};

use crate::consts::is_container_kind;
use crate::flow::Position;
use crate::resource::Resource;

/// Where the dragged item came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum DragOrigin {
    /// A fresh resource pulled from the resource panel.
    #[default]
    Palette,
    /// An existing component being reordered; `dragged.id` names it.
    Canvas { step_id: String },
}

/// What is being dropped. `dragged == None` marks a cancelled or malformed drag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragSource {
    #[serde(default)]
    pub dragged: Option<Resource>,
    #[serde(default)]
    pub origin: DragOrigin,
}

impl DragSource {
    /// A new resource dragged from the panel.
    #[must_use]
    pub fn palette(resource: Resource) -> Self {
        Self { dragged: Some(resource), origin: DragOrigin::Palette }
    }

    /// An existing component of `step_id` being moved.
    #[must_use]
    pub fn canvas(step_id: impl Into<String>, resource: Resource) -> Self {
        Self { dragged: Some(resource), origin: DragOrigin::Canvas { step_id: step_id.into() } }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Where the item was released.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTarget {
    /// Step whose component tree receives the drop.
    #[serde(default)]
    pub step_id: Option<String>,
    /// Container the item landed on; `None` means the step root.
    #[serde(default)]
    pub dropped_on: Option<Resource>,
    /// Sibling the item should be placed in front of.
    #[serde(default)]
    pub target_element_id: Option<String>,
    /// Canvas coordinate, used when a step resource is dropped.
    #[serde(default)]
    pub position: Option<Position>,
}

impl DropTarget {
    /// Root of step `step_id`.
    #[must_use]
    pub fn step(step_id: impl Into<String>) -> Self {
        Self { step_id: Some(step_id.into()), ..Self::default() }
    }

    /// Canvas background at `position`.
    #[must_use]
    pub fn canvas_at(position: Position) -> Self {
        Self { position: Some(position), ..Self::default() }
    }

    /// Drop into `container` (a component of the same step).
    #[must_use]
    pub fn on(mut self, container: Resource) -> Self {
        self.dropped_on = Some(container);
        self
    }

    /// Place in front of sibling `element_id`.
    #[must_use]
    pub fn before(mut self, element_id: impl Into<String>) -> Self {
        self.target_element_id = Some(element_id.into());
        self
    }

    /// Step id if present and non-empty.
    #[must_use]
    pub fn step_id(&self) -> Option<&str> {
        self.step_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Whether the item landed on a container rather than the step root.
    #[must_use]
    pub fn drops_into_container(&self) -> bool {
        self.dropped_on
            .as_ref()
            .is_some_and(|resource| is_container_kind(&resource.kind))
    }

    /// Container id if present and non-empty.
    #[must_use]
    pub fn container_id(&self) -> Option<&str> {
        self.dropped_on
            .as_ref()
            .map(|container| container.id.as_str())
            .filter(|id| !id.is_empty())
    }
}
