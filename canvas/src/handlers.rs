//! Drag-drop handlers: resolve a drop into a new canvas state.
//!
//! DESIGN
//! ======
//! Each handler reads the current tree from the caller-owned `FlowGraph`,
//! builds a new tree with the pure helpers in [`crate::tree`], and commits it
//! through one of the graph's state setters. Malformed drops (no dragged
//! resource, no step, no container) are expected during normal UI use, so
//! they are not errors: the handler returns `DropOutcome::Skipped` with the
//! reason and commits nothing.
//!
//! Widgets bypass the element factory entirely. The injected loader returns
//! the full replacement step/edge set, an optional connection assigner runs
//! over it when the flow metadata lists executor connections, and the result
//! replaces the graph wholesale.

#[cfg(test)]
#[path = "handlers_test.rs"]
mod handlers_test;

use tracing::debug;

use crate::component::Component;
use crate::drag::{DragOrigin, DragSource, DropTarget};
use crate::factory::{DefaultResourceFactory, ResourceFactory};
use crate::flow::{FlowGraph, FlowMetadata};
use crate::resource::{Resource, ResourceType};
use crate::tree;
use crate::widget::{ConnectionAssigner, WidgetLoader};

// =============================================================================
// TYPES
// =============================================================================

/// Why a drop produced no change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("drop target has no step id")]
    MissingStep,
    #[error("drag carries no resource")]
    MissingDragged,
    #[error("drop target has no container id")]
    MissingContainer,
    #[error("step not found: {0}")]
    StepNotFound(String),
    #[error("container not found: {0}")]
    ContainerNotFound(String),
    #[error("component not found: {0}")]
    ComponentNotFound(String),
    #[error("no widget loader configured")]
    NoWidgetLoader,
    #[error("unsupported resource type for this drop: {0}")]
    UnsupportedResource(ResourceType),
    #[error("dragged item is not a canvas component")]
    NotMovable,
    #[error("cannot move {0} into itself")]
    InvalidMove(String),
    #[error("target step already holds component {0}")]
    DuplicateComponent(String),
}

/// What a drop did to the canvas state.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// A new element was placed in `step_id`.
    Inserted { step_id: String, component_id: String },
    /// An existing component was relocated.
    Moved { from_step: String, to_step: String, component_id: String },
    /// A new step was added to the graph.
    StepAdded { step_id: String },
    /// A widget replaced the graph's steps and edges.
    Expanded { created_step_id: Option<String> },
    /// Nothing was committed.
    Skipped(SkipReason),
}

impl DropOutcome {
    /// Whether the drop committed a new state.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Skipped(_))
    }

    #[must_use]
    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Skipped(reason) => Some(reason),
            _ => None,
        }
    }
}

type DroppedCallback = Box<dyn FnMut(&Resource)>;

/// Drop resolver configured with the caller's collaborators.
pub struct DragDropHandlers {
    factory: Box<dyn ResourceFactory>,
    widget_loader: Option<Box<dyn WidgetLoader>>,
    connection_assigner: Option<Box<dyn ConnectionAssigner>>,
    metadata: FlowMetadata,
    on_resource_dropped: Option<DroppedCallback>,
}

impl Default for DragDropHandlers {
    fn default() -> Self {
        Self::new()
    }
}

impl DragDropHandlers {
    /// Handlers using [`DefaultResourceFactory`] and no widget support.
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(DefaultResourceFactory)
    }

    #[must_use]
    pub fn with_factory(factory: impl ResourceFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            widget_loader: None,
            connection_assigner: None,
            metadata: FlowMetadata::default(),
            on_resource_dropped: None,
        }
    }

    #[must_use]
    pub fn widget_loader(mut self, loader: impl WidgetLoader + 'static) -> Self {
        self.widget_loader = Some(Box::new(loader));
        self
    }

    #[must_use]
    pub fn connection_assigner(mut self, assigner: impl ConnectionAssigner + 'static) -> Self {
        self.connection_assigner = Some(Box::new(assigner));
        self
    }

    #[must_use]
    pub fn metadata(mut self, metadata: FlowMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Called with the dropped resource after every successful insert, step
    /// creation, or widget expansion that reports a created resource.
    #[must_use]
    pub fn on_resource_dropped(mut self, callback: impl FnMut(&Resource) + 'static) -> Self {
        self.on_resource_dropped = Some(Box::new(callback));
        self
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Resolve a drop event, choosing the branch from the dragged resource
    /// type, its origin, and the target.
    pub fn handle_drop(&mut self, graph: &mut FlowGraph, source: &DragSource, target: &DropTarget) -> DropOutcome {
        let Some(dragged) = source.dragged.as_ref() else {
            return skip(SkipReason::MissingDragged);
        };
        if dragged.resource_type == ResourceType::Widget {
            return self.add_widget(graph, source, target);
        }
        if matches!(source.origin, DragOrigin::Canvas { .. }) {
            return self.move_component(graph, source, target);
        }
        match dragged.resource_type {
            ResourceType::Step => self.add_step(graph, source, target),
            ResourceType::Template | ResourceType::Widget => {
                skip(SkipReason::UnsupportedResource(dragged.resource_type))
            }
            ResourceType::Element => {
                let before = target.target_element_id.as_deref();
                match (target.drops_into_container(), before) {
                    (true, Some(before)) => self.add_to_form_at_index(graph, source, target, before),
                    (true, None) => self.add_to_form(graph, source, target),
                    (false, Some(before)) => self.add_to_view_at_index(graph, source, target, before),
                    (false, None) => self.add_to_view(graph, source, target),
                }
            }
        }
    }

    // =========================================================================
    // ELEMENT INSERTS
    // =========================================================================

    /// Append a new element to the root of the target step.
    pub fn add_to_view(&mut self, graph: &mut FlowGraph, source: &DragSource, target: &DropTarget) -> DropOutcome {
        let (step_id, dragged) = match require_step_and_dragged(source, target) {
            Ok(found) => found,
            Err(reason) => return skip(reason),
        };
        let Some(current) = graph.step_components(step_id) else {
            return skip(SkipReason::StepNotFound(step_id.to_owned()));
        };
        let element = self.factory.create_element(dragged);
        let dropped = Resource::from_component(&element);
        let next = tree::append(current, element);
        self.commit_element(graph, step_id, next, &dropped)
    }

    /// Append a new element to the container the drop landed on.
    pub fn add_to_form(&mut self, graph: &mut FlowGraph, source: &DragSource, target: &DropTarget) -> DropOutcome {
        let (step_id, dragged) = match require_step_and_dragged(source, target) {
            Ok(found) => found,
            Err(reason) => return skip(reason),
        };
        let Some(container_id) = target.container_id() else {
            return skip(SkipReason::MissingContainer);
        };
        let Some(current) = graph.step_components(step_id) else {
            return skip(SkipReason::StepNotFound(step_id.to_owned()));
        };
        if !tree::contains(current, container_id) {
            return skip(SkipReason::ContainerNotFound(container_id.to_owned()));
        }
        let element = self.factory.create_element(dragged);
        let dropped = Resource::from_component(&element);
        let Some(next) = tree::append_to_container(current, container_id, element) else {
            return skip(SkipReason::ContainerNotFound(container_id.to_owned()));
        };
        self.commit_element(graph, step_id, next, &dropped)
    }

    /// Insert a new element before root sibling `target_element_id`, or at
    /// the end of the root when that sibling doesn't exist.
    pub fn add_to_view_at_index(
        &mut self,
        graph: &mut FlowGraph,
        source: &DragSource,
        target: &DropTarget,
        target_element_id: &str,
    ) -> DropOutcome {
        let (step_id, dragged) = match require_step_and_dragged(source, target) {
            Ok(found) => found,
            Err(reason) => return skip(reason),
        };
        let Some(current) = graph.step_components(step_id) else {
            return skip(SkipReason::StepNotFound(step_id.to_owned()));
        };
        let element = self.factory.create_element(dragged);
        let dropped = Resource::from_component(&element);
        let next = tree::insert_before(current, target_element_id, element);
        self.commit_element(graph, step_id, next, &dropped)
    }

    /// Insert a new element before `target_element_id` inside the container
    /// the drop landed on, appending to that container when the sibling is
    /// missing.
    pub fn add_to_form_at_index(
        &mut self,
        graph: &mut FlowGraph,
        source: &DragSource,
        target: &DropTarget,
        target_element_id: &str,
    ) -> DropOutcome {
        let (step_id, dragged) = match require_step_and_dragged(source, target) {
            Ok(found) => found,
            Err(reason) => return skip(reason),
        };
        let Some(container_id) = target.container_id() else {
            return skip(SkipReason::MissingContainer);
        };
        let Some(current) = graph.step_components(step_id) else {
            return skip(SkipReason::StepNotFound(step_id.to_owned()));
        };
        if !tree::contains(current, container_id) {
            return skip(SkipReason::ContainerNotFound(container_id.to_owned()));
        }
        let element = self.factory.create_element(dragged);
        let dropped = Resource::from_component(&element);
        let Some(next) = tree::insert_into_container_before(current, container_id, target_element_id, element) else {
            return skip(SkipReason::ContainerNotFound(container_id.to_owned()));
        };
        self.commit_element(graph, step_id, next, &dropped)
    }

    fn commit_element(
        &mut self,
        graph: &mut FlowGraph,
        step_id: &str,
        next: Vec<Component>,
        dropped: &Resource,
    ) -> DropOutcome {
        graph.set_step_components(step_id, next);
        debug!(%step_id, component_id = %dropped.id, kind = %dropped.kind, "element dropped");
        self.notify(dropped);
        DropOutcome::Inserted { step_id: step_id.to_owned(), component_id: dropped.id.clone() }
    }

    // =========================================================================
    // MOVE
    // =========================================================================

    /// Relocate an existing component. The drag must originate on the canvas;
    /// placement follows the same rules as a fresh insert.
    pub fn move_component(&mut self, graph: &mut FlowGraph, source: &DragSource, target: &DropTarget) -> DropOutcome {
        let Some(dragged) = source.dragged.as_ref() else {
            return skip(SkipReason::MissingDragged);
        };
        let DragOrigin::Canvas { step_id: from_step } = &source.origin else {
            return skip(SkipReason::NotMovable);
        };
        let Some(to_step) = target.step_id() else {
            return skip(SkipReason::MissingStep);
        };
        let component_id = dragged.id.as_str();
        if target.target_element_id.as_deref() == Some(component_id) || target.container_id() == Some(component_id) {
            return skip(SkipReason::InvalidMove(component_id.to_owned()));
        }

        let Some(from_tree) = graph.step_components(from_step) else {
            return skip(SkipReason::StepNotFound(from_step.clone()));
        };
        let Some((without, moved)) = tree::remove(from_tree, component_id) else {
            return skip(SkipReason::ComponentNotFound(component_id.to_owned()));
        };
        if let Some(container_id) = target.container_id() {
            if tree::contains(moved.children(), container_id) {
                return skip(SkipReason::InvalidMove(component_id.to_owned()));
            }
        }

        let same_step = from_step == to_step;
        let base = if same_step {
            without.clone()
        } else {
            let Some(components) = graph.step_components(to_step) else {
                return skip(SkipReason::StepNotFound(to_step.to_owned()));
            };
            // Component ids are unique per step across the whole subtree.
            let clash = tree::collect_ids(std::slice::from_ref(&moved))
                .into_iter()
                .find(|id| tree::contains(components, id));
            if let Some(id) = clash {
                return skip(SkipReason::DuplicateComponent(id.to_owned()));
            }
            components.to_vec()
        };
        let placed = match place(&base, target, moved) {
            Ok(placed) => placed,
            Err(reason) => return skip(reason),
        };

        if !same_step {
            graph.set_step_components(from_step, without);
        }
        graph.set_step_components(to_step, placed);
        debug!(%from_step, %to_step, %component_id, "component moved");
        DropOutcome::Moved {
            from_step: from_step.clone(),
            to_step: to_step.to_owned(),
            component_id: component_id.to_owned(),
        }
    }

    // =========================================================================
    // STEPS AND WIDGETS
    // =========================================================================

    /// Add a new step to the graph at the drop position.
    pub fn add_step(&mut self, graph: &mut FlowGraph, source: &DragSource, target: &DropTarget) -> DropOutcome {
        let Some(dragged) = source.dragged.as_ref() else {
            return skip(SkipReason::MissingDragged);
        };
        if dragged.resource_type != ResourceType::Step {
            return skip(SkipReason::UnsupportedResource(dragged.resource_type));
        }
        let step = self
            .factory
            .create_step(dragged, target.position.unwrap_or_default());
        let step_id = step.id.clone();
        let dropped = Resource::from_step(&step);
        graph.add_step(step);
        debug!(%step_id, kind = %dropped.kind, "step added");
        self.notify(&dropped);
        DropOutcome::StepAdded { step_id }
    }

    /// Expand a widget through the injected loader and replace the graph with
    /// its output.
    pub fn add_widget(&mut self, graph: &mut FlowGraph, source: &DragSource, target: &DropTarget) -> DropOutcome {
        let Some(dragged) = source.dragged.as_ref() else {
            return skip(SkipReason::MissingDragged);
        };
        if dragged.resource_type != ResourceType::Widget {
            return skip(SkipReason::UnsupportedResource(dragged.resource_type));
        }
        let Some(loader) = self.widget_loader.as_ref() else {
            return skip(SkipReason::NoWidgetLoader);
        };

        let expansion = loader.load(dragged, target, graph.steps(), graph.edges());
        let (steps, edges) = match self.connection_assigner.as_ref() {
            Some(assigner) if self.metadata.has_executor_connections() => {
                assigner.assign(expansion.steps, expansion.edges, &self.metadata)
            }
            _ => (expansion.steps, expansion.edges),
        };
        graph.replace_all(steps, edges);
        debug!(widget = %dragged.kind, created_step_id = ?expansion.created_step_id, "widget expanded");

        if let Some(created) = expansion.created.as_ref() {
            self.notify(created);
        }
        DropOutcome::Expanded { created_step_id: expansion.created_step_id }
    }

    fn notify(&mut self, resource: &Resource) {
        if let Some(callback) = self.on_resource_dropped.as_mut() {
            callback(resource);
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn skip(reason: SkipReason) -> DropOutcome {
    debug!(%reason, "drop skipped");
    DropOutcome::Skipped(reason)
}

fn require_step_and_dragged<'a>(
    source: &'a DragSource,
    target: &'a DropTarget,
) -> Result<(&'a str, &'a Resource), SkipReason> {
    let step_id = target.step_id().ok_or(SkipReason::MissingStep)?;
    let dragged = source.dragged.as_ref().ok_or(SkipReason::MissingDragged)?;
    Ok((step_id, dragged))
}

/// Place `element` in `current` according to `target`.
fn place(current: &[Component], target: &DropTarget, element: Component) -> Result<Vec<Component>, SkipReason> {
    let before = target.target_element_id.as_deref();
    if !target.drops_into_container() {
        return Ok(match before {
            Some(before) => tree::insert_before(current, before, element),
            None => tree::append(current, element),
        });
    }
    let container_id = target.container_id().ok_or(SkipReason::MissingContainer)?;
    let placed = match before {
        Some(before) => tree::insert_into_container_before(current, container_id, before, element),
        None => tree::append_to_container(current, container_id, element),
    };
    placed.ok_or_else(|| SkipReason::ContainerNotFound(container_id.to_owned()))
}
