//! Canvas core for the visual authentication-flow builder.
//!
//! This crate owns the data side of the flow composer: the component trees
//! each step renders, the drag-drop resolution that inserts and moves
//! components within those trees, widget expansion, and conversion between
//! the canvas graph and stored flow definitions. It has no UI dependencies;
//! the host wires drop events into [`handlers::DragDropHandlers`] and renders
//! whatever [`flow::FlowGraph`] holds.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`component`] | Component descriptors and typed property access |
//! | [`tree`] | Pure copy-on-write tree operations |
//! | [`resource`] | Draggable catalog entries |
//! | [`drag`] | Drag source / drop target descriptors |
//! | [`flow`] | Steps, edges, metadata and the caller-owned graph state |
//! | [`factory`] | Element and step construction with fresh ids |
//! | [`widget`] | Widget expansion and connection assignment seams |
//! | [`handlers`] | Drop resolution and commit |
//! | [`definition`] | Flow definition (JSON / YAML) conversion |
//! | [`consts`] | Shared kind, handle and property names |

pub mod component;
pub mod consts;
pub mod definition;
pub mod drag;
pub mod factory;
pub mod flow;
pub mod handlers;
pub mod resource;
pub mod tree;
pub mod widget;

pub use component::{Component, ComponentId};
pub use drag::{DragOrigin, DragSource, DropTarget};
pub use flow::{Edge, FlowGraph, FlowMetadata, Position, Step};
pub use handlers::{DragDropHandlers, DropOutcome, SkipReason};
pub use resource::{Resource, ResourceType};
