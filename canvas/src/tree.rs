//! Pure operations over component trees.
//!
//! DESIGN
//! ======
//! Every mutation is a copy-on-write rebuild: the input slice is borrowed,
//! a fresh `Vec<Component>` is returned, and the caller decides whether to
//! commit it. All structural edits go through [`map_components`], a single
//! recursive map that visits children before their parent and applies an
//! updater to nodes matching a predicate. Insert, insert-before and remove
//! are thin layers over it.

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;

use std::collections::HashSet;

use crate::component::Component;

// =============================================================================
// TREE WALK
// =============================================================================

/// Rebuild `nodes`, applying `update` to every node for which `predicate`
/// holds. Children are rebuilt first, so the updater sees an already-mapped
/// subtree. Non-matching nodes come back equal to their input.
pub fn map_components<P, U>(nodes: &[Component], predicate: &P, update: &mut U) -> Vec<Component>
where
    P: Fn(&Component) -> bool,
    U: FnMut(Component) -> Component,
{
    nodes
        .iter()
        .map(|node| map_node(node, predicate, update))
        .collect()
}

fn map_node<P, U>(node: &Component, predicate: &P, update: &mut U) -> Component
where
    P: Fn(&Component) -> bool,
    U: FnMut(Component) -> Component,
{
    let next = Component {
        id: node.id.clone(),
        kind: node.kind.clone(),
        components: node
            .components
            .as_ref()
            .map(|children| map_components(children, predicate, update)),
        props: node.props.clone(),
    };
    if predicate(&next) { update(next) } else { next }
}

// =============================================================================
// LOOKUP
// =============================================================================

/// Depth-first search for the component with `id`.
#[must_use]
pub fn find<'a>(nodes: &'a [Component], id: &str) -> Option<&'a Component> {
    nodes.iter().find_map(|node| {
        if node.id == id {
            Some(node)
        } else {
            find(node.children(), id)
        }
    })
}

#[must_use]
pub fn contains(nodes: &[Component], id: &str) -> bool {
    find(nodes, id).is_some()
}

/// The list that directly holds `id`: the root or some container's children.
#[must_use]
pub fn siblings_of<'a>(nodes: &'a [Component], id: &str) -> Option<&'a [Component]> {
    if nodes.iter().any(|node| node.id == id) {
        return Some(nodes);
    }
    nodes.iter().find_map(|node| siblings_of(node.children(), id))
}

/// All ids in pre-order.
#[must_use]
pub fn collect_ids(nodes: &[Component]) -> Vec<&str> {
    let mut out = Vec::new();
    push_ids(nodes, &mut out);
    out
}

fn push_ids<'a>(nodes: &'a [Component], out: &mut Vec<&'a str>) {
    for node in nodes {
        out.push(node.id.as_str());
        push_ids(node.children(), out);
    }
}

/// Ids that occur more than once anywhere in the tree, in first-repeat order.
#[must_use]
pub fn duplicate_ids(nodes: &[Component]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dupes = Vec::new();
    for id in collect_ids(nodes) {
        if !seen.insert(id) && !dupes.iter().any(|d: &String| d == id) {
            dupes.push(id.to_owned());
        }
    }
    dupes
}

// =============================================================================
// INSERT
// =============================================================================

/// Append `element` to the root list.
#[must_use]
pub fn append(nodes: &[Component], element: Component) -> Vec<Component> {
    let mut next = nodes.to_vec();
    next.push(element);
    next
}

/// Insert `element` immediately before the sibling `target_id` in this flat
/// list. Appends when no sibling matches.
#[must_use]
pub fn insert_before(nodes: &[Component], target_id: &str, element: Component) -> Vec<Component> {
    let mut next = nodes.to_vec();
    match next.iter().position(|node| node.id == target_id) {
        Some(ix) => next.insert(ix, element),
        None => next.push(element),
    }
    next
}

/// Append `element` to the children of container `container_id`, at any
/// depth. Returns `None` when no such component exists.
#[must_use]
pub fn append_to_container(nodes: &[Component], container_id: &str, element: Component) -> Option<Vec<Component>> {
    place_in_container(nodes, container_id, |children| children.push(element))
}

/// Insert `element` before `target_id` inside container `container_id`,
/// appending to that container when the sibling is missing. Returns `None`
/// when the container does not exist.
#[must_use]
pub fn insert_into_container_before(
    nodes: &[Component],
    container_id: &str,
    target_id: &str,
    element: Component,
) -> Option<Vec<Component>> {
    place_in_container(nodes, container_id, |children| {
        match children.iter().position(|node| node.id == target_id) {
            Some(ix) => children.insert(ix, element),
            None => children.push(element),
        }
    })
}

fn place_in_container<F>(nodes: &[Component], container_id: &str, place: F) -> Option<Vec<Component>>
where
    F: FnOnce(&mut Vec<Component>),
{
    if !contains(nodes, container_id) {
        return None;
    }
    let mut place = Some(place);
    let next = map_components(nodes, &|node: &Component| node.id == container_id, &mut |mut node: Component| {
        if let Some(place) = place.take() {
            place(node.components.get_or_insert_with(Vec::new));
        }
        node
    });
    Some(next)
}

// =============================================================================
// REMOVE
// =============================================================================

/// Remove the component `id` from wherever it sits. Returns the rebuilt tree
/// and the detached subtree, or `None` when `id` is absent.
#[must_use]
pub fn remove(nodes: &[Component], id: &str) -> Option<(Vec<Component>, Component)> {
    let removed = find(nodes, id)?.clone();
    let holds_target = |node: &Component| node.children().iter().any(|child| child.id == id);
    let mapped = map_components(nodes, &holds_target, &mut |mut node: Component| {
        if let Some(children) = node.components.as_mut() {
            children.retain(|child| child.id != id);
        }
        node
    });
    let next = mapped.into_iter().filter(|node| node.id != id).collect();
    Some((next, removed))
}
