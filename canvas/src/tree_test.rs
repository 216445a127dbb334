use super::*;

fn leaf(id: &str) -> Component {
    Component::new(id, "TEXT")
}

fn block(id: &str, children: Vec<Component>) -> Component {
    Component::container(id, "BLOCK", children)
}

fn ids(nodes: &[Component]) -> Vec<&str> {
    nodes.iter().map(|node| node.id.as_str()).collect()
}

/// text_a, block_f1 { x, block_f2 { y } }, text_b
fn sample() -> Vec<Component> {
    vec![
        leaf("a"),
        block("f1", vec![leaf("x"), block("f2", vec![leaf("y")])]),
        leaf("b"),
    ]
}

// =============================================================
// map_components
// =============================================================

#[test]
fn map_without_matches_is_value_equal() {
    let nodes = sample();
    let mapped = map_components(&nodes, &|_: &Component| false, &mut |node: Component| node);
    assert_eq!(mapped, nodes);
}

#[test]
fn map_visits_nested_nodes() {
    let nodes = sample();
    let mapped = map_components(&nodes, &|node: &Component| node.id == "y", &mut |node: Component| {
        node.with_prop("touched", true)
    });
    let y = find(&mapped, "y").unwrap();
    assert_eq!(y.props.get("touched"), Some(&serde_json::Value::Bool(true)));
    assert!(find(&mapped, "x").unwrap().props.is_empty());
}

#[test]
fn map_leaves_input_untouched() {
    let nodes = sample();
    let before = nodes.clone();
    let _ = map_components(&nodes, &|_: &Component| true, &mut |node: Component| node.with_prop("k", 1));
    assert_eq!(nodes, before);
}

// =============================================================
// Lookup
// =============================================================

#[test]
fn find_at_any_depth() {
    let nodes = sample();
    assert_eq!(find(&nodes, "y").map(|node| node.kind.as_str()), Some("TEXT"));
    assert_eq!(find(&nodes, "f2").map(Component::is_container), Some(true));
    assert!(find(&nodes, "missing").is_none());
}

#[test]
fn collect_ids_is_preorder() {
    assert_eq!(collect_ids(&sample()), vec!["a", "f1", "x", "f2", "y", "b"]);
}

#[test]
fn duplicate_ids_across_depths() {
    let nodes = vec![leaf("a"), block("f1", vec![leaf("a"), leaf("c")]), leaf("c"), leaf("a")];
    assert_eq!(duplicate_ids(&nodes), vec!["a".to_owned(), "c".to_owned()]);
    assert!(duplicate_ids(&sample()).is_empty());
}

#[test]
fn siblings_of_returns_holding_list() {
    let nodes = sample();
    assert_eq!(ids(siblings_of(&nodes, "b").unwrap()), vec!["a", "f1", "b"]);
    assert_eq!(ids(siblings_of(&nodes, "x").unwrap()), vec!["x", "f2"]);
    assert!(siblings_of(&nodes, "nope").is_none());
}

// =============================================================
// Insert
// =============================================================

#[test]
fn append_grows_root_by_one_and_keeps_order() {
    let nodes = sample();
    let next = append(&nodes, leaf("new"));
    assert_eq!(next.len(), nodes.len() + 1);
    assert_eq!(ids(&next), vec!["a", "f1", "b", "new"]);
}

#[test]
fn insert_before_existing_sibling() {
    let nodes = vec![leaf("a"), leaf("b")];
    let next = insert_before(&nodes, "b", leaf("new"));
    assert_eq!(ids(&next), vec!["a", "new", "b"]);
}

#[test]
fn insert_before_first_sibling() {
    let nodes = vec![leaf("a"), leaf("b")];
    let next = insert_before(&nodes, "a", leaf("new"));
    assert_eq!(ids(&next), vec!["new", "a", "b"]);
}

#[test]
fn insert_before_missing_sibling_appends() {
    let nodes = vec![leaf("a"), leaf("b")];
    let next = insert_before(&nodes, "zzz", leaf("new"));
    assert_eq!(ids(&next), vec!["a", "b", "new"]);
}

#[test]
fn insert_before_into_empty_list() {
    let next = insert_before(&[], "a", leaf("new"));
    assert_eq!(ids(&next), vec!["new"]);
}

#[test]
fn append_to_container_top_level() {
    let nodes = vec![block("f1", vec![leaf("x")])];
    let next = append_to_container(&nodes, "f1", leaf("new")).unwrap();
    assert_eq!(ids(next[0].children()), vec!["x", "new"]);
}

#[test]
fn append_to_nested_container_only_touches_that_container() {
    let nodes = sample();
    let next = append_to_container(&nodes, "f2", leaf("new")).unwrap();

    let f2 = find(&next, "f2").unwrap();
    assert_eq!(ids(f2.children()), vec!["y", "new"]);

    // Siblings and their subtrees come back equal.
    assert_eq!(next[0], nodes[0]);
    assert_eq!(next[2], nodes[2]);
    assert_eq!(find(&next, "x"), find(&nodes, "x"));
    assert_eq!(ids(next[1].children()), vec!["x", "f2"]);
}

#[test]
fn append_to_container_creates_missing_children_list() {
    let nodes = vec![Component::new("f1", "BLOCK")];
    let next = append_to_container(&nodes, "f1", leaf("new")).unwrap();
    assert_eq!(ids(next[0].children()), vec!["new"]);
}

#[test]
fn append_to_missing_container_is_none() {
    assert!(append_to_container(&sample(), "nope", leaf("new")).is_none());
}

#[test]
fn insert_into_container_before_sibling() {
    let nodes = sample();
    let next = insert_into_container_before(&nodes, "f1", "f2", leaf("new")).unwrap();
    assert_eq!(ids(find(&next, "f1").unwrap().children()), vec!["x", "new", "f2"]);
}

#[test]
fn insert_into_container_before_missing_sibling_appends() {
    let nodes = sample();
    let next = insert_into_container_before(&nodes, "f1", "b", leaf("new")).unwrap();
    // "b" lives at the root, not in f1, so the element lands at the end of f1.
    assert_eq!(ids(find(&next, "f1").unwrap().children()), vec!["x", "f2", "new"]);
    assert_eq!(ids(&next), vec!["a", "f1", "b"]);
}

// =============================================================
// Remove
// =============================================================

#[test]
fn remove_root_component() {
    let (next, removed) = remove(&sample(), "a").unwrap();
    assert_eq!(removed.id, "a");
    assert_eq!(ids(&next), vec!["f1", "b"]);
}

#[test]
fn remove_nested_returns_subtree() {
    let (next, removed) = remove(&sample(), "f2").unwrap();
    assert_eq!(ids(removed.children()), vec!["y"]);
    assert_eq!(ids(find(&next, "f1").unwrap().children()), vec!["x"]);
    assert!(!contains(&next, "y"));
}

#[test]
fn remove_missing_is_none() {
    assert!(remove(&sample(), "nope").is_none());
}
