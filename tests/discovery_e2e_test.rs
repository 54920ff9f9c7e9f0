mod fixtures;

use fixtures::sample_registry;
use test_discovery_core::descriptor::{DescriptorTree, NodeId, UniqueId};
use test_discovery_core::discovery::{discover, DiscoverySelector, FilterOutcome, Root};
use test_discovery_core::error::TreeError;

fn all_nodes(tree: &DescriptorTree) -> Vec<NodeId> {
    let mut nodes = vec![tree.root()];
    let mut cursor = 0;
    while cursor < nodes.len() {
        nodes.extend_from_slice(tree.children(nodes[cursor]));
        cursor += 1;
    }
    nodes
}

fn all_unique_ids(tree: &DescriptorTree) -> Vec<String> {
    all_nodes(tree)
        .into_iter()
        .filter_map(|n| tree.descriptor(n))
        .map(|d| d.unique_id().to_string())
        .collect()
}

fn selector(raw: &str) -> DiscoverySelector {
    DiscoverySelector::parse(raw).expect("valid selector")
}

fn uid(rendered: &str) -> UniqueId {
    rendered.parse().expect("valid unique id")
}

#[test]
fn test_class_selector_discovers_methods_and_nested_containers() {
    let registry = sample_registry();
    let tree = discover(
        &registry,
        "e1",
        "Engine One",
        &[selector("class:com.example.OuterTests")],
    )
    .unwrap();

    let ids = all_unique_ids(&tree);
    assert!(ids.contains(&"[engine:e1]/[class:com.example.OuterTests]".to_string()));
    assert!(ids.contains(&"[engine:e1]/[class:com.example.OuterTests]/[method:top()]".to_string()));
    assert!(ids.contains(
        &"[engine:e1]/[class:com.example.OuterTests]/[nested-class:InnerTests]".to_string()
    ));
    assert!(ids.contains(
        &"[engine:e1]/[class:com.example.OuterTests]/[nested-class:InnerTests]/[method:inner()]"
            .to_string()
    ));
}

#[test]
fn test_every_unique_id_appears_once() {
    let registry = sample_registry();
    let tree = discover(
        &registry,
        "e1",
        "Engine One",
        &[
            selector("class:com.example.CalculatorTests"),
            selector("class:com.example.OuterTests"),
            selector("method:com.example.CalculatorTests#add"),
        ],
    )
    .unwrap();

    let mut ids = all_unique_ids(&tree);
    let before = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), before);
}

#[test]
fn test_parent_identifier_prefixes_every_child() {
    let registry = sample_registry();
    let tree = discover(
        &registry,
        "e1",
        "Engine One",
        &[selector("class:com.example.OuterTests")],
    )
    .unwrap();

    for node in all_nodes(&tree) {
        let Some(parent) = tree.parent(node) else {
            continue;
        };
        let parent_id = tree.descriptor(parent).unwrap().unique_id().clone();
        let child_id = tree.descriptor(node).unwrap().unique_id();
        assert!(
            parent_id.is_prefix_of(child_id),
            "{parent_id} should prefix {child_id}"
        );
    }
}

#[test]
fn test_resolution_is_idempotent() {
    let registry = sample_registry();
    let once = discover(
        &registry,
        "e1",
        "Engine One",
        &[selector("class:com.example.CalculatorTests")],
    )
    .unwrap();
    let twice = discover(
        &registry,
        "e1",
        "Engine One",
        &[
            selector("class:com.example.CalculatorTests"),
            selector("class:com.example.CalculatorTests"),
        ],
    )
    .unwrap();

    assert_eq!(all_unique_ids(&once), all_unique_ids(&twice));
}

#[test]
fn test_overlapping_selectors_share_descriptors() {
    let registry = sample_registry();
    let tree = discover(
        &registry,
        "e1",
        "Engine One",
        &[
            selector("method:com.example.CalculatorTests#add"),
            selector("uid:[engine:e1]/[class:com.example.CalculatorTests]/[method:add()]"),
            selector("class:com.example.CalculatorTests"),
        ],
    )
    .unwrap();

    let calculator = tree
        .find_by_unique_id(&uid("[engine:e1]/[class:com.example.CalculatorTests]"))
        .unwrap();
    // add() once, subtract() once, private helper never
    assert_eq!(tree.children(calculator).len(), 2);
}

#[test]
fn test_method_uid_blocks_siblings_during_expansion() {
    let registry = sample_registry();
    let tree = discover(
        &registry,
        "e1",
        "Engine One",
        &[selector(
            "uid:[engine:e1]/[class:com.example.CalculatorTests]/[method:subtract()]",
        )],
    )
    .unwrap();

    let ids = all_unique_ids(&tree);
    assert!(ids.contains(
        &"[engine:e1]/[class:com.example.CalculatorTests]/[method:subtract()]".to_string()
    ));
    assert!(!ids
        .contains(&"[engine:e1]/[class:com.example.CalculatorTests]/[method:add()]".to_string()));
}

#[test]
fn test_class_selector_reopens_filtered_container() {
    let registry = sample_registry();
    let tree = discover(
        &registry,
        "e1",
        "Engine One",
        &[
            selector("uid:[engine:e1]/[class:com.example.CalculatorTests]/[method:subtract()]"),
            selector("class:com.example.CalculatorTests"),
        ],
    )
    .unwrap();

    let ids = all_unique_ids(&tree);
    assert!(ids
        .contains(&"[engine:e1]/[class:com.example.CalculatorTests]/[method:add()]".to_string()));
    assert!(ids.contains(
        &"[engine:e1]/[class:com.example.CalculatorTests]/[method:subtract()]".to_string()
    ));
}

#[test]
fn test_nested_uid_expands_only_the_requested_branch() {
    let registry = sample_registry();
    let tree = discover(
        &registry,
        "e1",
        "Engine One",
        &[selector(
            "uid:[engine:e1]/[class:com.example.OuterTests]/[nested-class:InnerTests]",
        )],
    )
    .unwrap();

    let ids = all_unique_ids(&tree);
    // the nested branch fully materializes
    assert!(ids.contains(
        &"[engine:e1]/[class:com.example.OuterTests]/[nested-class:InnerTests]/[method:inner()]"
            .to_string()
    ));
    assert!(ids.contains(
        &"[engine:e1]/[class:com.example.OuterTests]/[nested-class:InnerTests]/[method:deep()]"
            .to_string()
    ));
    // the sibling method of the outer container does not
    assert!(
        !ids.contains(&"[engine:e1]/[class:com.example.OuterTests]/[method:top()]".to_string())
    );
}

#[test]
fn test_same_method_name_in_two_containers_stays_separate() {
    let registry = sample_registry();
    let tree = discover(
        &registry,
        "e1",
        "Engine One",
        &[
            selector("method:com.example.CalculatorTests#add"),
            selector("method:com.example.StringTests#add"),
        ],
    )
    .unwrap();

    let ids = all_unique_ids(&tree);
    assert!(ids
        .contains(&"[engine:e1]/[class:com.example.CalculatorTests]/[method:add()]".to_string()));
    assert!(
        ids.contains(&"[engine:e1]/[class:com.example.StringTests]/[method:add()]".to_string())
    );
}

#[test]
fn test_foreign_engine_uid_is_ignored() {
    let registry = sample_registry();
    let tree = discover(
        &registry,
        "e1",
        "Engine One",
        &[selector(
            "uid:[engine:other]/[class:com.example.CalculatorTests]",
        )],
    )
    .unwrap();
    assert_eq!(tree.descriptor_count(), 1);
}

#[test]
fn test_abstract_container_is_not_discovered() {
    let registry = sample_registry();
    let tree = discover(
        &registry,
        "e1",
        "Engine One",
        &[selector("class:com.example.AbstractBase")],
    )
    .unwrap();
    assert_eq!(tree.descriptor_count(), 1);
}

#[test]
fn test_prune_drops_testless_branches_but_keeps_root() {
    let registry = sample_registry();
    let tree = discover(
        &registry,
        "e1",
        "Engine One",
        &[
            selector("class:com.example.PlainHolder"),
            selector("class:com.example.CalculatorTests"),
        ],
    )
    .unwrap();

    let mut root = Root::new();
    root.add(tree);
    root.prune();

    let tree = root.tree_for("e1").unwrap();
    let ids = all_unique_ids(tree);
    assert!(!ids.iter().any(|id| id.contains("PlainHolder")));
    assert!(ids.contains(&"[engine:e1]/[class:com.example.CalculatorTests]".to_string()));
    assert!(ids.contains(&"[engine:e1]".to_string()));
}

#[test]
fn test_post_discovery_filter_then_prune() {
    let registry = sample_registry();
    let tree = discover(
        &registry,
        "e1",
        "Engine One",
        &[selector("class:com.example.CalculatorTests")],
    )
    .unwrap();

    let mut root = Root::new();
    root.add(tree);
    let report = root.apply_post_discovery_filters(|tree, node| {
        let descriptor = tree.descriptor(node).unwrap();
        if descriptor.tags().contains("slow") {
            FilterOutcome::excluded("excluded because of the 'slow' tag")
        } else {
            FilterOutcome::Included
        }
    });
    root.prune();

    assert_eq!(report.total_excluded(), 1);
    let tree = root.tree_for("e1").unwrap();
    let ids = all_unique_ids(tree);
    assert!(!ids.iter().any(|id| id.contains("subtract")));
    assert!(ids
        .contains(&"[engine:e1]/[class:com.example.CalculatorTests]/[method:add()]".to_string()));
}

#[test]
fn test_root_descriptor_cannot_be_removed() {
    let registry = sample_registry();
    let mut tree = discover(
        &registry,
        "e1",
        "Engine One",
        &[selector("class:com.example.CalculatorTests")],
    )
    .unwrap();

    let before = all_unique_ids(&tree);
    let err = tree.remove_from_hierarchy(tree.root()).unwrap_err();
    assert!(matches!(err, TreeError::RootRemoval { .. }));
    assert_eq!(all_unique_ids(&tree), before);
}

#[test]
fn test_unloadable_selector_leaves_tree_usable() {
    let registry = sample_registry();
    let tree = discover(
        &registry,
        "e1",
        "Engine One",
        &[
            selector("class:com.example.Missing"),
            selector("class:com.example.StringTests"),
        ],
    )
    .unwrap();

    let ids = all_unique_ids(&tree);
    assert!(ids.contains(&"[engine:e1]/[class:com.example.StringTests]".to_string()));
}
