#![allow(dead_code)]

use form_paths::form::form_node::{BoundValue, FormOptions, Nesting, NodeId};
use form_paths::form::record::Record;
use form_paths::form::resolver::DefaultResolver;
use form_paths::form::tree::FormTree;
use serde_json::json;

/// Tree holding a single root bound to an empty record of `model`.
pub fn root_tree(model: &str) -> (FormTree, NodeId) {
    root_tree_with(Record::new(model), FormOptions::root())
}

pub fn root_tree_with(record: Record, options: FormOptions) -> (FormTree, NodeId) {
    let mut tree = FormTree::new();
    let root = tree
        .root(Some(BoundValue::Concrete(record)), options, &DefaultResolver)
        .unwrap();
    (tree, root)
}

/// Adds a child bound to a placeholder named after the association.
pub fn nest(tree: &mut FormTree, parent: NodeId, association: &str, index: Option<usize>) -> NodeId {
    tree.nest(
        Nesting::new(parent, association, index),
        Some(BoundValue::Placeholder(association.to_string())),
        &DefaultResolver,
    )
    .unwrap()
}

/// A user with `count` addresses; keys are written in sorted order.
pub fn user_with_addresses(count: usize) -> Record {
    let addresses: Vec<_> = (0..count)
        .map(|i| json!({ "city": format!("City {}", i), "street": format!("{} Main St", i) }))
        .collect();
    Record::new("User")
        .with("addresses", addresses)
        .with("name", "Ann")
}

pub fn temp_path(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("form_paths_tests");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}
