use form_paths::form::error::FormError;
use form_paths::form::form_node::FormOptions;
use form_paths::form::record::Record;
use form_paths::form::resolver::DefaultResolver;
use form_paths::form::tree::Association;
use form_paths::path::resolver::resolve_name;
use serde_json::json;

use crate::common::utils::{root_tree_with, user_with_addresses};

mod common;

// =========================================================================
// Collection vs singular classification
// =========================================================================

#[test]
fn enumerable_association_yields_indexed_children() {
    let (mut tree, root) = root_tree_with(user_with_addresses(3), FormOptions::root());
    let children = tree
        .expand_association(root, "addresses", None, &DefaultResolver)
        .unwrap();

    assert_eq!(children.len(), 3);
    for (i, child) in children.iter().enumerate() {
        let node = tree.node(*child).unwrap();
        assert_eq!(node.index(), Some(i), "Index follows iteration order");
        assert_eq!(node.association(), Some("addresses"));
        assert_eq!(node.parent().unwrap(), root);
        assert_eq!(node.object().field_value("city"), format!("City {}", i));
    }

    assert_eq!(
        resolve_name(&tree, children[2], "street").unwrap(),
        "user[addresses_attributes][2][street]"
    );
}

#[test]
fn singular_association_yields_one_unindexed_child() {
    let user = Record::new("User").with("profile", json!({ "bio": "hello" }));
    let (mut tree, root) = root_tree_with(user, FormOptions::root());

    let children = tree
        .expand_association(root, "profile", None, &DefaultResolver)
        .unwrap();

    assert_eq!(children.len(), 1);
    let node = tree.node(children[0]).unwrap();
    assert_eq!(node.index(), None);
    assert_eq!(node.object().field_value("bio"), "hello");
    assert_eq!(
        resolve_name(&tree, children[0], "bio").unwrap(),
        "user[profile_attributes][bio]"
    );
}

#[test]
fn absent_association_yields_one_placeholder_child() {
    let user = Record::new("User").with("account", serde_json::Value::Null);
    let (mut tree, root) = root_tree_with(user, FormOptions::root());

    for association in ["account", "telephone"] {
        let children = tree
            .expand_association(root, association, None, &DefaultResolver)
            .unwrap();
        assert_eq!(children.len(), 1, "'{}' should yield one child", association);

        let node = tree.node(children[0]).unwrap();
        assert_eq!(node.index(), None);
        assert_eq!(node.model_name(), association);
        assert!(node.object().attributes.is_empty());
    }
}

#[test]
fn empty_collection_yields_no_children() {
    let (mut tree, root) = root_tree_with(user_with_addresses(0), FormOptions::root());
    let children = tree
        .expand_association(root, "addresses", None, &DefaultResolver)
        .unwrap();
    assert!(children.is_empty());
    assert_eq!(tree.len(), 1);
}

#[test]
fn explicit_instance_keeps_collection_indexing() {
    let (mut tree, root) = root_tree_with(user_with_addresses(2), FormOptions::root());
    let replacement = Record::new("Address").with("street", "Elm");

    let children = tree
        .expand_association(
            root,
            "addresses",
            Some(Association::One(Some(replacement))),
            &DefaultResolver,
        )
        .unwrap();

    assert_eq!(children.len(), 1);
    assert_eq!(tree.node(children[0]).unwrap().index(), Some(0));
    assert_eq!(tree.node(children[0]).unwrap().object().field_value("street"), "Elm");
}

#[test]
fn explicit_collection_on_singular_association_stays_unindexed() {
    let user = Record::new("User").with("profile", json!({ "bio": "x" }));
    let (mut tree, root) = root_tree_with(user, FormOptions::root());
    let explicit = Association::Many(vec![Record::new("Profile"), Record::new("Profile")]);

    let children = tree
        .expand_association(root, "profile", Some(explicit), &DefaultResolver)
        .unwrap();

    assert_eq!(children.len(), 2);
    assert!(children.iter().all(|c| tree.node(*c).unwrap().index().is_none()));
}

#[test]
fn children_can_be_expanded_further() {
    let user = Record::new("User").with(
        "addresses",
        json!([{ "phones": [{ "number": "1" }, { "number": "2" }] }]),
    );
    let (mut tree, root) = root_tree_with(user, FormOptions::root());

    let addresses = tree
        .expand_association(root, "addresses", None, &DefaultResolver)
        .unwrap();
    let phones = tree
        .expand_association(addresses[0], "phones", None, &DefaultResolver)
        .unwrap();

    assert_eq!(
        resolve_name(&tree, phones[1], "number").unwrap(),
        "user[addresses_attributes][0][phones_attributes][1][number]"
    );
}

// =========================================================================
// Rejected inputs
// =========================================================================

#[test]
fn plain_field_is_not_an_association() {
    let (mut tree, root) = root_tree_with(user_with_addresses(1), FormOptions::root());
    let result = tree.expand_association(root, "name", None, &DefaultResolver);
    assert!(matches!(result, Err(FormError::InvalidInput(_))));
}

#[test]
fn collection_of_scalars_is_rejected() {
    let user = Record::new("User").with("tags", json!(["a", "b"]));
    let (mut tree, root) = root_tree_with(user, FormOptions::root());
    let result = tree.expand_association(root, "tags", None, &DefaultResolver);
    assert!(matches!(result, Err(FormError::InvalidInput(_))));
}

#[test]
fn blank_association_name_is_rejected() {
    let (mut tree, root) = root_tree_with(user_with_addresses(1), FormOptions::root());
    let result = tree.expand_association(root, "", None, &DefaultResolver);
    assert!(matches!(result, Err(FormError::InvalidInput(_))));
}

#[test]
fn association_value_classifies_shapes() {
    let user = user_with_addresses(2).with("profile", json!({}));
    let (tree, root) = root_tree_with(user, FormOptions::root());

    assert!(tree.association_value(root, "addresses").unwrap().is_enumerable());
    assert!(!tree.association_value(root, "profile").unwrap().is_enumerable());
    assert_eq!(
        tree.association_value(root, "missing").unwrap(),
        Association::One(None)
    );
}
