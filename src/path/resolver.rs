use serde::Serialize;

use crate::form::error::FormError;
use crate::form::form_node::{FormNode, Nesting, NodeId};
use crate::form::record::is_blank;
use crate::form::tree::FormTree;

// ============================================================================
// Wire names and element ids for form fields
// ============================================================================
//
// name: user[addresses_attributes][0][street]
// id:   user_addresses_attributes_0_street
//
// Both walk the same chain; the root contributes the model name (and, for
// ids, its namespace) and every nested level contributes its attributes
// segment followed by its index, if any.

/// Name and id of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPath {
    pub name: String,
    pub id: String,
}

/// Root node plus the nesting descriptors below it, in root-to-leaf order.
struct Chain<'a> {
    root: &'a FormNode,
    levels: Vec<&'a Nesting>,
}

fn chain<'a>(tree: &'a FormTree, node: NodeId) -> Result<Chain<'a>, FormError> {
    let ids = tree.ancestors(node)?;
    let mut levels = Vec::with_capacity(ids.len().saturating_sub(1));
    let mut root = tree.node(node)?;

    for id in ids.iter().rev() {
        let current = tree.node(*id)?;
        match current.nesting() {
            Some(nesting) => levels.push(nesting),
            None => root = current,
        }
    }

    Ok(Chain { root, levels })
}

/// Bracketed wire name; a blank `field` yields just the node's prefix.
pub fn resolve_name(tree: &FormTree, node: NodeId, field: &str) -> Result<String, FormError> {
    let chain = chain(tree, node)?;
    let mut name = chain.root.model_name().to_string();

    for nesting in &chain.levels {
        name.push('[');
        name.push_str(&nesting.attributes_name());
        name.push(']');
        if let Some(index) = nesting.index {
            name.push_str(&format!("[{}]", index));
        }
    }

    if !is_blank(field) {
        name.push_str(&format!("[{}]", field));
    }

    Ok(name)
}

/// Underscore-joined element id. `value` disambiguates variants of one
/// field (radio buttons); blank field or value segments are skipped.
pub fn resolve_id(
    tree: &FormTree,
    node: NodeId,
    field: &str,
    value: Option<&str>,
) -> Result<String, FormError> {
    let chain = chain(tree, node)?;
    let mut id = String::new();

    if let Some(namespace) = chain.root.namespace_option().filter(|ns| !is_blank(ns)) {
        id.push_str(namespace);
        id.push('_');
    }
    id.push_str(chain.root.model_name());

    for nesting in &chain.levels {
        id.push('_');
        id.push_str(&nesting.attributes_name());
        if let Some(index) = nesting.index {
            id.push_str(&format!("_{}", index));
        }
    }

    if !is_blank(field) {
        id.push('_');
        id.push_str(field);
    }

    if let Some(value) = value.filter(|v| !is_blank(v)) {
        id.push('_');
        id.push_str(value);
    }

    Ok(id)
}

pub fn field_path(tree: &FormTree, node: NodeId, field: &str) -> Result<FieldPath, FormError> {
    Ok(FieldPath {
        name: resolve_name(tree, node, field)?,
        id: resolve_id(tree, node, field, None)?,
    })
}
