use serde_json::{Map, Value};

use crate::form::error::FormError;
use crate::form::form_node::{BoundValue, FormNode, FormOptions, Nesting, NodeId};
use crate::form::record::{Record, camelize, is_blank};
use crate::form::resolver::ObjectResolver;

// ============================================================================
// Association values
// ============================================================================

/// Value of an association field on a parent record.
#[derive(Debug, Clone, PartialEq)]
pub enum Association {
    /// Collection-valued: every element gets an index segment
    Many(Vec<Record>),

    /// Singular, possibly not yet present
    One(Option<Record>),
}

impl Association {
    pub fn is_enumerable(&self) -> bool {
        matches!(self, Association::Many(_))
    }
}

// ============================================================================
// FormTree — arena owning every node of one render pass
// ============================================================================

/// Owns all nodes of a render pass. Children refer to parents by `NodeId`,
/// and a parent is always inserted before its children, so every chain is
/// acyclic and ends at a root.
#[derive(Debug, Clone, Default)]
pub struct FormTree {
    nodes: Vec<FormNode>,
}

impl FormTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &FormNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Adds a top-level node.
    pub fn root(
        &mut self,
        bound: Option<BoundValue>,
        options: FormOptions,
        resolver: &dyn ObjectResolver,
    ) -> Result<NodeId, FormError> {
        if options.nested.is_some() {
            return Err(FormError::InvalidInput(
                "root form cannot carry a nesting descriptor".to_string(),
            ));
        }
        let node = FormNode::new(bound, options, resolver)?;
        Ok(self.insert(node))
    }

    /// Adds a child under an existing node.
    pub fn nest(
        &mut self,
        nesting: Nesting,
        bound: Option<BoundValue>,
        resolver: &dyn ObjectResolver,
    ) -> Result<NodeId, FormError> {
        let next = NodeId(self.nodes.len());
        check_nesting(next, &nesting, self.nodes.len())?;
        let node = FormNode::new(bound, FormOptions::nested(nesting), resolver)?;
        Ok(self.insert(node))
    }

    /// Appends an already-built node without checking its nesting; a broken
    /// descriptor surfaces when paths are resolved.
    pub fn insert(&mut self, node: FormNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Result<&FormNode, FormError> {
        self.nodes.get(id.0).ok_or(FormError::UnknownNode(id))
    }

    pub fn parent_of(&self, id: NodeId) -> Result<NodeId, FormError> {
        self.node(id)?.parent()
    }

    /// The chain from `id` up to its root, both inclusive, leaf first.
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>, FormError> {
        let mut chain = vec![id];
        let mut current = id;

        while let Some(nesting) = self.node(current)?.nesting() {
            check_nesting(current, nesting, current.0)?;
            current = nesting.parent;
            chain.push(current);
        }

        Ok(chain)
    }

    /// The root of the tree `id` belongs to.
    pub fn root_of(&self, id: NodeId) -> Result<NodeId, FormError> {
        let chain = self.ancestors(id)?;
        Ok(chain[chain.len() - 1])
    }

    pub fn depth(&self, id: NodeId) -> Result<usize, FormError> {
        Ok(self.ancestors(id)?.len() - 1)
    }

    /// Reads `association` off the parent's record.
    pub fn association_value(
        &self,
        parent: NodeId,
        association: &str,
    ) -> Result<Association, FormError> {
        let record = self.node(parent)?.object();

        match record.get(association) {
            None | Some(Value::Null) => Ok(Association::One(None)),
            Some(Value::Object(map)) => Ok(Association::One(Some(child_record(association, map)))),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(child_record(association, map)),
                    other => Err(FormError::InvalidInput(format!(
                        "collection '{}' holds a non-object element: {}",
                        association, other
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Association::Many),
            Some(other) => Err(FormError::InvalidInput(format!(
                "'{}' is a plain field, not an association: {}",
                association, other
            ))),
        }
    }

    /// Builds the child nodes for one association of `parent`.
    ///
    /// Index segments are decided here, once: they are present exactly when
    /// the parent's own association value is a collection. `explicit`
    /// replaces the children to bind but never changes that decision. An
    /// absent singular association still yields one child, resolved from a
    /// placeholder named after the association.
    pub fn expand_association(
        &mut self,
        parent: NodeId,
        association: &str,
        explicit: Option<Association>,
        resolver: &dyn ObjectResolver,
    ) -> Result<Vec<NodeId>, FormError> {
        if is_blank(association) {
            return Err(FormError::InvalidInput(
                "association name must not be blank".to_string(),
            ));
        }

        let default = self.association_value(parent, association)?;
        let include_index = default.is_enumerable();

        let children: Vec<BoundValue> = match explicit.unwrap_or(default) {
            Association::Many(records) => records.into_iter().map(BoundValue::Concrete).collect(),
            Association::One(Some(record)) => vec![BoundValue::Concrete(record)],
            Association::One(None) => vec![BoundValue::Placeholder(association.to_string())],
        };

        children
            .into_iter()
            .enumerate()
            .map(|(index, bound)| {
                let nesting = Nesting::new(parent, association, include_index.then_some(index));
                self.nest(nesting, Some(bound), resolver)
            })
            .collect()
    }
}

/// A parent must exist and precede its child; the association must be named.
fn check_nesting(node: NodeId, nesting: &Nesting, limit: usize) -> Result<(), FormError> {
    if nesting.parent.0 >= limit {
        return Err(FormError::BrokenNestingChain {
            node,
            reason: format!("parent {} is not an earlier node of this tree", nesting.parent),
        });
    }
    if is_blank(&nesting.association) {
        return Err(FormError::BrokenNestingChain {
            node,
            reason: "association name is missing".to_string(),
        });
    }
    Ok(())
}

fn child_record(association: &str, attributes: &Map<String, Value>) -> Record {
    Record {
        model: camelize(association),
        attributes: attributes.clone(),
    }
}
