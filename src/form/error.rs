use std::fmt;

use crate::form::form_node::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Node constructed with no bound object and no usable placeholder
    InvalidInput(String),

    /// `parent()` called on a root node
    NoParent { model_name: String },

    /// A nesting descriptor points at a parent that cannot be reached
    BrokenNestingChain { node: NodeId, reason: String },

    /// Handle does not belong to the tree it was used with
    UnknownNode(NodeId),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::InvalidInput(msg) => {
                write!(f, "Invalid form input: {}", msg)
            }
            FormError::NoParent { model_name } => {
                write!(f, "Form for '{}' is a root form and has no parent", model_name)
            }
            FormError::BrokenNestingChain { node, reason } => {
                write!(f, "Broken nesting chain at node {}: {}", node, reason)
            }
            FormError::UnknownNode(node) => {
                write!(f, "Node {} is not part of this form tree", node)
            }
        }
    }
}

impl std::error::Error for FormError {}
