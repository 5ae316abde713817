use std::fmt;

use serde::{Deserialize, Serialize};

use crate::form::error::FormError;
use crate::form::record::{Record, is_blank};
use crate::form::resolver::ObjectResolver;

// ============================================================================
// Handles and nesting descriptors
// ============================================================================

/// Handle of a node inside a `FormTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a non-root node hangs off its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nesting {
    /// Parent node in the same tree
    pub parent: NodeId,

    /// Field on the parent's record holding this child (`addresses`)
    pub association: String,

    /// Position inside a collection association; `None` for singular ones
    pub index: Option<usize>,
}

impl Nesting {
    pub fn new(parent: NodeId, association: impl Into<String>, index: Option<usize>) -> Self {
        Self {
            parent,
            association: association.into(),
            index,
        }
    }

    /// `addresses` -> `addresses_attributes`
    pub fn attributes_name(&self) -> String {
        format!("{}_attributes", self.association)
    }
}

/// Options fixed when a node is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormOptions {
    /// Prefix for element ids; honored on the root only. Default: none.
    pub namespace: Option<String>,

    /// Nesting context; absent on the root. Default: none.
    pub nested: Option<Nesting>,
}

impl FormOptions {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn nested(nesting: Nesting) -> Self {
        Self {
            namespace: None,
            nested: Some(nesting),
        }
    }
}

// ============================================================================
// Bound values
// ============================================================================

/// What a node is built from: a record, or a symbol naming one.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Concrete(Record),
    Placeholder(String),
}

impl From<Record> for BoundValue {
    fn from(record: Record) -> Self {
        BoundValue::Concrete(record)
    }
}

impl From<&str> for BoundValue {
    fn from(symbol: &str) -> Self {
        BoundValue::Placeholder(symbol.to_string())
    }
}

// ============================================================================
// FormNode
// ============================================================================

/// One level of a nested form. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FormNode {
    object: Record,
    model_name: String,
    options: FormOptions,
}

impl FormNode {
    /// Builds a node, resolving a placeholder through `resolver`.
    ///
    /// Fails with `InvalidInput` when `bound` is `None` or a blank
    /// placeholder. A placeholder's text becomes the model name as-is.
    pub fn new(
        bound: Option<BoundValue>,
        options: FormOptions,
        resolver: &dyn ObjectResolver,
    ) -> Result<Self, FormError> {
        let bound = bound.ok_or_else(|| {
            FormError::InvalidInput(
                "form object must not be empty; pass a placeholder symbol instead".to_string(),
            )
        })?;

        let (object, model_name) = match bound {
            BoundValue::Concrete(record) => {
                let name = record.model_name();
                if is_blank(&name) {
                    return Err(FormError::InvalidInput(
                        "bound record has no type name".to_string(),
                    ));
                }
                (record, name)
            }
            BoundValue::Placeholder(symbol) => {
                let symbol = symbol.trim().to_string();
                let record = resolver.resolve_or_create(&symbol)?;
                (record, symbol)
            }
        };

        Ok(Self {
            object,
            model_name,
            options,
        })
    }

    pub fn is_root(&self) -> bool {
        self.options.nested.is_none()
    }

    pub fn parent(&self) -> Result<NodeId, FormError> {
        self.nesting()
            .map(|n| n.parent)
            .ok_or_else(|| FormError::NoParent {
                model_name: self.model_name.clone(),
            })
    }

    pub fn association(&self) -> Option<&str> {
        self.nesting().map(|n| n.association.as_str())
    }

    pub fn index(&self) -> Option<usize> {
        self.nesting().and_then(|n| n.index)
    }

    pub fn nesting(&self) -> Option<&Nesting> {
        self.options.nested.as_ref()
    }

    pub fn namespace_option(&self) -> Option<&str> {
        self.options.namespace.as_deref()
    }

    pub fn object(&self) -> &Record {
        &self.object
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}
