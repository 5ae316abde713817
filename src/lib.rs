//! Wire names and element ids for fields of nested forms.
//!
//! A render pass owns a [`form::tree::FormTree`]; every nested association
//! becomes a child node pointing at its parent by handle, and
//! [`path::resolver`] folds the chain from a node up to its root into
//! `user[addresses_attributes][0][street]` and
//! `user_addresses_attributes_0_street`.

pub mod binding;
pub mod cli;
pub mod form;
pub mod path;
pub mod render;
pub mod trace;

pub use form::error::FormError;
pub use form::form_node::{BoundValue, FormNode, FormOptions, Nesting, NodeId};
pub use form::record::Record;
pub use form::tree::{Association, FormTree};
pub use path::resolver::{FieldPath, field_path, resolve_id, resolve_name};
