pub mod error;
pub mod record;
pub mod resolver;
pub mod form_node;
pub mod tree;
