use std::collections::HashMap;

use crate::form::error::FormError;
use crate::form::record::{Record, camelize, is_blank};

// ============================================================================
// ObjectResolver trait — turns placeholder symbols into records
// ============================================================================

/// Resolves a placeholder symbol (`user`, `admin/account`) to a record.
///
/// Consulted once, when a node is built from a placeholder. `lookup` returns
/// an existing instance the host already holds; `instantiate` builds a fresh
/// default instance when there is none.
pub trait ObjectResolver {
    fn lookup(&self, placeholder: &str) -> Option<Record>;

    fn instantiate(&self, placeholder: &str) -> Result<Record, FormError>;

    fn resolve_or_create(&self, placeholder: &str) -> Result<Record, FormError> {
        if is_blank(placeholder) {
            return Err(FormError::InvalidInput(
                "placeholder symbol must not be blank".to_string(),
            ));
        }
        match self.lookup(placeholder) {
            Some(record) => Ok(record),
            None => self.instantiate(placeholder),
        }
    }
}

/// Knows no instances; every placeholder becomes an empty record whose type
/// is the camelized symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResolver;

impl ObjectResolver for DefaultResolver {
    fn lookup(&self, _placeholder: &str) -> Option<Record> {
        None
    }

    fn instantiate(&self, placeholder: &str) -> Result<Record, FormError> {
        let type_name = camelize(placeholder.trim());
        if type_name.is_empty() {
            return Err(FormError::InvalidInput(format!(
                "cannot derive a type name from placeholder '{}'",
                placeholder
            )));
        }
        Ok(Record::new(type_name))
    }
}

/// Holds instances registered by the host under their placeholder symbol.
#[derive(Debug, Clone, Default)]
pub struct RegistryResolver {
    instances: HashMap<String, Record>,
}

impl RegistryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, placeholder: impl Into<String>, record: Record) -> Self {
        self.instances.insert(placeholder.into(), record);
        self
    }
}

impl ObjectResolver for RegistryResolver {
    fn lookup(&self, placeholder: &str) -> Option<Record> {
        self.instances.get(placeholder).cloned()
    }

    fn instantiate(&self, placeholder: &str) -> Result<Record, FormError> {
        DefaultResolver.instantiate(placeholder)
    }
}
