use serde::Serialize;
use serde_json::Value;

use crate::form::error::FormError;
use crate::form::form_node::NodeId;
use crate::form::record::{Record, is_blank, value_text};
use crate::form::tree::FormTree;
use crate::path::resolver::{resolve_id, resolve_name};

// ============================================================================
// Host-supplied capabilities
// ============================================================================

/// Validation errors recorded against a field.
pub trait ErrorLookup {
    fn errors_for(&self, record: &Record, field: &str) -> Vec<String>;
}

/// Current value of a field; `Value::Null` when the record has none.
pub trait ValueAccessor {
    fn field_value(&self, record: &Record, field: &str) -> Value;
}

/// Reports no errors at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoErrors;

impl ErrorLookup for NoErrors {
    fn errors_for(&self, _record: &Record, _field: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Reads errors from an `errors` attribute shaped `{ field: [messages] }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeErrors;

impl ErrorLookup for AttributeErrors {
    fn errors_for(&self, record: &Record, field: &str) -> Vec<String> {
        match record.get("errors").and_then(|e| e.get(field)) {
            Some(Value::Array(messages)) => messages.iter().map(value_text).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(message) => vec![value_text(message)],
        }
    }
}

/// Reads values straight from the record's attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeValues;

impl ValueAccessor for AttributeValues {
    fn field_value(&self, record: &Record, field: &str) -> Value {
        record.get(field).cloned().unwrap_or(Value::Null)
    }
}

// ============================================================================
// Bindings
// ============================================================================

/// Everything a host needs to emit one field, minus the markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldBinding {
    pub name: String,
    pub id: String,
    pub value: String,
    pub invalid: bool,
    pub css_class: Option<String>,
}

/// One radio button or checkbox of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceBinding {
    pub caption: String,
    pub value: String,
    pub name: String,
    pub id: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceKind {
    /// One value per group; every variant shares the field name
    Radio,
    /// Many values per group; names end in `[]`
    CheckBox,
}

pub const DEFAULT_ERROR_CLASS: &str = "invalid";

/// Combines path resolution with the host's error and value capabilities.
pub struct Binder<'a> {
    tree: &'a FormTree,
    errors: &'a dyn ErrorLookup,
    values: &'a dyn ValueAccessor,
    error_class: String,
}

impl<'a> Binder<'a> {
    pub fn new(tree: &'a FormTree, errors: &'a dyn ErrorLookup, values: &'a dyn ValueAccessor) -> Self {
        Self {
            tree,
            errors,
            values,
            error_class: DEFAULT_ERROR_CLASS.to_string(),
        }
    }

    pub fn with_error_class(mut self, class: impl Into<String>) -> Self {
        self.error_class = class.into();
        self
    }

    pub fn tree(&self) -> &'a FormTree {
        self.tree
    }

    pub fn value_of(&self, node: NodeId, field: &str) -> Result<Value, FormError> {
        Ok(self.values.field_value(self.tree.node(node)?.object(), field))
    }

    pub fn is_invalid(&self, node: NodeId, field: &str) -> Result<bool, FormError> {
        Ok(!self.errors.errors_for(self.tree.node(node)?.object(), field).is_empty())
    }

    /// Binds a plain field; `class` is kept and the error class appended
    /// when the field has errors.
    pub fn bind_field(&self, node: NodeId, field: &str, class: Option<&str>) -> Result<FieldBinding, FormError> {
        let invalid = self.is_invalid(node, field)?;

        let css_class = match (class.filter(|c| !is_blank(c)), invalid) {
            (Some(class), true) => Some(format!("{} {}", class, self.error_class)),
            (None, true) => Some(self.error_class.clone()),
            (class, false) => class.map(str::to_string),
        };

        Ok(FieldBinding {
            name: resolve_name(self.tree, node, field)?,
            id: resolve_id(self.tree, node, field, None)?,
            value: value_text(&self.value_of(node, field)?),
            invalid,
            css_class,
        })
    }

    /// Binds a single radio button; its id carries the value.
    pub fn bind_radio(&self, node: NodeId, field: &str, value: &str) -> Result<ChoiceBinding, FormError> {
        Ok(ChoiceBinding {
            caption: value.to_string(),
            value: value.to_string(),
            name: resolve_name(self.tree, node, field)?,
            id: resolve_id(self.tree, node, field, Some(value))?,
            checked: self.values_match_field(node, field, value)?,
        })
    }

    /// Binds every `(caption, value)` variant of a radio or checkbox group.
    pub fn bind_choice_group(
        &self,
        node: NodeId,
        field: &str,
        variants: &[(String, String)],
        kind: ChoiceKind,
    ) -> Result<Vec<ChoiceBinding>, FormError> {
        let base_name = resolve_name(self.tree, node, field)?;
        let base_id = resolve_id(self.tree, node, field, None)?;
        let selected = selected_values(&self.value_of(node, field)?);

        let name = match kind {
            ChoiceKind::Radio => base_name,
            ChoiceKind::CheckBox => format!("{}[]", base_name),
        };

        Ok(variants
            .iter()
            .map(|(caption, value)| ChoiceBinding {
                caption: caption.clone(),
                value: value.clone(),
                name: name.clone(),
                id: format!("{}_{}", base_id, value),
                checked: selected.iter().any(|s| s == value),
            })
            .collect())
    }

    /// True when `value` is present and equals the field's value, or the
    /// field's value is `true`.
    pub fn values_match_field(&self, node: NodeId, field: &str, value: &str) -> Result<bool, FormError> {
        if is_blank(value) {
            return Ok(false);
        }
        let current = value_text(&self.value_of(node, field)?);
        Ok(current == value || current == "true")
    }

    /// Id of a persisted record bound to a nested node.
    pub fn nested_object_id(&self, node: NodeId) -> Result<Option<String>, FormError> {
        let form = self.tree.node(node)?;
        if form.is_root() || form.object().is_new_record() {
            return Ok(None);
        }
        Ok(form.object().id())
    }
}

fn selected_values(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(value_text).collect(),
        other => vec![value_text(other)],
    }
}
