use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

static ACRONYM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").unwrap());
static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z\d])([A-Z])").unwrap());

/// A concrete data object bound to one level of a form.
///
/// `model` is the runtime type name (`User`, `Admin::UserProfile`); the
/// attribute map holds scalar fields as well as nested associations, which
/// are JSON objects (singular) or arrays of objects (collections).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub model: String,

    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl Record {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            attributes: Map::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// Wire model name derived from the runtime type.
    pub fn model_name(&self) -> String {
        model_name_for(&self.model)
    }

    /// Current value of a field as text, empty when the field is absent.
    pub fn field_value(&self, field: &str) -> String {
        self.get(field).map(value_text).unwrap_or_default()
    }

    pub fn is_new_record(&self) -> bool {
        match self.get("new_record") {
            Some(Value::Bool(flag)) => *flag,
            _ => self.id().is_none(),
        }
    }

    pub fn id(&self) -> Option<String> {
        match self.get("id") {
            None | Some(Value::Null) => None,
            Some(v) => Some(value_text(v)),
        }
    }
}

/// `Admin::UserProfile` -> `admin_user_profile`
pub fn model_name_for(type_name: &str) -> String {
    underscore(type_name).replace('/', "_")
}

/// Snake-cases a type path, turning `::` into `/`.
pub fn underscore(camel: &str) -> String {
    let word = camel.replace("::", "/");
    let word = ACRONYM_BOUNDARY.replace_all(&word, "${1}_${2}");
    let word = WORD_BOUNDARY.replace_all(&word, "${1}_${2}");
    word.replace('-', "_").to_lowercase()
}

/// `admin/user_profile` -> `Admin::UserProfile`
pub fn camelize(snake: &str) -> String {
    snake
        .split('/')
        .map(|segment| {
            segment
                .split('_')
                .filter(|part| !part.is_empty())
                .map(capitalize)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("::")
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Text rendering of an attribute value; null renders empty.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Blank means empty or whitespace only.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
