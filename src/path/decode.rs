use serde_json::{Map, Value};

use crate::form::error::FormError;

/// Splits `user[addresses_attributes][0][street]` into its keys.
///
/// A trailing `[]` becomes an empty key, meaning "append to a list".
pub fn split_name(name: &str) -> Result<Vec<String>, FormError> {
    let (base, mut rest) = match name.find('[') {
        Some(pos) => (&name[..pos], &name[pos..]),
        None => (name, ""),
    };

    if base.is_empty() {
        return Err(FormError::InvalidInput(format!(
            "parameter name '{}' has no base key",
            name
        )));
    }

    let mut keys = vec![base.to_string()];
    while !rest.is_empty() {
        let close = match (rest.starts_with('['), rest.find(']')) {
            (true, Some(close)) => close,
            _ => {
                return Err(FormError::InvalidInput(format!(
                    "unbalanced brackets in parameter name '{}'",
                    name
                )));
            }
        };
        keys.push(rest[1..close].to_string());
        rest = &rest[close + 1..];
    }

    if keys[..keys.len() - 1].iter().skip(1).any(|k| k.is_empty()) {
        return Err(FormError::InvalidInput(format!(
            "'[]' is only supported as the last segment of '{}'",
            name
        )));
    }

    Ok(keys)
}

/// Rebuilds the nested mapping a form submission encodes.
///
/// Index segments stay mapping keys (`"0"`), the way nested-attribute
/// decoders hand them to the server.
pub fn decode_pairs<'a, I>(pairs: I) -> Result<Value, FormError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut params = Map::new();
    for (name, value) in pairs {
        let keys = split_name(name)?;
        insert(&mut params, name, &keys, Value::String(value.to_string()))?;
    }
    Ok(Value::Object(params))
}

fn insert(target: &mut Map<String, Value>, name: &str, keys: &[String], value: Value) -> Result<(), FormError> {
    let key = &keys[0];

    match keys.get(1).map(String::as_str) {
        None => {
            if matches!(target.get(key), Some(Value::Object(_)) | Some(Value::Array(_))) {
                return Err(conflict(name));
            }
            target.insert(key.clone(), value);
            Ok(())
        }
        Some("") => {
            let slot = target.entry(key.clone()).or_insert_with(|| Value::Array(Vec::new()));
            match slot {
                Value::Array(items) => {
                    items.push(value);
                    Ok(())
                }
                _ => Err(conflict(name)),
            }
        }
        Some(_) => {
            let slot = target.entry(key.clone()).or_insert_with(|| Value::Object(Map::new()));
            match slot {
                Value::Object(child) => insert(child, name, &keys[1..], value),
                _ => Err(conflict(name)),
            }
        }
    }
}

fn conflict(name: &str) -> FormError {
    FormError::InvalidInput(format!(
        "parameter '{}' conflicts with an earlier parameter of a different shape",
        name
    ))
}
