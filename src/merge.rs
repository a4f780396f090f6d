//! Strict deep merge of user overrides into system defaults.
//!
//! Unlike a permissive overlay merge, overrides may only replace leaf
//! values that already exist in the system document. The merged result is
//! therefore always schema-complete: every system key present, no
//! structural drift between system and user configuration.

use crate::error::DefaultsError;
use serde_yaml::{Mapping, Value};

/// Deep-merge the partial `update` mapping into a copy of `base`.
///
/// Pure: `base` is never mutated. Recursing depth-first over `update`:
/// - a key absent from `base` is [`DefaultsError::UnknownOverrideKey`]
/// - a null base value adopts any non-mapping update as-is (null is the
///   placeholder for "slot declared, no value provided")
/// - a mapping/non-mapping kind change is
///   [`DefaultsError::OverrideTypeMismatch`]
/// - mappings recurse, leaves are replaced
pub fn merge_overrides(base: &Mapping, update: &Mapping) -> Result<Mapping, DefaultsError> {
    let mut merged = base.clone();
    merge_into(&mut merged, update, "")?;
    Ok(merged)
}

fn merge_into(base: &mut Mapping, update: &Mapping, at: &str) -> Result<(), DefaultsError> {
    for (key, update_value) in update {
        let label = join(at, key);

        let Some(base_value) = base.get_mut(key) else {
            return Err(DefaultsError::UnknownOverrideKey { path: label });
        };

        if base_value.is_null() && !update_value.is_mapping() {
            *base_value = update_value.clone();
            continue;
        }

        if base_value.is_mapping() != update_value.is_mapping() {
            return Err(DefaultsError::OverrideTypeMismatch { path: label });
        }

        match (base_value, update_value) {
            (Value::Mapping(base_inner), Value::Mapping(update_inner)) => {
                merge_into(base_inner, update_inner, &label)?;
            }
            (base_value, update_value) => *base_value = update_value.clone(),
        }
    }
    Ok(())
}

fn join(at: &str, key: &Value) -> String {
    let key = match key.as_str() {
        Some(s) => s.to_string(),
        None => format!("{key:?}"),
    };
    if at.is_empty() {
        key
    } else {
        format!("{at}/{key}")
    }
}
