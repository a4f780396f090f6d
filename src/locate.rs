//! Path-based lookup inside a nested mapping.

use crate::error::DefaultsError;
use serde_yaml::{Mapping, Value};

/// Walk `path` one segment at a time starting at `mapping`.
///
/// Returns `Ok(None)` for the empty path: the caller already holds the
/// container, unchanged. On a missing segment the error carries the
/// cumulative traversed path (segments joined by `/`), so
/// `group1/subgroup1/missing` is distinguishable from a bare `missing`.
/// Walking into a non-mapping with a further segment is also
/// [`DefaultsError::ContentMissing`]: indexing is undefined there.
pub fn locate<'a>(
    mapping: &'a Mapping,
    path: &[&str],
) -> Result<Option<&'a Value>, DefaultsError> {
    let mut traversed = String::new();
    let mut current: Option<&Value> = None;

    for segment in path {
        if !traversed.is_empty() {
            traversed.push('/');
        }
        traversed.push_str(segment);

        let container = match current {
            None => Some(mapping),
            Some(value) => value.as_mapping(),
        };
        current = Some(
            container
                .and_then(|m| m.get(*segment))
                .ok_or_else(|| DefaultsError::ContentMissing {
                    path: traversed.clone(),
                })?,
        );
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Mapping {
        let doc = "
group1:
  subgroup1:
    default: default11
    value1: value111
global1: some-global-value
";
        serde_yaml::from_str(doc).unwrap()
    }

    #[test]
    fn test_empty_path_returns_none() {
        let mapping = sample();
        assert!(locate(&mapping, &[]).unwrap().is_none());
    }

    #[test]
    fn test_top_level_lookup() {
        let mapping = sample();
        let value = locate(&mapping, &["global1"]).unwrap().unwrap();
        assert_eq!(value, &Value::from("some-global-value"));
    }

    #[test]
    fn test_nested_lookup() {
        let mapping = sample();
        let value = locate(&mapping, &["group1", "subgroup1", "value1"])
            .unwrap()
            .unwrap();
        assert_eq!(value, &Value::from("value111"));
    }

    #[test]
    fn test_missing_segment_carries_cumulative_path() {
        let mapping = sample();
        let err = locate(&mapping, &["group1", "subgroup1", "missing"]).unwrap_err();
        match err {
            DefaultsError::ContentMissing { path } => {
                assert_eq!(path, "group1/subgroup1/missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_first_segment_is_bare() {
        let mapping = sample();
        let err = locate(&mapping, &["missing"]).unwrap_err();
        match err {
            DefaultsError::ContentMissing { path } => assert_eq!(path, "missing"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_indexing_into_leaf_is_content_missing() {
        let mapping = sample();
        let err = locate(&mapping, &["global1", "deeper"]).unwrap_err();
        match err {
            DefaultsError::ContentMissing { path } => {
                assert_eq!(path, "global1/deeper");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
