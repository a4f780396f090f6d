//! Structured document loading.
//!
//! Every defaults document is a YAML file whose root is a mapping holding
//! one required top-level key (`defaults`, or `config` for the specialized
//! component-location documents). The working document is the sub-mapping
//! under that key.

use crate::error::DefaultsError;
use serde_yaml::{Mapping, Value};
use std::io::ErrorKind;
use std::path::Path;

/// Top-level key of an ordinary defaults document.
pub const DEFAULTS_KEY: &str = "defaults";

/// Top-level key of a component config document.
pub const CONFIG_KEY: &str = "config";

/// Load the mapping found under `top_level_key` in the YAML file at `path`.
///
/// Fails with [`DefaultsError::SourceNotFound`] if the file does not exist
/// and with [`DefaultsError::FormatInvalid`] if the root is not a mapping or
/// the key is absent. A key explicitly set to null yields an empty mapping,
/// never null. Other I/O errors pass through unchanged.
pub fn load(path: &Path, top_level_key: &str) -> Result<Mapping, DefaultsError> {
    let text = std::fs::read_to_string(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            DefaultsError::SourceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DefaultsError::Io(err)
        }
    })?;

    let root: Value = serde_yaml::from_str(&text).map_err(|source| DefaultsError::Parse {
        origin: path.to_path_buf(),
        source,
    })?;

    let Value::Mapping(mut root) = root else {
        return Err(DefaultsError::FormatInvalid {
            origin: path.to_path_buf(),
            reason: "document root is not a mapping".to_string(),
        });
    };

    match root.remove(top_level_key) {
        None => Err(DefaultsError::FormatInvalid {
            origin: path.to_path_buf(),
            reason: format!("missing top-level key '{top_level_key}'"),
        }),
        // The file may contain nothing but the top-level key.
        Some(Value::Null) => Ok(Mapping::new()),
        Some(Value::Mapping(mapping)) => Ok(mapping),
        Some(_) => Err(DefaultsError::FormatInvalid {
            origin: path.to_path_buf(),
            reason: format!("value under '{top_level_key}' is not a mapping"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_document() {
        let file = write_temp("defaults:\n  alpha: 1\n  beta:\n    gamma: two\n");
        let mapping = load(file.path(), DEFAULTS_KEY).unwrap();
        assert_eq!(mapping.get("alpha"), Some(&Value::from(1)));
        assert!(mapping.get("beta").unwrap().is_mapping());
    }

    #[test]
    fn test_missing_file_is_source_not_found() {
        let err = load(Path::new("/nonexistent/defaults.yml"), DEFAULTS_KEY).unwrap_err();
        assert!(matches!(err, DefaultsError::SourceNotFound { .. }));
    }

    #[test]
    fn test_missing_top_level_key_is_format_invalid() {
        // Not ContentMissing: an absent top-level key means the file is not
        // a defaults document at all.
        let file = write_temp("other:\n  alpha: 1\n");
        let err = load(file.path(), DEFAULTS_KEY).unwrap_err();
        assert!(matches!(err, DefaultsError::FormatInvalid { .. }));
    }

    #[test]
    fn test_non_mapping_root_is_format_invalid() {
        let file = write_temp("- just\n- a\n- list\n");
        let err = load(file.path(), DEFAULTS_KEY).unwrap_err();
        assert!(matches!(err, DefaultsError::FormatInvalid { .. }));
    }

    #[test]
    fn test_null_top_level_value_yields_empty_mapping() {
        let file = write_temp("defaults:\n");
        let mapping = load(file.path(), DEFAULTS_KEY).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_non_mapping_top_level_value_is_format_invalid() {
        let file = write_temp("defaults: 42\n");
        let err = load(file.path(), DEFAULTS_KEY).unwrap_err();
        assert!(matches!(err, DefaultsError::FormatInvalid { .. }));
    }

    #[test]
    fn test_unparseable_yaml_is_parse_error() {
        let file = write_temp("defaults: [unclosed\n");
        let err = load(file.path(), DEFAULTS_KEY).unwrap_err();
        assert!(matches!(err, DefaultsError::Parse { .. }));
    }

    #[test]
    fn test_config_top_level_key() {
        let file = write_temp("config:\n  defaults:\n    name: tool.yml\n    install-dir:\n");
        let mapping = load(file.path(), CONFIG_KEY).unwrap();
        assert!(mapping.get("defaults").unwrap().is_mapping());
    }
}
